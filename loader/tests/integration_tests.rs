use std::path::Path;

use command_grammar_core::{CommandSpec, GrammarDocument, GrammarError, OptionSpec};
use command_grammar_loader::{
    GrammarFormat, GrammarLoader, LoadError, load_document, load_grammar, parse_grammar,
    save_document,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sample_document() -> GrammarDocument {
    GrammarDocument::new()
        .with_command(
            CommandSpec::new("list")
                .default_command()
                .with_option(OptionSpec::new("filespec").required().with_default("*.csv"))
                .with_option(OptionSpec::new("-all").flag()),
        )
        .with_command(
            CommandSpec::new("delete")
                .allow_multiple()
                .with_option(OptionSpec::new("filespec").required()),
        )
        .with_global_option(OptionSpec::new("--repeat").allow_multiple())
}

fn write(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

#[test]
fn test_json_and_yaml_files_agree() {
    let dir = tempfile::tempdir().unwrap();
    let document = sample_document();

    let json = dir.path().join("grammar.json");
    let yaml = dir.path().join("grammar.yml");
    save_document(&document, &json).unwrap();
    save_document(&document, &yaml).unwrap();

    assert_eq!(load_document(&json).unwrap(), load_document(&yaml).unwrap());

    let grammar = load_grammar(&yaml).unwrap();
    assert_eq!(grammar.commands().len(), 2);
    assert_eq!(grammar.default_commands().collect::<Vec<_>>(), vec![0]);
    assert!(grammar.command(1).allow_multiple);
}

#[test]
fn test_hand_written_yaml_with_root() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "grammar.yaml",
        r#"
config:
  commands:
    - name: list
      is_default: true
      allow-multiple: false
      options:
        - name: filespec
          required: true
          default_value: "*.zip"
  options:
    - name: --repeat
      is-flag: true
      default-value: "on"
"#,
    );

    let grammar = load_grammar(&path).unwrap();
    let list = grammar.command_index("LIST").unwrap();
    assert_eq!(
        grammar.command(list).options[0].default_value.as_deref(),
        Some("*.zip")
    );
    let repeat = grammar.global_option_index("--repeat").unwrap();
    assert_eq!(grammar.global_option(repeat).flag_value(), "on");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_grammar(dir.path().join("absent.json"));
    assert!(matches!(result, Err(LoadError::Io(_))));
}

// ---------------------------------------------------------------------------
// Structural validation
// ---------------------------------------------------------------------------

#[test]
fn test_grammar_errors_surface_through_loader() {
    let cases = [
        (
            r#"{ "commands": [{ "name": "list" }, { "name": "List" }] }"#,
            GrammarError::DuplicateCommand("List".to_string()),
        ),
        (
            r#"{ "commands": [
                { "name": "list", "is_default": true },
                { "name": "copy", "is_default": true }
            ] }"#,
            GrammarError::MultipleDefaultCommands,
        ),
        (
            r#"{ "commands": [{ "name": "list" }], "options": [{ "name": "list" }] }"#,
            GrammarError::GlobalOptionShadowsCommand("list".to_string()),
        ),
        (
            r#"{ "commands": [{ "name": "list", "options": [
                { "name": "-all", "is_flag": true, "allow_multiple": true }
            ] }] }"#,
            GrammarError::FlagAllowsMultiple("-all".to_string()),
        ),
        (
            r#"{ "options": [{ "name": "--a" }, { "name": "--A" }] }"#,
            GrammarError::DuplicateOption {
                command: None,
                option: "--A".to_string(),
            },
        ),
    ];

    for (json, expected) in cases {
        match parse_grammar(json, GrammarFormat::Json) {
            Err(LoadError::Grammar(err)) => assert_eq!(err, expected),
            other => panic!("expected {expected:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_error_messages() {
    let err = parse_grammar(
        r#"{ "options": [{ "name": "--x", "required": true }] }"#,
        GrammarFormat::Json,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid grammar: global option '--x' cannot be flagged as required"
    );

    let err = load_grammar("grammar.toml").unwrap_err();
    assert_eq!(err.to_string(), "unsupported grammar format: grammar.toml");
}

// ---------------------------------------------------------------------------
// Builder fallback chain
// ---------------------------------------------------------------------------

#[test]
fn test_builder_prefers_first_valid_source() {
    let dir = tempfile::tempdir().unwrap();
    let first = write(
        dir.path(),
        "first.json",
        r#"{ "commands": [{ "name": "first" }] }"#,
    );
    let second = write(
        dir.path(),
        "second.json",
        r#"{ "commands": [{ "name": "second" }] }"#,
    );

    let grammar = GrammarLoader::new()
        .from_file(&first)
        .from_file(&second)
        .build()
        .unwrap();
    assert!(grammar.command_index("first").is_some());
    assert!(grammar.command_index("second").is_none());
}

#[test]
fn test_builder_skips_invalid_grammar() {
    let dir = tempfile::tempdir().unwrap();
    let invalid = write(
        dir.path(),
        "invalid.json",
        r#"{ "options": [{ "name": "--x", "required": true }] }"#,
    );

    let loader = GrammarLoader::new()
        .from_file(&invalid)
        .from_text(GrammarFormat::Json, r#"{ "commands": [{ "name": "ok" }] }"#);
    assert_eq!(loader.sources().len(), 2);

    let grammar = loader.build().unwrap();
    assert!(grammar.command_index("ok").is_some());
}

// ---------------------------------------------------------------------------
// XML grammars
// ---------------------------------------------------------------------------

#[test]
fn test_xml_file_without_wrapper() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "quotes.xml",
        "
        <command name='list' is_default='false' allow_multiple='false'>
            <option name='filename' required='false' allow_multiple='false' />
            <option name='action' required='false' allow_multiple='false' />
            <option name='delete' required='false' allow_multiple='false' />
        </command>",
    );

    let grammar = load_grammar(&path).unwrap();
    let list = grammar.command_index("LIST").unwrap();
    assert_eq!(
        grammar.command(list).option_names(),
        vec!["filename", "action", "delete"]
    );
    assert_eq!(grammar.default_commands().count(), 0);
    assert!(grammar.global_options().is_empty());
}

#[test]
fn test_xml_matches_json_grammar() {
    let xml = parse_grammar(
        "
        <xml>
            <command name='list' is_default='true'>
                <option name='filespec' required='true' default_value='*.csv' />
                <option name='-all' is-flag='true' />
            </command>
            <command name='delete' allow-multiple='true'>
                <option name='filespec' required='true' />
            </command>
            <option name='--repeat' allow_multiple='true' />
        </xml>",
        GrammarFormat::Xml,
    )
    .unwrap();

    assert_eq!(xml.to_document(), sample_document());
}

#[test]
fn test_xml_grammar_errors_surface_through_loader() {
    let cases = [
        (
            "<xml>
                <command name='list' is_default='true' />
                <command name='list' is_default='false' allow_multiple='false' />
            </xml>",
            GrammarError::DuplicateCommand("list".to_string()),
        ),
        (
            "<xml>
                <command name='list' is_default='true' />
                <option name='filespec' default_value='*.txt' />
                <option name='another' default_value='*.txt' />
                <option name='filespec' default_value='*.txt' />
            </xml>",
            GrammarError::DuplicateOption {
                command: None,
                option: "filespec".to_string(),
            },
        ),
        (
            "<xml>
                <command name='list' is_default='true' />
                <option name='list' default_value='*.txt' />
            </xml>",
            GrammarError::GlobalOptionShadowsCommand("list".to_string()),
        ),
        (
            "<xml>
                <command name='list' is_default='true' />
                <option name='revise' required='true' default_value='*.txt' />
            </xml>",
            GrammarError::RequiredGlobalOption("revise".to_string()),
        ),
        (
            "<xml>
                <command name='list' is_default='true' />
                <command name='clone' is_default='true' />
            </xml>",
            GrammarError::MultipleDefaultCommands,
        ),
        (
            "<xml><command name=' '><option name='x' /></command></xml>",
            GrammarError::EmptyCommandName,
        ),
    ];

    for (xml, expected) in cases {
        match parse_grammar(xml, GrammarFormat::Xml) {
            Err(LoadError::Grammar(err)) => assert_eq!(err, expected),
            other => panic!("expected {expected:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_malformed_xml_is_rejected() {
    // unclosed command element
    let unclosed = "
        <xml>
        <command name='list' is_default='true'>
            <option name='filespec' default_value='*.txt' />
        </xml>";
    assert!(matches!(
        parse_grammar(unclosed, GrammarFormat::Xml),
        Err(LoadError::Xml(_))
    ));

    // two root elements
    let two_roots = "
        <command name='list' is_default='true' />
        <command name='other' />";
    assert!(matches!(
        parse_grammar(two_roots, GrammarFormat::Xml),
        Err(LoadError::Xml(_))
    ));
}
