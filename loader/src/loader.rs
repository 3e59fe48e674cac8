//! Grammar loading with format detection and fallback chains.
//!
//! A grammar document is a JSON, YAML or XML description of commands and
//! global options. JSON and YAML may optionally be wrapped in a single root
//! key of any name:
//!
//! ```yaml
//! grammar:
//!   commands:
//!     - name: list
//!       is-default: true
//!       options:
//!         - name: filespec
//!           default-value: "*.csv"
//!   options:
//!     - name: --repeat
//!       is-flag: true
//! ```
//!
//! The same grammar as XML, where a single wrapping element is optional and
//! `option` elements outside any `command` are global:
//!
//! ```xml
//! <grammar>
//!   <command name='list' is-default='true'>
//!     <option name='filespec' default-value='*.csv' />
//!   </command>
//!   <option name='--repeat' is-flag='true' />
//! </grammar>
//! ```
//!
//! # Loading patterns
//!
//! ```no_run
//! use command_grammar_loader::{GrammarLoader, load_grammar};
//!
//! // Load one file, format picked from the extension
//! let grammar = load_grammar("grammar.yaml").unwrap();
//!
//! // Use the builder for a fallback chain
//! let grammar = GrammarLoader::new()
//!     .from_file("/etc/tool/grammar.yaml")
//!     .from_file("grammar.json")
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use command_grammar_core::{Grammar, GrammarDocument};
use tracing::debug;

use crate::error::{LoadError, Result};
use crate::xml::{parse_xml, to_xml};

/// Serialization format of a grammar document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarFormat {
    Json,
    Yaml,
    Xml,
}

impl GrammarFormat {
    /// Picks the format from a file extension (`json`, `yaml`, `yml`, `xml`).
    ///
    /// # Examples
    ///
    /// ```
    /// use command_grammar_loader::GrammarFormat;
    ///
    /// assert_eq!(GrammarFormat::from_path("a/grammar.YML"), Some(GrammarFormat::Yaml));
    /// assert_eq!(GrammarFormat::from_path("grammar.json"), Some(GrammarFormat::Json));
    /// assert_eq!(GrammarFormat::from_path("grammar.XML"), Some(GrammarFormat::Xml));
    /// assert_eq!(GrammarFormat::from_path("grammar.toml"), None);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }
}

fn is_section(key: &str) -> bool {
    key == "commands" || key == "options"
}

/// Strips a single arbitrary-named root key wrapping the document.
fn unwrap_json_root(value: serde_json::Value) -> serde_json::Value {
    if let serde_json::Value::Object(map) = &value {
        if map.len() == 1 {
            if let Some((key, inner)) = map.iter().next() {
                if !is_section(key) && inner.is_object() {
                    return inner.clone();
                }
            }
        }
    }
    value
}

fn unwrap_yaml_root(value: serde_yaml::Value) -> serde_yaml::Value {
    if let serde_yaml::Value::Mapping(map) = &value {
        if map.len() == 1 {
            if let Some((key, inner)) = map.iter().next() {
                let named_section = key.as_str().is_some_and(is_section);
                if !named_section && inner.is_mapping() {
                    return inner.clone();
                }
            }
        }
    }
    value
}

/// Parses a grammar document from text without validating it.
pub fn parse_document(text: &str, format: GrammarFormat) -> Result<GrammarDocument> {
    let document = match format {
        GrammarFormat::Json => {
            let value: serde_json::Value = serde_json::from_str(text)?;
            serde_json::from_value(unwrap_json_root(value))?
        }
        GrammarFormat::Yaml => {
            let value: serde_yaml::Value = serde_yaml::from_str(text)?;
            serde_yaml::from_value(unwrap_yaml_root(value))?
        }
        GrammarFormat::Xml => parse_xml(text)?,
    };
    Ok(document)
}

/// Parses and validates a grammar from text.
///
/// # Examples
///
/// ```
/// use command_grammar_loader::{GrammarFormat, parse_grammar};
///
/// let grammar = parse_grammar(
///     r#"{ "xml": { "commands": [{ "name": "list", "is-default": true }] } }"#,
///     GrammarFormat::Json,
/// )
/// .unwrap();
/// assert_eq!(grammar.default_commands().count(), 1);
/// ```
pub fn parse_grammar(text: &str, format: GrammarFormat) -> Result<Grammar> {
    Ok(Grammar::new(parse_document(text, format)?)?)
}

fn format_for(path: &Path) -> Result<GrammarFormat> {
    GrammarFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))
}

/// Reads a grammar document from a file without validating it.
///
/// # Errors
///
/// Returns [`LoadError::UnsupportedFormat`] for unknown extensions,
/// [`LoadError::Io`] if the file cannot be read, or a JSON/YAML error if it
/// does not parse.
pub fn load_document(path: impl AsRef<Path>) -> Result<GrammarDocument> {
    let path = path.as_ref();
    let format = format_for(path)?;
    let text = std::fs::read_to_string(path)?;
    parse_document(&text, format)
}

/// Reads and validates a grammar from a file.
pub fn load_grammar(path: impl AsRef<Path>) -> Result<Grammar> {
    Ok(Grammar::new(load_document(path)?)?)
}

/// Writes a grammar document to a file in the format named by its extension.
pub fn save_document(document: &GrammarDocument, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let text = match format_for(path)? {
        GrammarFormat::Json => serde_json::to_string_pretty(document)?,
        GrammarFormat::Yaml => serde_yaml::to_string(document)?,
        GrammarFormat::Xml => to_xml(document),
    };
    std::fs::write(path, text)?;
    Ok(())
}

/// One place a grammar can come from.
#[derive(Debug, Clone)]
pub enum GrammarSource {
    /// A JSON, YAML or XML file.
    File(PathBuf),
    /// Text supplied by the caller.
    Inline { format: GrammarFormat, text: String },
}

impl GrammarSource {
    fn load(&self) -> Result<Grammar> {
        match self {
            Self::File(path) => load_grammar(path),
            Self::Inline { format, text } => parse_grammar(text, *format),
        }
    }
}

impl fmt::Display for GrammarSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Inline { format, .. } => write!(f, "inline {format:?}"),
        }
    }
}

/// Builder for loading a [`Grammar`] from a fallback chain of sources.
///
/// Sources are tried in the order they are added. The first one that loads
/// and validates wins; if all fail, [`LoadError::NoSourcesAvailable`] is
/// returned.
///
/// # Example
///
/// ```
/// use command_grammar_loader::{GrammarFormat, GrammarLoader};
///
/// let grammar = GrammarLoader::new()
///     .from_file("/nonexistent/grammar.yaml")
///     .from_text(GrammarFormat::Yaml, "commands:\n  - name: list\n")
///     .build()
///     .unwrap();
/// assert!(grammar.command_index("list").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GrammarLoader {
    sources: Vec<GrammarSource>,
}

impl GrammarLoader {
    /// Creates a new loader with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a grammar file as a source.
    pub fn from_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(GrammarSource::File(path.into()));
        self
    }

    /// Adds in-memory grammar text as a source.
    pub fn from_text(mut self, format: GrammarFormat, text: impl Into<String>) -> Self {
        self.sources.push(GrammarSource::Inline {
            format,
            text: text.into(),
        });
        self
    }

    /// Configured sources, in the order they will be tried.
    pub fn sources(&self) -> &[GrammarSource] {
        &self.sources
    }

    /// Loads the first source that yields a valid grammar.
    pub fn build(self) -> Result<Grammar> {
        for source in &self.sources {
            match source.load() {
                Ok(grammar) => {
                    debug!(source = %source, "Loaded grammar");
                    return Ok(grammar);
                }
                Err(e) => debug!(source = %source, error = %e, "Grammar source failed"),
            }
        }

        Err(LoadError::NoSourcesAvailable)
    }
}

#[cfg(test)]
mod tests {
    use command_grammar_core::{CommandSpec, GrammarError, OptionSpec};

    use super::*;

    const YAML: &str = "
commands:
  - name: list
    is-default: true
    options:
      - name: filespec
        required: true
        default-value: '*.csv'
      - name: -all
        is_flag: true
options:
  - name: --repeat
    allow-multiple: true
";

    #[test]
    fn test_parse_yaml_with_both_spellings() {
        let document = parse_document(YAML, GrammarFormat::Yaml).unwrap();

        assert_eq!(document.commands.len(), 1);
        let list = &document.commands[0];
        assert!(list.is_default);
        assert_eq!(list.options[0].default_value.as_deref(), Some("*.csv"));
        assert!(list.options[1].is_flag);
        assert!(document.options[0].allow_multiple);
    }

    #[test]
    fn test_root_key_is_unwrapped() {
        let wrapped = format!(
            "xml:\n{}",
            YAML.lines()
                .map(|l| format!("  {l}\n"))
                .collect::<String>()
        );
        let document = parse_document(&wrapped, GrammarFormat::Yaml).unwrap();
        assert_eq!(document, parse_document(YAML, GrammarFormat::Yaml).unwrap());

        let json = r#"{ "grammar": { "options": [{ "name": "--x" }] } }"#;
        let document = parse_document(json, GrammarFormat::Json).unwrap();
        assert_eq!(document.options[0].name, "--x");
    }

    #[test]
    fn test_lone_section_is_not_unwrapped() {
        let json = r#"{ "commands": [{ "name": "list" }] }"#;
        let document = parse_document(json, GrammarFormat::Json).unwrap();
        assert_eq!(document.commands[0].name, "list");
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let json = r#"{ "commands": [{ "name": "list", "colour": "red" }] }"#;
        assert!(matches!(
            parse_document(json, GrammarFormat::Json),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn test_invalid_grammar_is_reported() {
        let json = r#"{ "options": [{ "name": "--x", "required": true }] }"#;
        match parse_grammar(json, GrammarFormat::Json) {
            Err(LoadError::Grammar(GrammarError::RequiredGlobalOption(name))) => {
                assert_eq!(name, "--x");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let document = GrammarDocument::new()
            .with_command(
                CommandSpec::new("delete").with_option(OptionSpec::new("filespec").required()),
            )
            .with_global_option(OptionSpec::new("--language").with_default("en"));

        for name in ["grammar.json", "grammar.yaml", "grammar.xml"] {
            let path = dir.path().join(name);
            save_document(&document, &path).unwrap();
            assert_eq!(load_document(&path).unwrap(), document);
            assert!(load_grammar(&path).is_ok());
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grammar.toml");
        std::fs::write(&path, "[[commands]]\nname = 'list'\n").unwrap();

        assert!(matches!(
            load_grammar(&path),
            Err(LoadError::UnsupportedFormat(p)) if p == path
        ));
    }

    #[test]
    fn test_builder_fallback() {
        let grammar = GrammarLoader::new()
            .from_file("/nonexistent/grammar.json")
            .from_text(GrammarFormat::Json, "{ not json")
            .from_text(GrammarFormat::Yaml, YAML)
            .build()
            .unwrap();
        assert!(grammar.global_option_index("--REPEAT").is_some());
    }

    #[test]
    fn test_builder_all_fail() {
        let result = GrammarLoader::new()
            .from_file("/nonexistent/grammar.json")
            .build();
        assert!(matches!(result, Err(LoadError::NoSourcesAvailable)));

        assert!(matches!(
            GrammarLoader::new().build(),
            Err(LoadError::NoSourcesAvailable)
        ));
    }
}
