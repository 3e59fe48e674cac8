//! Turns engine drafts into a [`ParseResult`].

use command_grammar_core::{CommandSpec, Grammar, ParseResult, ParsedCommand, ParsedOption};
use tracing::debug;

use crate::engine::{Draft, Scope};
use crate::error::{ResolveError, Result};

/// Builds the final result.
///
/// - Without any real command, every default command is synthesized.
/// - Options a command never mentioned get their non-empty default.
/// - Required options are checked per command in declaration order; the
///   first one without a value fails.
/// - Global option occurrences are merged by name in first-use order.
pub(crate) fn assemble(grammar: &Grammar, drafts: Vec<Draft>) -> Result<ParseResult> {
    let mut matched: Vec<(usize, Vec<ParsedOption>)> = Vec::new();
    let mut global_options: Vec<ParsedOption> = Vec::new();

    for draft in drafts {
        match draft.scope {
            Scope::Global => {
                for option in draft.options {
                    merge_option(&mut global_options, option);
                }
            }
            Scope::Command(idx) => matched.push((idx, draft.options)),
        }
    }

    if matched.is_empty() {
        matched.extend(grammar.default_commands().map(|idx| (idx, Vec::new())));
        debug!(count = matched.len(), "No command matched, using defaults");
    }

    let mut commands = Vec::with_capacity(matched.len());
    for (idx, options) in matched {
        let spec = grammar.command(idx);
        let mut command = ParsedCommand {
            name: spec.name.clone(),
            options,
        };
        back_fill(spec, &mut command);
        check_required(spec, &command)?;
        commands.push(command);
    }

    Ok(ParseResult {
        commands,
        global_options,
    })
}

fn merge_option(options: &mut Vec<ParsedOption>, option: ParsedOption) {
    match options.iter_mut().find(|o| o.name == option.name) {
        Some(existing) => existing.values.extend(option.values),
        None => options.push(option),
    }
}

fn back_fill(spec: &CommandSpec, command: &mut ParsedCommand) {
    for option in &spec.options {
        if command.has_option(&option.name) {
            continue;
        }
        if let Some(default) = option.effective_default() {
            command.add_option(ParsedOption::single(&option.name, default));
        }
    }
}

fn check_required(spec: &CommandSpec, command: &ParsedCommand) -> Result<()> {
    for option in spec.options.iter().filter(|o| o.required) {
        let present = command
            .option(&option.name)
            .is_some_and(|o| !o.values.is_empty());
        if !present {
            return Err(ResolveError::MissingValue {
                command: Some(spec.name.clone()),
                option: option.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use command_grammar_core::{GrammarDocument, OptionSpec};

    use super::*;

    fn grammar() -> Grammar {
        GrammarDocument::new()
            .with_command(
                CommandSpec::new("list")
                    .default_command()
                    .with_option(OptionSpec::new("filespec").with_default("*.csv"))
                    .with_option(OptionSpec::new("renameto").with_default("")),
            )
            .with_command(
                CommandSpec::new("delete").with_option(OptionSpec::new("filespec").required()),
            )
            .with_global_option(OptionSpec::new("--tag").allow_multiple())
            .build()
            .unwrap()
    }

    #[test]
    fn test_default_command_is_synthesized_and_back_filled() {
        let result = assemble(&grammar(), Vec::new()).unwrap();

        assert_eq!(result.commands.len(), 1);
        assert_eq!(result.commands[0].name, "list");
        // empty defaults are not applied
        assert_eq!(
            result.commands[0].options,
            vec![ParsedOption::single("filespec", "*.csv")]
        );
        assert!(result.global_options.is_empty());
    }

    #[test]
    fn test_globals_alone_still_synthesize_default() {
        let drafts = vec![Draft {
            scope: Scope::Global,
            options: vec![ParsedOption::single("--tag", "a")],
        }];

        let result = assemble(&grammar(), drafts).unwrap();
        assert_eq!(result.commands[0].name, "list");
        assert_eq!(result.global_options.len(), 1);
    }

    #[test]
    fn test_global_occurrences_merge_in_first_use_order() {
        let drafts = vec![
            Draft {
                scope: Scope::Global,
                options: vec![ParsedOption::single("--tag", "a")],
            },
            Draft {
                scope: Scope::Command(0),
                options: Vec::new(),
            },
            Draft {
                scope: Scope::Global,
                options: vec![ParsedOption::single("--tag", "b")],
            },
        ];

        let result = assemble(&grammar(), drafts).unwrap();
        assert_eq!(
            result.global_options,
            vec![ParsedOption::new(
                "--tag",
                vec!["a".to_string(), "b".to_string()]
            )]
        );
    }

    #[test]
    fn test_missing_required_option() {
        let drafts = vec![Draft {
            scope: Scope::Command(1),
            options: Vec::new(),
        }];

        let err = assemble(&grammar(), drafts).unwrap_err();
        assert_eq!(
            err,
            ResolveError::MissingValue {
                command: Some("delete".to_string()),
                option: "filespec".to_string()
            }
        );
    }
}
