//! Grammar document validation.
//!
//! Validates the structural invariants of a [`GrammarDocument`] before it is
//! turned into a [`Grammar`](crate::Grammar), catching errors such as
//! duplicate names, several default commands, or required global options
//! before they can confuse resolution.
//!
//! # Examples
//!
//! ```
//! use command_grammar_core::*;
//!
//! let document = GrammarDocument::new()
//!     .with_command(CommandSpec::new("list").default_command())
//!     .with_global_option(OptionSpec::new("--repeat"));
//! assert!(validate_document(&document).is_empty());
//!
//! // Invalid: a global option cannot be required
//! let bad = GrammarDocument::new()
//!     .with_global_option(OptionSpec::new("--repeat").required());
//! assert!(!validate_document(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{GrammarDocument, OptionSpec, canonical_key};

/// Grammar validation errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// Command name is empty or whitespace-only.
    #[error("command missing name")]
    EmptyCommandName,
    /// Option name is empty or whitespace-only.
    #[error("option missing name")]
    EmptyOptionName,
    /// Two commands share a name (case-insensitive).
    #[error("duplicate command name: {0}")]
    DuplicateCommand(String),
    /// Two options in the same scope share a name. `command` is `None` for
    /// global options.
    #[error("duplicate option name: {option}{}", in_command(.command))]
    DuplicateOption {
        command: Option<String>,
        option: String,
    },
    /// More than one command is flagged `is_default`.
    #[error("multiple default commands are not allowed")]
    MultipleDefaultCommands,
    /// A global option is flagged `required`.
    #[error("global option '{0}' cannot be flagged as required")]
    RequiredGlobalOption(String),
    /// A global option has the same name as a command.
    #[error("a command and global option have the same name of {0}")]
    GlobalOptionShadowsCommand(String),
    /// A flag option also allows multiple values.
    #[error("flag option '{0}' does not support multiple values")]
    FlagAllowsMultiple(String),
}

fn in_command(command: &Option<String>) -> String {
    match command {
        Some(name) => format!(" in command {name}"),
        None => String::new(),
    }
}

/// Validates a grammar document.
///
/// Commands are checked first, in declaration order, then global options,
/// then name clashes between the two. Validation stops at the first problem,
/// so the returned vector holds at most one error.
///
/// # Examples
///
/// ```
/// use command_grammar_core::*;
///
/// let document = GrammarDocument::new()
///     .with_command(CommandSpec::new("list").default_command())
///     .with_command(CommandSpec::new("clone").default_command());
///
/// assert_eq!(
///     validate_document(&document),
///     vec![GrammarError::MultipleDefaultCommands]
/// );
/// ```
pub fn validate_document(document: &GrammarDocument) -> Vec<GrammarError> {
    let mut errors = Vec::new();
    let mut seen_commands: HashSet<String> = HashSet::new();
    let mut has_default = false;

    for command in &document.commands {
        let name = command.name.trim();
        if name.is_empty() {
            errors.push(GrammarError::EmptyCommandName);
            return errors;
        }
        if !seen_commands.insert(canonical_key(name)) {
            errors.push(GrammarError::DuplicateCommand(name.to_string()));
            return errors;
        }
        if command.is_default {
            if has_default {
                errors.push(GrammarError::MultipleDefaultCommands);
                return errors;
            }
            has_default = true;
        }

        errors.extend(validate_options(&command.options, Some(name)));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors.extend(validate_options(&document.options, None));
    if !errors.is_empty() {
        return errors;
    }

    for option in &document.options {
        let name = option.name.trim();
        if option.required {
            errors.push(GrammarError::RequiredGlobalOption(name.to_string()));
            return errors;
        }
        if seen_commands.contains(&canonical_key(name)) {
            errors.push(GrammarError::GlobalOptionShadowsCommand(name.to_string()));
            return errors;
        }
    }

    errors
}

fn validate_options(options: &[OptionSpec], command: Option<&str>) -> Vec<GrammarError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for option in options {
        let name = option.name.trim();
        if name.is_empty() {
            errors.push(GrammarError::EmptyOptionName);
            return errors;
        }
        if option.is_flag && option.allow_multiple {
            errors.push(GrammarError::FlagAllowsMultiple(name.to_string()));
            return errors;
        }
        if !seen.insert(canonical_key(name)) {
            errors.push(GrammarError::DuplicateOption {
                command: command.map(String::from),
                option: name.to_string(),
            });
            return errors;
        }
    }

    errors
}
