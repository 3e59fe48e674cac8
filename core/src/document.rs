use serde::{Deserialize, Serialize};

use crate::{CommandSpec, Grammar, GrammarError, OptionSpec, validate_document};

/// Serializable grammar description.
///
/// A document lists the known commands (each with its own options) and the
/// global options that are not owned by any command. It is the unvalidated
/// form of a [`Grammar`]: call [`build`](GrammarDocument::build) to check it
/// and produce the immutable lookup tables used during resolution.
///
/// # Examples
///
/// ```
/// use command_grammar_core::*;
///
/// let document = GrammarDocument::new()
///     .with_command(
///         CommandSpec::new("delete")
///             .with_option(OptionSpec::new("filespec"))
///             .with_option(OptionSpec::new("-confirm").with_default("yes")),
///     )
///     .with_global_option(OptionSpec::new("--language"));
///
/// assert_eq!(document.commands.len(), 1);
/// assert_eq!(document.options.len(), 1);
///
/// let grammar = document.build().unwrap();
/// assert!(grammar.command_index("DELETE").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarDocument {
    /// Known commands, in declaration order.
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
    /// Global options, in declaration order.
    #[serde(default)]
    pub options: Vec<OptionSpec>,
}

impl GrammarDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command.
    pub fn with_command(mut self, command: CommandSpec) -> Self {
        self.commands.push(command);
        self
    }

    /// Adds a global option.
    pub fn with_global_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Returns the first structural problem in this document, if any.
    pub fn validate(&self) -> Result<(), GrammarError> {
        match validate_document(self).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Validates the document and builds a [`Grammar`] from it.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        Grammar::new(self)
    }
}
