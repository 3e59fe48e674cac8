use command_grammar_core::{Grammar, GrammarDocument, GrammarError, ParseResult};
use tracing::debug;

use crate::assemble::assemble;
use crate::engine::resolve_drafts;
use crate::error::Result;

/// Resolves lines of input against a fixed grammar.
///
/// The grammar cannot be changed once the resolver is built, and every call
/// to [`resolve`](Resolver::resolve) works on fresh state, so a single
/// resolver can be shared across threads.
///
/// # Examples
///
/// ```
/// use command_grammar_core::*;
/// use command_grammar_resolver::Resolver;
///
/// let resolver = Resolver::from_document(
///     GrammarDocument::new()
///         .with_command(
///             CommandSpec::new("list")
///                 .default_command()
///                 .with_option(OptionSpec::new("filespec").required().with_default("*.csv")),
///         )
///         .with_global_option(OptionSpec::new("--repeat").flag()),
/// )
/// .unwrap();
///
/// let result = resolver.resolve("*.txt --repeat").unwrap();
/// assert_eq!(result.commands[0].name, "list");
/// assert_eq!(result.commands[0].option("filespec").unwrap().values, vec!["*.txt"]);
/// assert_eq!(result.global_value("--repeat", "false"), "true");
///
/// let empty = resolver.resolve("").unwrap();
/// assert_eq!(empty.commands[0].option("filespec").unwrap().values, vec!["*.csv"]);
/// ```
#[derive(Debug, Clone)]
pub struct Resolver {
    grammar: Grammar,
}

impl Resolver {
    pub fn new(grammar: Grammar) -> Self {
        Self { grammar }
    }

    /// Validates `document` and builds a resolver for it.
    pub fn from_document(document: GrammarDocument) -> std::result::Result<Self, GrammarError> {
        Ok(Self::new(Grammar::new(document)?))
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Resolves one line of input.
    ///
    /// Leading and trailing whitespace is ignored. Fails on the first word
    /// that breaks a grammar rule.
    pub fn resolve(&self, text: &str) -> Result<ParseResult> {
        let text = text.trim();
        debug!(input = text, "Resolving");

        let drafts = resolve_drafts(&self.grammar, text)?;
        let result = assemble(&self.grammar, drafts)?;

        debug!(
            commands = result.commands.len(),
            global_options = result.global_options.len(),
            "Resolved"
        );
        Ok(result)
    }
}

impl From<Grammar> for Resolver {
    fn from(grammar: Grammar) -> Self {
        Self::new(grammar)
    }
}
