//! Grammar model and result types for command-line resolution.
//!
//! This crate defines the declarative description of what a line of input
//! may contain, and the structured shape it resolves into:
//!
//! - [`OptionSpec`]: a named option with required/default/flag/multiplicity
//!   attributes.
//! - [`CommandSpec`]: a named command owning an ordered list of options.
//! - [`GrammarDocument`]: the serializable, unvalidated set of commands and
//!   global options.
//! - [`Grammar`]: the validated, immutable form with case-insensitive lookup.
//! - [`ParseResult`], [`ParsedCommand`], [`ParsedOption`]: resolution output.
//!
//! Validation ([`validate_document`]) catches structural errors such as
//! duplicate names, several default commands, or required global options.
//!
//! # Example
//!
//! ```
//! use command_grammar_core::*;
//!
//! let grammar = GrammarDocument::new()
//!     .with_command(
//!         CommandSpec::new("list")
//!             .default_command()
//!             .with_option(OptionSpec::new("filespec").required().with_default("*.csv")),
//!     )
//!     .with_command(CommandSpec::new("delete").with_option(OptionSpec::new("filespec")))
//!     .with_global_option(OptionSpec::new("--repeat").flag())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(grammar.commands().len(), 2);
//! assert!(grammar.global_option_index("--REPEAT").is_some());
//! ```

mod document;
mod grammar;
mod result;
mod types;
mod validate;

pub use document::GrammarDocument;
pub use grammar::Grammar;
pub use result::{ParseResult, ParsedCommand, ParsedOption};
pub use types::*;
pub use validate::{GrammarError, validate_document};
