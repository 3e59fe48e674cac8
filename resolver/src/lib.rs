//! Resolution of free-form input lines against a command grammar.
//!
//! A line such as `list *.txt renameto=*.bak --repeat` is split into
//! quote-aware words by the [`Tokenizer`], matched word by word against a
//! [`Grammar`](command_grammar_core::Grammar), and assembled into a
//! [`ParseResult`](command_grammar_core::ParseResult) of commands and global
//! options.
//!
//! Words that appear before any command are held back and re-examined once,
//! so that input with no command keyword can still bind to the grammar's
//! default command.
//!
//! # Example
//!
//! ```
//! use command_grammar_core::*;
//! use command_grammar_resolver::{ResolveError, Resolver};
//!
//! let resolver = Resolver::from_document(
//!     GrammarDocument::new()
//!         .with_command(
//!             CommandSpec::new("list")
//!                 .default_command()
//!                 .with_option(OptionSpec::new("filespec"))
//!                 .with_option(OptionSpec::new("renameto")),
//!         )
//!         .with_command(CommandSpec::new("delete").with_option(OptionSpec::new("filespec"))),
//! )
//! .unwrap();
//!
//! let result = resolver.resolve("list *.txt renameto=*.bak").unwrap();
//! let list = result.command("list").unwrap();
//! assert_eq!(list.option("filespec").unwrap().value(), "*.txt");
//! assert_eq!(list.option("renameto").unwrap().value(), "*.bak");
//!
//! assert_eq!(
//!     resolver.resolve("delete a b").unwrap_err(),
//!     ResolveError::InvalidCommand("b".to_string())
//! );
//! ```

mod assemble;
mod engine;
mod error;
mod resolver;
mod tokenizer;

pub use error::{ResolveError, Result};
pub use resolver::Resolver;
pub use tokenizer::{Token, Tokenizer, tokenize};
