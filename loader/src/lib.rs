//! Grammar document loading for command resolution.
//!
//! Grammars are written as JSON, YAML or XML and loaded into a validated
//! [`Grammar`](command_grammar_core::Grammar), either from a single file or
//! through a [`GrammarLoader`] fallback chain.
//!
//! # Quick start
//!
//! ```no_run
//! use command_grammar_loader::{GrammarLoader, load_grammar};
//!
//! let grammar = load_grammar("grammar.json").unwrap();
//! println!("{} commands", grammar.commands().len());
//!
//! let grammar = GrammarLoader::new()
//!     .from_file("grammar.local.yaml")
//!     .from_file("grammar.yaml")
//!     .build()
//!     .unwrap();
//! ```

mod error;
mod loader;
mod xml;

pub use error::{LoadError, Result};
pub use loader::{
    GrammarFormat, GrammarLoader, GrammarSource, load_document, load_grammar, parse_document,
    parse_grammar, save_document,
};
