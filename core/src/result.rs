//! Resolution output.
//!
//! A resolved line is a list of [`ParsedCommand`]s plus the global options
//! that were seen anywhere in the line. The shapes serialize to a plain
//! structural document:
//!
//! ```json
//! {
//!   "commands": [{ "name": "list", "options": [{ "name": "filespec", "values": ["*.txt"] }] }],
//!   "global_options": [{ "name": "--repeat", "values": ["true"] }]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::canonical_key;

/// An option with the values it collected, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedOption {
    pub name: String,
    pub values: Vec<String>,
}

impl ParsedOption {
    pub fn new(name: &str, values: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            values,
        }
    }

    /// Creates an option holding one value.
    pub fn single(name: &str, value: &str) -> Self {
        Self::new(name, vec![value.to_string()])
    }

    /// First value, or `""` when the option holds none.
    pub fn value(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or("")
    }

    fn matches(&self, name: &str) -> bool {
        canonical_key(&self.name) == canonical_key(name)
    }
}

/// A resolved command and its options, in first-use order.
///
/// # Examples
///
/// ```
/// use command_grammar_core::{ParsedCommand, ParsedOption};
///
/// let mut cmd = ParsedCommand::new("list");
/// cmd.add_option(ParsedOption::single("name", "a"));
/// cmd.add_option(ParsedOption::single("NAME", "b"));
///
/// assert_eq!(cmd.options.len(), 1);
/// assert_eq!(cmd.option("Name").unwrap().values, vec!["a", "b"]);
/// assert_eq!(cmd.value(), "a");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommand {
    pub name: String,
    #[serde(default)]
    pub options: Vec<ParsedOption>,
}

impl ParsedCommand {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            options: Vec::new(),
        }
    }

    /// Records an option. Values of an option that is already present are
    /// appended to the existing entry.
    pub fn add_option(&mut self, option: ParsedOption) {
        match self.options.iter_mut().find(|o| o.matches(&option.name)) {
            Some(existing) => existing.values.extend(option.values),
            None => self.options.push(option),
        }
    }

    /// Finds an option by name, ignoring case.
    pub fn option(&self, name: &str) -> Option<&ParsedOption> {
        self.options.iter().find(|o| o.matches(name))
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.option(name).is_some()
    }

    /// First value of the first option, or `""`.
    pub fn value(&self) -> &str {
        self.options.first().map(ParsedOption::value).unwrap_or("")
    }
}

/// Everything resolved from one line of input.
///
/// Both lists are empty, never absent, when nothing matched.
///
/// # Examples
///
/// ```
/// use command_grammar_core::{ParseResult, ParsedCommand, ParsedOption};
///
/// let result = ParseResult {
///     commands: vec![ParsedCommand::new("list")],
///     global_options: vec![ParsedOption::single("--language", "en")],
/// };
///
/// assert!(result.command("LIST").is_some());
/// assert_eq!(result.global_value("--language", "fr"), "en");
/// assert_eq!(result.global_value("--region", "eu"), "eu");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    #[serde(default)]
    pub commands: Vec<ParsedCommand>,
    #[serde(default)]
    pub global_options: Vec<ParsedOption>,
}

impl ParseResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the first command with the given name, ignoring case.
    pub fn command(&self, name: &str) -> Option<&ParsedCommand> {
        let key = canonical_key(name);
        self.commands.iter().find(|c| canonical_key(&c.name) == key)
    }

    /// Finds a global option by name, ignoring case.
    pub fn global_option(&self, name: &str) -> Option<&ParsedOption> {
        self.global_options.iter().find(|o| o.matches(name))
    }

    /// First value of a global option, or `fallback` when it was not given.
    pub fn global_value<'a>(&'a self, name: &str, fallback: &'a str) -> &'a str {
        self.global_option(name)
            .map(ParsedOption::value)
            .unwrap_or(fallback)
    }

    /// All values of a global option, or `fallback` when it was not given.
    pub fn global_values(&self, name: &str, fallback: &[&str]) -> Vec<String> {
        match self.global_option(name) {
            Some(option) => option.values.clone(),
            None => fallback.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Serializes the result to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
