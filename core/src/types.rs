//! Grammar entry definitions.
//!
//! This module defines the declarative building blocks of a grammar: the
//! options a command (or the grammar as a whole) accepts and the commands
//! themselves. The types are designed for serialization with [`serde`] so a
//! grammar can be written by hand in JSON or YAML and loaded at startup.
//!
//! Every attribute also accepts a `-` spelling (`is-default`,
//! `allow-multiple`, `default-value`, `is-flag`) in serialized documents.

use serde::{Deserialize, Serialize};

/// Returns the case-insensitive lookup key for a command or option name.
///
/// All name matching in a grammar goes through this key, so `List`, `LIST`
/// and `list` refer to the same command.
///
/// # Examples
///
/// ```
/// use command_grammar_core::canonical_key;
///
/// assert_eq!(canonical_key("--Repeat"), "--REPEAT");
/// assert_eq!(canonical_key("list"), canonical_key("LIST"));
/// ```
pub fn canonical_key(name: &str) -> String {
    name.to_uppercase()
}

/// Definition of a named option.
///
/// Options live either inside a [`CommandSpec`] (command-scoped) or at the
/// top level of a grammar (global). A flag takes no textual value: it resolves
/// to `"true"`, or to its default value, the moment its keyword is seen.
///
/// # Examples
///
/// ```
/// use command_grammar_core::OptionSpec;
///
/// let filespec = OptionSpec::new("filespec").required().with_default("*.csv");
/// assert!(filespec.required);
/// assert_eq!(filespec.default_value.as_deref(), Some("*.csv"));
///
/// let all = OptionSpec::new("-all").flag();
/// assert!(all.is_flag);
/// assert_eq!(all.flag_value(), "true");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionSpec {
    /// Canonical (display) name of the option
    pub name: String,
    /// Must the option end up with a value?
    #[serde(default)]
    pub required: bool,
    /// Value applied when the option is not supplied
    #[serde(
        default,
        alias = "default-value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<String>,
    /// Can the option collect more than one value?
    #[serde(default, alias = "allow-multiple")]
    pub allow_multiple: bool,
    /// Does the option take no value?
    #[serde(default, alias = "is-flag")]
    pub is_flag: bool,
}

impl OptionSpec {
    /// Creates an optional, single-valued, non-flag option.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            required: false,
            default_value: None,
            allow_multiple: false,
            is_flag: false,
        }
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    /// Marks the option as accepting multiple values.
    pub fn allow_multiple(mut self) -> Self {
        self.allow_multiple = true;
        self
    }

    /// Marks the option as a flag.
    pub fn flag(mut self) -> Self {
        self.is_flag = true;
        self
    }

    /// Returns the lookup key for this option.
    pub fn key(&self) -> String {
        canonical_key(&self.name)
    }

    /// Value recorded when a flag keyword is seen.
    pub fn flag_value(&self) -> &str {
        self.default_value.as_deref().unwrap_or("true")
    }

    /// Default value, ignoring empty strings.
    ///
    /// Used when back-filling options that were never mentioned.
    pub fn effective_default(&self) -> Option<&str> {
        self.default_value.as_deref().filter(|v| !v.is_empty())
    }
}

/// Definition of a command and the options it owns.
///
/// Options are kept in declaration order, which drives positional fallback:
/// an unlabelled word is assigned to the first option that is still unused
/// (or accepts multiple values).
///
/// # Examples
///
/// ```
/// use command_grammar_core::{CommandSpec, OptionSpec};
///
/// let list = CommandSpec::new("list")
///     .default_command()
///     .with_option(OptionSpec::new("filespec"))
///     .with_option(OptionSpec::new("renameto"));
///
/// assert!(list.is_default);
/// assert_eq!(list.option_names(), vec!["filespec", "renameto"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    /// Canonical (display) name of the command
    pub name: String,
    /// Used when the input names no command
    #[serde(default, alias = "is-default")]
    pub is_default: bool,
    /// Can the command appear more than once in one input?
    #[serde(default, alias = "allow-multiple")]
    pub allow_multiple: bool,
    /// Options scoped to this command, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSpec>,
}

impl CommandSpec {
    /// Creates a command with no options.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            ..Default::default()
        }
    }

    /// Marks the command as the default command.
    pub fn default_command(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Marks the command as allowed to repeat.
    pub fn allow_multiple(mut self) -> Self {
        self.allow_multiple = true;
        self
    }

    /// Adds an option.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Returns the lookup key for this command.
    pub fn key(&self) -> String {
        canonical_key(&self.name)
    }

    /// Gets all option names in declaration order.
    pub fn option_names(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.name.as_str()).collect()
    }
}
