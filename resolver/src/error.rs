use thiserror::Error;

/// Failure to resolve a line of input against a grammar.
///
/// Resolution stops at the first violation; no partial result is returned.
/// A `command` of `None` refers to the global option scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A word matched no command, option or free option slot.
    #[error("invalid command '{0}'")]
    InvalidCommand(String),
    /// A command that does not allow repeats was used again.
    #[error("multiple uses of {0} not supported")]
    DuplicateCommand(String),
    /// An option that does not allow repeats was used again in its scope.
    #[error("multiple uses of {option} not supported{}", for_command(.command))]
    DuplicateOption {
        command: Option<String>,
        option: String,
    },
    /// An option was left without a value and has no default.
    #[error("no value specified for option '{option}'{}", for_quoted_command(.command))]
    MissingValue {
        command: Option<String>,
        option: String,
    },
}

fn for_command(command: &Option<String>) -> String {
    match command {
        Some(name) => format!(" for command {name}"),
        None => String::new(),
    }
}

fn for_quoted_command(command: &Option<String>) -> String {
    match command {
        Some(name) => format!(" for command '{name}'"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
