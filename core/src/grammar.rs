use std::collections::HashMap;

use crate::{CommandSpec, GrammarDocument, GrammarError, OptionSpec, canonical_key};

/// Validated, immutable grammar with case-insensitive lookup tables.
///
/// A `Grammar` is built once from a [`GrammarDocument`] and then shared by
/// any number of resolutions. Commands and options are addressed by their
/// declaration index, which keeps resolution state free of borrowed names.
///
/// # Examples
///
/// ```
/// use command_grammar_core::*;
///
/// let grammar = Grammar::new(
///     GrammarDocument::new()
///         .with_command(
///             CommandSpec::new("list")
///                 .default_command()
///                 .with_option(OptionSpec::new("filespec")),
///         )
///         .with_global_option(OptionSpec::new("--repeat").flag()),
/// )
/// .unwrap();
///
/// let list = grammar.command_index("LiSt").unwrap();
/// assert_eq!(grammar.command(list).name, "list");
/// assert_eq!(grammar.command_option_index(list, "FILESPEC"), Some(0));
/// assert_eq!(grammar.global_option_index("--REPEAT"), Some(0));
/// assert_eq!(grammar.default_commands().count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Grammar {
    commands: Vec<CommandSpec>,
    global_options: Vec<OptionSpec>,
    command_lookup: HashMap<String, usize>,
    global_lookup: HashMap<String, usize>,
    command_option_lookup: Vec<HashMap<String, usize>>,
}

impl Grammar {
    /// Validates `document` and builds the lookup tables.
    ///
    /// Names are trimmed before indexing. Returns the first structural
    /// problem found, see [`validate_document`](crate::validate_document).
    pub fn new(document: GrammarDocument) -> Result<Self, GrammarError> {
        document.validate()?;

        let GrammarDocument { commands, options } = document;
        let commands: Vec<CommandSpec> = commands.into_iter().map(trim_command).collect();
        let global_options: Vec<OptionSpec> = options.into_iter().map(trim_option).collect();

        let command_lookup = commands
            .iter()
            .enumerate()
            .map(|(idx, cmd)| (cmd.key(), idx))
            .collect();
        let global_lookup = index_options(&global_options);
        let command_option_lookup = commands
            .iter()
            .map(|cmd| index_options(&cmd.options))
            .collect();

        Ok(Self {
            commands,
            global_options,
            command_lookup,
            global_lookup,
            command_option_lookup,
        })
    }

    /// Looks up a command by name, ignoring case.
    pub fn command_index(&self, word: &str) -> Option<usize> {
        self.command_lookup.get(&canonical_key(word)).copied()
    }

    /// Returns the command at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` did not come from this grammar.
    pub fn command(&self, idx: usize) -> &CommandSpec {
        &self.commands[idx]
    }

    /// All commands, in declaration order.
    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// Indexes of the commands flagged as default, in declaration order.
    pub fn default_commands(&self) -> impl Iterator<Item = usize> + '_ {
        self.commands
            .iter()
            .enumerate()
            .filter(|(_, cmd)| cmd.is_default)
            .map(|(idx, _)| idx)
    }

    /// Looks up a global option by name, ignoring case.
    pub fn global_option_index(&self, word: &str) -> Option<usize> {
        self.global_lookup.get(&canonical_key(word)).copied()
    }

    /// Returns the global option at `idx`.
    pub fn global_option(&self, idx: usize) -> &OptionSpec {
        &self.global_options[idx]
    }

    /// All global options, in declaration order.
    pub fn global_options(&self) -> &[OptionSpec] {
        &self.global_options
    }

    /// Looks up an option of command `cmd` by name, ignoring case.
    pub fn command_option_index(&self, cmd: usize, word: &str) -> Option<usize> {
        self.command_option_lookup
            .get(cmd)
            .and_then(|lookup| lookup.get(&canonical_key(word)).copied())
    }

    /// Converts the grammar back into its serializable form.
    pub fn to_document(&self) -> GrammarDocument {
        GrammarDocument {
            commands: self.commands.clone(),
            options: self.global_options.clone(),
        }
    }
}

fn trim_option(mut option: OptionSpec) -> OptionSpec {
    option.name = option.name.trim().to_string();
    option
}

fn trim_command(mut command: CommandSpec) -> CommandSpec {
    command.name = command.name.trim().to_string();
    command.options = command.options.into_iter().map(trim_option).collect();
    command
}

fn index_options(options: &[OptionSpec]) -> HashMap<String, usize> {
    options
        .iter()
        .enumerate()
        .map(|(idx, opt)| (opt.key(), idx))
        .collect()
}
