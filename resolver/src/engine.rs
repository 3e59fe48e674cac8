//! Token-by-token resolution.
//!
//! The engine walks the tokens of a line against a [`Grammar`] and produces
//! an ordered list of [`Segment`]s: command or global-option drafts, and
//! spans of text that nothing claimed. Resolution runs in at most two
//! passes. The outer pass buffers words that appear before any command; the
//! fallback pass re-scans each buffered span once so it can bind to the
//! default command. Anything still unclaimed after that is an error.
//!
//! Decision order for every token:
//!
//! 1. unquoted global option name
//! 2. unquoted command name (skipped while an option awaits its first value)
//! 3. unquoted option name of the current command
//! 4. first value of the pending option
//! 5. extra value of a multi-value option
//! 6. next free option of the current command, by declaration order

use std::collections::HashSet;

use command_grammar_core::{Grammar, OptionSpec, ParsedOption};
use tracing::{debug, trace};

use crate::error::{ResolveError, Result};
use crate::tokenizer::{Token, Tokenizer};

/// Owner of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    /// Carries global options while a line is scanned; never a real command.
    Global,
    /// Index of a command in the grammar.
    Command(usize),
}

/// Options collected for one command (or one global option occurrence).
///
/// Option names use the grammar's spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Draft {
    pub scope: Scope,
    pub options: Vec<ParsedOption>,
}

impl Draft {
    fn new(scope: Scope) -> Self {
        Self {
            scope,
            options: Vec::new(),
        }
    }

    fn entry(&self, name: &str) -> Option<usize> {
        self.options.iter().position(|o| o.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Matched(Draft),
    Unresolved(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    Outer,
    Fallback,
}

/// Commands and global options already seen in the current line, across
/// both passes.
#[derive(Debug, Default)]
pub(crate) struct UsageTracker {
    commands: HashSet<usize>,
    global_options: HashSet<usize>,
}

/// The option currently receiving values.
#[derive(Debug, Clone, Copy)]
struct PendingSlot {
    /// Declaration index of the option within its scope.
    option: usize,
    /// Position of the option in the draft.
    entry: usize,
    awaiting: bool,
}

/// The draft being built and its open slot.
#[derive(Debug)]
struct Current {
    draft: Draft,
    slot: Option<PendingSlot>,
}

impl Current {
    fn new(scope: Scope) -> Self {
        Self {
            draft: Draft::new(scope),
            slot: None,
        }
    }

    fn awaiting(&self) -> bool {
        self.slot.is_some_and(|s| s.awaiting)
    }

    /// Records a fresh occurrence of `spec`. Flags take their value at once;
    /// other options hold an empty placeholder until a value arrives.
    fn open_option(&mut self, spec: &OptionSpec, option: usize) {
        let (value, awaiting) = if spec.is_flag {
            (spec.flag_value(), false)
        } else {
            ("", true)
        };
        self.draft.options.push(ParsedOption::single(&spec.name, value));
        self.slot = Some(PendingSlot {
            option,
            entry: self.draft.options.len() - 1,
            awaiting,
        });
    }
}

fn option_spec(grammar: &Grammar, scope: Scope, option: usize) -> &OptionSpec {
    match scope {
        Scope::Global => grammar.global_option(option),
        Scope::Command(cmd) => &grammar.command(cmd).options[option],
    }
}

fn scope_name(grammar: &Grammar, scope: Scope) -> Option<String> {
    match scope {
        Scope::Global => None,
        Scope::Command(cmd) => Some(grammar.command(cmd).name.clone()),
    }
}

fn missing_value(grammar: &Grammar, scope: Scope, spec: &OptionSpec) -> ResolveError {
    ResolveError::MissingValue {
        command: scope_name(grammar, scope),
        option: spec.name.clone(),
    }
}

/// One left-to-right pass over a piece of text.
struct Scan<'g, 'u> {
    grammar: &'g Grammar,
    usage: &'u mut UsageTracker,
    pass: Pass,
    segments: Vec<Segment>,
    current: Option<Current>,
}

impl<'g, 'u> Scan<'g, 'u> {
    fn new(grammar: &'g Grammar, usage: &'u mut UsageTracker, pass: Pass) -> Self {
        Self {
            grammar,
            usage,
            pass,
            segments: Vec::new(),
            current: None,
        }
    }

    fn run(mut self, text: &str) -> Result<Vec<Segment>> {
        for token in Tokenizer::new(text) {
            self.step(&token)?;
        }
        self.finish()
    }

    fn awaiting(&self) -> bool {
        self.current.as_ref().is_some_and(Current::awaiting)
    }

    fn step(&mut self, token: &Token) -> Result<()> {
        let grammar = self.grammar;

        if !token.is_quoted() {
            if let Some(idx) = grammar.global_option_index(&token.text) {
                return self.open_global(idx);
            }
        }

        if !token.is_quoted() && !self.awaiting() {
            if let Some(idx) = grammar.command_index(&token.text) {
                if !self.usage.commands.contains(&idx) || grammar.command(idx).allow_multiple {
                    self.open_command(idx);
                    return Ok(());
                }
            }
        }

        if self.current.is_some() {
            self.assign(token)
        } else {
            self.unassigned(token)
        }
    }

    fn open_global(&mut self, idx: usize) -> Result<()> {
        let spec = self.grammar.global_option(idx);
        if !spec.allow_multiple && self.usage.global_options.contains(&idx) {
            return Err(ResolveError::DuplicateOption {
                command: None,
                option: spec.name.clone(),
            });
        }

        self.close_superseded()?;
        self.usage.global_options.insert(idx);
        self.flush();

        trace!(option = %spec.name, "Global option");
        let mut current = Current::new(Scope::Global);
        current.open_option(spec, idx);
        self.current = Some(current);
        Ok(())
    }

    /// A required option still awaiting its value falls back to its default
    /// when a global option interrupts it. A non-required one keeps its
    /// empty placeholder.
    fn close_superseded(&mut self) -> Result<()> {
        let grammar = self.grammar;
        let Some(current) = self.current.as_mut() else {
            return Ok(());
        };
        let Some(slot) = current.slot.filter(|s| s.awaiting) else {
            return Ok(());
        };

        let spec = option_spec(grammar, current.draft.scope, slot.option);
        if spec.required {
            match &spec.default_value {
                Some(default) => {
                    current.draft.options[slot.entry].values = vec![default.clone()];
                }
                None => return Err(missing_value(grammar, current.draft.scope, spec)),
            }
        }
        Ok(())
    }

    fn open_command(&mut self, idx: usize) {
        trace!(command = %self.grammar.command(idx).name, "Command");
        self.usage.commands.insert(idx);
        self.flush();
        self.current = Some(Current::new(Scope::Command(idx)));
    }

    /// Handles a token inside an open command or global option.
    fn assign(&mut self, token: &Token) -> Result<()> {
        let grammar = self.grammar;
        let Some(current) = self.current.as_mut() else {
            return self.unassigned(token);
        };
        let scope = current.draft.scope;

        if let (false, Scope::Command(cmd)) = (token.is_quoted(), scope) {
            if let Some(option) = grammar.command_option_index(cmd, &token.text) {
                let spec = &grammar.command(cmd).options[option];
                match current.slot {
                    Some(slot) if slot.awaiting => {
                        let pending = option_spec(grammar, scope, slot.option);
                        if pending.required {
                            return Err(missing_value(grammar, scope, pending));
                        }
                        // the keyword becomes the pending option's value
                    }
                    _ => {
                        match current.draft.entry(&spec.name) {
                            Some(entry) if spec.allow_multiple => {
                                trace!(option = %spec.name, "Option resumed");
                                current.slot = Some(PendingSlot {
                                    option,
                                    entry,
                                    awaiting: false,
                                });
                            }
                            Some(_) => {
                                return Err(ResolveError::DuplicateOption {
                                    command: scope_name(grammar, scope),
                                    option: spec.name.clone(),
                                });
                            }
                            None => {
                                trace!(option = %spec.name, "Option");
                                current.open_option(spec, option);
                            }
                        }
                        return Ok(());
                    }
                }
            }
        }

        if let Some(slot) = current.slot.as_mut() {
            let values = &mut current.draft.options[slot.entry].values;
            if slot.awaiting {
                trace!(value = %token.text, "Value");
                *values = vec![token.text.clone()];
                slot.awaiting = false;
                return Ok(());
            }
            if option_spec(grammar, scope, slot.option).allow_multiple {
                trace!(value = %token.text, "Additional value");
                values.push(token.text.clone());
                return Ok(());
            }
        }

        if let Scope::Command(cmd) = scope {
            let free = grammar
                .command(cmd)
                .options
                .iter()
                .enumerate()
                .find(|(_, o)| o.allow_multiple || current.draft.entry(&o.name).is_none());

            if let Some((option, spec)) = free {
                trace!(option = %spec.name, value = %token.text, "Positional value");
                let entry = match current.draft.entry(&spec.name) {
                    Some(entry) => {
                        current.draft.options[entry].values.push(token.text.clone());
                        entry
                    }
                    None => {
                        current
                            .draft
                            .options
                            .push(ParsedOption::single(&spec.name, &token.text));
                        current.draft.options.len() - 1
                    }
                };
                current.slot = Some(PendingSlot {
                    option,
                    entry,
                    awaiting: false,
                });
                return Ok(());
            }
        }

        match grammar.command_index(&token.text) {
            Some(idx) if self.usage.commands.contains(&idx) => Err(ResolveError::DuplicateCommand(
                grammar.command(idx).name.clone(),
            )),
            _ => Err(ResolveError::InvalidCommand(token.text.clone())),
        }
    }

    /// Handles a token seen before any command or global option.
    fn unassigned(&mut self, token: &Token) -> Result<()> {
        match self.pass {
            Pass::Outer => {
                trace!(word = %token.raw(), "Deferred");
                match self.segments.last_mut() {
                    Some(Segment::Unresolved(span)) => {
                        span.push(' ');
                        span.push_str(&token.raw());
                    }
                    _ => self.segments.push(Segment::Unresolved(token.raw())),
                }
                Ok(())
            }
            Pass::Fallback => self.bind_default(token),
        }
    }

    /// Starts the first unused default command with `token` as the value of
    /// its first declared option.
    fn bind_default(&mut self, token: &Token) -> Result<()> {
        let grammar = self.grammar;
        let usage = &*self.usage;
        let target = grammar
            .default_commands()
            .find(|idx| !usage.commands.contains(idx));

        let Some(cmd) = target else {
            return Err(ResolveError::InvalidCommand(token.text.clone()));
        };
        let Some(first) = grammar.command(cmd).options.first() else {
            return Err(ResolveError::InvalidCommand(token.text.clone()));
        };

        trace!(command = %grammar.command(cmd).name, value = %token.text, "Default command");
        self.usage.commands.insert(cmd);
        self.flush();

        let mut current = Current::new(Scope::Command(cmd));
        current
            .draft
            .options
            .push(ParsedOption::single(&first.name, &token.text));
        current.slot = Some(PendingSlot {
            option: 0,
            entry: 0,
            awaiting: false,
        });
        self.current = Some(current);
        Ok(())
    }

    fn flush(&mut self) {
        if let Some(current) = self.current.take() {
            self.segments.push(Segment::Matched(current.draft));
        }
    }

    /// An option still awaiting its value at the end of the text takes its
    /// default, or fails.
    fn finish(mut self) -> Result<Vec<Segment>> {
        let grammar = self.grammar;
        if let Some(current) = self.current.as_mut() {
            if let Some(slot) = current.slot.filter(|s| s.awaiting) {
                let spec = option_spec(grammar, current.draft.scope, slot.option);
                match &spec.default_value {
                    Some(default) => {
                        current.draft.options[slot.entry].values = vec![default.clone()];
                    }
                    None => return Err(missing_value(grammar, current.draft.scope, spec)),
                }
            }
        }
        self.flush();
        Ok(self.segments)
    }
}

/// Runs the outer pass over `text`, then re-scans every deferred span once
/// so it can bind to the default command.
pub(crate) fn resolve_drafts(grammar: &Grammar, text: &str) -> Result<Vec<Draft>> {
    let mut usage = UsageTracker::default();

    let outer = Scan::new(grammar, &mut usage, Pass::Outer).run(text)?;
    debug!(segments = outer.len(), "Outer pass complete");

    let mut drafts = Vec::with_capacity(outer.len());
    for segment in outer {
        match segment {
            Segment::Matched(draft) => drafts.push(draft),
            Segment::Unresolved(span) => {
                debug!(span = %span, "Fallback pass");
                for inner in Scan::new(grammar, &mut usage, Pass::Fallback).run(&span)? {
                    match inner {
                        Segment::Matched(draft) => drafts.push(draft),
                        Segment::Unresolved(rest) => {
                            return Err(ResolveError::InvalidCommand(rest));
                        }
                    }
                }
            }
        }
    }

    Ok(drafts)
}
