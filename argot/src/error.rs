// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Error types.
//!
//! `SpecificationError` reports defects in a command declaration and is
//! raised while building specs or configuration. `ParseError` reports
//! problems with user input and is raised by `Parser::parse`.

use {
    crate::Arity,
    thiserror::Error,
};

/// A defect in a `CommandSpec`, `OptionSpec`, `PositionalSpec`, or
/// `ParserConfiguration` declaration.
#[derive(Debug, Error)]
pub enum SpecificationError {
    #[error(
        "invalid {kind} name '{name}': names start with a letter and contain only \
         letters, digits, '-' or '_'"
    )]
    InvalidName { kind: &'static str, name: String },

    #[error(
        "invalid short name '{short}' for option '{option}': short names are a \
         single letter or digit"
    )]
    InvalidShortName { option: String, short: char },

    #[error("invalid arity for '{name}': minimum {min} exceeds maximum {max}")]
    InvalidArity { name: String, min: usize, max: usize },

    #[error("flag option '{option}' cannot accept values (arity {arity})")]
    FlagWithArity { option: String, arity: Arity },

    #[error("option name '{name}' is declared more than once in command '{command}'")]
    DuplicateOptionName { command: String, name: String },

    #[error(
        "option alias '{alias}' is used by both '{first}' and '{second}' in command \
         '{command}'"
    )]
    DuplicateOptionAlias { command: String, alias: String, first: String, second: String },

    #[error("positional '{name}' is declared more than once in command '{command}'")]
    DuplicatePositional { command: String, name: String },

    #[error(
        "subcommand name '{name}' is used by both '{first}' and '{second}' in command \
         '{command}'"
    )]
    DuplicateSubcommand { command: String, name: String, first: String, second: String },

    #[error("{owner} declares an empty set of {kind} flag values")]
    EmptyFlagValueSet { owner: String, kind: &'static str },

    #[error("{owner} declares an empty {kind} flag value")]
    EmptyFlagValue { owner: String, kind: &'static str },

    #[error("{owner} declares '{value}' as both a truthy and a falsey flag value")]
    OverlappingFlagValues { owner: String, value: String },

    #[error("invalid negation word '{word}' for option '{option}'")]
    InvalidNegationWord { option: String, word: String },

    #[error("minimum abbreviation length must be at least 1, got {0}")]
    InvalidAbbreviationLength(usize),

    #[error("invalid negative number pattern '{pattern}': {source}")]
    NegativeNumberPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("negative number pattern '{0}' matches the empty string")]
    NegativeNumberPatternMatchesEmpty(String),

    #[error("negative number pattern '{0}' contains a nested quantifier")]
    NegativeNumberPatternNestedQuantifier(String),

    #[error("command '{command}' nests subcommands deeper than {limit} levels")]
    CommandTooDeep { command: String, limit: usize },
}

/// The kind of a `ParseError`, without its context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    UnknownOption,
    AmbiguousOption,
    UnknownSubcommand,
    AmbiguousSubcommand,
    InsufficientOptionValues,
    FlagWithValue,
    InvalidFlagValue,
    OptionDoesNotAcceptValue,
    OptionCannotBeSpecifiedMultipleTimes,
    InsufficientPositionalArguments,
    UnexpectedPositionalArgument,
}

/// A problem with the arguments handed to `Parser::parse`.
///
/// Parsing stops at the first problem; no partial result is produced.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown option '{option}' for command '{command}'{}", did_you_mean(.suggestions))]
    UnknownOption { command: String, option: String, suggestions: Vec<String> },

    #[error(
        "ambiguous option '{option}' for command '{command}': could be {}",
        .candidates.join(", ")
    )]
    AmbiguousOption { command: String, option: String, candidates: Vec<String> },

    #[error("unknown subcommand '{name}' for command '{command}'{}", did_you_mean(.suggestions))]
    UnknownSubcommand { command: String, name: String, suggestions: Vec<String> },

    #[error(
        "ambiguous subcommand '{name}' for command '{command}': could be {}",
        .candidates.join(", ")
    )]
    AmbiguousSubcommand { command: String, name: String, candidates: Vec<String> },

    #[error("option '{option}' expects {expected} value(s), got {received}")]
    InsufficientOptionValues { command: String, option: String, expected: Arity, received: usize },

    #[error("flag '{option}' does not take a value, got '{value}'")]
    FlagWithValue { command: String, option: String, value: String },

    #[error("invalid value '{value}' for flag '{option}'")]
    InvalidFlagValue { command: String, option: String, value: String },

    #[error("option '{option}' does not accept a value")]
    OptionDoesNotAcceptValue { command: String, option: String },

    #[error("option '{option}' cannot be specified multiple times")]
    OptionCannotBeSpecifiedMultipleTimes { command: String, option: String },

    #[error(
        "positional '{positional}' of command '{command}' expects {expected} value(s), \
         got {received}"
    )]
    InsufficientPositionalArguments {
        command: String,
        positional: String,
        expected: Arity,
        received: usize,
    },

    #[error("unexpected positional argument '{argument}' for command '{command}'")]
    UnexpectedPositionalArgument { command: String, argument: String },
}

impl ParseError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ParseError::UnknownOption { .. } => ParseErrorKind::UnknownOption,
            ParseError::AmbiguousOption { .. } => ParseErrorKind::AmbiguousOption,
            ParseError::UnknownSubcommand { .. } => ParseErrorKind::UnknownSubcommand,
            ParseError::AmbiguousSubcommand { .. } => ParseErrorKind::AmbiguousSubcommand,
            ParseError::InsufficientOptionValues { .. } => {
                ParseErrorKind::InsufficientOptionValues
            }
            ParseError::FlagWithValue { .. } => ParseErrorKind::FlagWithValue,
            ParseError::InvalidFlagValue { .. } => ParseErrorKind::InvalidFlagValue,
            ParseError::OptionDoesNotAcceptValue { .. } => {
                ParseErrorKind::OptionDoesNotAcceptValue
            }
            ParseError::OptionCannotBeSpecifiedMultipleTimes { .. } => {
                ParseErrorKind::OptionCannotBeSpecifiedMultipleTimes
            }
            ParseError::InsufficientPositionalArguments { .. } => {
                ParseErrorKind::InsufficientPositionalArguments
            }
            ParseError::UnexpectedPositionalArgument { .. } => {
                ParseErrorKind::UnexpectedPositionalArgument
            }
        }
    }

    /// The canonical name of the command the error was raised against.
    pub fn command(&self) -> &str {
        match self {
            ParseError::UnknownOption { command, .. }
            | ParseError::AmbiguousOption { command, .. }
            | ParseError::UnknownSubcommand { command, .. }
            | ParseError::AmbiguousSubcommand { command, .. }
            | ParseError::InsufficientOptionValues { command, .. }
            | ParseError::FlagWithValue { command, .. }
            | ParseError::InvalidFlagValue { command, .. }
            | ParseError::OptionDoesNotAcceptValue { command, .. }
            | ParseError::OptionCannotBeSpecifiedMultipleTimes { command, .. }
            | ParseError::InsufficientPositionalArguments { command, .. }
            | ParseError::UnexpectedPositionalArgument { command, .. } => command,
        }
    }
}

fn did_you_mean(suggestions: &[String]) -> String {
    match suggestions {
        [] => String::new(),
        [only] => ["; did you mean '", only.as_str(), "'?"].concat(),
        many => ["; did you mean one of: ", many.join(", ").as_str(), "?"].concat(),
    }
}
