// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The values produced by a successful parse.

use indexmap::IndexMap;

/// The value recorded for an option.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum OptionValue {
    /// A flag, `true` unless negated or given a falsey value.
    Flag(bool),
    /// The number of occurrences of a counted option.
    Count(usize),
    /// A single value.
    Single(String),
    /// Several values: one multi-value occurrence, or the collected values of
    /// single-value occurrences.
    Multiple(Vec<String>),
    /// Collected flag occurrences.
    Flags(Vec<bool>),
    /// Collected multi-value occurrences, one inner list per occurrence.
    Nested(Vec<Vec<String>>),
}

impl OptionValue {
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            OptionValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<usize> {
        match self {
            OptionValue::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Single(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&[String]> {
        match self {
            OptionValue::Multiple(values) => Some(values),
            _ => None,
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Flag(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Single(value.to_owned())
    }
}

/// An option found while parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParsedOption {
    /// The canonical option name.
    pub name: String,
    pub value: OptionValue,
    /// The name as typed (`verb` for `--verb`), when it differs from the canonical name.
    pub alias: Option<String>,
}

/// The value recorded for a positional.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PositionalValue {
    /// The value of an exactly-one positional.
    Single(String),
    Multiple(Vec<String>),
}

impl PositionalValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PositionalValue::Single(s) => Some(s),
            PositionalValue::Multiple(_) => None,
        }
    }

    /// All values, whichever the shape.
    pub fn values(&self) -> &[String] {
        match self {
            PositionalValue::Single(s) => std::slice::from_ref(s),
            PositionalValue::Multiple(values) => values,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParsedPositional {
    pub name: String,
    pub value: PositionalValue,
}

/// The outcome of parsing one command level, with the nested subcommand
/// level (if any) attached.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParseResult {
    /// The canonical command name.
    pub command: String,
    /// The subcommand token as typed, when it was an alias or abbreviation.
    pub alias: Option<String>,
    pub options: IndexMap<String, ParsedOption>,
    pub positionals: IndexMap<String, ParsedPositional>,
    /// Tokens following a literal `--`.
    pub extra_args: Vec<String>,
    pub subcommand: Option<Box<ParseResult>>,
}

impl ParseResult {
    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name).map(|o| &o.value)
    }

    pub fn positional(&self, name: &str) -> Option<&PositionalValue> {
        self.positionals.get(name).map(|p| &p.value)
    }

    /// Whether an option was given at this level.
    pub fn is_present(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn subcommand(&self) -> Option<&ParseResult> {
        self.subcommand.as_deref()
    }

    /// Canonical command names from this level down to the deepest subcommand.
    pub fn command_path(&self) -> Vec<&str> {
        let mut path = vec![self.command.as_str()];
        let mut current = self;
        while let Some(next) = current.subcommand.as_deref() {
            path.push(&next.command);
            current = next;
        }
        path
    }

    /// The deepest subcommand level, or `self` when there is none.
    pub fn leaf(&self) -> &ParseResult {
        let mut current = self;
        while let Some(next) = current.subcommand.as_deref() {
            current = next;
        }
        current
    }
}
