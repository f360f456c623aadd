// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Shared primitives between the argot parser and tooling that inspects
//! command trees (completion generators, documentation renderers).
//!
//! Nothing in here parses arguments. It only describes how many values a
//! parameter takes, how repeated options combine, and which names are legal.

use std::fmt;

/// The number of values an option or positional accepts.
///
/// `max == None` means the parameter is unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arity {
    /// The minimum number of values.
    pub min: usize,
    /// The maximum number of values, if bounded.
    pub max: Option<usize>,
}

/// Returned when an `Arity` is constructed with `min > max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidArity {
    pub min: usize,
    pub max: usize,
}

impl fmt::Display for InvalidArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arity minimum {} exceeds maximum {}", self.min, self.max)
    }
}

impl std::error::Error for InvalidArity {}

impl Arity {
    /// A flag: no values at all.
    pub const ZERO: Arity = Arity { min: 0, max: Some(0) };
    /// An optional single value.
    pub const ZERO_OR_ONE: Arity = Arity { min: 0, max: Some(1) };
    /// Exactly one value.
    pub const EXACTLY_ONE: Arity = Arity { min: 1, max: Some(1) };
    /// Any number of values, including none.
    pub const ZERO_OR_MORE: Arity = Arity { min: 0, max: None };
    /// At least one value.
    pub const ONE_OR_MORE: Arity = Arity { min: 1, max: None };

    /// Create a new arity, checking that `min <= max`.
    pub fn new(min: usize, max: Option<usize>) -> Result<Self, InvalidArity> {
        match max {
            Some(max) if min > max => Err(InvalidArity { min, max }),
            _ => Ok(Arity { min, max }),
        }
    }

    /// Exactly `n` values.
    pub const fn exactly(n: usize) -> Self {
        Arity { min: n, max: Some(n) }
    }

    /// At least `n` values, no upper bound.
    pub const fn at_least(n: usize) -> Self {
        Arity { min: n, max: None }
    }

    /// Whether any value at all may be supplied.
    pub fn accepts_values(&self) -> bool {
        self.max != Some(0)
    }

    pub fn is_zero(&self) -> bool {
        self.min == 0 && self.max == Some(0)
    }

    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }

    /// Whether at most one value is accepted (and at least one may be).
    pub fn is_single(&self) -> bool {
        self.max == Some(1)
    }

    /// Whether `count` values satisfy this arity.
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }
}

impl Default for Arity {
    fn default() -> Self {
        Arity::EXACTLY_ONE
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", self.min),
            Some(max) => write!(f, "{}..={}", self.min, max),
            None => write!(f, "{}..", self.min),
        }
    }
}

/// How a repeated option combines with its earlier occurrences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccumulationMode {
    /// Each occurrence replaces the previous value.
    #[default]
    LastWins,
    /// The first occurrence is kept; later ones are parsed and dropped.
    FirstWins,
    /// Every occurrence is kept, in order.
    Collect,
    /// The value is the number of (truthy) occurrences.
    Count,
    /// A second occurrence is an error.
    Error,
}

impl AccumulationMode {
    /// Whether a single-valued option keeps a scalar value under this mode.
    pub fn keeps_scalar(&self) -> bool {
        matches!(
            self,
            AccumulationMode::LastWins | AccumulationMode::FirstWins | AccumulationMode::Error
        )
    }
}

impl fmt::Display for AccumulationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccumulationMode::LastWins => "last-wins",
            AccumulationMode::FirstWins => "first-wins",
            AccumulationMode::Collect => "collect",
            AccumulationMode::Count => "count",
            AccumulationMode::Error => "error",
        };
        f.write_str(name)
    }
}

/// Whether `name` is a legal command, option, or positional name.
///
/// Names start with an ASCII letter and continue with ASCII letters,
/// digits, dashes, or underscores.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Whether `c` is a legal short option name.
pub fn is_valid_short_name(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn arity_rejects_inverted_bounds() {
        assert_eq!(Arity::new(3, Some(1)), Err(InvalidArity { min: 3, max: 1 }));
        assert_eq!(Arity::new(1, None), Ok(Arity::ONE_OR_MORE));
        assert_eq!(Arity::new(2, Some(2)), Ok(Arity::exactly(2)));
    }

    #[test]
    fn arity_accepts() {
        assert!(Arity::ZERO_OR_ONE.accepts(0));
        assert!(Arity::ZERO_OR_ONE.accepts(1));
        assert!(!Arity::ZERO_OR_ONE.accepts(2));
        assert!(Arity::at_least(2).accepts(40));
        assert!(!Arity::at_least(2).accepts(1));
        assert!(!Arity::ZERO.accepts_values());
    }

    #[test]
    fn arity_display() {
        assert_eq!(Arity::EXACTLY_ONE.to_string(), "1");
        assert_eq!(Arity::new(2, Some(4)).unwrap().to_string(), "2..=4");
        assert_eq!(Arity::ONE_OR_MORE.to_string(), "1..");
    }

    #[test]
    fn name_grammar() {
        assert!(is_valid_name("verbose"));
        assert!(is_valid_name("dry-run"));
        assert!(is_valid_name("max_depth2"));
        assert!(is_valid_name("x"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("-v"));
        assert!(!is_valid_name("2fast"));
        assert!(!is_valid_name("with space"));
        assert!(!is_valid_name("eq=uals"));
        assert!(is_valid_short_name('v'));
        assert!(is_valid_short_name('1'));
        assert!(!is_valid_short_name('-'));
    }
}
