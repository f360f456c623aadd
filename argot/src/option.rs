// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use {
    crate::{AccumulationMode, Arity, SpecificationError},
    argot_shared::{is_valid_name, is_valid_short_name},
    indexmap::IndexSet,
};

/// An immutable description of a single option.
///
/// Built with `OptionSpec::builder` (or the `flag` shorthand) and owned by
/// the `CommandSpec` it is registered on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionSpec {
    name: String,
    long: IndexSet<String>,
    short: IndexSet<char>,
    arity: Arity,
    accumulation_mode: AccumulationMode,
    is_flag: bool,
    truthy_flag_values: Option<Vec<String>>,
    falsey_flag_values: Option<Vec<String>>,
    negation_words: Vec<String>,
    const_value: Option<String>,
    flatten_values: bool,
}

impl OptionSpec {
    /// Start describing an option that takes exactly one value.
    pub fn builder(name: impl Into<String>) -> OptionSpecBuilder {
        OptionSpecBuilder::new(name.into())
    }

    /// Start describing a boolean flag.
    pub fn flag(name: impl Into<String>) -> OptionSpecBuilder {
        OptionSpecBuilder::new(name.into()).flag()
    }

    /// The canonical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Long aliases, without leading dashes.
    pub fn long(&self) -> impl Iterator<Item = &str> {
        self.long.iter().map(String::as_str)
    }

    /// Single character aliases.
    pub fn short(&self) -> impl Iterator<Item = char> + '_ {
        self.short.iter().copied()
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn accumulation_mode(&self) -> AccumulationMode {
        self.accumulation_mode
    }

    pub fn is_flag(&self) -> bool {
        self.is_flag
    }

    /// Whether the option behaves like a flag: declared as one, or taking no values.
    pub fn is_flag_like(&self) -> bool {
        self.is_flag || self.arity.is_zero()
    }

    pub fn truthy_flag_values(&self) -> Option<&[String]> {
        self.truthy_flag_values.as_deref()
    }

    pub fn falsey_flag_values(&self) -> Option<&[String]> {
        self.falsey_flag_values.as_deref()
    }

    pub fn negation_words(&self) -> &[String] {
        &self.negation_words
    }

    pub fn const_value(&self) -> Option<&str> {
        self.const_value.as_deref()
    }

    pub fn flatten_values(&self) -> bool {
        self.flatten_values
    }

    /// Long aliases produced by negation words, e.g. `no-verbose`.
    pub(crate) fn negated_long(&self) -> impl Iterator<Item = String> + '_ {
        let words = if self.is_flag_like() { self.negation_words.as_slice() } else { &[] };
        words.iter().flat_map(move |word| {
            self.long.iter().map(move |long| [word.as_str(), "-", long.as_str()].concat())
        })
    }

    /// The name shown to users: the first long alias with dashes, else the
    /// first short alias.
    pub fn display_name(&self) -> String {
        if let Some(long) = self.long.first() {
            ["--", long.as_str()].concat()
        } else if let Some(short) = self.short.first() {
            format!("-{short}")
        } else {
            self.name.clone()
        }
    }
}

/// Builder for `OptionSpec`. Validation happens in `build`.
#[derive(Clone, Debug)]
pub struct OptionSpecBuilder {
    name: String,
    long: Vec<String>,
    short: Vec<char>,
    arity: Option<(usize, Option<usize>)>,
    accumulation_mode: AccumulationMode,
    is_flag: bool,
    truthy_flag_values: Option<Vec<String>>,
    falsey_flag_values: Option<Vec<String>>,
    negation_words: Vec<String>,
    const_value: Option<String>,
    flatten_values: bool,
}

impl OptionSpecBuilder {
    fn new(name: String) -> Self {
        OptionSpecBuilder {
            name,
            long: Vec::new(),
            short: Vec::new(),
            arity: None,
            accumulation_mode: AccumulationMode::default(),
            is_flag: false,
            truthy_flag_values: None,
            falsey_flag_values: None,
            negation_words: Vec::new(),
            const_value: None,
            flatten_values: false,
        }
    }

    /// Add a long alias. Leading dashes are stripped.
    pub fn long(mut self, long: impl Into<String>) -> Self {
        let long = long.into();
        self.long.push(long.trim_start_matches('-').to_owned());
        self
    }

    pub fn short(mut self, short: char) -> Self {
        self.short.push(short);
        self
    }

    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = Some((arity.min, arity.max));
        self
    }

    /// Set the arity from raw bounds, checked in `build`.
    pub fn values(mut self, min: usize, max: Option<usize>) -> Self {
        self.arity = Some((min, max));
        self
    }

    pub fn accumulation(mut self, mode: AccumulationMode) -> Self {
        self.accumulation_mode = mode;
        self
    }

    /// Mark as a boolean flag. Flags take no values unless given with `=`
    /// and the parser allows it.
    pub fn flag(mut self) -> Self {
        self.is_flag = true;
        self
    }

    pub fn truthy_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.truthy_flag_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn falsey_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.falsey_flag_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Enable `--<word>-<long>` negation for a flag.
    pub fn negation_word(mut self, word: impl Into<String>) -> Self {
        self.negation_words.push(word.into());
        self
    }

    pub fn const_value(mut self, value: impl Into<String>) -> Self {
        self.const_value = Some(value.into());
        self
    }

    pub fn flatten_values(mut self, flatten: bool) -> Self {
        self.flatten_values = flatten;
        self
    }

    pub fn build(self) -> Result<OptionSpec, SpecificationError> {
        if !is_valid_name(&self.name) {
            return Err(SpecificationError::InvalidName { kind: "option", name: self.name });
        }

        let arity = match self.arity {
            None if self.is_flag => Arity::ZERO,
            None => Arity::EXACTLY_ONE,
            Some((min, max)) => Arity::new(min, max).map_err(|e| {
                SpecificationError::InvalidArity { name: self.name.clone(), min: e.min, max: e.max }
            })?,
        };
        if self.is_flag && arity.accepts_values() {
            return Err(SpecificationError::FlagWithArity { option: self.name, arity });
        }

        let mut long = IndexSet::new();
        let mut short = IndexSet::new();
        for alias in self.long {
            if !is_valid_name(&alias) {
                return Err(SpecificationError::InvalidName { kind: "long option", name: alias });
            }
            long.insert(alias);
        }
        for c in self.short {
            if !is_valid_short_name(c) {
                return Err(SpecificationError::InvalidShortName { option: self.name, short: c });
            }
            short.insert(c);
        }
        if long.is_empty() {
            let mut chars = self.name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    short.insert(c);
                }
                _ => {
                    long.insert(self.name.clone());
                }
            }
        }

        for word in &self.negation_words {
            if !is_valid_name(word) {
                return Err(SpecificationError::InvalidNegationWord {
                    option: self.name,
                    word: word.clone(),
                });
            }
        }

        let owner = ["option '", self.name.as_str(), "'"].concat();
        validate_flag_values(
            &owner,
            self.truthy_flag_values.as_deref(),
            self.falsey_flag_values.as_deref(),
        )?;

        if self.flatten_values && self.accumulation_mode != AccumulationMode::Collect {
            tracing::warn!(
                option = %self.name,
                mode = %self.accumulation_mode,
                "flatten_values has no effect without collect accumulation"
            );
        }

        Ok(OptionSpec {
            name: self.name,
            long,
            short,
            arity,
            accumulation_mode: self.accumulation_mode,
            is_flag: self.is_flag,
            truthy_flag_values: self.truthy_flag_values,
            falsey_flag_values: self.falsey_flag_values,
            negation_words: self.negation_words,
            const_value: self.const_value,
            flatten_values: self.flatten_values,
        })
    }
}

/// Check a pair of truthy/falsey flag value sets: neither may be empty or
/// contain an empty string, and they may not share a value.
pub(crate) fn validate_flag_values(
    owner: &str,
    truthy: Option<&[String]>,
    falsey: Option<&[String]>,
) -> Result<(), SpecificationError> {
    for (kind, values) in [("truthy", truthy), ("falsey", falsey)] {
        let Some(values) = values else { continue };
        if values.is_empty() {
            return Err(SpecificationError::EmptyFlagValueSet { owner: owner.to_owned(), kind });
        }
        if values.iter().any(String::is_empty) {
            return Err(SpecificationError::EmptyFlagValue { owner: owner.to_owned(), kind });
        }
    }
    if let (Some(truthy), Some(falsey)) = (truthy, falsey) {
        if let Some(value) =
            truthy.iter().find(|t| falsey.iter().any(|f| f.eq_ignore_ascii_case(t)))
        {
            return Err(SpecificationError::OverlappingFlagValues {
                owner: owner.to_owned(),
                value: value.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_long_alias_to_name() {
        let spec = OptionSpec::builder("output").build().unwrap();
        assert_eq!(spec.long().collect::<Vec<_>>(), ["output"]);
        assert_eq!(spec.short().count(), 0);
        assert_eq!(spec.arity(), Arity::EXACTLY_ONE);
        assert_eq!(spec.display_name(), "--output");
    }

    #[test]
    fn single_character_name_becomes_short_alias() {
        let spec = OptionSpec::flag("v").build().unwrap();
        assert_eq!(spec.short().collect::<Vec<_>>(), ['v']);
        assert_eq!(spec.long().count(), 0);
        assert!(spec.is_flag_like());
        assert_eq!(spec.display_name(), "-v");
    }

    #[test]
    fn short_alias_keeps_default_long() {
        let spec = OptionSpec::flag("verbose").short('v').build().unwrap();
        assert_eq!(spec.long().collect::<Vec<_>>(), ["verbose"]);
        assert_eq!(spec.short().collect::<Vec<_>>(), ['v']);

        let spec = OptionSpec::flag("verbose").long("loud").build().unwrap();
        assert_eq!(spec.long().collect::<Vec<_>>(), ["loud"]);
    }

    #[test]
    fn negated_aliases() {
        let spec = OptionSpec::flag("verbose")
            .long("verbose")
            .long("loud")
            .negation_word("no")
            .build()
            .unwrap();
        assert_eq!(spec.negated_long().collect::<Vec<_>>(), ["no-verbose", "no-loud"]);

        let valued = OptionSpec::builder("level").negation_word("no").build().unwrap();
        assert_eq!(valued.negated_long().count(), 0);
    }

    #[test]
    fn empty_flag_value_is_rejected() {
        let err = OptionSpec::flag("color").truthy_values(["yes", ""]).build().unwrap_err();
        assert!(matches!(err, SpecificationError::EmptyFlagValue { kind: "truthy", .. }));
    }

    #[test]
    fn empty_flag_value_set_is_rejected() {
        let err =
            OptionSpec::flag("color").falsey_values(Vec::<String>::new()).build().unwrap_err();
        assert!(matches!(err, SpecificationError::EmptyFlagValueSet { kind: "falsey", .. }));
    }
}
