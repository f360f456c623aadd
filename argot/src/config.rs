// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Parser configuration and the name-matching rules derived from it.

use {
    crate::{SpecificationError, option::validate_flag_values},
    once_cell::sync::Lazy,
    regex::Regex,
    std::borrow::Cow,
};

/// Matches `-` followed by an integer, a decimal, or scientific notation.
pub const DEFAULT_NEGATIVE_NUMBER_PATTERN: &str = r"^-(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$";

pub const DEFAULT_TRUTHY_FLAG_VALUES: &[&str] = &["true", "1", "yes", "y", "on"];
pub const DEFAULT_FALSEY_FLAG_VALUES: &[&str] = &["false", "0", "no", "n", "off"];

static DEFAULT_NEGATIVE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DEFAULT_NEGATIVE_NUMBER_PATTERN).expect("default negative number pattern is valid")
});

/// Rules for matching a user-typed name against declared names.
///
/// Also the key of the per-spec resolution caches, so it is `Copy + Hash`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MatchRules {
    /// Accept unique prefixes of declared names.
    pub allow_abbreviation: bool,
    /// Shortest prefix accepted when abbreviating.
    pub minimum_abbreviation_length: usize,
    pub case_insensitive: bool,
    /// Treat `_` in the typed name as `-`.
    pub underscores_to_dashes: bool,
    /// Match declared aliases as well as canonical names.
    pub allow_aliases: bool,
}

impl MatchRules {
    /// Exact, case-sensitive matching of names and aliases.
    pub const EXACT: MatchRules = MatchRules {
        allow_abbreviation: false,
        minimum_abbreviation_length: 1,
        case_insensitive: false,
        underscores_to_dashes: false,
        allow_aliases: true,
    };

    /// Fold `name` the way typed tokens are folded before lookup.
    pub fn normalize<'a>(&self, name: &'a str) -> Cow<'a, str> {
        let mut out = Cow::Borrowed(name);
        if self.underscores_to_dashes && out.contains('_') {
            out = Cow::Owned(out.replace('_', "-"));
        }
        if self.case_insensitive && out.chars().any(|c| c.is_uppercase()) {
            out = Cow::Owned(out.to_lowercase());
        }
        out
    }
}

impl Default for MatchRules {
    fn default() -> Self {
        MatchRules::EXACT
    }
}

/// Knobs controlling how a `Parser` reads tokens.
///
/// Built once with `ParserConfiguration::builder()` and never mutated.
#[derive(Clone, Debug)]
pub struct ParserConfiguration {
    allow_abbreviated_subcommands: bool,
    allow_abbreviated_options: bool,
    allow_equals_for_flags: bool,
    allow_aliases: bool,
    allow_negative_numbers: bool,
    case_insensitive_flags: bool,
    case_insensitive_options: bool,
    case_insensitive_subcommands: bool,
    convert_underscores_to_dashes: bool,
    flatten_option_values: bool,
    minimum_abbreviation_length: usize,
    negative_number_pattern: Option<Regex>,
    strict_options_before_positionals: bool,
    truthy_flag_values: Option<Vec<String>>,
    falsey_flag_values: Option<Vec<String>>,
}

impl Default for ParserConfiguration {
    fn default() -> Self {
        ParserConfiguration {
            allow_abbreviated_subcommands: false,
            allow_abbreviated_options: false,
            allow_equals_for_flags: false,
            allow_aliases: true,
            allow_negative_numbers: false,
            case_insensitive_flags: false,
            case_insensitive_options: false,
            case_insensitive_subcommands: false,
            convert_underscores_to_dashes: true,
            flatten_option_values: false,
            minimum_abbreviation_length: 3,
            negative_number_pattern: None,
            strict_options_before_positionals: false,
            truthy_flag_values: None,
            falsey_flag_values: None,
        }
    }
}

impl ParserConfiguration {
    pub fn builder() -> ParserConfigurationBuilder {
        ParserConfigurationBuilder::default()
    }

    pub fn allow_abbreviated_subcommands(&self) -> bool {
        self.allow_abbreviated_subcommands
    }

    pub fn allow_abbreviated_options(&self) -> bool {
        self.allow_abbreviated_options
    }

    pub fn allow_equals_for_flags(&self) -> bool {
        self.allow_equals_for_flags
    }

    pub fn allow_aliases(&self) -> bool {
        self.allow_aliases
    }

    pub fn allow_negative_numbers(&self) -> bool {
        self.allow_negative_numbers
    }

    pub fn case_insensitive_flags(&self) -> bool {
        self.case_insensitive_flags
    }

    pub fn case_insensitive_options(&self) -> bool {
        self.case_insensitive_options
    }

    pub fn case_insensitive_subcommands(&self) -> bool {
        self.case_insensitive_subcommands
    }

    pub fn convert_underscores_to_dashes(&self) -> bool {
        self.convert_underscores_to_dashes
    }

    pub fn flatten_option_values(&self) -> bool {
        self.flatten_option_values
    }

    pub fn minimum_abbreviation_length(&self) -> usize {
        self.minimum_abbreviation_length
    }

    pub fn strict_options_before_positionals(&self) -> bool {
        self.strict_options_before_positionals
    }

    /// The pattern used to recognize negative numbers, anchored so that it
    /// must match a whole token.
    pub fn negative_number_pattern(&self) -> &Regex {
        self.negative_number_pattern.as_ref().unwrap_or(&DEFAULT_NEGATIVE_NUMBER)
    }

    pub fn truthy_flag_values(&self) -> Option<&[String]> {
        self.truthy_flag_values.as_deref()
    }

    pub fn falsey_flag_values(&self) -> Option<&[String]> {
        self.falsey_flag_values.as_deref()
    }

    /// Rules for resolving `--long` option names.
    pub fn option_rules(&self) -> MatchRules {
        MatchRules {
            allow_abbreviation: self.allow_abbreviated_options,
            minimum_abbreviation_length: self.minimum_abbreviation_length,
            case_insensitive: self.case_insensitive_options,
            underscores_to_dashes: self.convert_underscores_to_dashes,
            allow_aliases: true,
        }
    }

    /// Rules for resolving single-character `-x` option names.
    pub fn short_rules(&self) -> MatchRules {
        MatchRules { case_insensitive: self.case_insensitive_flags, ..MatchRules::EXACT }
    }

    /// Rules for resolving subcommand names.
    pub fn subcommand_rules(&self) -> MatchRules {
        MatchRules {
            allow_abbreviation: self.allow_abbreviated_subcommands,
            minimum_abbreviation_length: self.minimum_abbreviation_length,
            case_insensitive: self.case_insensitive_subcommands,
            underscores_to_dashes: self.convert_underscores_to_dashes,
            allow_aliases: self.allow_aliases,
        }
    }

    /// Whether `token` reads as a negative number under this configuration.
    ///
    /// Always false when negative numbers are disabled.
    pub fn is_negative_number(&self, token: &str) -> bool {
        self.allow_negative_numbers && self.negative_number_pattern().is_match(token)
    }
}

/// Builder for `ParserConfiguration`. Validation happens in `build`.
#[derive(Clone, Debug, Default)]
pub struct ParserConfigurationBuilder {
    config: ParserConfiguration,
    negative_number_pattern: Option<String>,
}

macro_rules! bool_setters {
    ($($(#[$doc:meta])* $field:ident,)*) => {
        $(
            $(#[$doc])*
            pub fn $field(mut self, value: bool) -> Self {
                self.config.$field = value;
                self
            }
        )*
    }
}

impl ParserConfigurationBuilder {
    bool_setters![
        allow_abbreviated_subcommands,
        allow_abbreviated_options,
        /// Accept `--flag=value` (and `-f=value`) for flags, coercing the value to a boolean.
        allow_equals_for_flags,
        /// Match subcommand aliases.
        allow_aliases,
        allow_negative_numbers,
        /// Match single-character options regardless of case.
        case_insensitive_flags,
        /// Match long options regardless of case.
        case_insensitive_options,
        case_insensitive_subcommands,
        convert_underscores_to_dashes,
        /// Merge multi-value occurrences of collected options into one flat list.
        flatten_option_values,
        /// Treat every token after the first positional as positional.
        strict_options_before_positionals,
    ];

    pub fn minimum_abbreviation_length(mut self, length: usize) -> Self {
        self.config.minimum_abbreviation_length = length;
        self
    }

    pub fn negative_number_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.negative_number_pattern = Some(pattern.into());
        self
    }

    pub fn truthy_flag_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.truthy_flag_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn falsey_flag_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.falsey_flag_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<ParserConfiguration, SpecificationError> {
        let mut config = self.config;
        if config.minimum_abbreviation_length < 1 {
            return Err(SpecificationError::InvalidAbbreviationLength(
                config.minimum_abbreviation_length,
            ));
        }
        validate_flag_values(
            "parser configuration",
            config.truthy_flag_values.as_deref(),
            config.falsey_flag_values.as_deref(),
        )?;
        if let Some(pattern) = self.negative_number_pattern {
            config.negative_number_pattern = Some(compile_negative_number_pattern(pattern)?);
        }
        Ok(config)
    }
}

fn compile_negative_number_pattern(pattern: String) -> Result<Regex, SpecificationError> {
    if has_nested_quantifier(&pattern) {
        return Err(SpecificationError::NegativeNumberPatternNestedQuantifier(pattern));
    }
    // The whole token must match, whatever anchors the pattern carries.
    let regex = match Regex::new(&["^(?:", pattern.as_str(), ")$"].concat()) {
        Ok(regex) => regex,
        Err(source) => {
            return Err(SpecificationError::NegativeNumberPattern { pattern, source });
        }
    };
    if regex.is_match("") {
        return Err(SpecificationError::NegativeNumberPatternMatchesEmpty(pattern));
    }
    Ok(regex)
}

/// Detect a repeated group whose body is itself repeated, e.g. `(a+)+`,
/// `(\d*)*` or `(?:x+y){2,}`.
fn has_nested_quantifier(pattern: &str) -> bool {
    // One entry per open group: whether its body contains a quantifier.
    let mut groups: Vec<bool> = Vec::new();
    let mut chars = pattern.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
            continue;
        }
        if in_class {
            if c == ']' {
                in_class = false;
            }
            continue;
        }
        match c {
            '[' => {
                in_class = true;
                // A leading `]` is literal inside a class.
                if chars.peek() == Some(&']') {
                    chars.next();
                }
            }
            '(' => {
                groups.push(false);
                if chars.peek() == Some(&'?') {
                    chars.next();
                }
            }
            ')' => {
                let inner = groups.pop().unwrap_or(false);
                let repeated = matches!(chars.peek(), Some('*' | '+' | '{'));
                if inner && repeated {
                    return true;
                }
                if let Some(outer) = groups.last_mut() {
                    *outer |= inner || repeated;
                }
            }
            '*' | '+' | '{' => {
                if let Some(current) = groups.last_mut() {
                    *current = true;
                }
            }
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nested_quantifiers_are_detected() {
        assert!(has_nested_quantifier(r"(a+)+"));
        assert!(has_nested_quantifier(r"^-(\d*)*$"));
        assert!(has_nested_quantifier(r"(?:x+y){2,}"));
        assert!(has_nested_quantifier(r"((ab)*c)+"));
        assert!(!has_nested_quantifier(DEFAULT_NEGATIVE_NUMBER_PATTERN));
        assert!(!has_nested_quantifier(r"^-[(+]+\d+$"));
        assert!(!has_nested_quantifier(r"^-\(+\d+$"));
        assert!(!has_nested_quantifier(r"^-(\d)+$"));
    }

    #[test]
    fn default_pattern_recognizes_negative_numbers() {
        let config = ParserConfiguration::builder().allow_negative_numbers(true).build().unwrap();
        for token in ["-1", "-42", "-3.5", "-.5", "-1e10", "-2.5E-3", "-7."] {
            assert!(config.is_negative_number(token), "{token}");
        }
        for token in ["-", "--1", "-x", "-1x", "1", "-e5", ""] {
            assert!(!config.is_negative_number(token), "{token}");
        }
    }

    #[test]
    fn custom_pattern_matches_whole_tokens() {
        let config = ParserConfiguration::builder()
            .allow_negative_numbers(true)
            .negative_number_pattern(r"-\d|-\d+")
            .build()
            .unwrap();
        assert!(config.is_negative_number("-1"));
        assert!(config.is_negative_number("-12"));
        assert!(!config.is_negative_number("x-12"));
        assert!(!config.is_negative_number("-12x"));
    }

    #[test]
    fn negative_numbers_disabled_by_default() {
        assert!(!ParserConfiguration::default().is_negative_number("-1"));
    }

    #[test]
    fn match_rules_normalize() {
        let rules = MatchRules {
            case_insensitive: true,
            underscores_to_dashes: true,
            ..MatchRules::EXACT
        };
        assert_eq!(rules.normalize("Dry_Run"), "dry-run");
        assert!(matches!(MatchRules::EXACT.normalize("dry_run"), Cow::Borrowed("dry_run")));
    }
}
