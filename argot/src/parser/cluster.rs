// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Splitting a short option cluster (`-abc`, `-ofile`, `-o=file`) into
//! individual options and their inline values.

use crate::{CommandSpec, MatchRules, OptionSpec, ParseError, ParserConfiguration};

/// One option named inside a cluster.
#[derive(Debug)]
pub(crate) struct ClusterItem<'s, 'a> {
    pub short: char,
    pub option: &'s OptionSpec,
    pub value: Option<ClusterValue<'a>>,
}

/// A value attached to the option inside the cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ClusterValue<'a> {
    /// `-ofile`
    Inline(&'a str),
    /// `-o=file`
    Equals(&'a str),
}

impl<'a> ClusterValue<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            ClusterValue::Inline(v) | ClusterValue::Equals(v) => v,
        }
    }
}

/// Walk `cluster` (the token without its leading dash) one character at a
/// time.
///
/// Every option but the last must be flag-like or accept no required value.
/// An unknown character directly after a value-taking option starts that
/// option's inline value, and `=` always starts one.
pub(crate) fn split_cluster<'s, 'a>(
    spec: &'s CommandSpec,
    config: &ParserConfiguration,
    cluster: &'a str,
) -> Result<Vec<ClusterItem<'s, 'a>>, ParseError> {
    let rules = config.short_rules();
    let mut items: Vec<ClusterItem<'s, 'a>> = Vec::new();

    for (i, c) in cluster.char_indices() {
        if c == '=' {
            let value = &cluster[i + c.len_utf8()..];
            let Some(prev) = items.last_mut() else {
                return Err(ParseError::UnknownOption {
                    command: spec.name().to_owned(),
                    option: ["-", cluster].concat(),
                    suggestions: Vec::new(),
                });
            };
            if prev.option.is_flag_like() && !config.allow_equals_for_flags() {
                return Err(flag_value_error(spec, prev, value));
            }
            prev.value = Some(ClusterValue::Equals(value));
            return Ok(items);
        }

        match spec.resolve_short_option(c, rules) {
            Ok((_, option)) => {
                if let Some(prev) = items.last() {
                    let arity = prev.option.arity();
                    if arity.min > 0 {
                        return Err(ParseError::InsufficientOptionValues {
                            command: spec.name().to_owned(),
                            option: format!("-{}", prev.short),
                            expected: arity,
                            received: 0,
                        });
                    }
                }
                items.push(ClusterItem { short: c, option, value: None });
            }
            Err(err) => {
                let Some(prev) = items.last_mut() else {
                    return Err(err);
                };
                let rest = &cluster[i..];
                if !prev.option.is_flag_like() {
                    prev.value = Some(ClusterValue::Inline(rest));
                    return Ok(items);
                }
                if looks_like_value(spec, rules, rest) {
                    return Err(ParseError::OptionDoesNotAcceptValue {
                        command: spec.name().to_owned(),
                        option: format!("-{}", prev.short),
                    });
                }
                return Err(err);
            }
        }
    }

    Ok(items)
}

/// Whether the unresolvable tail of a cluster reads like a value someone
/// tried to give the preceding flag rather than a mistyped option.
fn looks_like_value(spec: &CommandSpec, rules: MatchRules, rest: &str) -> bool {
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(only), None) => !only.is_ascii_alphabetic(),
        (Some(_), Some(_)) => !rest.chars().any(|c| spec.has_short_option(c, rules)),
        _ => false,
    }
}

fn flag_value_error(spec: &CommandSpec, item: &ClusterItem<'_, '_>, value: &str) -> ParseError {
    let option = format!("-{}", item.short);
    if !item.option.is_flag() && value.is_empty() {
        ParseError::OptionDoesNotAcceptValue { command: spec.name().to_owned(), option }
    } else {
        ParseError::FlagWithValue {
            command: spec.name().to_owned(),
            option,
            value: value.to_owned(),
        }
    }
}

#[cfg(test)]
mod test {
    use {super::*, crate::Arity};

    fn spec() -> CommandSpec {
        CommandSpec::builder("tool")
            .option(OptionSpec::flag("all").short('a').build().unwrap())
            .option(OptionSpec::flag("verbose").short('v').build().unwrap())
            .option(OptionSpec::builder("message").short('m').build().unwrap())
            .option(
                OptionSpec::builder("pair").short('p').arity(Arity::exactly(2)).build().unwrap(),
            )
            .option(
                OptionSpec::builder("level").short('l').arity(Arity::ZERO_OR_ONE).build().unwrap(),
            )
            .option(OptionSpec::builder("quiet").short('q').arity(Arity::ZERO).build().unwrap())
            .build()
            .unwrap()
    }

    fn shorts<'a>(items: &[ClusterItem<'_, 'a>]) -> Vec<(char, Option<ClusterValue<'a>>)> {
        items.iter().map(|i| (i.short, i.value)).collect()
    }

    #[test]
    fn flags_then_trailing_value_option() {
        let spec = spec();
        let items = split_cluster(&spec, &ParserConfiguration::default(), "am").unwrap();
        assert_eq!(shorts(&items), [('a', None), ('m', None)]);
    }

    #[test]
    fn repeated_flags_are_kept() {
        let spec = spec();
        let items = split_cluster(&spec, &ParserConfiguration::default(), "vvv").unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.option.name() == "verbose"));
    }

    #[test]
    fn unknown_character_starts_inline_value() {
        let spec = spec();
        let items = split_cluster(&spec, &ParserConfiguration::default(), "amhello").unwrap();
        assert_eq!(shorts(&items), [('a', None), ('m', Some(ClusterValue::Inline("hello")))]);
    }

    #[test]
    fn equals_starts_value() {
        let spec = spec();
        let items = split_cluster(&spec, &ParserConfiguration::default(), "m=a=b").unwrap();
        assert_eq!(shorts(&items), [('m', Some(ClusterValue::Equals("a=b")))]);
    }

    #[test]
    fn value_option_before_another_option() {
        let spec = spec();
        let err = split_cluster(&spec, &ParserConfiguration::default(), "ma").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InsufficientOptionValues { ref option, received: 0, .. } if option == "-m"
        ));
    }

    #[test]
    fn optional_value_option_may_precede_flags() {
        let spec = spec();
        let items = split_cluster(&spec, &ParserConfiguration::default(), "la").unwrap();
        assert_eq!(shorts(&items), [('l', None), ('a', None)]);
    }

    #[test]
    fn equals_on_flag_requires_permission() {
        let spec = spec();
        let err = split_cluster(&spec, &ParserConfiguration::default(), "v=yes").unwrap_err();
        assert!(matches!(err, ParseError::FlagWithValue { ref value, .. } if value == "yes"));

        let err = split_cluster(&spec, &ParserConfiguration::default(), "q=").unwrap_err();
        assert!(matches!(err, ParseError::OptionDoesNotAcceptValue { .. }));

        let config = ParserConfiguration::builder().allow_equals_for_flags(true).build().unwrap();
        let items = split_cluster(&spec, &config, "v=yes").unwrap();
        assert_eq!(shorts(&items), [('v', Some(ClusterValue::Equals("yes")))]);
    }

    #[test]
    fn unknown_tail_after_flag() {
        let spec = spec();
        let config = ParserConfiguration::default();

        let err = split_cluster(&spec, &config, "v42").unwrap_err();
        assert!(matches!(
            err,
            ParseError::OptionDoesNotAcceptValue { ref option, .. } if option == "-v"
        ));

        let err = split_cluster(&spec, &config, "vx").unwrap_err();
        assert!(matches!(err, ParseError::UnknownOption { ref option, .. } if option == "-x"));

        let err = split_cluster(&spec, &config, "vxa").unwrap_err();
        assert!(matches!(err, ParseError::UnknownOption { ref option, .. } if option == "-x"));
    }

    #[test]
    fn unknown_first_character() {
        let spec = spec();
        let err = split_cluster(&spec, &ParserConfiguration::default(), "xa").unwrap_err();
        assert!(matches!(err, ParseError::UnknownOption { ref option, .. } if option == "-x"));
    }

    #[test]
    fn case_insensitive_flags() {
        let spec = spec();
        let config = ParserConfiguration::builder().case_insensitive_flags(true).build().unwrap();
        let items = split_cluster(&spec, &config, "AV").unwrap();
        assert_eq!(shorts(&items), [('A', None), ('V', None)]);
    }
}
