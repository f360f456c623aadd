// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use argot::{
    Arity, CommandSpec, DEFAULT_NEGATIVE_NUMBER_PATTERN, OptionSpec, OptionValue, ParseErrorKind,
    Parser, ParserConfiguration, PositionalSpec, SpecificationError,
};

#[test]
fn defaults() {
    let config = ParserConfiguration::default();
    assert!(!config.allow_abbreviated_subcommands());
    assert!(!config.allow_abbreviated_options());
    assert!(!config.allow_equals_for_flags());
    assert!(config.allow_aliases());
    assert!(!config.allow_negative_numbers());
    assert!(!config.case_insensitive_flags());
    assert!(!config.case_insensitive_options());
    assert!(!config.case_insensitive_subcommands());
    assert!(config.convert_underscores_to_dashes());
    assert!(!config.flatten_option_values());
    assert_eq!(config.minimum_abbreviation_length(), 3);
    assert!(!config.strict_options_before_positionals());
    assert_eq!(config.negative_number_pattern().as_str(), DEFAULT_NEGATIVE_NUMBER_PATTERN);
    assert_eq!(config.truthy_flag_values(), None);
    assert_eq!(config.falsey_flag_values(), None);

    let built = ParserConfiguration::builder().build().unwrap();
    assert_eq!(built.minimum_abbreviation_length(), 3);
    assert_eq!(built.option_rules(), config.option_rules());
}

#[test]
fn minimum_abbreviation_length_must_be_positive() {
    let err = ParserConfiguration::builder().minimum_abbreviation_length(0).build().unwrap_err();
    assert!(matches!(err, SpecificationError::InvalidAbbreviationLength(0)));
}

#[test]
fn negative_number_pattern_is_validated() {
    let err = ParserConfiguration::builder().negative_number_pattern("-(").build().unwrap_err();
    assert!(matches!(err, SpecificationError::NegativeNumberPattern { .. }));

    let err =
        ParserConfiguration::builder().negative_number_pattern(r"^-?\d*$").build().unwrap_err();
    assert!(matches!(err, SpecificationError::NegativeNumberPatternMatchesEmpty(_)));

    let err =
        ParserConfiguration::builder().negative_number_pattern(r"^-(\d+)+$").build().unwrap_err();
    assert!(matches!(err, SpecificationError::NegativeNumberPatternNestedQuantifier(_)));
}

#[test]
fn custom_negative_number_pattern() {
    let config = ParserConfiguration::builder()
        .allow_negative_numbers(true)
        .negative_number_pattern(r"^-\d+$")
        .build()
        .unwrap();
    assert!(config.is_negative_number("-42"));
    assert!(!config.is_negative_number("-4.2"));
    assert!(!config.is_negative_number("x-42"));

    let spec = CommandSpec::builder("calc")
        .positional(PositionalSpec::new("numbers", Arity::ZERO_OR_MORE).unwrap())
        .build()
        .unwrap();
    let parser = Parser::new(spec, config);
    let result = parser.parse(&["-42"]).unwrap();
    assert_eq!(result.positional("numbers").unwrap().values(), ["-42"]);

    let err = parser.parse(&["-4.2"]).unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::UnknownOption);
}

#[test]
fn flag_value_sets_are_validated() {
    let err = ParserConfiguration::builder()
        .truthy_flag_values(["on", "Yes"])
        .falsey_flag_values(["off", "yes"])
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        SpecificationError::OverlappingFlagValues { ref value, .. } if value == "Yes"
    ));

    let err = ParserConfiguration::builder().truthy_flag_values([""]).build().unwrap_err();
    assert!(matches!(err, SpecificationError::EmptyFlagValue { kind: "truthy", .. }));

    let err = ParserConfiguration::builder()
        .falsey_flag_values(Vec::<String>::new())
        .build()
        .unwrap_err();
    assert!(matches!(err, SpecificationError::EmptyFlagValueSet { kind: "falsey", .. }));
}

fn flags() -> CommandSpec {
    CommandSpec::builder("tool")
        .option(OptionSpec::flag("verbose").build().unwrap())
        .option(OptionSpec::flag("color").truthy_values(["always"]).build().unwrap())
        .build()
        .unwrap()
}

#[test]
fn custom_flag_values_replace_defaults() {
    let config = ParserConfiguration::builder()
        .allow_equals_for_flags(true)
        .truthy_flag_values(["sure"])
        .falsey_flag_values(["nope"])
        .build()
        .unwrap();
    let parser = Parser::new(flags(), config);

    let result = parser.parse(&["--verbose=SURE"]).unwrap();
    assert_eq!(result.option("verbose"), Some(&OptionValue::Flag(true)));

    let result = parser.parse(&["--verbose=nope"]).unwrap();
    assert_eq!(result.option("verbose"), Some(&OptionValue::Flag(false)));

    let err = parser.parse(&["--verbose=yes"]).unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::InvalidFlagValue);
}

#[test]
fn option_flag_values_take_precedence() {
    let config = ParserConfiguration::builder()
        .allow_equals_for_flags(true)
        .truthy_flag_values(["sure"])
        .build()
        .unwrap();
    let parser = Parser::new(flags(), config);

    let result = parser.parse(&["--color=always"]).unwrap();
    assert_eq!(result.option("color"), Some(&OptionValue::Flag(true)));

    let err = parser.parse(&["--color=sure"]).unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::InvalidFlagValue);

    // Falsey values still come from the defaults.
    let result = parser.parse(&["--color=off"]).unwrap();
    assert_eq!(result.option("color"), Some(&OptionValue::Flag(false)));
}

#[test]
fn single_character_abbreviations() {
    let config = ParserConfiguration::builder()
        .allow_abbreviated_options(true)
        .minimum_abbreviation_length(1)
        .build()
        .unwrap();
    let parser = Parser::new(flags(), config);
    let result = parser.parse(&["--v", "--c"]).unwrap();
    assert!(result.is_present("verbose"));
    assert!(result.is_present("color"));
}
