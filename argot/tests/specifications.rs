// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use argot::{
    AccumulationMode, Arity, CommandSpec, MAX_COMMAND_DEPTH, MatchRules, OptionSpec,
    ParseError, ParserConfiguration, PositionalSpec, SpecificationError,
};

#[test]
fn names_follow_the_grammar() {
    for bad in ["", "1st", "-x", "has space", "dot.ted"] {
        let err = OptionSpec::builder(bad).build().unwrap_err();
        assert!(matches!(err, SpecificationError::InvalidName { kind: "option", .. }), "{bad}");
    }
    assert!(OptionSpec::builder("dry_run-2").build().is_ok());

    let err = CommandSpec::builder("bad name").build().unwrap_err();
    assert!(matches!(err, SpecificationError::InvalidName { kind: "command", .. }));

    let err = CommandSpec::builder("tool").alias("9lives").build().unwrap_err();
    assert!(matches!(err, SpecificationError::InvalidName { kind: "command alias", .. }));

    let err = PositionalSpec::required("").unwrap_err();
    assert!(matches!(err, SpecificationError::InvalidName { .. }));

    let err = OptionSpec::builder("output").long("--").build().unwrap_err();
    assert!(matches!(err, SpecificationError::InvalidName { kind: "long option", .. }));
}

#[test]
fn short_names_are_single_alphanumerics() {
    let err = OptionSpec::flag("verbose").short('-').build().unwrap_err();
    assert!(matches!(err, SpecificationError::InvalidShortName { short: '-', .. }));
    assert!(OptionSpec::flag("one").short('1').build().is_ok());
}

#[test]
fn long_aliases_drop_leading_dashes() {
    let spec = OptionSpec::builder("output").long("--out").long("output").build().unwrap();
    assert_eq!(spec.long().collect::<Vec<_>>(), ["out", "output"]);
}

#[test]
fn arity_is_validated() {
    let err = Arity::new(3, Some(1)).unwrap_err();
    assert_eq!((err.min, err.max), (3, 1));

    let err = OptionSpec::builder("range").values(3, Some(1)).build().unwrap_err();
    assert!(matches!(err, SpecificationError::InvalidArity { min: 3, max: 1, .. }));

    let err = OptionSpec::flag("verbose").arity(Arity::EXACTLY_ONE).build().unwrap_err();
    assert!(matches!(err, SpecificationError::FlagWithArity { .. }));
}

#[test]
fn option_aliases_are_unique_per_command() {
    let err = CommandSpec::builder("tool")
        .option(OptionSpec::flag("verbose").short('v').build().unwrap())
        .option(OptionSpec::flag("version").short('v').build().unwrap())
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        SpecificationError::DuplicateOptionAlias { ref alias, ref first, ref second, .. }
            if alias == "v" && first == "verbose" && second == "version"
    ));

    let err = CommandSpec::builder("tool")
        .option(OptionSpec::flag("verbose").build().unwrap())
        .option(OptionSpec::flag("verbose").build().unwrap())
        .build()
        .unwrap_err();
    assert!(matches!(err, SpecificationError::DuplicateOptionName { .. }));
}

#[test]
fn negated_aliases_take_part_in_duplicate_detection() {
    let err = CommandSpec::builder("tool")
        .option(OptionSpec::flag("verbose").negation_word("no").build().unwrap())
        .option(OptionSpec::flag("no-verbose").build().unwrap())
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        SpecificationError::DuplicateOptionAlias { ref alias, .. } if alias == "no-verbose"
    ));

    let err = OptionSpec::flag("verbose").negation_word("no way").build().unwrap_err();
    assert!(matches!(err, SpecificationError::InvalidNegationWord { .. }));
}

#[test]
fn positional_names_are_unique() {
    let err = CommandSpec::builder("tool")
        .positional(PositionalSpec::required("file").unwrap())
        .positional(PositionalSpec::required("file").unwrap())
        .build()
        .unwrap_err();
    assert!(matches!(err, SpecificationError::DuplicatePositional { .. }));
}

#[test]
fn subcommand_names_and_aliases_are_unique() {
    let err = CommandSpec::builder("git")
        .subcommand(CommandSpec::builder("remove").alias("rm").build().unwrap())
        .subcommand(CommandSpec::builder("rm").build().unwrap())
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        SpecificationError::DuplicateSubcommand { ref name, ref first, ref second, .. }
            if name == "rm" && first == "remove" && second == "rm"
    ));
}

#[test]
fn nesting_depth_is_bounded() {
    let mut spec = CommandSpec::builder("leaf").build().unwrap();
    for level in 1..MAX_COMMAND_DEPTH {
        spec = CommandSpec::builder(format!("c{level}")).subcommand(spec).build().unwrap();
    }
    assert_eq!(spec.depth(), MAX_COMMAND_DEPTH);

    let err = CommandSpec::builder("root").subcommand(spec).build().unwrap_err();
    assert!(matches!(
        err,
        SpecificationError::CommandTooDeep { limit: MAX_COMMAND_DEPTH, .. }
    ));
}

#[test]
fn flag_value_sets_are_validated() {
    let err = OptionSpec::flag("color")
        .truthy_values(["always"])
        .falsey_values(["never", "ALWAYS"])
        .build()
        .unwrap_err();
    assert!(matches!(err, SpecificationError::OverlappingFlagValues { .. }));
}

#[test]
fn inert_flatten_is_accepted() {
    let spec = OptionSpec::builder("include")
        .arity(Arity::ONE_OR_MORE)
        .accumulation(AccumulationMode::LastWins)
        .flatten_values(true)
        .build()
        .unwrap();
    assert!(spec.flatten_values());
}

fn tool() -> CommandSpec {
    CommandSpec::builder("tool")
        .option(OptionSpec::flag("verbose").negation_word("no").build().unwrap())
        .option(OptionSpec::flag("version").build().unwrap())
        .option(OptionSpec::builder("output").build().unwrap())
        .subcommand(CommandSpec::builder("stash").build().unwrap())
        .subcommand(CommandSpec::builder("status").alias("st").build().unwrap())
        .subcommand(CommandSpec::builder("commit").build().unwrap())
        .build()
        .unwrap()
}

#[test]
fn resolution_queries() {
    let spec = tool();
    let rules = ParserConfiguration::builder()
        .allow_abbreviated_options(true)
        .build()
        .unwrap()
        .option_rules();

    let (matched, option) = spec.resolve_option("verb", rules).unwrap();
    assert_eq!((matched, option.name()), ("verbose", "verbose"));

    let (matched, option) = spec.resolve_option("no-verbose", MatchRules::EXACT).unwrap();
    assert_eq!((matched, option.name()), ("no-verbose", "verbose"));

    let err = spec.resolve_option("ver", rules).unwrap_err();
    assert!(matches!(err, ParseError::AmbiguousOption { .. }));

    let (matched, status) = spec.resolve_subcommand("st", MatchRules::EXACT).unwrap().unwrap();
    assert_eq!((matched, status.name()), ("st", "status"));
    assert!(spec.resolve_subcommand("nope", MatchRules::EXACT).unwrap().is_none());
}

#[test]
fn resolution_is_memoized_consistently() {
    let spec = tool();
    let rules = MatchRules { allow_abbreviation: true, ..MatchRules::default() };
    for _ in 0..3 {
        let (_, option) = spec.resolve_option("outp", rules).unwrap();
        assert_eq!(option.name(), "output");
    }
    // Different rules are a different query.
    assert!(spec.resolve_option("outp", MatchRules::EXACT).is_err());
}

#[test]
fn completion_queries() {
    let spec = tool();
    let rules = MatchRules::default();
    assert_eq!(spec.complete_option("--ver", rules), ["--verbose", "--version"]);
    assert_eq!(spec.complete_option("no", rules), ["--no-verbose"]);
    assert_eq!(spec.complete_subcommand("st", rules), ["st", "stash", "status"]);

    let no_aliases = MatchRules { allow_aliases: false, ..rules };
    assert_eq!(spec.complete_subcommand("st", no_aliases), ["stash", "status"]);
    assert!(spec.complete_subcommand("x", rules).is_empty());
}

#[test]
fn spec_accessors() {
    let spec = tool();
    assert_eq!(spec.name(), "tool");
    assert_eq!(
        spec.options().map(|o| o.name()).collect::<Vec<_>>(),
        ["verbose", "version", "output"]
    );
    assert!(spec.has_subcommands());
    assert!(!spec.has_positionals());
    assert_eq!(spec.subcommand("status").unwrap().aliases().collect::<Vec<_>>(), ["st"]);
    assert_eq!(spec.option("output").unwrap().arity(), Arity::EXACTLY_ONE);
    assert_eq!(spec.depth(), 2);
}
