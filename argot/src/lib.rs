// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Specification-driven command-line argument parsing.
//!
//! A command line is described once as a tree of `CommandSpec`s, each
//! declaring its options, positionals and subcommands. A `Parser` pairs the
//! tree with a `ParserConfiguration` and turns argument lists into
//! `ParseResult`s: one node per command level, holding the options and
//! positionals found there.
//!
//! ## Basic Example
//!
//! ```rust
//! use argot::{
//!     AccumulationMode, CommandSpec, OptionSpec, OptionValue, Parser, ParserConfiguration,
//! };
//!
//! let commit = CommandSpec::builder("commit")
//!     .option(OptionSpec::flag("all").short('a').build().unwrap())
//!     .option(OptionSpec::builder("message").short('m').build().unwrap())
//!     .build()
//!     .unwrap();
//!
//! let git = CommandSpec::builder("git")
//!     .option(
//!         OptionSpec::flag("verbose")
//!             .short('v')
//!             .accumulation(AccumulationMode::Count)
//!             .build()
//!             .unwrap(),
//!     )
//!     .subcommand(commit)
//!     .build()
//!     .unwrap();
//!
//! let parser = Parser::new(git, ParserConfiguration::default());
//! let result = parser.parse(&["-vv", "commit", "-am", "Update files"]).unwrap();
//!
//! assert_eq!(result.option("verbose"), Some(&OptionValue::Count(2)));
//! let commit = result.subcommand().unwrap();
//! assert_eq!(commit.option("all"), Some(&OptionValue::Flag(true)));
//! assert_eq!(commit.option("message"), Some(&OptionValue::from("Update files")));
//! assert_eq!(result.command_path(), ["git", "commit"]);
//! ```
//!
//! ## Options
//!
//! Options are spelled `--name`, `--name=value` or `-n`. Short options may
//! be clustered (`-abc`), and the last option of a cluster may take its
//! value from the rest of the cluster (`-ofile`, `-o=file`) or from the
//! following arguments. Every option has an `Arity` giving how many values
//! each occurrence takes, and an `AccumulationMode` saying how repeated
//! occurrences combine.
//!
//! Flags are options taking no values. A flag with negation words gets
//! extra long aliases: `negation_word("no")` on `--verbose` adds
//! `--no-verbose`, which records `false`.
//!
//! ## Positionals
//!
//! Arguments that are neither options nor subcommand names are handed to
//! the declared positionals in order. Each positional takes as many as its
//! arity allows while leaving enough for the minimums of those after it:
//!
//! ```rust
//! # use argot::{Arity, CommandSpec, Parser, PositionalSpec};
//! let cp = CommandSpec::builder("cp")
//!     .positional(PositionalSpec::new("sources", Arity::ONE_OR_MORE).unwrap())
//!     .positional(PositionalSpec::required("dest").unwrap())
//!     .build()
//!     .unwrap();
//! let result = Parser::from(cp).parse(&["a", "b", "dir"]).unwrap();
//! assert_eq!(result.positional("sources").unwrap().values(), ["a", "b"]);
//! assert_eq!(result.positional("dest").unwrap().as_str(), Some("dir"));
//! ```
//!
//! Commands that declare neither positionals nor subcommands collect their
//! positional arguments under `IMPLICIT_POSITIONAL`. Everything after a
//! literal `--` is kept verbatim in `ParseResult::extra_args`.
//!
//! ## Errors
//!
//! Mistakes in a specification are reported as `SpecificationError` when it
//! is built, before any argument is read. Mistakes on the command line are
//! reported as `ParseError`, one variant per kind of problem.

mod command;
mod config;
mod error;
mod option;
mod parser;
mod positional;
mod result;

pub use {
    argot_shared::{AccumulationMode, Arity, InvalidArity},
    command::{CommandSpec, CommandSpecBuilder, MAX_COMMAND_DEPTH},
    config::{
        DEFAULT_FALSEY_FLAG_VALUES, DEFAULT_NEGATIVE_NUMBER_PATTERN, DEFAULT_TRUTHY_FLAG_VALUES,
        MatchRules, ParserConfiguration, ParserConfigurationBuilder,
    },
    error::{ParseError, ParseErrorKind, SpecificationError},
    option::{OptionSpec, OptionSpecBuilder},
    parser::{IMPLICIT_POSITIONAL, Parser},
    positional::PositionalSpec,
    result::{OptionValue, ParseResult, ParsedOption, ParsedPositional, PositionalValue},
};
