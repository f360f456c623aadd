// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The parser: a state machine over a cursor into the argument list, one
//! level per command in the subcommand chain.

mod accumulate;
mod cluster;
mod context;
mod positionals;

pub use self::positionals::IMPLICIT_POSITIONAL;

use {
    self::{
        accumulate::{Occurrence, Step, accumulate},
        cluster::split_cluster,
        context::{ParsingContext, ValueTokenCounts},
        positionals::group_positionals,
    },
    crate::{
        CommandSpec, DEFAULT_FALSEY_FLAG_VALUES, DEFAULT_TRUTHY_FLAG_VALUES, OptionSpec,
        ParseError, ParseResult, ParsedOption, ParserConfiguration,
    },
    tracing::{debug, trace},
};

/// Parses argument lists against a `CommandSpec`.
///
/// A `Parser` holds no per-parse state: `parse` may be called any number of
/// times, from any number of threads, and equal inputs give equal results.
///
/// ```
/// use argot::{CommandSpec, OptionSpec, Parser, ParserConfiguration, PositionalSpec};
///
/// let spec = CommandSpec::builder("greet")
///     .option(OptionSpec::flag("loud").short('l').build().unwrap())
///     .positional(PositionalSpec::required("name").unwrap())
///     .build()
///     .unwrap();
/// let parser = Parser::new(spec, ParserConfiguration::default());
///
/// let result = parser.parse(&["-l", "world"]).unwrap();
/// assert_eq!(result.option("loud").and_then(|v| v.as_flag()), Some(true));
/// assert_eq!(result.positional("name").and_then(|v| v.as_str()), Some("world"));
/// ```
#[derive(Debug)]
pub struct Parser {
    spec: CommandSpec,
    config: ParserConfiguration,
}

impl From<CommandSpec> for Parser {
    fn from(spec: CommandSpec) -> Self {
        Parser::new(spec, ParserConfiguration::default())
    }
}

impl Parser {
    pub fn new(spec: CommandSpec, config: ParserConfiguration) -> Self {
        Parser { spec, config }
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    pub fn config(&self) -> &ParserConfiguration {
        &self.config
    }

    /// Parse `args`, which should not include the program name.
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> Result<ParseResult, ParseError> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        self.parse_level(&self.spec, &args, None)
    }

    /// Parse the arguments of the current process, skipping the program name.
    ///
    /// Panics if any argument is not valid unicode.
    pub fn parse_env(&self) -> Result<ParseResult, ParseError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        self.parse(&args)
    }

    fn parse_level(
        &self,
        spec: &CommandSpec,
        args: &[&str],
        alias: Option<String>,
    ) -> Result<ParseResult, ParseError> {
        debug!(command = spec.name(), args = args.len(), "parsing command level");
        let strict = self.config.strict_options_before_positionals();
        let mut ctx = ParsingContext::new(spec, args);
        let mut subcommand = None;

        while let Some(token) = ctx.next_token() {
            trace!(command = spec.name(), token, "classifying token");

            if token == "--" {
                ctx.extra_args = ctx.take_rest().iter().map(|t| t.to_string()).collect();
                break;
            }

            let options_allowed = !(strict && ctx.positionals_started());
            if options_allowed && token.starts_with("--") {
                self.parse_long_option(&mut ctx, token)?;
                continue;
            }
            if options_allowed
                && token.len() > 1
                && token.starts_with('-')
                && !self.is_positional_number(spec, token)
            {
                self.parse_short_cluster(&mut ctx, token)?;
                continue;
            }

            match spec.resolve_subcommand(token, self.config.subcommand_rules())? {
                Some((_, sub)) => {
                    debug!(command = spec.name(), subcommand = sub.name(), token, "descending");
                    let alias = (token != sub.name()).then(|| token.to_owned());
                    let rest = ctx.take_rest();
                    subcommand = Some(Box::new(self.parse_level(sub, rest, alias)?));
                    break;
                }
                None if spec.has_subcommands() && !spec.has_positionals() => {
                    return Err(spec.unknown_subcommand(token, self.config.subcommand_rules()));
                }
                None => ctx.positionals.push(token),
            }
        }

        let positionals = group_positionals(spec, &ctx.positionals)?;
        Ok(ParseResult {
            command: spec.name().to_owned(),
            alias,
            options: ctx.options,
            positionals,
            extra_args: ctx.extra_args,
            subcommand,
        })
    }

    fn parse_long_option<'s, 'a>(
        &self,
        ctx: &mut ParsingContext<'s, 'a>,
        token: &'a str,
    ) -> Result<(), ParseError> {
        let body = &token[2..];
        let (name, attached) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let spec = ctx.spec;
        let (matched, option) = spec.resolve_option(name, self.config.option_rules())?;
        trace!(option = option.name(), matched, "resolved long option");

        let shown = ["--", name].concat();
        let occurrence = if option.is_flag_like() {
            let negated = option.negated_long().any(|n| n == matched);
            self.flag_occurrence(ctx, option, negated, attached, &shown, true)?
        } else {
            self.value_occurrence(ctx, option, attached, &shown)?
        };
        let alias = (name != option.name()).then(|| name.to_owned());
        self.record(ctx, option, occurrence, alias, &shown)
    }

    fn parse_short_cluster<'s, 'a>(
        &self,
        ctx: &mut ParsingContext<'s, 'a>,
        token: &'a str,
    ) -> Result<(), ParseError> {
        let items = split_cluster(ctx.spec, &self.config, &token[1..])?;
        let last = items.len().saturating_sub(1);

        for (i, item) in items.into_iter().enumerate() {
            let shown = format!("-{}", item.short);
            let attached = item.value.map(|v| v.as_str());
            let trailing = i == last;
            trace!(option = item.option.name(), short = %item.short, trailing, "cluster item");

            let occurrence = if item.option.is_flag_like() {
                self.flag_occurrence(ctx, item.option, false, attached, &shown, trailing)?
            } else if attached.is_some() || trailing {
                self.value_occurrence(ctx, item.option, attached, &shown)?
            } else {
                empty_occurrence(item.option)
            };
            let typed = item.short.to_string();
            let alias = (typed != item.option.name()).then_some(typed);
            self.record(ctx, item.option, occurrence, alias, &shown)?;
        }
        Ok(())
    }

    /// Work out what a flag-like option's occurrence means.
    ///
    /// With `lookahead`, and equals syntax allowed for flags, a following
    /// token that reads as a truthy or falsey value is taken as the flag's
    /// value. Anything else is left alone.
    fn flag_occurrence(
        &self,
        ctx: &mut ParsingContext<'_, '_>,
        option: &OptionSpec,
        negated: bool,
        attached: Option<&str>,
        shown: &str,
        lookahead: bool,
    ) -> Result<Occurrence, ParseError> {
        let spec = ctx.spec;
        let command = spec.name();
        let explicit = match attached {
            Some(value) if !self.config.allow_equals_for_flags() => {
                return Err(if !option.is_flag() && value.is_empty() {
                    ParseError::OptionDoesNotAcceptValue {
                        command: command.to_owned(),
                        option: shown.to_owned(),
                    }
                } else {
                    ParseError::FlagWithValue {
                        command: command.to_owned(),
                        option: shown.to_owned(),
                        value: value.to_owned(),
                    }
                });
            }
            Some(value) => match self.coerce_flag(option, value) {
                Some(b) => Some(b),
                None => {
                    return Err(ParseError::InvalidFlagValue {
                        command: command.to_owned(),
                        option: shown.to_owned(),
                        value: value.to_owned(),
                    });
                }
            },
            None if lookahead && self.config.allow_equals_for_flags() => {
                self.speculate_flag_value(ctx, option)
            }
            None => None,
        };

        Ok(match (explicit, option.const_value()) {
            (Some(b), _) => Occurrence::Switch(b != negated),
            (None, Some(value)) => Occurrence::Values(vec![value.to_owned()]),
            (None, None) => Occurrence::Switch(!negated),
        })
    }

    /// Take the next token as a flag's value if it coerces, without
    /// consuming anything otherwise.
    fn speculate_flag_value(
        &self,
        ctx: &mut ParsingContext<'_, '_>,
        option: &OptionSpec,
    ) -> Option<bool> {
        let next = ctx.peek()?;
        if self.is_option_like(ctx.spec, next) {
            return None;
        }
        let value = self.coerce_flag(option, next)?;
        let reserved = ctx.reserved_positional_tokens();
        if reserved > 0 && self.remaining_value_tokens(ctx) <= reserved {
            trace!(option = option.name(), token = next, "leaving flag value for positionals");
            return None;
        }
        trace!(option = option.name(), token = next, value, "took flag value from next token");
        ctx.next_token();
        Some(value)
    }

    fn coerce_flag(&self, option: &OptionSpec, value: &str) -> Option<bool> {
        let truthy = option.truthy_flag_values().or(self.config.truthy_flag_values());
        let falsey = option.falsey_flag_values().or(self.config.falsey_flag_values());
        if contains_ignore_case(truthy, DEFAULT_TRUTHY_FLAG_VALUES, value) {
            Some(true)
        } else if contains_ignore_case(falsey, DEFAULT_FALSEY_FLAG_VALUES, value) {
            Some(false)
        } else {
            None
        }
    }

    fn value_occurrence(
        &self,
        ctx: &mut ParsingContext<'_, '_>,
        option: &OptionSpec,
        attached: Option<&str>,
        shown: &str,
    ) -> Result<Occurrence, ParseError> {
        let arity = option.arity();
        let values = match attached {
            Some(value) => vec![value.to_owned()],
            None => self.consume_values(ctx, option),
        };
        if values.len() < arity.min {
            return Err(ParseError::InsufficientOptionValues {
                command: ctx.spec.name().to_owned(),
                option: shown.to_owned(),
                expected: arity,
                received: values.len(),
            });
        }
        if values.is_empty() {
            return Ok(empty_occurrence(option));
        }
        Ok(Occurrence::Values(values))
    }

    /// Consume the values following an option, up to its maximum arity.
    ///
    /// Once the minimum is met, stop before a subcommand name and before
    /// eating into the tokens still owed to declared positionals.
    fn consume_values(&self, ctx: &mut ParsingContext<'_, '_>, option: &OptionSpec) -> Vec<String> {
        let arity = option.arity();
        let spec = ctx.spec;
        let reserved = ctx.reserved_positional_tokens();
        let mut values = Vec::new();

        while arity.max.is_none_or(|max| values.len() < max) {
            let Some(token) = ctx.peek() else { break };
            if self.is_option_like(spec, token) {
                trace!(option = option.name(), token, "value consumption stopped at option");
                break;
            }
            if values.len() >= arity.min {
                if self.is_subcommand(spec, token) {
                    trace!(option = option.name(), token, "values stopped at subcommand");
                    break;
                }
                if reserved > 0 && self.remaining_value_tokens(ctx) <= reserved {
                    trace!(option = option.name(), reserved, "values stopped for positionals");
                    break;
                }
            }
            trace!(option = option.name(), token, "consumed option value");
            values.push(token.to_owned());
            ctx.next_token();
        }
        values
    }

    /// Record an occurrence, folding it into any earlier one.
    fn record(
        &self,
        ctx: &mut ParsingContext<'_, '_>,
        option: &OptionSpec,
        occurrence: Occurrence,
        alias: Option<String>,
        shown: &str,
    ) -> Result<(), ParseError> {
        let existing = ctx.options.get(option.name()).map(|o| &o.value);
        match accumulate(option, self.config.flatten_option_values(), existing, occurrence) {
            Step::Keep => {}
            Step::Replace(value) => {
                let name = option.name().to_owned();
                ctx.options.insert(name.clone(), ParsedOption { name, value, alias });
            }
            Step::Duplicate => {
                return Err(ParseError::OptionCannotBeSpecifiedMultipleTimes {
                    command: ctx.spec.name().to_owned(),
                    option: shown.to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Whether `token` would be read as an option (or the `--` separator)
    /// rather than as a value.
    fn is_option_like(&self, spec: &CommandSpec, token: &str) -> bool {
        token.len() > 1 && token.starts_with('-') && !self.is_unclaimed_number(spec, token)
    }

    /// A negative number whose first digit is not itself a short option.
    fn is_unclaimed_number(&self, spec: &CommandSpec, token: &str) -> bool {
        self.config.is_negative_number(token)
            && !token
                .chars()
                .nth(1)
                .is_some_and(|c| spec.has_short_option(c, self.config.short_rules()))
    }

    /// Whether a negative number at the top of the loop is a positional.
    ///
    /// Only commands that take positionals expect one: those declaring
    /// positionals, and those with no subcommands (which collect into the
    /// implicit positional).
    fn is_positional_number(&self, spec: &CommandSpec, token: &str) -> bool {
        (spec.has_positionals() || !spec.has_subcommands()) && self.is_unclaimed_number(spec, token)
    }

    fn is_subcommand(&self, spec: &CommandSpec, token: &str) -> bool {
        matches!(spec.resolve_subcommand(token, self.config.subcommand_rules()), Ok(Some(_)))
    }

    /// The number of tokens from the cursor that could still become
    /// positionals of this level.
    ///
    /// Counts for a whole window are computed in one backward pass and kept
    /// on the context, so repeated queries while consuming values are cheap.
    fn remaining_value_tokens(&self, ctx: &mut ParsingContext<'_, '_>) -> usize {
        let position = ctx.position();
        if let Some(count) = ctx.value_tokens.as_ref().and_then(|c| c.get(position)) {
            return count;
        }
        let counts = self.count_value_tokens(ctx.spec, ctx.remaining(), position);
        let count = counts.get(position).unwrap_or(0);
        ctx.value_tokens = Some(counts);
        count
    }

    /// Walk `tokens` (starting at argument index `start`) up to the first `--`
    /// or subcommand name. Option-like tokens are skipped along with the
    /// values they are owed, since those can never become positionals.
    fn count_value_tokens(
        &self,
        spec: &CommandSpec,
        tokens: &[&str],
        start: usize,
    ) -> ValueTokenCounts {
        let end = tokens
            .iter()
            .position(|t| *t == "--" || self.is_subcommand(spec, t))
            .unwrap_or(tokens.len());
        let window = &tokens[..end];
        let mut counts = vec![0; end + 1];
        for (i, token) in window.iter().enumerate().rev() {
            counts[i] = if self.is_option_like(spec, token) {
                let owed = self.owed_values(spec, token, &window[i + 1..]);
                counts[i + 1 + owed]
            } else {
                counts[i + 1] + 1
            };
        }
        trace!(command = spec.name(), start, window = end, "counted value tokens");
        ValueTokenCounts::new(start, counts)
    }

    /// How many of the `following` tokens the option spelled by `token` is
    /// sure to consume: its minimum arity, unless its value is attached.
    fn owed_values(&self, spec: &CommandSpec, token: &str, following: &[&str]) -> usize {
        let option = if let Some(body) = token.strip_prefix("--") {
            if body.contains('=') {
                return 0;
            }
            match spec.resolve_option(body, self.config.option_rules()) {
                Ok((_, option)) => option,
                Err(_) => return 0,
            }
        } else {
            match split_cluster(spec, &self.config, &token[1..]) {
                Ok(items) => match items.last() {
                    Some(item) if item.value.is_none() => item.option,
                    _ => return 0,
                },
                Err(_) => return 0,
            }
        };
        if option.is_flag_like() {
            return 0;
        }
        following
            .iter()
            .take(option.arity().min)
            .take_while(|t| !self.is_option_like(spec, t))
            .count()
    }
}

/// The occurrence of a value-taking option given no values.
fn empty_occurrence(option: &OptionSpec) -> Occurrence {
    match option.const_value() {
        Some(value) => Occurrence::Values(vec![value.to_owned()]),
        None => Occurrence::Values(Vec::new()),
    }
}

fn contains_ignore_case(set: Option<&[String]>, defaults: &[&str], value: &str) -> bool {
    match set {
        Some(set) => set.iter().any(|s| s.eq_ignore_ascii_case(value)),
        None => defaults.iter().any(|s| s.eq_ignore_ascii_case(value)),
    }
}
