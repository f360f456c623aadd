// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use {
    crate::{Arity, CommandSpec, ParseError, ParsedPositional, PositionalValue},
    indexmap::IndexMap,
};

/// Name of the positional that collects arguments for commands declaring
/// neither positionals nor subcommands.
pub const IMPLICIT_POSITIONAL: &str = "args";

/// Distribute `tokens` over the declared positionals of `spec`, in order.
///
/// Each positional takes as many tokens as it may while leaving enough for
/// the minimums of the positionals after it.
///
/// Tokens left over once every positional has taken its maximum are an
/// `UnexpectedPositionalArgument` error in GNU-style mode as well as under
/// `strict_options_before_positionals`. Bounded positionals are the only way
/// to end up with leftovers, and dropping them silently would hide mistakes.
pub(crate) fn group_positionals(
    spec: &CommandSpec,
    tokens: &[&str],
) -> Result<IndexMap<String, ParsedPositional>, ParseError> {
    let mut grouped = IndexMap::new();

    if !spec.has_positionals() {
        if spec.has_subcommands() {
            if let Some(first) = tokens.first() {
                return Err(unexpected(spec, first));
            }
            return Ok(grouped);
        }
        grouped.insert(
            IMPLICIT_POSITIONAL.to_owned(),
            ParsedPositional {
                name: IMPLICIT_POSITIONAL.to_owned(),
                value: PositionalValue::Multiple(tokens.iter().map(|t| t.to_string()).collect()),
            },
        );
        return Ok(grouped);
    }

    let arities: Vec<Arity> = spec.positionals().map(|p| p.arity()).collect();
    if let Some(err) = insufficient(spec, &arities, tokens.len()) {
        return Err(err);
    }

    let mut cursor = 0;
    for (i, positional) in spec.positionals().enumerate() {
        let arity = positional.arity();
        let reserved: usize = arities[i + 1..].iter().map(|a| a.min).sum();
        let available = tokens.len() - cursor - reserved;
        let take = arity.max.map_or(available, |max| max.min(available));
        let values: Vec<String> =
            tokens[cursor..cursor + take].iter().map(|t| t.to_string()).collect();
        cursor += take;

        tracing::trace!(positional = positional.name(), count = values.len(), "grouped positional");

        let value = if arity == Arity::EXACTLY_ONE {
            match <[String; 1]>::try_from(values) {
                Ok([single]) => PositionalValue::Single(single),
                Err(values) => PositionalValue::Multiple(values),
            }
        } else {
            PositionalValue::Multiple(values)
        };
        grouped.insert(
            positional.name().to_owned(),
            ParsedPositional { name: positional.name().to_owned(), value },
        );
    }

    if let Some(extra) = tokens.get(cursor) {
        return Err(unexpected(spec, extra));
    }
    Ok(grouped)
}

/// The error naming the first positional whose minimum cannot be met by
/// `received` tokens, if any.
fn insufficient(spec: &CommandSpec, arities: &[Arity], received: usize) -> Option<ParseError> {
    let mut needed = 0;
    for (positional, arity) in spec.positionals().zip(arities) {
        let before = needed;
        needed += arity.min;
        if needed > received {
            return Some(ParseError::InsufficientPositionalArguments {
                command: spec.name().to_owned(),
                positional: positional.name().to_owned(),
                expected: *arity,
                received: received - before,
            });
        }
    }
    None
}

fn unexpected(spec: &CommandSpec, argument: &str) -> ParseError {
    ParseError::UnexpectedPositionalArgument {
        command: spec.name().to_owned(),
        argument: argument.to_owned(),
    }
}
