// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{AccumulationMode, OptionSpec, OptionValue};

/// What a single appearance of an option on the command line produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Occurrence {
    /// A flag-like option, resolved to true or false.
    Switch(bool),
    /// The values consumed for a value-taking option (or a flag's constant).
    Values(Vec<String>),
}

/// How the recorded value changes after an occurrence.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Leave the recorded value alone.
    Keep,
    Replace(OptionValue),
    /// The option may not be repeated.
    Duplicate,
}

/// Fold `occurrence` into the value already recorded for `option`.
pub(crate) fn accumulate(
    option: &OptionSpec,
    flatten: bool,
    existing: Option<&OptionValue>,
    occurrence: Occurrence,
) -> Step {
    match (option.accumulation_mode(), existing) {
        (AccumulationMode::Error, Some(_)) => Step::Duplicate,
        (AccumulationMode::FirstWins, Some(_)) => Step::Keep,
        (AccumulationMode::Count, existing) => {
            let count = existing.and_then(OptionValue::as_count).unwrap_or(0);
            let increment = usize::from(occurrence != Occurrence::Switch(false));
            Step::Replace(OptionValue::Count(count + increment))
        }
        (AccumulationMode::Collect, existing) => {
            Step::Replace(collect(option, flatten || option.flatten_values(), existing, occurrence))
        }
        (AccumulationMode::LastWins | AccumulationMode::FirstWins | AccumulationMode::Error, _) => {
            Step::Replace(scalar(option, occurrence))
        }
    }
}

/// The shape of a lone occurrence under a scalar mode.
pub(crate) fn scalar(option: &OptionSpec, occurrence: Occurrence) -> OptionValue {
    match occurrence {
        Occurrence::Switch(b) => OptionValue::Flag(b),
        Occurrence::Values(mut values) if values.len() == 1 && takes_one(option) => {
            OptionValue::Single(values.remove(0))
        }
        Occurrence::Values(values) => OptionValue::Multiple(values),
    }
}

/// An option whose every occurrence yields at most one value.
fn takes_one(option: &OptionSpec) -> bool {
    option.is_flag_like() || option.arity().max == Some(1)
}

fn collect(
    option: &OptionSpec,
    flatten: bool,
    existing: Option<&OptionValue>,
    occurrence: Occurrence,
) -> OptionValue {
    let flat = flatten || takes_one(option);
    match (existing, occurrence) {
        (None, Occurrence::Switch(b)) => OptionValue::Flags(vec![b]),
        (Some(OptionValue::Flags(seen)), Occurrence::Switch(b)) => {
            let mut seen = seen.clone();
            seen.push(b);
            OptionValue::Flags(seen)
        }
        (None, Occurrence::Values(values)) if flat => OptionValue::Multiple(values),
        (Some(OptionValue::Multiple(seen)), Occurrence::Values(values)) if flat => {
            OptionValue::Multiple(seen.iter().cloned().chain(values).collect())
        }
        (None, Occurrence::Values(values)) => OptionValue::Nested(vec![values]),
        (Some(OptionValue::Nested(seen)), Occurrence::Values(values)) => {
            let mut seen = seen.clone();
            seen.push(values);
            OptionValue::Nested(seen)
        }
        // Flag and value occurrences mixed (a flag with a constant, say):
        // fall back to one flat list of strings.
        (Some(other), occurrence) => {
            let mut merged = strings(other);
            match occurrence {
                Occurrence::Switch(b) => merged.push(b.to_string()),
                Occurrence::Values(values) => merged.extend(values),
            }
            OptionValue::Multiple(merged)
        }
    }
}

fn strings(value: &OptionValue) -> Vec<String> {
    match value {
        OptionValue::Flag(b) => vec![b.to_string()],
        OptionValue::Count(n) => vec![n.to_string()],
        OptionValue::Single(s) => vec![s.clone()],
        OptionValue::Multiple(values) => values.clone(),
        OptionValue::Flags(flags) => flags.iter().map(bool::to_string).collect(),
        OptionValue::Nested(groups) => groups.iter().flatten().cloned().collect(),
    }
}
