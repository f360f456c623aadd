// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use {
    crate::{CommandSpec, ParsedOption},
    indexmap::IndexMap,
};

/// Mutable state for parsing one command level.
///
/// Created fresh for every level of every `parse` call.
pub(crate) struct ParsingContext<'s, 'a> {
    pub spec: &'s CommandSpec,
    args: &'a [&'a str],
    position: usize,
    pub options: IndexMap<String, ParsedOption>,
    /// Raw positional tokens, grouped once the level is done.
    pub positionals: Vec<&'a str>,
    pub extra_args: Vec<String>,
    /// Lazily computed by the parser when option values compete with
    /// required positionals.
    pub value_tokens: Option<ValueTokenCounts>,
}

/// For each position in a window of the argument list, how many tokens from
/// there up to the window's end could still become positionals.
///
/// The window ends at the first `--` or subcommand name, whose count is 0.
#[derive(Debug)]
pub(crate) struct ValueTokenCounts {
    start: usize,
    counts: Vec<usize>,
}

impl ValueTokenCounts {
    pub fn new(start: usize, counts: Vec<usize>) -> Self {
        ValueTokenCounts { start, counts }
    }

    /// The count at `position`, if it lies inside the window.
    pub fn get(&self, position: usize) -> Option<usize> {
        position.checked_sub(self.start).and_then(|i| self.counts.get(i)).copied()
    }
}

impl<'s, 'a> ParsingContext<'s, 'a> {
    pub fn new(spec: &'s CommandSpec, args: &'a [&'a str]) -> Self {
        ParsingContext {
            spec,
            args,
            position: 0,
            options: IndexMap::new(),
            positionals: Vec::new(),
            extra_args: Vec::new(),
            value_tokens: None,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The token under the cursor.
    pub fn peek(&self) -> Option<&'a str> {
        self.args.get(self.position).copied()
    }

    /// Return the token under the cursor and move past it.
    pub fn next_token(&mut self) -> Option<&'a str> {
        let token = self.peek()?;
        self.position += 1;
        Some(token)
    }

    /// Every token after the cursor, consuming them all.
    pub fn take_rest(&mut self) -> &'a [&'a str] {
        let rest = self.args.get(self.position..).unwrap_or(&[]);
        self.position = self.args.len();
        rest
    }

    /// Tokens from the cursor onwards, without consuming them.
    pub fn remaining(&self) -> &'a [&'a str] {
        self.args.get(self.position..).unwrap_or(&[])
    }

    pub fn positionals_started(&self) -> bool {
        !self.positionals.is_empty()
    }

    /// Tokens still owed to declared positionals: the sum of their minimum
    /// arities less what has already been collected.
    pub fn reserved_positional_tokens(&self) -> usize {
        let required: usize = self.spec.positionals().map(|p| p.arity().min).sum();
        required.saturating_sub(self.positionals.len())
    }
}
