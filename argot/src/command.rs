// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Command specifications and name resolution.

use {
    crate::{MatchRules, OptionSpec, ParseError, PositionalSpec, SpecificationError},
    argot_shared::is_valid_name,
    indexmap::{IndexMap, IndexSet},
    std::{
        collections::HashMap,
        fmt,
        sync::{PoisonError, RwLock},
    },
};

/// The deepest subcommand nesting a `CommandSpec` tree may have.
pub const MAX_COMMAND_DEPTH: usize = 900;

const MAX_SUGGESTIONS: usize = 3;
const SUGGESTION_THRESHOLD: f32 = 0.3;

/// An immutable description of a command: its options, positionals and
/// nested subcommands.
///
/// Name lookups are memoized per spec instance, keyed by the typed token and
/// the `MatchRules` in effect.
#[derive(Debug)]
pub struct CommandSpec {
    name: String,
    aliases: IndexSet<String>,
    options: IndexMap<String, OptionSpec>,
    positionals: IndexMap<String, PositionalSpec>,
    subcommands: IndexMap<String, CommandSpec>,
    long_table: Vec<NameEntry>,
    short_table: Vec<NameEntry>,
    subcommand_table: Vec<NameEntry>,
    depth: usize,
    cache: ResolutionCache,
}

/// A declared name and the index of the option or subcommand it names.
#[derive(Clone, Debug)]
struct NameEntry {
    name: String,
    target: usize,
    is_alias: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Table {
    Long,
    Short,
    Subcommand,
}

/// The outcome of matching a token against a name table.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Resolution {
    /// Index into the table of the matched entry.
    Exact(usize),
    Abbreviated(usize),
    NotFound,
    TooShort,
    Ambiguous(Vec<String>),
}

#[derive(Default)]
struct ResolutionCache {
    entries: RwLock<HashMap<(Table, String, MatchRules), Resolution>>,
}

impl fmt::Debug for ResolutionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.entries.read().unwrap_or_else(PoisonError::into_inner).len();
        f.debug_struct("ResolutionCache").field("entries", &len).finish()
    }
}

impl ResolutionCache {
    fn get_or_insert_with(
        &self,
        key: (Table, String, MatchRules),
        resolve: impl FnOnce() -> Resolution,
    ) -> Resolution {
        if let Some(found) = self.entries.read().unwrap_or_else(PoisonError::into_inner).get(&key)
        {
            return found.clone();
        }
        let resolution = resolve();
        tracing::debug!(table = ?key.0, token = %key.1, ?resolution, "resolved name");
        // Only tokens that prefix a declared name are kept, which bounds the
        // map by the name tables rather than by user input.
        if resolution.is_match() {
            self.entries
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key, resolution.clone());
        }
        resolution
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Resolution {
    fn is_match(&self) -> bool {
        !matches!(self, Resolution::NotFound | Resolution::TooShort)
    }
}

impl CommandSpec {
    pub fn builder(name: impl Into<String>) -> CommandSpecBuilder {
        CommandSpecBuilder {
            name: name.into(),
            aliases: Vec::new(),
            options: Vec::new(),
            positionals: Vec::new(),
            subcommands: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(String::as_str)
    }

    pub fn options(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options.values()
    }

    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.get(name)
    }

    /// Positionals in declaration order.
    pub fn positionals(&self) -> impl ExactSizeIterator<Item = &PositionalSpec> {
        self.positionals.values()
    }

    pub fn has_positionals(&self) -> bool {
        !self.positionals.is_empty()
    }

    pub fn subcommands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.subcommands.values()
    }

    pub fn subcommand(&self, name: &str) -> Option<&CommandSpec> {
        self.subcommands.get(name)
    }

    pub fn has_subcommands(&self) -> bool {
        !self.subcommands.is_empty()
    }

    /// Levels of nesting below and including this command; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Resolve a long option name (without leading dashes) to its spec.
    ///
    /// Returns the declared alias that matched alongside the spec. Negated
    /// aliases such as `no-verbose` resolve to the option they negate.
    pub fn resolve_option(
        &self,
        token: &str,
        rules: MatchRules,
    ) -> Result<(&str, &OptionSpec), ParseError> {
        let resolution = self.resolve_in(Table::Long, token, rules);
        match resolution {
            Resolution::Exact(i) | Resolution::Abbreviated(i) => {
                let entry = &self.long_table[i];
                Ok((entry.name.as_str(), &self.options[entry.target]))
            }
            Resolution::Ambiguous(candidates) => Err(ParseError::AmbiguousOption {
                command: self.name.clone(),
                option: ["--", token].concat(),
                candidates: candidates.iter().map(|c| ["--", c.as_str()].concat()).collect(),
            }),
            Resolution::NotFound | Resolution::TooShort => Err(ParseError::UnknownOption {
                command: self.name.clone(),
                option: ["--", token].concat(),
                suggestions: suggestions(
                    token,
                    self.long_table.iter().map(|e| e.name.as_str()),
                    "--",
                ),
            }),
        }
    }

    /// Resolve a single-character option name to its spec.
    pub fn resolve_short_option(
        &self,
        short: char,
        rules: MatchRules,
    ) -> Result<(&str, &OptionSpec), ParseError> {
        let mut buf = [0; 4];
        let token = short.encode_utf8(&mut buf);
        let rules = MatchRules { allow_abbreviation: false, ..rules };
        match self.resolve_in(Table::Short, token, rules) {
            Resolution::Exact(i) | Resolution::Abbreviated(i) => {
                let entry = &self.short_table[i];
                Ok((entry.name.as_str(), &self.options[entry.target]))
            }
            Resolution::Ambiguous(candidates) => Err(ParseError::AmbiguousOption {
                command: self.name.clone(),
                option: format!("-{short}"),
                candidates: candidates.iter().map(|c| ["-", c.as_str()].concat()).collect(),
            }),
            Resolution::NotFound | Resolution::TooShort => Err(ParseError::UnknownOption {
                command: self.name.clone(),
                option: format!("-{short}"),
                suggestions: Vec::new(),
            }),
        }
    }

    /// Whether `short` names an option of this command.
    pub fn has_short_option(&self, short: char, rules: MatchRules) -> bool {
        self.resolve_short_option(short, rules).is_ok()
    }

    /// Resolve a subcommand name, alias or abbreviation.
    ///
    /// A token that matches nothing (or only a too-short prefix) yields
    /// `Ok(None)`; the caller decides whether that is an error. Ambiguous
    /// abbreviations are always an error.
    pub fn resolve_subcommand(
        &self,
        token: &str,
        rules: MatchRules,
    ) -> Result<Option<(&str, &CommandSpec)>, ParseError> {
        if self.subcommands.is_empty() {
            return Ok(None);
        }
        match self.resolve_in(Table::Subcommand, token, rules) {
            Resolution::Exact(i) | Resolution::Abbreviated(i) => {
                let entry = &self.subcommand_table[i];
                Ok(Some((entry.name.as_str(), &self.subcommands[entry.target])))
            }
            Resolution::Ambiguous(candidates) => Err(ParseError::AmbiguousSubcommand {
                command: self.name.clone(),
                name: token.to_owned(),
                candidates,
            }),
            Resolution::NotFound | Resolution::TooShort => Ok(None),
        }
    }

    /// Build the error for a token that should have named a subcommand.
    pub fn unknown_subcommand(&self, token: &str, rules: MatchRules) -> ParseError {
        ParseError::UnknownSubcommand {
            command: self.name.clone(),
            name: token.to_owned(),
            suggestions: suggestions(
                token,
                self.subcommand_table
                    .iter()
                    .filter(|e| rules.allow_aliases || !e.is_alias)
                    .map(|e| e.name.as_str()),
                "",
            ),
        }
    }

    /// Long option completions for `prefix`, with leading dashes.
    ///
    /// `prefix` may itself carry dashes.
    pub fn complete_option(&self, prefix: &str, rules: MatchRules) -> Vec<String> {
        let prefix = rules.normalize(prefix.trim_start_matches('-')).into_owned();
        let mut out: Vec<String> = self
            .long_table
            .iter()
            .filter(|e| rules.normalize(&e.name).starts_with(&prefix))
            .map(|e| ["--", e.name.as_str()].concat())
            .collect();
        out.sort();
        out
    }

    /// Subcommand completions for `prefix`.
    pub fn complete_subcommand(&self, prefix: &str, rules: MatchRules) -> Vec<String> {
        let prefix = rules.normalize(prefix).into_owned();
        let mut out: Vec<String> = self
            .subcommand_table
            .iter()
            .filter(|e| rules.allow_aliases || !e.is_alias)
            .filter(|e| rules.normalize(&e.name).starts_with(&prefix))
            .map(|e| e.name.clone())
            .collect();
        out.sort();
        out
    }

    fn table(&self, table: Table) -> &[NameEntry] {
        match table {
            Table::Long => &self.long_table,
            Table::Short => &self.short_table,
            Table::Subcommand => &self.subcommand_table,
        }
    }

    fn resolve_in(&self, table: Table, token: &str, rules: MatchRules) -> Resolution {
        let token = rules.normalize(token);
        self.cache.get_or_insert_with((table, token.clone().into_owned(), rules), || {
            match_name(self.table(table), &token, rules)
        })
    }
}

/// Match `token` against `entries` following `rules`.
///
/// An exact match always wins. Otherwise, with abbreviation enabled, every
/// entry the token prefixes is a candidate; candidates naming a single
/// target resolve to the first of them.
fn match_name(entries: &[NameEntry], token: &str, rules: MatchRules) -> Resolution {
    let token = rules.normalize(token);
    let visible = |e: &&NameEntry| rules.allow_aliases || !e.is_alias;

    let exact: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| visible(e) && rules.normalize(&e.name) == token)
        .map(|(i, _)| i)
        .collect();
    if let Some(&first) = exact.first() {
        return if distinct_targets(entries, &exact) == 1 {
            Resolution::Exact(first)
        } else {
            Resolution::Ambiguous(candidate_names(entries, &exact))
        };
    }

    if !rules.allow_abbreviation {
        return Resolution::NotFound;
    }

    let prefixed: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| visible(e) && rules.normalize(&e.name).starts_with(&*token))
        .map(|(i, _)| i)
        .collect();
    let Some(&first) = prefixed.first() else {
        return Resolution::NotFound;
    };

    let targets = distinct_targets(entries, &prefixed);
    if targets > 1 {
        Resolution::Ambiguous(candidate_names(entries, &prefixed))
    } else if token.chars().count() < rules.minimum_abbreviation_length {
        Resolution::TooShort
    } else {
        Resolution::Abbreviated(first)
    }
}

fn distinct_targets(entries: &[NameEntry], matched: &[usize]) -> usize {
    matched.iter().map(|&i| entries[i].target).collect::<IndexSet<_>>().len()
}

fn candidate_names(entries: &[NameEntry], matched: &[usize]) -> Vec<String> {
    let mut names: Vec<String> = matched.iter().map(|&i| entries[i].name.clone()).collect();
    names.sort();
    names.dedup();
    names
}

/// Close matches for a mistyped `token`, best first.
fn suggestions<'a>(token: &str, names: impl Iterator<Item = &'a str>, prefix: &str) -> Vec<String> {
    let mut scored: Vec<(f32, &str)> = names
        .map(|name| (rust_fuzzy_search::fuzzy_compare(token, name), name))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored.dedup_by(|a, b| a.1 == b.1);
    scored.into_iter().take(MAX_SUGGESTIONS).map(|(_, name)| [prefix, name].concat()).collect()
}

/// Builder for `CommandSpec`. Validation happens in `build`.
#[derive(Debug)]
pub struct CommandSpecBuilder {
    name: String,
    aliases: Vec<String>,
    options: Vec<OptionSpec>,
    positionals: Vec<PositionalSpec>,
    subcommands: Vec<CommandSpec>,
}

impl CommandSpecBuilder {
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    pub fn positional(mut self, positional: PositionalSpec) -> Self {
        self.positionals.push(positional);
        self
    }

    pub fn subcommand(mut self, subcommand: CommandSpec) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    pub fn build(self) -> Result<CommandSpec, SpecificationError> {
        let CommandSpecBuilder { name, aliases: raw_aliases, options: raw_options, .. } = self;
        if !is_valid_name(&name) {
            return Err(SpecificationError::InvalidName { kind: "command", name });
        }
        let mut aliases = IndexSet::new();
        for alias in raw_aliases {
            if !is_valid_name(&alias) {
                return Err(SpecificationError::InvalidName { kind: "command alias", name: alias });
            }
            if alias != name {
                aliases.insert(alias);
            }
        }

        let mut options = IndexMap::new();
        let mut long_table: Vec<NameEntry> = Vec::new();
        let mut short_table: Vec<NameEntry> = Vec::new();
        for option in raw_options {
            if options.contains_key(option.name()) {
                return Err(SpecificationError::DuplicateOptionName {
                    command: name,
                    name: option.name().to_owned(),
                });
            }
            let target = options.len();
            let longs = option
                .long()
                .map(|l| (l.to_owned(), false))
                .chain(option.negated_long().map(|l| (l, true)));
            for (alias, is_alias) in longs {
                if let Some(prev) = long_table.iter().find(|e| e.name == alias) {
                    return Err(duplicate_alias(&name, &options, prev.target, &option, alias));
                }
                long_table.push(NameEntry { name: alias, target, is_alias });
            }
            for short in option.short() {
                let alias = short.to_string();
                if let Some(prev) = short_table.iter().find(|e| e.name == alias) {
                    return Err(duplicate_alias(&name, &options, prev.target, &option, alias));
                }
                short_table.push(NameEntry { name: alias, target, is_alias: false });
            }
            options.insert(option.name().to_owned(), option);
        }

        let mut positionals = IndexMap::new();
        for positional in self.positionals {
            if positionals.contains_key(positional.name()) {
                return Err(SpecificationError::DuplicatePositional {
                    command: name,
                    name: positional.name().to_owned(),
                });
            }
            positionals.insert(positional.name().to_owned(), positional);
        }

        let mut subcommands: IndexMap<String, CommandSpec> = IndexMap::new();
        let mut subcommand_table: Vec<NameEntry> = Vec::new();
        let mut depth = 1;
        for subcommand in self.subcommands {
            let target = subcommands.len();
            let names = std::iter::once((subcommand.name.clone(), false))
                .chain(subcommand.aliases.iter().map(|a| (a.clone(), true)));
            for (sub_name, is_alias) in names {
                if let Some(prev) = subcommand_table.iter().find(|e| e.name == sub_name) {
                    let first = subcommands[prev.target].name.clone();
                    return Err(SpecificationError::DuplicateSubcommand {
                        command: name,
                        name: sub_name,
                        first,
                        second: subcommand.name.clone(),
                    });
                }
                subcommand_table.push(NameEntry { name: sub_name, target, is_alias });
            }
            depth = depth.max(subcommand.depth + 1);
            subcommands.insert(subcommand.name.clone(), subcommand);
        }
        if depth > MAX_COMMAND_DEPTH {
            return Err(SpecificationError::CommandTooDeep {
                command: name,
                limit: MAX_COMMAND_DEPTH,
            });
        }

        Ok(CommandSpec {
            name,
            aliases,
            options,
            positionals,
            subcommands,
            long_table,
            short_table,
            subcommand_table,
            depth,
            cache: ResolutionCache::default(),
        })
    }
}

fn duplicate_alias(
    command: &str,
    options: &IndexMap<String, OptionSpec>,
    prev: usize,
    option: &OptionSpec,
    alias: String,
) -> SpecificationError {
    SpecificationError::DuplicateOptionAlias {
        command: command.to_owned(),
        alias,
        first: options[prev].name().to_owned(),
        second: option.name().to_owned(),
    }
}
