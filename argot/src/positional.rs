// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use {
    crate::{Arity, SpecificationError},
    argot_shared::is_valid_name,
};

/// An immutable description of a positional parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionalSpec {
    name: String,
    arity: Arity,
}

impl PositionalSpec {
    pub fn new(name: impl Into<String>, arity: Arity) -> Result<Self, SpecificationError> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(SpecificationError::InvalidName { kind: "positional", name });
        }
        Ok(PositionalSpec { name, arity })
    }

    /// A positional taking exactly one value.
    pub fn required(name: impl Into<String>) -> Result<Self, SpecificationError> {
        Self::new(name, Arity::EXACTLY_ONE)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }
}
