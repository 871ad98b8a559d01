//! Sequential identifier assignment.
//!
//! CIM identifiers are opaque strings (`_4a3c...`, `tn1`); PPC tables need
//! small positive integers. [`IdRemapper`] hands out `1, 2, 3, ...` in the
//! order identifiers are first seen and returns the same integer on every
//! later lookup.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct IdRemapper {
    ids: HashMap<String, usize>,
}

impl IdRemapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the integer for `original`, assigning the next one on first sight.
    pub fn map(&mut self, original: &str) -> usize {
        let next = self.ids.len() + 1;
        *self.ids.entry(original.to_string()).or_insert(next)
    }
}
