use crate::models::{ParseOutcome, ParsedProxy};

use super::node_manip::dedupe_names;

/// Accumulates parsed proxies and unsupported-protocol tokens while an
/// input is being read, before names are de-duplicated.
#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    parsed: Vec<ParsedProxy>,
    unsupported: Vec<String>,
}

impl ParsedBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, parsed: ParsedProxy) {
        self.parsed.push(parsed);
    }

    /// Records an unsupported protocol token once, keeping first-seen order.
    pub fn push_unsupported(&mut self, token: impl Into<String>) {
        let token = token.into();
        if !self.unsupported.contains(&token) {
            self.unsupported.push(token);
        }
    }

    pub fn extend(&mut self, other: ParsedBatch) {
        self.parsed.extend(other.parsed);
        for token in other.unsupported {
            self.push_unsupported(token);
        }
    }

    pub fn len(&self) -> usize {
        self.parsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsed.is_empty()
    }

    pub fn unsupported(&self) -> &[String] {
        &self.unsupported
    }

    /// Runs the name de-duplication pass and hands back the final outcome.
    pub fn finish(self) -> ParseOutcome {
        ParseOutcome {
            proxies: dedupe_names(self.parsed),
            unsupported: self.unsupported,
        }
    }
}
