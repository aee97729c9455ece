//! Candidate host enumeration
//!
//! The cluster names its nodes `{prefix}{NNN}{domain}` with a zero-padded
//! three-digit index. Host lists are generated fresh at run start and never
//! persisted.

use serde::{Deserialize, Serialize};

/// A numbered range of cluster hosts sharing a prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRange {
    /// Node name prefix (e.g. "cpu", "gpu")
    pub prefix: String,

    /// First index, inclusive
    pub start: u32,

    /// Last index, inclusive
    pub end: u32,
}

impl HostRange {
    /// Create a new range with inclusive bounds
    pub fn new(prefix: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            prefix: prefix.into(),
            start,
            end,
        }
    }

    /// Number of hosts this range expands to
    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start + 1) as usize
        }
    }

    /// Whether the range expands to nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expand the range into fully-qualified host names
    pub fn expand(&self, domain: &str) -> Vec<String> {
        (self.start..=self.end)
            .map(|i| format!("{}{:03}{}", self.prefix, i, domain))
            .collect()
    }
}

/// Expand a set of ranges into one flat candidate list, in range order
pub fn generate_hosts(ranges: &[HostRange], domain: &str) -> Vec<String> {
    ranges.iter().flat_map(|r| r.expand(domain)).collect()
}
