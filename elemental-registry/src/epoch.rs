//! Epoch numbering
//!
//! Every committed reload starts a new epoch. Cached values record the
//! revision they were computed for so that a commit racing a reload can be
//! detected and dropped.

use crate::fingerprint::Fingerprint;
use serde::Serialize;
use std::fmt;

/// Revision number of the element store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Revision(pub u64);

impl Revision {
    pub const ZERO: Revision = Revision(0);

    pub fn next(self) -> Revision {
        Revision(self.0 + 1)
    }
}

impl Default for Revision {
    fn default() -> Self {
        Revision::ZERO
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Description of the epoch a registry is currently serving
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Epoch {
    pub revision: Revision,

    /// Fingerprint of the loaded manifests
    pub fingerprint: Fingerprint,

    pub element_count: usize,
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} elements, {})",
            self.revision,
            self.element_count,
            self.fingerprint.short()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_ordering() {
        let r1 = Revision(1);
        let r2 = Revision(2);

        assert!(r1 < r2);
        assert_eq!(r1.next(), r2);
        assert_eq!(Revision::default(), Revision::ZERO);
    }

    #[test]
    fn test_revision_display() {
        insta::assert_snapshot!(Revision(7).to_string(), @"r7");
    }
}
