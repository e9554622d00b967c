//! Persistence versions for optimistic concurrency.

/// Number of times a product has been saved.
///
/// A product that was never persisted is at version 0; each successful save
/// moves it to the next version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version(u64);

impl Version {
    /// Creates a version from a raw value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the version of a product that has never been saved.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the version after the first save.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the following version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_sequence() {
        assert_eq!(Version::default(), Version::initial());
        assert_eq!(Version::initial().next(), Version::first());
        assert_eq!(Version::first().next().as_u64(), 2);
        assert!(Version::new(3) > Version::first());
    }
}
