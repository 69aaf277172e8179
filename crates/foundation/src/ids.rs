use std::fmt;

/// Opaque venue identity.
///
/// The CMS hands out numeric ids today, but nothing downstream may rely on
/// that; ids are compared and hashed as text.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VenueId(String);

impl VenueId {
    pub fn new(id: impl Into<String>) -> Self {
        VenueId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for VenueId {
    fn from(n: u64) -> Self {
        VenueId(n.to_string())
    }
}

impl From<&str> for VenueId {
    fn from(s: &str) -> Self {
        VenueId(s.to_string())
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
