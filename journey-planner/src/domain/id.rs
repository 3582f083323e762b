//! Identifier types for timetable entities.
//!
//! Ids are opaque strings assigned by the data-import layer. They are
//! validated to be non-empty at construction and are cheap to clone, so
//! graph edges and journey legs can reference entities by id rather than
//! holding direct links.

use std::fmt;
use std::sync::Arc;

use super::DomainError;

/// A station identifier.
///
/// # Examples
///
/// ```
/// use journey_planner::domain::StationId;
///
/// let id = StationId::new("stn:0042").unwrap();
/// assert_eq!(id.as_str(), "stn:0042");
///
/// // Empty ids are rejected
/// assert!(StationId::new("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(Arc<str>);

/// A service identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(Arc<str>);

/// A trip identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripId(Arc<str>);

impl StationId {
    /// Create a station id from a non-empty string.
    pub fn new(id: impl AsRef<str>) -> Result<Self, DomainError> {
        let s = id.as_ref();
        if s.is_empty() {
            return Err(DomainError::EmptyId("station"));
        }
        Ok(Self(Arc::from(s)))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ServiceId {
    /// Create a service id from a non-empty string.
    pub fn new(id: impl AsRef<str>) -> Result<Self, DomainError> {
        let s = id.as_ref();
        if s.is_empty() {
            return Err(DomainError::EmptyId("service"));
        }
        Ok(Self(Arc::from(s)))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TripId {
    /// Create a trip id from a non-empty string.
    pub fn new(id: impl AsRef<str>) -> Result<Self, DomainError> {
        let s = id.as_ref();
        if s.is_empty() {
            return Err(DomainError::EmptyId("trip"));
        }
        Ok(Self(Arc::from(s)))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_id_fmt {
    ($ty:ident) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($ty), "({})"), self.0)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }
    };
}

impl_id_fmt!(StationId);
impl_id_fmt!(ServiceId);
impl_id_fmt!(TripId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_ids_parse() {
        assert!(StationId::new("a").is_ok());
        assert!(ServiceId::new("weekday").is_ok());
        assert!(TripId::new("trip-001").is_ok());
    }

    #[test]
    fn empty_ids_rejected() {
        assert!(StationId::new("").is_err());
        assert!(ServiceId::new("").is_err());
        assert!(TripId::new("").is_err());
    }

    #[test]
    fn display_and_debug() {
        let id = StationId::new("stn:1").unwrap();
        assert_eq!(format!("{}", id), "stn:1");
        assert_eq!(format!("{:?}", id), "StationId(stn:1)");
    }

    #[test]
    fn equality_and_hash() {
        use std::collections::HashSet;

        let a = TripId::new("t1").unwrap();
        let b = TripId::new("t1").unwrap();
        let c = TripId::new("t2").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&c));
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = ServiceId::new("s1").unwrap();
        let b = ServiceId::new("s2").unwrap();
        assert!(a < b);
    }
}
