//! Scope and item identity types.
//!
//! A [`Scope`] names the sibling set an item's position is compared within:
//! an immutable set of equality constraints such as `owner_id` + `parent_id`.
//! Positions are only ever compared between items in the same scope.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for an item managed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    /// Creates a new item id from any string-like input.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0)
    }
}

impl std::ops::Deref for ItemId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq<str> for ItemId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ItemId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// An immutable set of equality constraints identifying a sibling list.
///
/// Constraints are held in key order, so two scopes built from the same
/// key-value pairs compare equal regardless of construction order. The
/// constraint *keys* double as the column names a relational store adapter
/// matches against; the core never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Scope {
    constraints: BTreeMap<String, String>,
}

impl Scope {
    /// Creates an empty scope. Constrain it with [`Scope::with`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a scope extended with one more equality constraint.
    ///
    /// ```
    /// use fracindex::Scope;
    ///
    /// let scope = Scope::new().with("owner_id", "u1").with("category_id", "c7");
    /// assert_eq!(scope.get("owner_id"), Some("u1"));
    /// ```
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.constraints.insert(key.into(), value.into());
        self
    }

    /// Returns the constraint value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.constraints.get(key).map(String::as_str)
    }

    /// True when `key` is one of this scope's constraint columns.
    pub fn constrains(&self, key: &str) -> bool {
        self.constraints.contains_key(key)
    }

    /// Iterates the constraints in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.constraints
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// True when the scope carries no constraints.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// True when `other` names the same sibling set.
    pub fn matches(&self, other: &Scope) -> bool {
        self == other
    }

    /// Overwrites a single constraint value in place.
    ///
    /// Used by store adapters when a write's extra fields retarget one of the
    /// row's scope columns.
    pub(crate) fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.constraints.insert(key.into(), value.into());
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.constraints.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        write!(f, "}}")
    }
}

/// Opaque columns persisted alongside a position in the same atomic write.
///
/// Callers use these to change scope membership in one step (e.g. move an
/// item to a different category): keys that name one of the row's scope
/// constraint columns retarget that column, everything else is stored as-is.
pub type ExtraFields = BTreeMap<String, serde_json::Value>;

/// One row of an ordered scope fetch: item identity plus its position.
///
/// The core treats the persisted row as opaque apart from these two fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// The item's identity.
    pub id: ItemId,
    /// The item's current position within its scope.
    pub position: crate::Position,
}
