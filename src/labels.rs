//! The project label set.
//!
//! Labels are defined before annotation begins. Each has a user-assigned
//! positive integer id and a unique, non-blank name. The registry is not
//! versioned: redefining it does not touch annotations that already carry a
//! `label_id`, which is why annotations cache `label_name` themselves.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A label identifier as assigned by the user (or by a COCO category id).
///
/// Signed so that invalid input (zero, negatives) can be represented and
/// rejected by validation instead of failing to parse.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelId(pub i64);

impl LabelId {
    #[inline]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl From<i64> for LabelId {
    fn from(id: i64) -> Self {
        LabelId::new(id)
    }
}

impl From<i32> for LabelId {
    fn from(id: i32) -> Self {
        LabelId::new(id.into())
    }
}

impl fmt::Debug for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LabelId({})", self.0)
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised when editing the label set.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("label id must be positive (got {0})")]
    NonPositiveId(LabelId),

    #[error("label name cannot be empty")]
    BlankName,

    #[error("label id {0} already exists")]
    DuplicateId(LabelId),

    #[error("label '{0}' already exists")]
    DuplicateName(String),
}

/// A label that could not be merged into the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelConflict {
    pub label_id: LabelId,
    pub label_name: String,
    pub reason: LabelError,
}

/// Bidirectional id <-> name mapping for the active project.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LabelRegistry {
    labels: BTreeMap<LabelId, String>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from `(id, name)` pairs, rejecting the first entry
    /// that breaks a uniqueness or validity rule.
    pub fn from_pairs<I, N>(pairs: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = (LabelId, N)>,
        N: Into<String>,
    {
        let mut registry = Self::new();
        for (id, name) in pairs {
            registry.add(id, name)?;
        }
        Ok(registry)
    }

    /// Replaces the whole label set. On error the registry is unchanged.
    pub fn set_labels<I, N>(&mut self, pairs: I) -> Result<(), LabelError>
    where
        I: IntoIterator<Item = (LabelId, N)>,
        N: Into<String>,
    {
        *self = Self::from_pairs(pairs)?;
        Ok(())
    }

    /// Adds one label. The name is trimmed before it is stored.
    pub fn add(&mut self, id: LabelId, name: impl Into<String>) -> Result<(), LabelError> {
        let name = name.into().trim().to_string();

        if !id.is_positive() {
            return Err(LabelError::NonPositiveId(id));
        }
        if name.is_empty() {
            return Err(LabelError::BlankName);
        }
        if self.labels.contains_key(&id) {
            return Err(LabelError::DuplicateId(id));
        }
        if self.id_of(&name).is_some() {
            return Err(LabelError::DuplicateName(name));
        }

        self.labels.insert(id, name);
        Ok(())
    }

    /// Removes a label, returning its name.
    pub fn remove(&mut self, id: LabelId) -> Option<String> {
        self.labels.remove(&id)
    }

    /// Adds every label that does not collide with an existing one.
    ///
    /// An incoming pair identical to an existing entry is a no-op. Anything
    /// else that collides is left out of the registry and returned.
    pub fn merge<'a, I>(&mut self, incoming: I) -> Vec<LabelConflict>
    where
        I: IntoIterator<Item = (&'a LabelId, &'a String)>,
    {
        let mut conflicts = Vec::new();
        for (&id, name) in incoming {
            if self.name_of(id) == Some(name.trim()) {
                continue;
            }
            if let Err(reason) = self.add(id, name.as_str()) {
                conflicts.push(LabelConflict {
                    label_id: id,
                    label_name: name.clone(),
                    reason,
                });
            }
        }
        conflicts
    }

    pub fn name_of(&self, id: LabelId) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    pub fn id_of(&self, name: &str) -> Option<LabelId> {
        self.labels
            .iter()
            .find(|(_, label)| label.as_str() == name)
            .map(|(id, _)| *id)
    }

    /// Labels sorted by id.
    pub fn iter(&self) -> impl Iterator<Item = (LabelId, &str)> {
        self.labels.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn as_map(&self) -> &BTreeMap<LabelId, String> {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }
}
