// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene snapshot data structures.
//!
//! A snapshot is the serializable content of one drawing: the engine's
//! elements, its UI state, and any binary assets. Elements and assets are
//! opaque to this crate and are carried as JSON values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One drawing-engine element, kept as uninterpreted data.
pub type Element = Value;

/// Asset id to asset payload.
pub type Files = BTreeMap<String, Value>;

/// Collaborator id to collaborator state.
///
/// The engine works with this as a keyed association. At rest it is
/// written as a plain list of `[key, value]` pairs, see
/// [`crate::io::codec::collaborators`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collaborators(BTreeMap<String, Value>);

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Collaborators {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Engine UI state.
///
/// Only `collaborators` is typed; every other key is preserved verbatim.
/// The untyped keys never include `collaborators` itself, so the
/// flattened form never repeats it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default, with = "crate::io::codec::collaborators")]
    pub collaborators: Collaborators,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl AppState {
    /// Key reserved for the typed collaborators field.
    pub const COLLABORATORS_KEY: &'static str = "collaborators";

    /// Untyped UI state keys.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Set an untyped key. Returns `false` and changes nothing for the
    /// reserved collaborators key; use the typed field for that.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if key == Self::COLLABORATORS_KEY {
            return false;
        }
        self.extra.insert(key, value);
        true
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.extra.remove(key)
    }
}

/// The content of one drawing at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    pub elements: Vec<Element>,
    pub app_state: AppState,
    #[serde(default)]
    pub files: Files,
}

impl SceneSnapshot {
    /// Create a snapshot holding the given elements and default state.
    pub fn with_elements(elements: Vec<Element>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }

    /// Check if the snapshot has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
