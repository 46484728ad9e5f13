// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene codec.
//!
//! Converts snapshots and the project list to and from their at-rest JSON
//! text. In memory the collaborators field is a keyed association; at rest
//! it is a plain list of `[key, value]` pairs.

use crate::error::SessionError;
use crate::models::{
    project::{Project, ProjectId},
    scene::SceneSnapshot,
};
use serde_json::Value;

/// Serialize a snapshot to its at-rest text.
pub fn encode(snapshot: &SceneSnapshot) -> Result<String, SessionError> {
    serde_json::to_string(snapshot).map_err(|e| SessionError::CorruptData(e.to_string()))
}

/// Parse a snapshot from at-rest text.
///
/// Fails with [`SessionError::CorruptData`] if the text is not JSON or
/// `elements` / `appState` are absent.
pub fn decode(text: &str) -> Result<SceneSnapshot, SessionError> {
    serde_json::from_str(text).map_err(|e| SessionError::CorruptData(e.to_string()))
}

/// Serialize the whole project list (the persisted session layout).
pub fn encode_projects(projects: &[Project]) -> Result<String, SessionError> {
    serde_json::to_string(projects).map_err(|e| SessionError::CorruptData(e.to_string()))
}

/// Parse the persisted project list.
///
/// Only a top-level value that is not an array is an error. Individual
/// entries are recovered where possible: entries without a string id and
/// repeated ids are skipped, and a project whose `data` does not decode
/// keeps its id and name but starts empty.
pub fn decode_projects(text: &str) -> Result<Vec<Project>, SessionError> {
    let entries: Vec<Value> =
        serde_json::from_str(text).map_err(|e| SessionError::CorruptData(e.to_string()))?;

    let mut projects: Vec<Project> = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(project) = decode_project(entry) {
            if projects.iter().any(|p| p.id() == project.id()) {
                log::warn!("Skipping duplicate project id {}", project.id());
                continue;
            }
            projects.push(project);
        }
    }
    Ok(projects)
}

fn decode_project(entry: Value) -> Option<Project> {
    let Value::Object(mut fields) = entry else {
        log::warn!("Skipping project entry that is not an object");
        return None;
    };

    let id = match fields.remove("id") {
        Some(Value::String(id)) => ProjectId::from_string(id),
        _ => {
            log::warn!("Skipping project entry without an id");
            return None;
        }
    };
    let name = match fields.remove("name") {
        Some(Value::String(name)) => name,
        _ => id.to_string(),
    };

    let mut project = Project::new(id, name);
    project.snapshot = match fields.remove("data") {
        None | Some(Value::Null) => None,
        Some(data) => match serde_json::from_value::<SceneSnapshot>(data) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                log::warn!(
                    "Project {} has corrupt scene data, starting it empty: {}",
                    project.id(),
                    err
                );
                None
            }
        },
    };
    Some(project)
}

/// Serde helpers for the collaborators association.
///
/// Writes a list of pairs. Reads a list of pairs, a plain object, or
/// `null`.
pub mod collaborators {
    use crate::models::scene::Collaborators;
    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use serde::{Deserializer, Serializer};
    use serde_json::Value as JsonValue;
    use std::fmt;

    pub fn serialize<S>(value: &Collaborators, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(value.iter())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Collaborators, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CollaboratorsVisitor;

        impl<'de> Visitor<'de> for CollaboratorsVisitor {
            type Value = Collaborators;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a list of [key, value] pairs or an object")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut out = Collaborators::new();
                while let Some((key, value)) = seq.next_element::<(String, JsonValue)>()? {
                    out.insert(key, value);
                }
                Ok(out)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut out = Collaborators::new();
                while let Some((key, value)) = map.next_entry::<String, JsonValue>()? {
                    out.insert(key, value);
                }
                Ok(out)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Collaborators::new())
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Collaborators::new())
            }
        }

        deserializer.deserialize_any(CollaboratorsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scene::Collaborators;
    use serde_json::json;

    fn sample_snapshot() -> SceneSnapshot {
        let mut snapshot = SceneSnapshot::with_elements(vec![
            json!({"type": "ellipse", "id": "e1", "x": 12.5, "y": 300.0 / 7.0}),
            json!({"type": "rectangle", "id": "r1", "groupIds": [], "boundElements": null}),
        ]);
        snapshot
            .app_state
            .collaborators
            .insert("socket-1", json!({"username": "ada", "pointer": {"x": 1, "y": 2}}));
        snapshot
            .app_state
            .set("viewBackgroundColor", json!("#ffffff"));
        snapshot
            .files
            .insert("file-1".into(), json!({"mimeType": "image/png", "dataURL": "data:"}));
        snapshot
    }

    #[test]
    fn test_round_trip_preserves_snapshot() {
        let snapshot = sample_snapshot();
        let text = encode(&snapshot).unwrap();
        assert_eq!(decode(&text).unwrap(), snapshot);
    }

    #[test]
    fn test_round_trip_empty_collaborators() {
        let snapshot = SceneSnapshot::default();
        let text = encode(&snapshot).unwrap();
        let decoded = decode(&text).unwrap();
        assert!(decoded.app_state.collaborators.is_empty());
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_collaborators_stored_as_pairs() {
        let text = encode(&sample_snapshot()).unwrap();
        let raw: Value = serde_json::from_str(&text).unwrap();
        let stored = &raw["appState"]["collaborators"];
        assert!(stored.is_array());
        assert_eq!(stored[0][0], json!("socket-1"));
        assert_eq!(stored[0][1]["username"], json!("ada"));
    }

    #[test]
    fn test_decode_accepts_collaborators_object_and_null() {
        let from_object = decode(
            r#"{"elements": [], "appState": {"collaborators": {"a": 1, "b": {"x": 2}}}}"#,
        )
        .unwrap();
        let expected: Collaborators = [("a".to_string(), json!(1)), ("b".to_string(), json!({"x": 2}))]
            .into_iter()
            .collect();
        assert_eq!(from_object.app_state.collaborators, expected);

        let from_null = decode(r#"{"elements": [], "appState": {"collaborators": null}}"#).unwrap();
        assert!(from_null.app_state.collaborators.is_empty());
    }

    #[test]
    fn test_decode_missing_required_fields_is_corrupt() {
        assert!(matches!(
            decode(r#"{"appState": {}}"#),
            Err(SessionError::CorruptData(_))
        ));
        assert!(matches!(
            decode(r#"{"elements": []}"#),
            Err(SessionError::CorruptData(_))
        ));
        assert!(matches!(decode("{not json"), Err(SessionError::CorruptData(_))));
    }

    #[test]
    fn test_reserved_app_state_key_cannot_shadow_collaborators() {
        let mut snapshot = SceneSnapshot::default();
        assert!(!snapshot
            .app_state
            .set("collaborators", json!({"x": 1})));
        assert!(snapshot.app_state.set("zoom", json!({"value": 1})));

        let text = encode(&snapshot).unwrap();
        assert_eq!(text.matches("\"collaborators\"").count(), 1);
        assert_eq!(decode(&text).unwrap(), snapshot);
    }

    #[test]
    fn test_decode_projects_recovers_entries() {
        let text = r#"[
            {"id": "a", "name": "First", "data": null},
            {"name": "no id"},
            {"id": "b", "name": "Broken", "data": {"appState": {}}},
            {"id": "a", "name": "Duplicate", "data": null},
            42,
            {"id": "c", "data": {"elements": [{"id": "x"}], "appState": {"collaborators": []}}}
        ]"#;

        let projects = decode_projects(text).unwrap();
        let ids: Vec<&str> = projects.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(projects[0].name, "First");
        assert!(projects[1].snapshot.is_none());
        assert_eq!(projects[2].name, "c");
        assert_eq!(projects[2].element_count(), 1);
    }

    #[test]
    fn test_decode_projects_rejects_non_array() {
        assert!(matches!(
            decode_projects(r#"{"id": "a"}"#),
            Err(SessionError::CorruptData(_))
        ));
    }

    #[test]
    fn test_projects_round_trip() {
        let mut edited = Project::new(ProjectId::from_string("p2"), "Edited");
        edited.snapshot = Some(sample_snapshot());
        let projects = vec![Project::new(ProjectId::from_string("p1"), "Blank"), edited];

        let text = encode_projects(&projects).unwrap();
        assert_eq!(decode_projects(&text).unwrap(), projects);
    }
}
