// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project store.
//!
//! Owns the in-memory [`Session`] and persists the whole project list under
//! one storage key. Mutations only touch memory; callers decide when to
//! [`save`](ProjectStore::save). A failed save never changes memory.

use crate::error::SessionError;
use crate::io::codec;
use crate::io::storage::Storage;
use crate::models::{
    project::{Project, ProjectId, Session},
    scene::SceneSnapshot,
};

#[derive(Debug)]
pub struct ProjectStore<S: Storage> {
    storage: S,
    key: String,
    session: Session,
}

impl<S: Storage> ProjectStore<S> {
    /// Create a store over `storage` with an empty session. Call
    /// [`load`](Self::load) to read what was persisted.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            session: Session::empty(),
        }
    }

    /// Replace the in-memory session with the persisted one.
    ///
    /// Missing or malformed storage yields an empty session. Nothing is
    /// active after a load.
    pub fn load(&mut self) -> &Session {
        self.session = match self.storage.get(&self.key) {
            None => {
                log::info!("No stored projects under {}", self.key);
                Session::empty()
            }
            Some(text) => match codec::decode_projects(&text) {
                Ok(projects) => {
                    log::info!("Loaded {} projects from {}", projects.len(), self.key);
                    Session::from_projects(projects)
                }
                Err(err) => {
                    log::warn!("Ignoring stored projects under {}: {}", self.key, err);
                    Session::empty()
                }
            },
        };
        &self.session
    }

    /// Write the full project list to storage.
    pub fn save(&mut self) -> Result<(), SessionError> {
        let text = codec::encode_projects(self.session.projects())?;
        self.storage.set(&self.key, &text)?;
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Append a project with a fresh id, unique within this session.
    pub fn create_project(
        &mut self,
        name: impl Into<String>,
        snapshot: Option<SceneSnapshot>,
    ) -> ProjectId {
        let mut id = ProjectId::new();
        while self.session.contains(&id) {
            id = ProjectId::new();
        }
        let mut project = Project::new(id.clone(), name);
        project.snapshot = snapshot;
        self.session.push(project);
        id
    }

    /// Remove a project and discard its snapshot.
    pub fn remove_project(&mut self, id: &ProjectId) -> Result<Project, SessionError> {
        self.session
            .remove(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    /// Change a project's display name. The snapshot is not touched.
    pub fn rename_project(
        &mut self,
        id: &ProjectId,
        name: impl Into<String>,
    ) -> Result<(), SessionError> {
        let project = self
            .session
            .project_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        project.name = name.into();
        Ok(())
    }

    /// Replace one project's snapshot.
    ///
    /// `NotFound` if the project was deleted while the update was in flight.
    pub fn upsert_snapshot(
        &mut self,
        id: &ProjectId,
        snapshot: SceneSnapshot,
    ) -> Result<(), SessionError> {
        let project = self
            .session
            .project_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        project.snapshot = Some(snapshot);
        Ok(())
    }

    /// Set or clear the active project.
    pub fn set_active(&mut self, id: Option<ProjectId>) -> Result<(), SessionError> {
        match id {
            Some(id) if !self.session.contains(&id) => Err(SessionError::NotFound(id)),
            id => {
                self.session.set_active(id);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStorage;
    use serde_json::json;

    const KEY: &str = "sketchbook_projects";

    fn store() -> ProjectStore<MemoryStorage> {
        ProjectStore::new(MemoryStorage::new(), KEY)
    }

    #[test]
    fn test_load_missing_storage_is_empty() {
        let mut store = store();
        let session = store.load();
        assert!(session.is_empty());
        assert!(session.active_project_id().is_none());
    }

    #[test]
    fn test_load_malformed_storage_is_empty() {
        let mut storage = MemoryStorage::new();
        storage.set(KEY, "{{{ definitely not json").unwrap();
        let mut store = ProjectStore::new(storage, KEY);

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let mut store = store();
        let a = store.create_project("A", None);
        store
            .upsert_snapshot(&a, SceneSnapshot::with_elements(vec![json!({"id": "e"})]))
            .unwrap();
        store.create_project("B", None);
        store.save().unwrap();

        let text = store.storage().get(KEY).unwrap();
        let mut reloaded = ProjectStore::new(MemoryStorage::new(), KEY);
        reloaded.storage.set(KEY, &text).unwrap();
        let session = reloaded.load();

        let names: Vec<&str> = session.projects().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(session.project(&a).unwrap().element_count(), 1);
        assert!(session.projects()[1].snapshot.is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = store();
        let mut ids: Vec<ProjectId> = (0..50).map(|i| store.create_project(format!("p{i}"), None)).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_upsert_unknown_project_is_not_found() {
        let mut store = store();
        let missing = ProjectId::from_string("gone");
        let result = store.upsert_snapshot(&missing, SceneSnapshot::default());
        assert!(matches!(result, Err(SessionError::NotFound(id)) if id == missing));
    }

    #[test]
    fn test_rename_keeps_snapshot() {
        let mut store = store();
        let id = store.create_project("Old", None);
        let snapshot = SceneSnapshot::with_elements(vec![json!({"id": "e1"}), json!({"id": "e2"})]);
        store.upsert_snapshot(&id, snapshot.clone()).unwrap();

        store.rename_project(&id, "New").unwrap();

        let project = store.session().project(&id).unwrap();
        assert_eq!(project.name, "New");
        assert_eq!(project.snapshot.as_ref(), Some(&snapshot));
    }

    #[test]
    fn test_failed_save_keeps_memory() {
        let mut store = ProjectStore::new(MemoryStorage::with_capacity(8), KEY);
        let id = store.create_project("Too big to store", None);

        assert!(matches!(
            store.save(),
            Err(SessionError::PersistenceFailure(_))
        ));
        assert!(store.session().contains(&id));
        assert!(store.storage().get(KEY).is_none());
    }

    #[test]
    fn test_set_active_requires_existing_project() {
        let mut store = store();
        let id = store.create_project("A", None);
        assert!(store.set_active(Some(ProjectId::from_string("nope"))).is_err());
        store.set_active(Some(id.clone())).unwrap();
        assert_eq!(store.session().active_project_id(), Some(&id));
        store.set_active(None).unwrap();
        assert!(store.session().active_project_id().is_none());
    }
}
