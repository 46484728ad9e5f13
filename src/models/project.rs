// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project and session state.
//!
//! A project is a named drawing with its own snapshot; the session is the
//! ordered list of projects plus the one currently open.

use super::scene::SceneSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque, immutable project identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named, independently persisted drawing.
///
/// Stored as `{id, name, data}`; `data` is `null` until the first edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    pub name: String,
    #[serde(rename = "data")]
    pub snapshot: Option<SceneSnapshot>,
}

impl Project {
    /// Create a never-edited project with the given id and name.
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            snapshot: None,
        }
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    /// Number of elements in the stored snapshot (zero if never edited).
    pub fn element_count(&self) -> usize {
        self.snapshot.as_ref().map_or(0, |s| s.elements.len())
    }
}

/// All projects plus the active one.
///
/// `active_project_id`, when set, always names a project in `projects`;
/// mutation goes through [`crate::session::store::ProjectStore`] which
/// keeps that true.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    projects: Vec<Project>,
    active_project_id: Option<ProjectId>,
}

impl Session {
    /// An empty session: no projects, nothing active.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_projects(projects: Vec<Project>) -> Self {
        Self {
            projects,
            active_project_id: None,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn active_project_id(&self) -> Option<&ProjectId> {
        self.active_project_id.as_ref()
    }

    pub fn active_project(&self) -> Option<&Project> {
        self.active_project_id.as_ref().and_then(|id| self.project(id))
    }

    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == *id)
    }

    pub fn contains(&self, id: &ProjectId) -> bool {
        self.project(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub(crate) fn project_mut(&mut self, id: &ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == *id)
    }

    pub(crate) fn push(&mut self, project: Project) {
        self.projects.push(project);
    }

    /// Remove a project, clearing the active id if it pointed at it.
    pub(crate) fn remove(&mut self, id: &ProjectId) -> Option<Project> {
        let index = self.projects.iter().position(|p| p.id == *id)?;
        if self.active_project_id.as_ref() == Some(id) {
            self.active_project_id = None;
        }
        Some(self.projects.remove(index))
    }

    /// Set the active project. Returns `false` (and changes nothing) if
    /// `id` names no project.
    pub(crate) fn set_active(&mut self, id: Option<ProjectId>) -> bool {
        match id {
            Some(id) if !self.contains(&id) => false,
            id => {
                self.active_project_id = id;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(names: &[&str]) -> Session {
        Session::from_projects(
            names
                .iter()
                .map(|name| Project::new(ProjectId::from_string(*name), *name))
                .collect(),
        )
    }

    #[test]
    fn test_set_active_rejects_unknown_id() {
        let mut session = session_with(&["a", "b"]);
        assert!(session.set_active(Some(ProjectId::from_string("b"))));
        assert!(!session.set_active(Some(ProjectId::from_string("zzz"))));
        assert_eq!(session.active_project_id().map(|id| id.as_str()), Some("b"));
    }

    #[test]
    fn test_remove_active_clears_active_id() {
        let mut session = session_with(&["a", "b"]);
        session.set_active(Some(ProjectId::from_string("a")));

        let removed = session.remove(&ProjectId::from_string("a")).unwrap();
        assert_eq!(removed.name, "a");
        assert!(session.active_project_id().is_none());
        assert_eq!(session.projects().len(), 1);
    }

    #[test]
    fn test_project_serializes_with_data_key() {
        let project = Project::new(ProjectId::from_string("p1"), "Untitled 1");
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "p1", "name": "Untitled 1", "data": null})
        );
    }
}
