// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session controller.
//!
//! Orchestrates project create / delete / rename / select, and routes
//! engine changes to the project that was active when the live
//! subscription was made. It is the only mutator of the session and of the
//! subscription slot.
//!
//! Switching projects disposes the old subscription before the target
//! snapshot is read or pushed, and subscribes again only after the push.
//! Events carrying any handle other than the live one are dropped, so an
//! edit can never land in the wrong project.
//!
//! The switch runs to completion inside [`SessionController::select_project`],
//! so callers only ever observe [`SessionState::Empty`] or
//! [`SessionState::Active`]. While it runs no subscription is live, which
//! is what keeps the engine's own emissions out of the queue.

use crate::config::Config;
use crate::engine::DrawingEngine;
use crate::error::SessionError;
use crate::io::storage::Storage;
use crate::models::{
    project::{Project, ProjectId, Session},
    scene::SceneSnapshot,
};
use crate::session::bridge::{ChangeEvent, SceneBridge, SubscriptionHandle};
use crate::session::store::ProjectStore;

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No project selected.
    Empty,
    /// One project selected with a live subscription.
    Active(ProjectId),
}

/// What happened to a single change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    Saved,
    Discarded,
}

/// Summary of one [`SessionController::process_events`] pass.
#[derive(Debug, Default)]
pub struct AutosaveReport {
    pub applied: usize,
    pub discarded: usize,
    pub failures: Vec<SessionError>,
}

impl AutosaveReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn merge(&mut self, other: AutosaveReport) {
        self.applied += other.applied;
        self.discarded += other.discarded;
        self.failures.extend(other.failures);
    }
}

struct LiveBinding {
    handle: SubscriptionHandle,
    project: ProjectId,
}

pub struct SessionController<S: Storage, E: DrawingEngine> {
    store: ProjectStore<S>,
    bridge: SceneBridge<E>,
    live: Option<LiveBinding>,
    /// Outcome of drains done on the way into a switch, handed out by the
    /// next `process_events`.
    carried: AutosaveReport,
    untitled_prefix: String,
}

impl<S: Storage, E: DrawingEngine> SessionController<S, E> {
    /// Wrap an already loaded store. Nothing is selected.
    pub fn new(store: ProjectStore<S>, engine: E, untitled_prefix: impl Into<String>) -> Self {
        Self {
            store,
            bridge: SceneBridge::new(engine),
            live: None,
            carried: AutosaveReport::default(),
            untitled_prefix: untitled_prefix.into(),
        }
    }

    /// Load the persisted session and open its first project, if any.
    pub fn start(storage: S, engine: E, config: &Config) -> Self {
        let mut store = ProjectStore::new(storage, config.storage_key.clone());
        store.load();
        let first = store.session().projects().first().map(|p| p.id().clone());

        let mut controller = Self::new(store, engine, config.untitled_prefix.clone());
        if let Some(id) = first {
            if let Err(err) = controller.select_project(&id) {
                log::warn!("Could not open project {} at startup: {}", id, err);
            }
        }
        controller
    }

    pub fn state(&self) -> SessionState {
        match &self.live {
            Some(binding) => SessionState::Active(binding.project.clone()),
            None => SessionState::Empty,
        }
    }

    pub fn session(&self) -> &Session {
        self.store.session()
    }

    pub fn projects(&self) -> &[Project] {
        self.store.session().projects()
    }

    pub fn active_project_id(&self) -> Option<&ProjectId> {
        self.store.session().active_project_id()
    }

    /// Stored snapshot of the active project, `None` if nothing is active
    /// or it was never edited.
    pub fn active_snapshot(&self) -> Option<&SceneSnapshot> {
        self.store
            .session()
            .active_project()
            .and_then(|p| p.snapshot.as_ref())
    }

    pub fn store(&self) -> &ProjectStore<S> {
        &self.store
    }

    pub fn engine(&self) -> &E {
        self.bridge.engine()
    }

    pub fn engine_mut(&mut self) -> &mut E {
        self.bridge.engine_mut()
    }

    /// Add an empty project and open it.
    ///
    /// Without a name the project is called "{prefix} {n}". On
    /// `PersistenceFailure` the project still exists and is active.
    pub fn create_project(&mut self, name: Option<String>) -> Result<ProjectId, SessionError> {
        self.add_project(name, None)
    }

    /// Add a project pre-filled with `snapshot` and open it.
    pub fn import_project(
        &mut self,
        name: Option<String>,
        snapshot: SceneSnapshot,
    ) -> Result<ProjectId, SessionError> {
        self.add_project(name, Some(snapshot))
    }

    fn add_project(
        &mut self,
        name: Option<String>,
        snapshot: Option<SceneSnapshot>,
    ) -> Result<ProjectId, SessionError> {
        let name = name.unwrap_or_else(|| {
            format!("{} {}", self.untitled_prefix, self.projects().len() + 1)
        });
        let id = self.store.create_project(name.as_str(), snapshot);
        log::info!("Created project {} ({})", name, id);

        let saved = self.store.save();
        self.select_project(&id)?;
        saved.map(|()| id)
    }

    /// Remove a project. If it was open, open the first remaining one or
    /// go to Empty.
    pub fn delete_project(&mut self, id: &ProjectId) -> Result<(), SessionError> {
        if !self.store.session().contains(id) {
            return Err(SessionError::NotFound(id.clone()));
        }

        let was_active = self.active_project_id() == Some(id);
        if was_active {
            self.detach();
        }
        let removed = self.store.remove_project(id)?;
        log::info!("Deleted project {} ({})", removed.name, id);
        let saved = self.store.save();

        if was_active {
            match self.projects().first().map(|p| p.id().clone()) {
                Some(next) => self.select_project(&next)?,
                None => self.clear_canvas(),
            }
        }
        saved
    }

    /// Change a project's name and persist. Snapshot and subscription are
    /// left alone.
    pub fn rename_project(
        &mut self,
        id: &ProjectId,
        name: impl Into<String>,
    ) -> Result<(), SessionError> {
        let name = name.into();
        self.store.rename_project(id, name.as_str())?;
        log::info!("Renamed project {} to {}", id, name);
        self.store.save()
    }

    /// Open a project: dispose the current subscription, push the target
    /// scene into the engine, then subscribe on behalf of the target.
    pub fn select_project(&mut self, id: &ProjectId) -> Result<(), SessionError> {
        if !self.store.session().contains(id) {
            return Err(SessionError::NotFound(id.clone()));
        }
        if self.live.as_ref().is_some_and(|b| b.project == *id) {
            return Ok(());
        }

        // Changes already delivered belong to the project being left.
        let mut flushed = AutosaveReport::default();
        self.drain_into(&mut flushed);
        self.carried.merge(flushed);

        self.detach();
        let scene = self
            .store
            .session()
            .project(id)
            .and_then(|p| p.snapshot.clone())
            .unwrap_or_default();
        self.bridge.push_scene(&scene);
        let handle = self.bridge.subscribe()?;
        self.live = Some(LiveBinding {
            handle,
            project: id.clone(),
        });
        self.store.set_active(Some(id.clone()))?;
        log::info!("Opened project {} ({} elements)", id, scene.elements.len());
        Ok(())
    }

    /// Apply one change event if it came from the live subscription.
    pub fn handle_change(&mut self, event: ChangeEvent) -> Result<ChangeOutcome, SessionError> {
        let project = match &self.live {
            Some(binding) if binding.handle == event.handle => {
                binding.project.clone()
            }
            _ => {
                log::debug!("Discarding stale change from subscription {}", event.handle);
                return Ok(ChangeOutcome::Discarded);
            }
        };

        self.store.upsert_snapshot(&project, event.snapshot)?;
        self.store.save()?;
        log::debug!("Autosaved project {}", project);
        Ok(ChangeOutcome::Saved)
    }

    /// Drain queued engine changes, autosaving the current ones.
    ///
    /// The report also covers changes flushed by any project switch since
    /// the previous call.
    pub fn process_events(&mut self) -> AutosaveReport {
        let mut report = std::mem::take(&mut self.carried);
        self.drain_into(&mut report);
        report
    }

    fn drain_into(&mut self, report: &mut AutosaveReport) {
        while let Some(event) = self.bridge.next_event() {
            match self.handle_change(event) {
                Ok(ChangeOutcome::Saved) => report.applied += 1,
                Ok(ChangeOutcome::Discarded) => report.discarded += 1,
                Err(err) => {
                    log::warn!("Autosave failed: {}", err);
                    report.failures.push(err);
                }
            }
        }
    }

    fn detach(&mut self) {
        self.bridge.dispose();
        self.live = None;
    }

    fn clear_canvas(&mut self) {
        self.detach();
        self.bridge.push_scene(&SceneSnapshot::default());
        // Clearing is always accepted.
        let _ = self.store.set_active(None);
        log::info!("No projects left");
    }
}
