// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing-engine collaborator.
//!
//! The engine renders and edits the scene; this crate only needs to hear
//! about edits and to replace what is displayed. Anything that implements
//! [`DrawingEngine`] can sit behind the session core.

use crate::models::scene::{AppState, Element, Files, SceneSnapshot};

/// Callback invoked with the full scene after every content change.
pub type ChangeListener = Box<dyn FnMut(&SceneSnapshot)>;

/// Token identifying a registered change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Partial scene replacement; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneUpdate {
    pub elements: Option<Vec<Element>>,
    pub app_state: Option<AppState>,
    pub files: Option<Files>,
}

impl SceneUpdate {
    /// Replace everything with the given snapshot.
    pub fn replace(snapshot: SceneSnapshot) -> Self {
        Self {
            elements: Some(snapshot.elements),
            app_state: Some(snapshot.app_state),
            files: Some(snapshot.files),
        }
    }

    /// Replace only the element list.
    pub fn elements(elements: Vec<Element>) -> Self {
        Self {
            elements: Some(elements),
            ..Self::default()
        }
    }
}

pub trait DrawingEngine {
    /// Register a listener for content changes.
    fn on_change(&mut self, listener: ChangeListener) -> ListenerId;

    /// Stop delivering to a listener. Unknown ids are ignored.
    fn remove_listener(&mut self, id: ListenerId);

    /// Current element list.
    fn scene_elements(&self) -> &[Element];

    /// Apply a scene immediately. Engines may notify listeners from here.
    fn update_scene(&mut self, update: SceneUpdate);
}

#[cfg(test)]
pub(crate) mod fake {
    //! Engine double for session tests.

    use super::*;

    /// Emits synchronously from `update_scene` and records every pushed
    /// scene. Removed listeners are kept so a test can replay a late
    /// delivery through them.
    #[derive(Default)]
    pub(crate) struct FakeEngine {
        scene: SceneSnapshot,
        listeners: Vec<(ListenerId, ChangeListener)>,
        removed: Vec<(ListenerId, ChangeListener)>,
        next_id: u64,
        pub(crate) pushed: Vec<SceneSnapshot>,
    }

    impl FakeEngine {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn listener_count(&self) -> usize {
            self.listeners.len()
        }

        pub(crate) fn scene(&self) -> &SceneSnapshot {
            &self.scene
        }

        /// Simulate a user edit: replace the elements and notify.
        pub(crate) fn edit(&mut self, elements: Vec<Element>) {
            self.scene.elements = elements;
            self.emit();
        }

        /// Deliver `elements` through listeners that were already removed.
        pub(crate) fn replay_removed(&mut self, elements: Vec<Element>) {
            let scene = SceneSnapshot::with_elements(elements);
            for (_, listener) in self.removed.iter_mut() {
                listener(&scene);
            }
        }

        fn emit(&mut self) {
            for (_, listener) in self.listeners.iter_mut() {
                listener(&self.scene);
            }
        }
    }

    impl DrawingEngine for FakeEngine {
        fn on_change(&mut self, listener: ChangeListener) -> ListenerId {
            self.next_id += 1;
            let id = ListenerId(self.next_id);
            self.listeners.push((id, listener));
            id
        }

        fn remove_listener(&mut self, id: ListenerId) {
            if let Some(index) = self.listeners.iter().position(|(l, _)| *l == id) {
                let entry = self.listeners.remove(index);
                self.removed.push(entry);
            }
        }

        fn scene_elements(&self) -> &[Element] {
            &self.scene.elements
        }

        fn update_scene(&mut self, update: SceneUpdate) {
            if let Some(elements) = update.elements {
                self.scene.elements = elements;
            }
            if let Some(app_state) = update.app_state {
                self.scene.app_state = app_state;
            }
            if let Some(files) = update.files {
                self.scene.files = files;
            }
            self.pushed.push(self.scene.clone());
            self.emit();
        }
    }
}
