// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sketchbook session core.
//!
//! Keeps several independent drawings ("projects"), autosaves the one
//! currently open, and switches the drawing engine between them without
//! routing an edit to the wrong project. The drawing engine and durable
//! storage are injected collaborators.

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod models;
pub mod session;

pub use config::{Config, ConfigError};
pub use engine::{ChangeListener, DrawingEngine, ListenerId, SceneUpdate};
pub use error::SessionError;
pub use io::storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use models::{
    project::{Project, ProjectId, Session},
    scene::{AppState, Collaborators, Element, Files, SceneSnapshot},
};
pub use session::{
    bridge::{ChangeEvent, SceneBridge, SubscriptionHandle},
    controller::{AutosaveReport, ChangeOutcome, SessionController, SessionState},
    store::ProjectStore,
};
