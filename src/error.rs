// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error taxonomy for the session core.
//!
//! None of these are fatal: corrupt data degrades to defaults, a rejected
//! write leaves in-memory state untouched, and a missing project is a
//! no-op.

use crate::io::storage::StorageError;
use crate::models::project::ProjectId;
use crate::session::bridge::SubscriptionHandle;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Persisted text was malformed or missing required fields.
    #[error("corrupt scene data: {0}")]
    CorruptData(String),
    /// The storage collaborator rejected a write.
    #[error("failed to persist session: {0}")]
    PersistenceFailure(#[from] StorageError),
    /// The referenced project no longer exists.
    #[error("project {0} not found")]
    NotFound(ProjectId),
    /// A second engine subscription was requested while one is live.
    #[error("subscription {0} is still live")]
    SubscriptionActive(SubscriptionHandle),
}

impl SessionError {
    /// `NotFound` is expected when a delete races an in-flight autosave.
    pub fn is_benign(&self) -> bool {
        matches!(self, SessionError::NotFound(_))
    }
}
