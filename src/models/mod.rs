// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: projects, the session that groups them, and scene snapshots.

pub mod project;
pub mod scene;
