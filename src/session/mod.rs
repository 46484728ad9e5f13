// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Multi-project session management.

pub mod bridge;
pub mod controller;
pub mod store;
