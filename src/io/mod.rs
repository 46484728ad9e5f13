// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O: the scene codec, durable storage, and scene file export/import.

pub mod codec;
pub mod serialization;
pub mod storage;
