// SPDX-FileCopyrightText: 2026 The Patchbay Authors
// SPDX-License-Identifier: MIT

//! Patchbay, an equipment-topology schema library.
//!
//! A schema is a set of equipment instances, each carrying a snapshot of its
//! type's port list, plus styled point-to-point connections between ports.
//! The crate keeps the schema valid under a small set of wiring rules and
//! persists it as a JSON document next to per-type XML files.

pub mod model;
pub mod ops;
pub mod session;
pub mod store;
