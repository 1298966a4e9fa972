// SPDX-FileCopyrightText: 2026 The Patchbay Authors
// SPDX-License-Identifier: MIT

//! Folder-backed persistence for schemas and equipment types.

pub mod schema_folder;

pub use schema_folder::{SchemaFolder, StoreError, WriteDurability};
