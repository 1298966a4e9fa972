// SPDX-FileCopyrightText: 2026 The Patchbay Authors
// SPDX-License-Identifier: MIT

//! Core data model.
//!
//! A schema holds equipment instances (each owning a fixed, ordered port
//! list) and styled connections between ports. Ports are addressed
//! transiently by [`PortRef`] and persistently by the stable [`PortId`].

pub mod connection;
pub mod equipment;
pub mod ids;
pub mod schema;

pub use connection::{Connection, ConnectionStyle, EndStyle, LineStyle};
pub use equipment::{EquipmentInstance, EquipmentType, Port, Position};
pub use ids::{PortId, PortRef};
pub use schema::Schema;
