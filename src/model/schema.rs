// SPDX-FileCopyrightText: 2026 The Patchbay Authors
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use super::connection::Connection;
use super::equipment::{EquipmentInstance, Port};
use super::ids::{PortId, PortRef};

/// The in-memory diagram: equipment instances plus the connections between
/// their ports.
///
/// `Schema` itself is a dumb container with queries; invariant-preserving
/// mutation lives in [`crate::ops`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    instances: BTreeMap<String, EquipmentInstance>,
    connections: Vec<Connection>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instances(&self) -> &BTreeMap<String, EquipmentInstance> {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut BTreeMap<String, EquipmentInstance> {
        &mut self.instances
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connections_mut(&mut self) -> &mut Vec<Connection> {
        &mut self.connections
    }

    pub fn instance(&self, name: &str) -> Option<&EquipmentInstance> {
        self.instances.get(name)
    }

    /// Resolves a transient port address against the current instances.
    pub fn resolve(&self, port_ref: &PortRef) -> Option<(&EquipmentInstance, &Port)> {
        let instance = self.instances.get(port_ref.instance())?;
        let port = instance.port(port_ref.port())?;
        Some((instance, port))
    }

    pub fn port_id_of(&self, port_ref: &PortRef) -> Option<PortId> {
        let instance = self.instances.get(port_ref.instance())?;
        instance.port_id(port_ref.port())
    }

    /// Finds the instance and port a stable identifier refers to.
    pub fn port_owner(&self, id: &PortId) -> Option<(&EquipmentInstance, &Port)> {
        self.instances.values().find_map(|instance| {
            instance
                .ports()
                .iter()
                .find(|port| {
                    instance.port_id(port.index()).as_ref() == Some(id)
                })
                .map(|port| (instance, port))
        })
    }

    pub fn port_occupied(&self, id: &PortId) -> bool {
        self.connections.iter().any(|conn| conn.touches(id))
    }

    /// Returns the connections touching a port.
    ///
    /// The occupancy invariant bounds this at one entry, but it is shaped as a
    /// sequence so callers tolerate transient violations during bulk load.
    pub fn connections_for_port(&self, id: &PortId) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|conn| conn.touches(id))
            .collect()
    }

    /// Owning instance names of a connection's two endpoints, if both resolve.
    pub fn connection_instances(&self, conn: &Connection) -> Option<(&str, &str)> {
        let (a_owner, _) = self.port_owner(conn.a())?;
        let (b_owner, _) = self.port_owner(conn.b())?;
        Some((a_owner.name(), b_owner.name()))
    }

    /// Whether some connection already joins the two named instances,
    /// regardless of which ports it uses.
    pub fn instances_connected(&self, a: &str, b: &str) -> bool {
        self.connections.iter().any(|conn| {
            self.connection_instances(conn).is_some_and(|(x, y)| {
                (x == a && y == b) || (x == b && y == a)
            })
        })
    }

    pub fn find_connection(&self, a: &PortId, b: &PortId) -> Option<usize> {
        self.connections.iter().position(|conn| conn.joins(a, b))
    }
}
