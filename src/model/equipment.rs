// SPDX-FileCopyrightText: 2026 The Patchbay Authors
// SPDX-License-Identifier: MIT

use super::ids::PortId;

/// A named template listing the ports a class of equipment exposes, in order.
///
/// Types are persisted one file per type and never mutated after creation;
/// instances snapshot the port list at instantiation time and stay valid even
/// if the type file later disappears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentType {
    name: String,
    ports: Vec<String>,
}

impl EquipmentType {
    pub fn new(
        name: impl Into<String>,
        ports: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            ports: ports.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered port-type list. Order is semantically meaningful: it defines
    /// the default port index on instances created from this type.
    pub fn ports(&self) -> &[String] {
        &self.ports
    }
}

/// Canvas position of an instance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A typed, indexed attachment point owned by exactly one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    port_type: String,
    index: usize,
}

impl Port {
    pub fn new(port_type: impl Into<String>, index: usize) -> Self {
        Self {
            port_type: port_type.into(),
            index,
        }
    }

    pub fn port_type(&self) -> &str {
        &self.port_type
    }

    /// Position within the owning instance's port list.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A placed, named copy of a type's port layout.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentInstance {
    name: String,
    type_name: String,
    ports: Vec<Port>,
    position: Position,
}

impl EquipmentInstance {
    /// Builds an instance from a snapshot of port types, assigning sequential
    /// port indices in list order.
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        port_types: impl IntoIterator<Item = impl Into<String>>,
        position: Position,
    ) -> Self {
        let ports = port_types
            .into_iter()
            .enumerate()
            .map(|(index, port_type)| Port::new(port_type, index))
            .collect();

        Self {
            name: name.into(),
            type_name: type_name.into(),
            ports,
            position,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the type this instance was created from. Not guaranteed to
    /// still resolve against the type library.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn port(&self, index: usize) -> Option<&Port> {
        self.ports.get(index)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Stable identifier of the port at `index`, if present.
    pub fn port_id(&self, index: usize) -> Option<PortId> {
        self.ports
            .get(index)
            .map(|port| PortId::compose(&self.name, port.port_type(), port.index()))
    }

    pub fn port_ids(&self) -> impl Iterator<Item = PortId> + '_ {
        self.ports
            .iter()
            .map(|port| PortId::compose(&self.name, port.port_type(), port.index()))
    }
}
