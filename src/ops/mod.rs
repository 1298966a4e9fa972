// SPDX-FileCopyrightText: 2026 The Patchbay Authors
// SPDX-License-Identifier: MIT

//! Invariant-preserving mutations over a [`Schema`].
//!
//! Every operation is all-or-nothing: a validation error leaves the schema
//! untouched. Connecting is validated in one fixed order regardless of the
//! calling path: self-connection, then instance-pair uniqueness, then
//! per-port occupancy, then port-type match.

use std::fmt;

use crate::model::{
    Connection, ConnectionStyle, EquipmentInstance, PortId, PortRef, Position, Schema,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    DuplicateName {
        name: String,
    },
    SelfConnection {
        instance: String,
    },
    InstancesAlreadyConnected {
        a: String,
        b: String,
    },
    PortOccupied {
        port: PortId,
    },
    PortTypeMismatch {
        a: String,
        b: String,
    },
    UnknownInstance {
        name: String,
    },
    UnknownPort {
        port: PortRef,
    },
    /// A reserved endpoint no longer resolves; the schema changed between
    /// reserve and commit.
    StalePort {
        port: PortId,
    },
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => {
                write!(f, "an equipment instance named '{name}' already exists")
            }
            Self::SelfConnection { instance } => {
                write!(f, "cannot connect two ports of the same instance '{instance}'")
            }
            Self::InstancesAlreadyConnected { a, b } => {
                write!(f, "instances '{a}' and '{b}' are already connected")
            }
            Self::PortOccupied { port } => write!(f, "port {port} is already in use"),
            Self::PortTypeMismatch { a, b } => {
                write!(f, "port types do not match ({a} vs {b})")
            }
            Self::UnknownInstance { name } => write!(f, "no instance named '{name}'"),
            Self::UnknownPort { port } => write!(f, "no port at {port}"),
            Self::StalePort { port } => {
                write!(f, "reserved port {port} no longer resolves")
            }
        }
    }
}

impl std::error::Error for OpError {}

/// A validated-but-uncommitted connection.
///
/// Produced by [`reserve_connection`] so an interactive flow can prompt for a
/// style without a half-formed edge ever entering the schema; dropping the
/// pending value aborts the flow. [`commit_connection`] re-validates, since
/// the schema may have changed in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConnection {
    a: PortId,
    b: PortId,
}

impl PendingConnection {
    pub fn a(&self) -> &PortId {
        &self.a
    }

    pub fn b(&self) -> &PortId {
        &self.b
    }
}

/// Adds a new equipment instance, snapshotting `port_types` with sequential
/// indices in list order.
pub fn add_instance(
    schema: &mut Schema,
    name: &str,
    type_name: &str,
    port_types: &[String],
    position: Position,
) -> Result<(), OpError> {
    if schema.instance(name).is_some() {
        return Err(OpError::DuplicateName {
            name: name.to_owned(),
        });
    }

    let instance = EquipmentInstance::new(name, type_name, port_types.iter().cloned(), position);
    schema.instances_mut().insert(name.to_owned(), instance);
    Ok(())
}

fn resolve_ref(schema: &Schema, port_ref: &PortRef) -> Result<PortId, OpError> {
    if schema.instance(port_ref.instance()).is_none() {
        return Err(OpError::UnknownInstance {
            name: port_ref.instance().to_owned(),
        });
    }
    schema.port_id_of(port_ref).ok_or_else(|| OpError::UnknownPort {
        port: port_ref.clone(),
    })
}

/// Checks the connection invariants for a candidate endpoint pair, in the
/// fixed order self -> instance pair -> port occupancy -> type match.
fn validate_link(schema: &Schema, a: &PortId, b: &PortId) -> Result<(), OpError> {
    let (a_owner, a_port) = schema
        .port_owner(a)
        .ok_or_else(|| OpError::StalePort { port: a.clone() })?;
    let (b_owner, b_port) = schema
        .port_owner(b)
        .ok_or_else(|| OpError::StalePort { port: b.clone() })?;

    if a_owner.name() == b_owner.name() {
        return Err(OpError::SelfConnection {
            instance: a_owner.name().to_owned(),
        });
    }

    if schema.instances_connected(a_owner.name(), b_owner.name()) {
        return Err(OpError::InstancesAlreadyConnected {
            a: a_owner.name().to_owned(),
            b: b_owner.name().to_owned(),
        });
    }

    if schema.port_occupied(a) {
        return Err(OpError::PortOccupied { port: a.clone() });
    }
    if schema.port_occupied(b) {
        return Err(OpError::PortOccupied { port: b.clone() });
    }

    if a_port.port_type() != b_port.port_type() {
        return Err(OpError::PortTypeMismatch {
            a: a_port.port_type().to_owned(),
            b: b_port.port_type().to_owned(),
        });
    }

    Ok(())
}

/// Validates an endpoint pair and reserves it for a later commit.
pub fn reserve_connection(
    schema: &Schema,
    a: &PortRef,
    b: &PortRef,
) -> Result<PendingConnection, OpError> {
    let a = resolve_ref(schema, a)?;
    let b = resolve_ref(schema, b)?;
    validate_link(schema, &a, &b)?;
    Ok(PendingConnection { a, b })
}

/// Re-validates and inserts a reserved connection with its final style.
pub fn commit_connection(
    schema: &mut Schema,
    pending: PendingConnection,
    style: ConnectionStyle,
) -> Result<(), OpError> {
    validate_link(schema, &pending.a, &pending.b)?;
    schema
        .connections_mut()
        .push(Connection::new(pending.a, pending.b, style));
    Ok(())
}

/// One-step reserve-and-commit for non-interactive callers.
pub fn connect(
    schema: &mut Schema,
    a: &PortRef,
    b: &PortRef,
    style: ConnectionStyle,
) -> Result<(), OpError> {
    let pending = reserve_connection(schema, a, b)?;
    commit_connection(schema, pending, style)
}

/// Connects two ports addressed by their stable identifiers. Used by the
/// store's load path, where only identifiers are available.
pub fn connect_by_id(
    schema: &mut Schema,
    a: PortId,
    b: PortId,
    style: ConnectionStyle,
) -> Result<(), OpError> {
    validate_link(schema, &a, &b)?;
    schema.connections_mut().push(Connection::new(a, b, style));
    Ok(())
}

/// Removes the connection joining `a` and `b` in either order.
/// Returns `false` (and changes nothing) when no such connection exists.
pub fn delete_connection(schema: &mut Schema, a: &PortId, b: &PortId) -> bool {
    match schema.find_connection(a, b) {
        Some(index) => {
            schema.connections_mut().remove(index);
            true
        }
        None => false,
    }
}

/// Deletes an instance, cascading to every connection touching its ports.
/// Returns the number of connections removed by the cascade.
pub fn delete_instance(schema: &mut Schema, name: &str) -> Result<usize, OpError> {
    let Some(instance) = schema.instance(name) else {
        return Err(OpError::UnknownInstance {
            name: name.to_owned(),
        });
    };

    let port_ids: Vec<PortId> = instance.port_ids().collect();
    let before = schema.connections().len();
    schema
        .connections_mut()
        .retain(|conn| !port_ids.iter().any(|id| conn.touches(id)));
    let removed = before - schema.connections().len();

    schema.instances_mut().remove(name);
    Ok(removed)
}

/// Replaces the style of the connection joining `a` and `b`, if present.
pub fn update_connection_style(
    schema: &mut Schema,
    a: &PortId,
    b: &PortId,
    style: ConnectionStyle,
) -> bool {
    match schema.find_connection(a, b) {
        Some(index) => {
            schema.connections_mut()[index].set_style(style);
            true
        }
        None => false,
    }
}

pub fn move_instance(
    schema: &mut Schema,
    name: &str,
    position: Position,
) -> Result<(), OpError> {
    match schema.instances_mut().get_mut(name) {
        Some(instance) => {
            instance.set_position(position);
            Ok(())
        }
        None => Err(OpError::UnknownInstance {
            name: name.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests;
