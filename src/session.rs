// SPDX-FileCopyrightText: 2026 The Patchbay Authors
// SPDX-License-Identifier: MIT

//! Editing session over a schema folder.
//!
//! An [`EditorSession`] owns the in-memory [`Schema`] and its backing
//! [`SchemaFolder`]. Every mutation that changes the schema rewrites the
//! whole document; a failed write is reported in [`Applied`] rather than
//! rolling the in-memory change back, so the caller can retry the save.

use std::fmt;

use crate::model::{ConnectionStyle, PortRef, Position, Schema};
use crate::ops::{self, OpError, PendingConnection};
use crate::store::{SchemaFolder, StoreError};

/// A single edit, as driven by a UI or a script.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    CreateType {
        name: String,
        ports: Vec<String>,
    },
    CreateInstance {
        name: String,
        type_name: String,
        position: Position,
    },
    Connect {
        a: PortRef,
        b: PortRef,
        style: Option<ConnectionStyle>,
    },
    DeleteInstance {
        name: String,
    },
    DeleteConnection {
        a: PortRef,
        b: PortRef,
    },
    MoveInstance {
        name: String,
        position: Position,
    },
    Restyle {
        a: PortRef,
        b: PortRef,
        style: ConnectionStyle,
    },
}

/// Outcome of a successfully applied intent.
///
/// `saved` reports whether the on-disk document matches the in-memory schema
/// after the operation. A mutation whose save failed still took effect in
/// memory; `save_error` then carries the write failure.
#[derive(Debug)]
pub struct Applied {
    pub saved: bool,
    pub save_error: Option<StoreError>,
}

impl Applied {
    fn clean() -> Self {
        Self {
            saved: true,
            save_error: None,
        }
    }
}

#[derive(Debug)]
pub enum SessionError {
    Op(OpError),
    Store(StoreError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Op(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Op(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<OpError> for SessionError {
    fn from(err: OpError) -> Self {
        Self::Op(err)
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

#[derive(Debug)]
pub struct EditorSession {
    folder: SchemaFolder,
    schema: Schema,
}

impl EditorSession {
    /// Opens a session on a schema folder, loading the current document.
    pub fn open(folder: SchemaFolder) -> Result<Self, StoreError> {
        let schema = folder.load_schema()?;
        Ok(Self { folder, schema })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn folder(&self) -> &SchemaFolder {
        &self.folder
    }

    pub fn apply(&mut self, intent: Intent) -> Result<Applied, SessionError> {
        match intent {
            Intent::CreateType { name, ports } => {
                self.create_type(&name, &ports)?;
                Ok(Applied::clean())
            }
            Intent::CreateInstance {
                name,
                type_name,
                position,
            } => self.create_instance(&name, &type_name, position),
            Intent::Connect { a, b, style } => {
                self.connect(&a, &b, style.unwrap_or_default())
            }
            Intent::DeleteInstance { name } => self.delete_instance(&name),
            Intent::DeleteConnection { a, b } => Ok(self.delete_connection(&a, &b)),
            Intent::MoveInstance { name, position } => self.move_instance(&name, position),
            Intent::Restyle { a, b, style } => Ok(self.restyle(&a, &b, style)),
        }
    }

    /// Defines a new equipment type, persisted immediately as its own file.
    /// Types are append-only: redefining an existing name is refused.
    pub fn create_type(&self, name: &str, ports: &[String]) -> Result<(), SessionError> {
        let ty = crate::model::EquipmentType::new(name, ports.iter().cloned());
        self.folder.save_equipment_type(&ty)?;
        Ok(())
    }

    /// Places an instance of a stored type, snapshotting the type's port
    /// list as it exists right now.
    pub fn create_instance(
        &mut self,
        name: &str,
        type_name: &str,
        position: Position,
    ) -> Result<Applied, SessionError> {
        let ty = self.folder.load_equipment_type(type_name)?;
        ops::add_instance(&mut self.schema, name, type_name, ty.ports(), position)?;
        Ok(self.persist())
    }

    /// Validates an endpoint pair without mutating anything. The returned
    /// reservation is committed with [`commit_connection`], or dropped to
    /// abandon the link.
    ///
    /// [`commit_connection`]: EditorSession::commit_connection
    pub fn reserve_connection(
        &self,
        a: &PortRef,
        b: &PortRef,
    ) -> Result<PendingConnection, OpError> {
        ops::reserve_connection(&self.schema, a, b)
    }

    pub fn commit_connection(
        &mut self,
        pending: PendingConnection,
        style: ConnectionStyle,
    ) -> Result<Applied, SessionError> {
        ops::commit_connection(&mut self.schema, pending, style)?;
        Ok(self.persist())
    }

    pub fn connect(
        &mut self,
        a: &PortRef,
        b: &PortRef,
        style: ConnectionStyle,
    ) -> Result<Applied, SessionError> {
        ops::connect(&mut self.schema, a, b, style)?;
        Ok(self.persist())
    }

    /// Deletes an instance together with every connection touching it.
    pub fn delete_instance(&mut self, name: &str) -> Result<Applied, SessionError> {
        ops::delete_instance(&mut self.schema, name)?;
        Ok(self.persist())
    }

    /// Removes the connection between two port addresses, in either order.
    /// Unresolvable addresses and absent connections are no-ops.
    pub fn delete_connection(&mut self, a: &PortRef, b: &PortRef) -> Applied {
        let Some((a, b)) = self.resolve_pair(a, b) else {
            return Applied::clean();
        };
        if ops::delete_connection(&mut self.schema, &a, &b) {
            self.persist()
        } else {
            Applied::clean()
        }
    }

    pub fn move_instance(
        &mut self,
        name: &str,
        position: Position,
    ) -> Result<Applied, SessionError> {
        ops::move_instance(&mut self.schema, name, position)?;
        Ok(self.persist())
    }

    /// Replaces the style of the connection between two port addresses.
    /// Unresolvable addresses and absent connections are no-ops.
    pub fn restyle(&mut self, a: &PortRef, b: &PortRef, style: ConnectionStyle) -> Applied {
        let Some((a, b)) = self.resolve_pair(a, b) else {
            return Applied::clean();
        };
        if ops::update_connection_style(&mut self.schema, &a, &b, style) {
            self.persist()
        } else {
            Applied::clean()
        }
    }

    /// Rewrites the on-disk document after a schema mutation. The in-memory
    /// schema is kept even when the write fails.
    fn persist(&self) -> Applied {
        match self.folder.save_schema(&self.schema) {
            Ok(()) => Applied::clean(),
            Err(err) => {
                log::warn!("schema save failed, keeping in-memory state: {err}");
                Applied {
                    saved: false,
                    save_error: Some(err),
                }
            }
        }
    }

    fn resolve_pair(
        &self,
        a: &PortRef,
        b: &PortRef,
    ) -> Option<(crate::model::PortId, crate::model::PortId)> {
        Some((self.schema.port_id_of(a)?, self.schema.port_id_of(b)?))
    }
}
