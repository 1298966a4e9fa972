// SPDX-FileCopyrightText: 2026 The Patchbay Authors
// SPDX-License-Identifier: MIT

use std::borrow::Borrow;
use std::fmt;

/// Stable identifier for a port, used to re-resolve connection endpoints
/// across save/load cycles.
///
/// The identifier is the composition `<instance>_<port_type>_<index>`. It is
/// only ever composed, never parsed back apart: instance names and port types
/// may themselves contain `_`, so resolution always goes through a lookup map
/// built from the loaded instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(String);

impl PortId {
    pub fn compose(instance: &str, port_type: &str, index: usize) -> Self {
        Self(format!("{instance}_{port_type}_{index}"))
    }

    /// Wraps an identifier read back from a persisted schema document.
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PortId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for PortId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

/// Transient address of a port: the owning instance's name plus the port's
/// position in that instance's port list.
///
/// Unlike [`PortId`] this is how a presentation layer talks about ports; it is
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortRef {
    instance: String,
    port: usize,
}

impl PortRef {
    pub fn new(instance: impl Into<String>, port: usize) -> Self {
        Self {
            instance: instance.into(),
            port,
        }
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn port(&self) -> usize {
        self.port
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.instance, self.port)
    }
}
