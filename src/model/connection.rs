// SPDX-FileCopyrightText: 2026 The Patchbay Authors
// SPDX-License-Identifier: MIT

use super::ids::PortId;

/// Routing mode for a connection's line.
///
/// The numeric codes are the schema document's wire format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineStyle {
    Straight,
    Orthogonal,
    #[default]
    Curved,
}

impl LineStyle {
    pub fn code(self) -> u8 {
        match self {
            Self::Straight => 0,
            Self::Orthogonal => 1,
            Self::Curved => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Straight),
            1 => Some(Self::Orthogonal),
            2 => Some(Self::Curved),
            _ => None,
        }
    }
}

/// End-cap drawn at either end of a connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EndStyle {
    #[default]
    None,
    Arrow,
    Circle,
    Square,
}

impl EndStyle {
    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Arrow => 1,
            Self::Circle => 2,
            Self::Square => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Arrow),
            2 => Some(Self::Circle),
            3 => Some(Self::Square),
            _ => None,
        }
    }
}

/// Display style carried by a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStyle {
    pub name: String,
    /// `#rrggbb` hex color.
    pub color: String,
    pub line_style: LineStyle,
    pub start_style: EndStyle,
    pub end_style: EndStyle,
    pub width: u32,
}

impl Default for ConnectionStyle {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: "#000000".to_owned(),
            line_style: LineStyle::Curved,
            start_style: EndStyle::None,
            end_style: EndStyle::Arrow,
            width: 2,
        }
    }
}

/// A validated link between two compatible ports.
///
/// Stored as an ordered pair for persistence, but its identity is the
/// unordered pair of stable port identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    a: PortId,
    b: PortId,
    style: ConnectionStyle,
}

impl Connection {
    pub fn new(a: PortId, b: PortId, style: ConnectionStyle) -> Self {
        Self { a, b, style }
    }

    pub fn a(&self) -> &PortId {
        &self.a
    }

    pub fn b(&self) -> &PortId {
        &self.b
    }

    pub fn style(&self) -> &ConnectionStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: ConnectionStyle) {
        self.style = style;
    }

    pub fn touches(&self, port: &PortId) -> bool {
        &self.a == port || &self.b == port
    }

    /// Unordered endpoint comparison.
    pub fn joins(&self, a: &PortId, b: &PortId) -> bool {
        (&self.a == a && &self.b == b) || (&self.a == b && &self.b == a)
    }
}
