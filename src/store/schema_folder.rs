// SPDX-FileCopyrightText: 2026 The Patchbay Authors
// SPDX-License-Identifier: MIT

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::model::{ConnectionStyle, EndStyle, EquipmentType, LineStyle, PortId, Position, Schema};
use crate::ops;

const TYPES_DIR: &str = "equipment_types";

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    Xml {
        path: PathBuf,
        source: quick_xml::DeError,
    },
    TypeExists {
        name: String,
    },
    InvalidTypeName {
        name: String,
    },
    /// The schema root has no usable directory name to derive the document
    /// filename from.
    SchemaDirName {
        path: PathBuf,
    },
    SymlinkRefused {
        path: PathBuf,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::Xml { path, source } => write!(f, "xml error at {path:?}: {source}"),
            Self::TypeExists { name } => {
                write!(f, "an equipment type named '{name}' already exists")
            }
            Self::InvalidTypeName { name } => {
                write!(f, "invalid equipment type name {name:?}")
            }
            Self::SchemaDirName { path } => {
                write!(f, "cannot derive a schema document name from {path:?}")
            }
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Xml { source, .. } => Some(source),
            Self::TypeExists { .. } => None,
            Self::InvalidTypeName { .. } => None,
            Self::SchemaDirName { .. } => None,
            Self::SymlinkRefused { .. } => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable
    /// storage where possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

/// Folder-backed persistence for one schema.
///
/// The document lives at `<root>/<dirname>.json`, equipment types at
/// `<root>/equipment_types/<name>.xml`. Every save is a full-document
/// overwrite via an atomic temp-file-then-rename.
#[derive(Debug, Clone)]
pub struct SchemaFolder {
    root: PathBuf,
    durability: WriteDurability,
}

impl SchemaFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the schema document, named after the schema's directory.
    pub fn schema_json_path(&self) -> Result<PathBuf, StoreError> {
        let dirname = self
            .root
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| StoreError::SchemaDirName {
                path: self.root.clone(),
            })?;
        Ok(self.root.join(format!("{dirname}.json")))
    }

    pub fn types_dir(&self) -> PathBuf {
        self.root.join(TYPES_DIR)
    }

    pub fn equipment_type_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_type_name(name)?;
        Ok(self.types_dir().join(format!("{name}.xml")))
    }

    /// Loads the schema document; a missing file yields an empty schema.
    ///
    /// Instance records are loaded first; connection records are then
    /// resolved against them, best-effort: a record whose endpoints do not
    /// resolve, or that would violate a connection invariant (including a
    /// port already consumed by an earlier record), is logged and skipped.
    pub fn load_schema(&self) -> Result<Schema, StoreError> {
        let path = self.schema_json_path()?;
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Ok(Schema::new());
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let json: SchemaJson =
            serde_json::from_str(&raw).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;

        Ok(schema_from_json(json))
    }

    /// Serializes the full schema and overwrites the document wholesale.
    pub fn save_schema(&self, schema: &Schema) -> Result<(), StoreError> {
        let path = self.schema_json_path()?;
        let json = schema_to_json(schema);
        let raw = serde_json::to_string_pretty(&json).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;

        write_atomic(&path, format!("{raw}\n").as_bytes(), self.durability)
    }

    /// Persists a new equipment type, refusing to overwrite an existing one.
    pub fn save_equipment_type(&self, ty: &EquipmentType) -> Result<(), StoreError> {
        let path = self.equipment_type_path(ty.name())?;
        if path.exists() {
            return Err(StoreError::TypeExists {
                name: ty.name().to_owned(),
            });
        }

        let xml = equipment_type_to_xml(ty).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        write_atomic(&path, xml.as_bytes(), self.durability)
    }

    pub fn load_equipment_type(&self, name: &str) -> Result<EquipmentType, StoreError> {
        let path = self.equipment_type_path(name)?;
        let raw = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        equipment_type_from_xml(&raw).map_err(|source| StoreError::Xml { path, source })
    }

    /// Enumerates type names from the types directory, sorted.
    ///
    /// Files that fail to parse are logged and skipped rather than aborting
    /// the enumeration; a missing directory yields an empty list.
    pub fn list_equipment_types(&self) -> Result<Vec<String>, StoreError> {
        let dir = self.types_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Ok(Vec::new());
            }
            Err(source) => return Err(StoreError::Io { path: dir, source }),
        };

        let mut names = Vec::new();
        for entry in entries.filter_map(|entry| entry.ok()) {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("xml") {
                continue;
            }

            let raw = match fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(err) => {
                    log::warn!("skipping unreadable type file {path:?}: {err}");
                    continue;
                }
            };
            match equipment_type_from_xml(&raw) {
                Ok(ty) => names.push(ty.name().to_owned()),
                Err(err) => {
                    log::warn!("skipping unparsable type file {path:?}: {err}");
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

fn validate_type_name(name: &str) -> Result<(), StoreError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        return Err(StoreError::InvalidTypeName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

// Extracted JSON/XML conversion and safe filesystem write helpers.
include!("schema_folder/helpers.rs");
