// SPDX-FileCopyrightText: 2026 The Patchbay Authors
// SPDX-License-Identifier: MIT

/// Schema folder persistence helpers:
/// document DTOs, legacy connection resolution, XML type codecs, and safe
/// filesystem writes.

#[derive(Debug, Default, Serialize, Deserialize)]
struct SchemaJson {
    #[serde(default)]
    instances: Vec<InstanceJson>,
    #[serde(default)]
    connections: Vec<ConnectionJson>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InstanceJson {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    ports: Vec<PortJson>,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct PortJson {
    #[serde(rename = "type")]
    port_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConnectionJson {
    from: String,
    to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from_port_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to_port_id: Option<String>,
    // Legacy records written before stable port ids address ports by type
    // name plus position among same-typed ports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from_port_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to_port_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style: Option<StyleJson>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StyleJson {
    #[serde(default)]
    name: String,
    #[serde(default = "default_color")]
    color: String,
    #[serde(default = "default_line_style_code")]
    line_style: u8,
    #[serde(default)]
    start_style: u8,
    #[serde(default = "default_end_style_code")]
    end_style: u8,
    #[serde(default = "default_width")]
    width: u32,
}

fn default_color() -> String {
    "#000000".to_owned()
}

fn default_line_style_code() -> u8 {
    LineStyle::Curved.code()
}

fn default_end_style_code() -> u8 {
    EndStyle::Arrow.code()
}

fn default_width() -> u32 {
    2
}

#[derive(Debug)]
enum RecordSkip {
    Unresolved { endpoint: &'static str },
    BadStyleCode { field: &'static str, code: u8 },
}

impl fmt::Display for RecordSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved { endpoint } => {
                write!(f, "cannot resolve the '{endpoint}' endpoint")
            }
            Self::BadStyleCode { field, code } => {
                write!(f, "style field '{field}' has out-of-range code {code}")
            }
        }
    }
}

fn style_to_json(style: &ConnectionStyle) -> StyleJson {
    StyleJson {
        name: style.name.clone(),
        color: style.color.clone(),
        line_style: style.line_style.code(),
        start_style: style.start_style.code(),
        end_style: style.end_style.code(),
        width: style.width,
    }
}

fn style_from_json(style: Option<StyleJson>) -> Result<ConnectionStyle, RecordSkip> {
    let Some(style) = style else {
        return Ok(ConnectionStyle::default());
    };

    let line_style = LineStyle::from_code(style.line_style).ok_or(RecordSkip::BadStyleCode {
        field: "line_style",
        code: style.line_style,
    })?;
    let start_style = EndStyle::from_code(style.start_style).ok_or(RecordSkip::BadStyleCode {
        field: "start_style",
        code: style.start_style,
    })?;
    let end_style = EndStyle::from_code(style.end_style).ok_or(RecordSkip::BadStyleCode {
        field: "end_style",
        code: style.end_style,
    })?;

    Ok(ConnectionStyle {
        name: style.name,
        color: style.color,
        line_style,
        start_style,
        end_style,
        width: style.width,
    })
}

/// Resolves one persisted connection endpoint: stable id first, then the
/// legacy instance-name + port-type + positional-index form.
fn resolve_endpoint(
    schema: &Schema,
    port_id: Option<&str>,
    instance: &str,
    legacy_type: Option<&str>,
    legacy_index: Option<usize>,
) -> Option<PortId> {
    if let Some(raw) = port_id {
        let id = PortId::from_raw(raw);
        if schema.port_owner(&id).is_some() {
            return Some(id);
        }
    }

    let instance = schema.instance(instance)?;
    let port_type = legacy_type?;
    let index_among_typed = legacy_index.unwrap_or(0);
    let port = instance
        .ports()
        .iter()
        .filter(|port| port.port_type() == port_type)
        .nth(index_among_typed)?;
    instance.port_id(port.index())
}

fn resolve_connection_record(
    schema: &Schema,
    record: ConnectionJson,
) -> Result<(PortId, PortId, ConnectionStyle), RecordSkip> {
    let a = resolve_endpoint(
        schema,
        record.from_port_id.as_deref(),
        &record.from,
        record.from_port.as_deref(),
        record.from_port_index,
    )
    .ok_or(RecordSkip::Unresolved { endpoint: "from" })?;

    let b = resolve_endpoint(
        schema,
        record.to_port_id.as_deref(),
        &record.to,
        record.to_port.as_deref(),
        record.to_port_index,
    )
    .ok_or(RecordSkip::Unresolved { endpoint: "to" })?;

    let style = style_from_json(record.style)?;
    Ok((a, b, style))
}

fn schema_from_json(json: SchemaJson) -> Schema {
    let mut schema = Schema::new();

    for instance in json.instances {
        let port_types: Vec<String> = instance
            .ports
            .into_iter()
            .map(|port| port.port_type)
            .collect();
        if let Err(err) = ops::add_instance(
            &mut schema,
            &instance.name,
            &instance.type_name,
            &port_types,
            Position::new(instance.x, instance.y),
        ) {
            log::warn!("skipping instance record '{}': {err}", instance.name);
        }
    }

    for (index, record) in json.connections.into_iter().enumerate() {
        match resolve_connection_record(&schema, record) {
            Ok((a, b, style)) => {
                // connect_by_id enforces the full invariant set, so an
                // earlier record that consumed a port makes this one a
                // silent skip rather than a load failure.
                if let Err(err) = ops::connect_by_id(&mut schema, a, b, style) {
                    log::warn!("skipping connection record #{index}: {err}");
                }
            }
            Err(skip) => log::warn!("skipping connection record #{index}: {skip}"),
        }
    }

    schema
}

fn schema_to_json(schema: &Schema) -> SchemaJson {
    let instances = schema
        .instances()
        .values()
        .map(|instance| InstanceJson {
            name: instance.name().to_owned(),
            type_name: instance.type_name().to_owned(),
            ports: instance
                .ports()
                .iter()
                .map(|port| PortJson {
                    port_type: port.port_type().to_owned(),
                })
                .collect(),
            x: instance.position().x,
            y: instance.position().y,
        })
        .collect();

    let mut connections = Vec::with_capacity(schema.connections().len());
    for conn in schema.connections() {
        let Some((from, to)) = schema.connection_instances(conn) else {
            log::warn!(
                "not persisting connection {} <-> {}: an endpoint no longer resolves",
                conn.a(),
                conn.b()
            );
            continue;
        };

        connections.push(ConnectionJson {
            from: from.to_owned(),
            to: to.to_owned(),
            from_port_id: Some(conn.a().as_str().to_owned()),
            to_port_id: Some(conn.b().as_str().to_owned()),
            from_port: None,
            to_port: None,
            from_port_index: None,
            to_port_index: None,
            style: Some(style_to_json(conn.style())),
        });
    }

    SchemaJson {
        instances,
        connections,
    }
}

#[derive(Debug, Deserialize)]
struct EquipmentTypeXml {
    name: String,
    #[serde(default)]
    ports: PortsXml,
}

#[derive(Debug, Default, Deserialize)]
struct PortsXml {
    #[serde(default, rename = "port")]
    port: Vec<String>,
}

fn equipment_type_from_xml(raw: &str) -> Result<EquipmentType, quick_xml::DeError> {
    let xml: EquipmentTypeXml = quick_xml::de::from_str(raw)?;
    Ok(EquipmentType::new(xml.name, xml.ports.port))
}

fn equipment_type_to_xml(ty: &EquipmentType) -> io::Result<String> {
    use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
    use quick_xml::Writer;
    use std::io::Cursor;

    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("equipment_type")))?;

    writer.write_event(Event::Start(BytesStart::new("name")))?;
    writer.write_event(Event::Text(BytesText::new(ty.name())))?;
    writer.write_event(Event::End(BytesEnd::new("name")))?;

    writer.write_event(Event::Start(BytesStart::new("ports")))?;
    for port_type in ty.ports() {
        writer.write_event(Event::Start(BytesStart::new("port")))?;
        writer.write_event(Event::Text(BytesText::new(port_type)))?;
        writer.write_event(Event::End(BytesEnd::new("port")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("ports")))?;

    writer.write_event(Event::End(BytesEnd::new("equipment_type")))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes)
        .map(|mut xml| {
            if !xml.ends_with('\n') {
                xml.push('\n');
            }
            xml
        })
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

fn write_atomic(
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    let Some(parent) = path.parent() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent"),
        });
    };
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    fs::create_dir_all(parent).map_err(|source| StoreError::Io {
        path: parent.to_path_buf(),
        source,
    })?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".patchbay.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}
