// SPDX-FileCopyrightText: 2026 The Patchbay Authors
// SPDX-License-Identifier: MIT

use crate::model::{ConnectionStyle, EndStyle, LineStyle, PortId, PortRef, Position, Schema};

use super::{
    add_instance, commit_connection, connect, connect_by_id, delete_connection, delete_instance,
    move_instance, reserve_connection, update_connection_style, OpError,
};

fn schema_with(instances: &[(&str, &str, &[&str])]) -> Schema {
    let mut schema = Schema::new();
    for (name, type_name, ports) in instances {
        let port_types: Vec<String> = ports.iter().map(|p| (*p).to_owned()).collect();
        add_instance(&mut schema, name, type_name, &port_types, Position::default())
            .expect("fixture instance");
    }
    schema
}

fn lan_pair() -> Schema {
    schema_with(&[
        ("Switch1", "Switch", &["LAN", "LAN"]),
        ("PC1", "PC", &["LAN"]),
    ])
}

#[test]
fn add_instance_rejects_duplicate_names() {
    let mut schema = lan_pair();
    let result = add_instance(
        &mut schema,
        "PC1",
        "PC",
        &["LAN".to_owned()],
        Position::new(5.0, 5.0),
    );
    assert_eq!(
        result,
        Err(OpError::DuplicateName {
            name: "PC1".to_owned()
        })
    );
    assert_eq!(schema.instances().len(), 2);
}

#[test]
fn connect_links_compatible_free_ports() {
    let mut schema = lan_pair();
    connect(
        &mut schema,
        &PortRef::new("Switch1", 0),
        &PortRef::new("PC1", 0),
        ConnectionStyle::default(),
    )
    .expect("connect");

    let a = PortId::compose("Switch1", "LAN", 0);
    let b = PortId::compose("PC1", "LAN", 0);
    assert_eq!(schema.connections_for_port(&a).len(), 1);
    assert_eq!(schema.connections_for_port(&b).len(), 1);
    assert!(schema.connections()[0].joins(&a, &b));
}

#[test]
fn connect_rejects_ports_of_one_instance() {
    let mut schema = lan_pair();
    let result = connect(
        &mut schema,
        &PortRef::new("Switch1", 0),
        &PortRef::new("Switch1", 1),
        ConnectionStyle::default(),
    );
    assert_eq!(
        result,
        Err(OpError::SelfConnection {
            instance: "Switch1".to_owned()
        })
    );
    assert!(schema.connections().is_empty());
}

#[test]
fn connect_rejects_second_link_between_same_instances() {
    // The pair check fires before the occupancy check: Switch1 port 1 and
    // PC1 port 0 would also collide on occupancy, but the reported error is
    // InstancesAlreadyConnected.
    let mut schema = lan_pair();
    connect(
        &mut schema,
        &PortRef::new("Switch1", 0),
        &PortRef::new("PC1", 0),
        ConnectionStyle::default(),
    )
    .expect("first connect");

    let result = connect(
        &mut schema,
        &PortRef::new("Switch1", 1),
        &PortRef::new("PC1", 0),
        ConnectionStyle::default(),
    );
    assert_eq!(
        result,
        Err(OpError::InstancesAlreadyConnected {
            a: "Switch1".to_owned(),
            b: "PC1".to_owned(),
        })
    );
    assert_eq!(schema.connections().len(), 1);
}

#[test]
fn connect_rejects_occupied_port() {
    let mut schema = schema_with(&[
        ("Switch1", "Switch", &["LAN", "LAN"]),
        ("PC1", "PC", &["LAN"]),
        ("PC2", "PC", &["LAN"]),
    ]);
    connect(
        &mut schema,
        &PortRef::new("PC1", 0),
        &PortRef::new("Switch1", 0),
        ConnectionStyle::default(),
    )
    .expect("first connect");

    let result = connect(
        &mut schema,
        &PortRef::new("PC1", 0),
        &PortRef::new("PC2", 0),
        ConnectionStyle::default(),
    );
    assert_eq!(
        result,
        Err(OpError::PortOccupied {
            port: PortId::compose("PC1", "LAN", 0)
        })
    );
}

#[test]
fn connect_rejects_mismatched_port_types() {
    let mut schema = schema_with(&[
        ("Proj1", "Projector", &["HDMI"]),
        ("PC1", "PC", &["VGA"]),
    ]);
    let result = connect(
        &mut schema,
        &PortRef::new("Proj1", 0),
        &PortRef::new("PC1", 0),
        ConnectionStyle::default(),
    );
    assert_eq!(
        result,
        Err(OpError::PortTypeMismatch {
            a: "HDMI".to_owned(),
            b: "VGA".to_owned(),
        })
    );
}

#[test]
fn connect_reports_unknown_endpoints() {
    let mut schema = lan_pair();
    let result = connect(
        &mut schema,
        &PortRef::new("Router9", 0),
        &PortRef::new("PC1", 0),
        ConnectionStyle::default(),
    );
    assert_eq!(
        result,
        Err(OpError::UnknownInstance {
            name: "Router9".to_owned()
        })
    );

    let result = connect(
        &mut schema,
        &PortRef::new("PC1", 3),
        &PortRef::new("Switch1", 0),
        ConnectionStyle::default(),
    );
    assert_eq!(
        result,
        Err(OpError::UnknownPort {
            port: PortRef::new("PC1", 3)
        })
    );
}

#[test]
fn dropping_a_reservation_leaves_no_trace() {
    let mut schema = lan_pair();
    let pending = reserve_connection(
        &schema,
        &PortRef::new("Switch1", 0),
        &PortRef::new("PC1", 0),
    )
    .expect("reserve");
    drop(pending);

    assert!(schema.connections().is_empty());
    assert!(!schema.port_occupied(&PortId::compose("Switch1", "LAN", 0)));

    // Both ports are still free for a real connect afterwards.
    connect(
        &mut schema,
        &PortRef::new("Switch1", 0),
        &PortRef::new("PC1", 0),
        ConnectionStyle::default(),
    )
    .expect("connect after abort");
}

#[test]
fn commit_revalidates_against_interleaved_mutations() {
    let mut schema = schema_with(&[
        ("Switch1", "Switch", &["LAN", "LAN"]),
        ("PC1", "PC", &["LAN"]),
        ("PC2", "PC", &["LAN"]),
    ]);

    let pending = reserve_connection(
        &schema,
        &PortRef::new("Switch1", 0),
        &PortRef::new("PC1", 0),
    )
    .expect("reserve");

    // Another mutation consumes PC1's port before the commit.
    connect(
        &mut schema,
        &PortRef::new("PC1", 0),
        &PortRef::new("PC2", 0),
        ConnectionStyle::default(),
    )
    .expect("interleaved connect");

    let result = commit_connection(&mut schema, pending, ConnectionStyle::default());
    assert_eq!(
        result,
        Err(OpError::PortOccupied {
            port: PortId::compose("PC1", "LAN", 0)
        })
    );
    assert_eq!(schema.connections().len(), 1);
}

#[test]
fn commit_fails_when_endpoint_instance_was_deleted() {
    let mut schema = lan_pair();
    let pending = reserve_connection(
        &schema,
        &PortRef::new("Switch1", 0),
        &PortRef::new("PC1", 0),
    )
    .expect("reserve");

    delete_instance(&mut schema, "PC1").expect("delete");

    let result = commit_connection(&mut schema, pending, ConnectionStyle::default());
    assert_eq!(
        result,
        Err(OpError::StalePort {
            port: PortId::compose("PC1", "LAN", 0)
        })
    );
    assert!(schema.connections().is_empty());
}

#[test]
fn delete_instance_cascades_to_touching_connections() {
    let mut schema = schema_with(&[
        ("Switch1", "Switch", &["LAN", "LAN"]),
        ("PC1", "PC", &["LAN"]),
        ("PC2", "PC", &["LAN"]),
    ]);
    connect(
        &mut schema,
        &PortRef::new("Switch1", 0),
        &PortRef::new("PC1", 0),
        ConnectionStyle::default(),
    )
    .expect("switch-pc1");
    connect(
        &mut schema,
        &PortRef::new("Switch1", 1),
        &PortRef::new("PC2", 0),
        ConnectionStyle::default(),
    )
    .expect("switch-pc2");

    let removed = delete_instance(&mut schema, "Switch1").expect("delete");
    assert_eq!(removed, 2);
    assert!(schema.instance("Switch1").is_none());
    assert!(schema.connections().is_empty());
    assert!(schema
        .connections_for_port(&PortId::compose("PC1", "LAN", 0))
        .is_empty());
    assert!(schema
        .connections_for_port(&PortId::compose("PC2", "LAN", 0))
        .is_empty());
}

#[test]
fn delete_connection_is_unordered_and_tolerates_unknown() {
    let mut schema = lan_pair();
    connect(
        &mut schema,
        &PortRef::new("Switch1", 0),
        &PortRef::new("PC1", 0),
        ConnectionStyle::default(),
    )
    .expect("connect");

    let a = PortId::compose("Switch1", "LAN", 0);
    let b = PortId::compose("PC1", "LAN", 0);

    assert!(!delete_connection(
        &mut schema,
        &PortId::compose("Switch1", "LAN", 1),
        &b
    ));
    assert_eq!(schema.connections().len(), 1);

    // Reversed endpoint order still matches.
    assert!(delete_connection(&mut schema, &b, &a));
    assert!(schema.connections().is_empty());
    assert!(!delete_connection(&mut schema, &a, &b));
}

#[test]
fn update_connection_style_replaces_in_place() {
    let mut schema = lan_pair();
    connect(
        &mut schema,
        &PortRef::new("Switch1", 0),
        &PortRef::new("PC1", 0),
        ConnectionStyle::default(),
    )
    .expect("connect");

    let a = PortId::compose("Switch1", "LAN", 0);
    let b = PortId::compose("PC1", "LAN", 0);
    let style = ConnectionStyle {
        name: "uplink".to_owned(),
        color: "#ff0000".to_owned(),
        line_style: LineStyle::Orthogonal,
        start_style: EndStyle::Circle,
        end_style: EndStyle::Square,
        width: 4,
    };

    assert!(update_connection_style(&mut schema, &b, &a, style.clone()));
    assert_eq!(schema.connections()[0].style(), &style);

    assert!(!update_connection_style(
        &mut schema,
        &a,
        &PortId::compose("PC1", "LAN", 5),
        style
    ));
}

#[test]
fn move_instance_updates_position() {
    let mut schema = lan_pair();
    move_instance(&mut schema, "PC1", Position::new(42.0, -7.5)).expect("move");
    let position = schema.instance("PC1").expect("instance").position();
    assert_eq!(position, Position::new(42.0, -7.5));

    assert_eq!(
        move_instance(&mut schema, "Ghost", Position::default()),
        Err(OpError::UnknownInstance {
            name: "Ghost".to_owned()
        })
    );
}

#[test]
fn connect_by_id_enforces_the_same_order() {
    let mut schema = lan_pair();
    let a = PortId::compose("Switch1", "LAN", 0);
    let b = PortId::compose("Switch1", "LAN", 1);
    let result = connect_by_id(&mut schema, a, b, ConnectionStyle::default());
    assert_eq!(
        result,
        Err(OpError::SelfConnection {
            instance: "Switch1".to_owned()
        })
    );
}
