// SPDX-FileCopyrightText: 2026 The Patchbay Authors
// SPDX-License-Identifier: MIT

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use patchbay::model::Schema;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut path = std::env::temp_dir();
        path.push(format!("patchbay_bench_{prefix}_{pid}_{nanos}_{counter}"));
        std::fs::create_dir_all(&path).expect("create temp dir");

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

pub fn checksum_schema(schema: &Schema) -> u64 {
    let mut acc = 0u64;

    for (name, instance) in schema.instances() {
        acc = acc.wrapping_mul(131).wrapping_add(name.len() as u64);
        acc = acc
            .wrapping_mul(131)
            .wrapping_add(instance.type_name().len() as u64);
        acc = acc
            .wrapping_mul(131)
            .wrapping_add(instance.ports().len() as u64);
        acc = acc
            .wrapping_mul(131)
            .wrapping_add(instance.position().x.to_bits());
        acc = acc
            .wrapping_mul(131)
            .wrapping_add(instance.position().y.to_bits());
    }

    for conn in schema.connections() {
        acc = acc
            .wrapping_mul(131)
            .wrapping_add(conn.a().as_str().len() as u64);
        acc = acc
            .wrapping_mul(131)
            .wrapping_add(conn.b().as_str().len() as u64);
        acc = acc
            .wrapping_mul(131)
            .wrapping_add(conn.style().line_style.code() as u64);
        acc = acc
            .wrapping_mul(131)
            .wrapping_add(conn.style().width as u64);
    }

    acc
}

pub mod schema {
    use patchbay::model::{ConnectionStyle, PortRef, Position, Schema};
    use patchbay::ops;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StarParams {
        pub hubs: usize,
        pub fanout: usize,
    }

    impl StarParams {
        pub const fn new(hubs: usize, fanout: usize) -> Self {
            Self { hubs, fanout }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Case {
        Small,
        Medium,
        Large,
    }

    impl Case {
        pub const fn id(self) -> &'static str {
            match self {
                Self::Small => "small",
                Self::Medium => "medium",
                Self::Large => "large",
            }
        }

        pub const fn params(self) -> StarParams {
            match self {
                Self::Small => StarParams::new(2, 8),
                Self::Medium => StarParams::new(8, 16),
                Self::Large => StarParams::new(24, 32),
            }
        }
    }

    /// Builds `hubs` switches, each wired to `fanout` dedicated leaf devices.
    /// Every connection joins a distinct instance pair, so the wiring rules
    /// hold for any parameter choice.
    pub fn fixture(case: Case) -> Schema {
        let params = case.params();
        let mut schema = Schema::new();
        let hub_ports: Vec<String> = (0..params.fanout).map(|_| "LAN".to_owned()).collect();
        let leaf_ports = vec!["LAN".to_owned()];

        for hub in 0..params.hubs {
            let hub_name = format!("hub_{hub:03}");
            ops::add_instance(
                &mut schema,
                &hub_name,
                "Switch",
                &hub_ports,
                Position::new((hub * 400) as f64, 0.0),
            )
            .expect("add hub");

            for leaf in 0..params.fanout {
                let leaf_name = format!("leaf_{hub:03}_{leaf:03}");
                ops::add_instance(
                    &mut schema,
                    &leaf_name,
                    "PC",
                    &leaf_ports,
                    Position::new((hub * 400) as f64, ((leaf + 1) * 60) as f64),
                )
                .expect("add leaf");
                ops::connect(
                    &mut schema,
                    &PortRef::new(&hub_name, leaf),
                    &PortRef::new(&leaf_name, 0),
                    ConnectionStyle::default(),
                )
                .expect("connect leaf");
            }
        }

        schema
    }
}
