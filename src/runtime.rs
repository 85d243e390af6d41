// CLASSIFICATION: COMMUNITY
// Filename: runtime.rs v0.4
// Author: Lukas Bower
// Date Modified: 2027-11-24

//! Runtime state reader over the kernel class and bus directories.
//!
//! Entities are value snapshots of one scan; directory iteration order is
//! preserved for display but carries no correctness contract. The only
//! gating condition in the whole pipeline lives here: a missing or empty
//! remoteproc class means no remote processor is registered at all.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::DiagPaths;
use crate::report::{Finding, Stage};

/// What kind of kernel object a discovered handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    RemoteprocInstance,
    PlatformDriver,
    VirtioDevice,
    RpmsgDevice,
}

/// One discovered handle. A fresh scan is required to re-read kernel state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEntity {
    pub kind: EntityKind,
    pub path: PathBuf,
    /// Driver symlink resolved to a real path, when the device is bound.
    pub driver: Option<PathBuf>,
}

impl RuntimeEntity {
    fn new(kind: EntityKind, path: PathBuf) -> Self {
        RuntimeEntity {
            kind,
            path,
            driver: None,
        }
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

fn list_dir(dir: &Path, kind: EntityKind) -> Vec<RuntimeEntity> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .map(|e| RuntimeEntity::new(kind, e.path()))
        .collect()
}

/// Instances registered under the remoteproc class.
pub fn remoteproc_instances(paths: &DiagPaths) -> Vec<RuntimeEntity> {
    list_dir(&paths.remoteproc_class, EntityKind::RemoteprocInstance)
}

/// virtio bus devices matching `virtio*`, driver links resolved at scan time.
pub fn virtio_devices(paths: &DiagPaths) -> Vec<RuntimeEntity> {
    let pattern = format!("{}/virtio*", paths.virtio_bus.display());
    let Ok(matches) = glob::glob(&pattern) else {
        return Vec::new();
    };
    matches
        .filter_map(Result::ok)
        .map(|path| {
            let driver = fs::canonicalize(path.join("driver")).ok();
            let mut entity = RuntimeEntity::new(EntityKind::VirtioDevice, path);
            entity.driver = driver;
            entity
        })
        .collect()
}

/// Devices registered on the rpmsg bus (channels bound via name service).
pub fn rpmsg_devices(paths: &DiagPaths) -> Vec<RuntimeEntity> {
    list_dir(&paths.rpmsg_bus, EntityKind::RpmsgDevice)
}

/// The gating prerequisite check: Ok when at least one remoteproc instance
/// exists, a gating Fail when the class is missing or empty.
pub fn remoteproc_findings(paths: &DiagPaths, instances: &[RuntimeEntity]) -> Vec<Finding> {
    if !paths.remoteproc_class.is_dir() {
        debug!("remoteproc class missing at {}", paths.remoteproc_class.display());
        return vec![Finding::fail(
            Stage::RuntimeState,
            "remoteproc class is absent, platform driver never registered",
        )
        .gating()];
    }
    if instances.is_empty() {
        return vec![Finding::fail(
            Stage::RuntimeState,
            "remoteproc instance is not created, platform driver did not probe",
        )
        .gating()];
    }
    vec![
        Finding::ok(
            Stage::RuntimeState,
            "remoteproc instance created (platform driver probed)",
        )
        .with_entities(instances.iter().map(RuntimeEntity::display_path).collect()),
    ]
}

/// Presence finding for the virtio bus scan.
pub fn virtio_findings(devices: &[RuntimeEntity]) -> Vec<Finding> {
    if devices.is_empty() {
        vec![Finding::warning(
            Stage::RuntimeState,
            "no virtio devices created by remoteproc",
        )]
    } else {
        vec![
            Finding::ok(Stage::RuntimeState, "virtio devices present")
                .with_entities(devices.iter().map(RuntimeEntity::display_path).collect()),
        ]
    }
}

/// Presence finding for the rpmsg bus scan.
pub fn rpmsg_findings(devices: &[RuntimeEntity]) -> Vec<Finding> {
    if devices.is_empty() {
        vec![Finding::warning(
            Stage::RpmsgBus,
            "no rpmsg devices created",
        )]
    } else {
        vec![
            Finding::ok(Stage::RpmsgBus, "rpmsg devices present")
                .with_entities(devices.iter().map(RuntimeEntity::display_path).collect()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;

    fn entity(kind: EntityKind, path: &str) -> RuntimeEntity {
        RuntimeEntity::new(kind, PathBuf::from(path))
    }

    #[test]
    fn missing_class_is_gating() {
        let paths = DiagPaths::under(Path::new("/nonexistent"));
        let findings = remoteproc_findings(&paths, &[]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Fail);
        assert!(findings[0].gating);
    }

    #[test]
    fn virtio_absence_is_warning_not_fail() {
        let findings = virtio_findings(&[]);
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn rpmsg_presence_lists_devices() {
        let devices = vec![
            entity(EntityKind::RpmsgDevice, "/sys/bus/rpmsg/devices/virtio0.rpmsg-openamp-demo-channel.-1.0"),
        ];
        let findings = rpmsg_findings(&devices);
        assert_eq!(findings[0].severity, Severity::Ok);
        assert_eq!(findings[0].entities.len(), 1);
    }
}
