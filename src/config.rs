// CLASSIFICATION: COMMUNITY
// Filename: config.rs v0.2
// Author: Lukas Bower
// Date Modified: 2027-11-20

//! Inspection roots for one diagnostic run.
//!
//! Defaults point at the live kernel mounts; fixture trees rebase them
//! with [`DiagPaths::under`].

use std::path::{Path, PathBuf};

/// The five read-only roots the pipeline inspects.
#[derive(Debug, Clone)]
pub struct DiagPaths {
    /// Flattened device tree as exported by the kernel.
    pub device_tree: PathBuf,
    /// remoteproc class instances, one per registered remote processor.
    pub remoteproc_class: PathBuf,
    /// virtio bus device directory.
    pub virtio_bus: PathBuf,
    /// rpmsg bus device directory.
    pub rpmsg_bus: PathBuf,
    /// Platform bus driver directory.
    pub platform_drivers: PathBuf,
}

impl Default for DiagPaths {
    fn default() -> Self {
        DiagPaths {
            device_tree: PathBuf::from("/proc/device-tree"),
            remoteproc_class: PathBuf::from("/sys/class/remoteproc"),
            virtio_bus: PathBuf::from("/sys/bus/virtio/devices"),
            rpmsg_bus: PathBuf::from("/sys/bus/rpmsg/devices"),
            platform_drivers: PathBuf::from("/sys/bus/platform/drivers"),
        }
    }
}

impl DiagPaths {
    /// Rebase every root under `root`, mirroring the live layout.
    pub fn under(root: &Path) -> Self {
        DiagPaths {
            device_tree: root.join("proc/device-tree"),
            remoteproc_class: root.join("sys/class/remoteproc"),
            virtio_bus: root.join("sys/bus/virtio/devices"),
            rpmsg_bus: root.join("sys/bus/rpmsg/devices"),
            platform_drivers: root.join("sys/bus/platform/drivers"),
        }
    }
}
