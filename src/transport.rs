// CLASSIFICATION: COMMUNITY
// Filename: transport.rs v0.3
// Author: Lukas Bower
// Date Modified: 2027-11-26

//! virtio → RPMsg transport correlator.
//!
//! The single load-bearing inference of the pipeline: a virtio device bound
//! to `virtio_rpmsg_bus` proves the mailbox/interrupt path delivered the
//! kick and the transport probed. An unbound virtio device, given that
//! virtio devices exist at all, means the stack stalled mid-initialization
//! and is flagged as a failure — non-gating, later stages still run.

use std::path::Path;

use crate::report::{Finding, Stage};
use crate::runtime::RuntimeEntity;

/// Driver name the virtio RPMsg transport registers under.
pub const RPMSG_TRANSPORT_DRIVER: &str = "virtio_rpmsg_bus";

/// First virtio device whose resolved driver path ends in the transport
/// driver name, if any.
pub fn find_bound_transport(devices: &[RuntimeEntity]) -> Option<&RuntimeEntity> {
    devices.iter().find(|dev| {
        dev.driver
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name == RPMSG_TRANSPORT_DRIVER)
            .unwrap_or(false)
    })
}

/// Correlation findings. Callers only invoke this with a non-empty list;
/// the empty case is reported as an Info skip by the pipeline.
pub fn findings(devices: &[RuntimeEntity]) -> Vec<Finding> {
    match find_bound_transport(devices) {
        Some(dev) => vec![
            Finding::ok(Stage::Transport, "rpmsg transport bound")
                .with_entities(vec![dev.display_path()]),
        ],
        None => vec![Finding::fail(
            Stage::Transport,
            "virtio_rpmsg_bus is not bound to any virtio device",
        )],
    }
}
