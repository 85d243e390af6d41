// CLASSIFICATION: COMMUNITY
// Filename: lib.rs v0.4
// Author: Lukas Bower
// Date Modified: 2027-11-28

//! Diagnostics for the remoteproc / virtio / RPMsg messaging stack.
//!
//! The crate inspects the device tree, the kernel class and bus
//! directories and the platform driver bindings of a running system, then
//! reports which layer of the inter-processor messaging stack is present,
//! missing or mis-wired. Everything is read-only and single-shot: one run
//! is one snapshot, and re-running against unchanged state yields the
//! identical finding sequence.

/// Inspection roots for one run.
pub mod config;

/// Mailbox / IPC driver binding classifier.
pub mod mailbox;

/// Stage sequencing and gating.
pub mod pipeline;

/// Best-effort external command capability (dtc, dmesg).
pub mod probe;

/// Finding model and ordered report.
pub mod report;

/// Runtime state reader over class and bus directories.
pub mod runtime;

/// Device-tree topology scanner.
pub mod topology;

/// virtio → RPMsg transport correlator.
pub mod transport;

pub use config::DiagPaths;
pub use pipeline::Pipeline;
pub use probe::{ExternalProbe, HostProbe};
pub use report::{Finding, Report, Severity, Stage};
