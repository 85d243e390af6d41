// CLASSIFICATION: COMMUNITY
// Filename: pipeline.rs v0.5
// Author: Lukas Bower
// Date Modified: 2027-11-28

//! Stage sequencing for one diagnostic run.
//!
//! Stages run strictly in dependency order and each returns its findings
//! as an ordered batch merged into the report at the aggregation boundary.
//! Absence at one stage narrows later stages (the transport correlation
//! and notifyid trace are skipped without virtio devices) but only the
//! remoteproc-class gating failure truncates the run.

use log::info;

use crate::config::DiagPaths;
use crate::probe::ExternalProbe;
use crate::report::{Finding, Report, Stage};
use crate::{mailbox, runtime, topology, transport};

/// One-shot diagnostic pipeline over a fixed set of inspection roots.
pub struct Pipeline<'p, P: ExternalProbe> {
    paths: DiagPaths,
    probe: &'p P,
}

impl<'p, P: ExternalProbe> Pipeline<'p, P> {
    pub fn new(paths: DiagPaths, probe: &'p P) -> Self {
        Pipeline { paths, probe }
    }

    /// Run every stage and return the merged report.
    pub fn run(&self) -> Report {
        info!("scanning device tree at {}", self.paths.device_tree.display());
        let mut report = Report::default();
        let topo = topology::scan(&self.paths.device_tree);
        report.extend(topology::remoteproc_findings(&topo));

        let instances = runtime::remoteproc_instances(&self.paths);
        let batch = runtime::remoteproc_findings(&self.paths, &instances);
        let halted = batch.iter().any(|f| f.gating);
        report.extend(batch);
        if halted {
            info!("remoteproc class absent, truncating remaining stages");
            return report;
        }

        report.extend(topology::mailbox_findings(&topo, self.probe));

        let drivers = mailbox::bound_mailbox_drivers(&self.paths);
        report.extend(mailbox::findings(&drivers));

        report.extend(topology::vdev_findings(&topo));

        let virtio = runtime::virtio_devices(&self.paths);
        report.extend(runtime::virtio_findings(&virtio));
        if virtio.is_empty() {
            report.push(Finding::info(
                Stage::Transport,
                "virtio layer not present, vendor may use a non-virtio transport",
            ));
        } else {
            report.extend(transport::findings(&virtio));
            report.extend(self.notifyid_findings());
        }

        let rpmsg = runtime::rpmsg_devices(&self.paths);
        report.extend(runtime::rpmsg_findings(&rpmsg));
        report
    }

    /// Opportunistic kernel log search for virtqueue kick activity. Only
    /// meaningful once virtqueues exist, so only called on the virtio path.
    fn notifyid_findings(&self) -> Vec<Finding> {
        match self.probe.kernel_log("notify") {
            Some(_) => vec![Finding::ok(
                Stage::LogTrace,
                "notifyid activity seen in kernel log",
            )],
            None => vec![Finding::warning(
                Stage::LogTrace,
                "notifyid not visible in kernel log (may need tracing)",
            )],
        }
    }
}
