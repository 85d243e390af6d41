// CLASSIFICATION: COMMUNITY
// Filename: pipeline_scenarios.rs v0.4
// Author: Lukas Bower
// Date Modified: 2027-12-02

//! End-to-end pipeline scenarios over fixture sysfs / device-tree hierarchies.

use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;

use tempfile::TempDir;

use rprocdiag::{DiagPaths, ExternalProbe, Finding, Pipeline, Severity, Stage};

struct CannedProbe {
    dts: Option<&'static str>,
    log: Option<&'static str>,
}

impl CannedProbe {
    fn silent() -> Self {
        CannedProbe { dts: None, log: None }
    }
}

impl ExternalProbe for CannedProbe {
    fn decode_node(&self, _node: &Path) -> Option<String> {
        self.dts.map(String::from)
    }

    fn kernel_log(&self, _keyword: &str) -> Option<String> {
        self.log.map(String::from)
    }
}

fn mkdirs(root: &Path, rel: &str) {
    fs::create_dir_all(root.join(rel)).unwrap();
}

/// Fixture with a registered remoteproc instance and a device-tree
/// remoteproc node; everything else is added per scenario.
fn base_fixture() -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    mkdirs(root, "proc/device-tree/amba/remoteproc@ff9a0000");
    mkdirs(root, "sys/class/remoteproc/remoteproc0");
    mkdirs(root, "sys/bus/virtio/devices");
    mkdirs(root, "sys/bus/rpmsg/devices");
    mkdirs(root, "sys/bus/platform/drivers");
    tmp
}

/// Add a virtio device bound (via symlink) to the named driver.
fn add_virtio_device(root: &Path, dev: &str, driver: &str) {
    let drivers = root.join("sys/bus/virtio/drivers").join(driver);
    fs::create_dir_all(&drivers).unwrap();
    let dev_dir = root.join("sys/bus/virtio/devices").join(dev);
    fs::create_dir_all(&dev_dir).unwrap();
    symlink(&drivers, dev_dir.join("driver")).unwrap();
}

fn position(findings: &[Finding], severity: Severity, stage: Stage, needle: &str) -> usize {
    findings
        .iter()
        .position(|f| f.severity == severity && f.stage == stage && f.message.contains(needle))
        .unwrap_or_else(|| panic!("no {severity} {stage:?} finding containing {needle:?}"))
}

#[test]
fn missing_remoteproc_class_halts_pipeline() {
    let tmp = tempfile::tempdir().unwrap();
    mkdirs(tmp.path(), "proc/device-tree/amba/remoteproc@ff9a0000");
    let probe = CannedProbe::silent();
    let report = Pipeline::new(DiagPaths::under(tmp.path()), &probe).run();

    assert!(report.halted());
    let gating: Vec<&Finding> = report.findings().iter().filter(|f| f.gating).collect();
    assert_eq!(gating.len(), 1);
    assert_eq!(gating[0].severity, Severity::Fail);
    // The gating failure is the last finding; no later stage ran.
    assert!(std::ptr::eq(gating[0], report.findings().last().unwrap()));
    for finding in report.findings() {
        assert!(!matches!(
            finding.stage,
            Stage::DriverBinding | Stage::Transport | Stage::LogTrace | Stage::RpmsgBus
        ));
    }
}

#[test]
fn degrades_without_mailbox_or_virtio() {
    let tmp = base_fixture();
    let probe = CannedProbe::silent();
    let report = Pipeline::new(DiagPaths::under(tmp.path()), &probe).run();
    let findings = report.findings();

    let remoteproc = position(findings, Severity::Ok, Stage::RuntimeState, "remoteproc instance");
    let mailbox = position(findings, Severity::Warning, Stage::DriverBinding, "mailbox");
    let virtio = position(findings, Severity::Warning, Stage::RuntimeState, "no virtio devices");
    let skipped = position(findings, Severity::Info, Stage::Transport, "virtio layer not present");
    let rpmsg = position(findings, Severity::Warning, Stage::RpmsgBus, "no rpmsg devices");
    assert!(remoteproc < mailbox && mailbox < virtio && virtio < skipped && skipped < rpmsg);

    // The notifyid trace is narrowed away along with the transport stage.
    assert!(!findings.iter().any(|f| f.stage == Stage::LogTrace));
    assert!(!report.halted());
}

#[test]
fn bound_transport_names_device() {
    let tmp = base_fixture();
    add_virtio_device(tmp.path(), "virtio0", "virtio_rpmsg_bus");
    let probe = CannedProbe {
        dts: None,
        log: Some("[    3.14] remoteproc remoteproc0: kicking vq with notifyid 0"),
    };
    let report = Pipeline::new(DiagPaths::under(tmp.path()), &probe).run();
    let findings = report.findings();

    let transport = &findings[position(findings, Severity::Ok, Stage::Transport, "rpmsg transport bound")];
    assert_eq!(transport.entities.len(), 1);
    assert!(transport.entities[0].ends_with("virtio0"));
    position(findings, Severity::Ok, Stage::LogTrace, "notifyid");
}

#[test]
fn unbound_transport_fails_but_continues() {
    let tmp = base_fixture();
    add_virtio_device(tmp.path(), "virtio0", "virtio_console");
    let probe = CannedProbe::silent();
    let report = Pipeline::new(DiagPaths::under(tmp.path()), &probe).run();
    let findings = report.findings();

    let fail = position(findings, Severity::Fail, Stage::Transport, "not bound");
    assert!(findings[fail].entities.is_empty());
    assert!(!findings[fail].gating);
    let rpmsg = position(findings, Severity::Warning, Stage::RpmsgBus, "no rpmsg devices");
    assert!(fail < rpmsg);
    assert!(!report.halted());
}

#[test]
fn mailbox_driver_classification_requires_binding() {
    let tmp = base_fixture();
    let root = tmp.path();
    // Matched and bound.
    mkdirs(root, "sys/bus/platform/drivers/zynqmp-ipi/ff990000.mailbox");
    // Family name, but nothing bound beneath it.
    mkdirs(root, "sys/bus/platform/drivers/arm-mhu");
    fs::write(root.join("sys/bus/platform/drivers/arm-mhu/bind"), b"").unwrap();
    // Bound, but not in the family.
    mkdirs(root, "sys/bus/platform/drivers/multiplexer/ff000000.mux");

    let probe = CannedProbe::silent();
    let report = Pipeline::new(DiagPaths::under(root), &probe).run();
    let findings = report.findings();
    let idx = position(findings, Severity::Ok, Stage::DriverBinding, "mailbox/IPC");
    assert_eq!(findings[idx].entities, vec!["zynqmp-ipi".to_string()]);
}

#[test]
fn mailbox_node_interrupt_decode_paths() {
    let tmp = base_fixture();
    mkdirs(tmp.path(), "proc/device-tree/amba/mailbox@ff990000");

    let with_irq = CannedProbe {
        dts: Some("mailbox@ff990000 {\n\tinterrupts = <0 29 4>;\n};\n"),
        log: None,
    };
    let report = Pipeline::new(DiagPaths::under(tmp.path()), &with_irq).run();
    position(report.findings(), Severity::Ok, Stage::Topology, "interrupts declared");

    let no_decoder = CannedProbe::silent();
    let report = Pipeline::new(DiagPaths::under(tmp.path()), &no_decoder).run();
    position(
        report.findings(),
        Severity::Warning,
        Stage::Topology,
        "interrupt decode unavailable",
    );
}

#[test]
fn empty_topology_warns_and_never_crashes() {
    let tmp = tempfile::tempdir().unwrap();
    // Runtime class exists, device tree does not.
    mkdirs(tmp.path(), "sys/class/remoteproc/remoteproc0");
    let probe = CannedProbe::silent();
    let report = Pipeline::new(DiagPaths::under(tmp.path()), &probe).run();

    let topology_warnings: Vec<&Finding> = report
        .findings()
        .iter()
        .filter(|f| f.stage == Stage::Topology && f.severity == Severity::Warning)
        .collect();
    // remoteproc, mailbox, vdev buffer, vdev vring, resource table.
    assert_eq!(topology_warnings.len(), 5);
    for finding in topology_warnings {
        assert!(finding.entities.is_empty());
    }
}

#[test]
fn identical_snapshot_is_idempotent() {
    let tmp = base_fixture();
    let root = tmp.path();
    mkdirs(root, "proc/device-tree/amba/mailbox@ff990000");
    mkdirs(root, "proc/device-tree/reserved-memory/vdev0buffer@3ed48000");
    mkdirs(root, "proc/device-tree/reserved-memory/vdev0vring0@3ed40000");
    mkdirs(root, "proc/device-tree/reserved-memory/rproc@3ed20000/rsc-table");
    mkdirs(root, "sys/bus/platform/drivers/zynqmp-ipi/ff990000.mailbox");
    add_virtio_device(root, "virtio0", "virtio_rpmsg_bus");
    mkdirs(root, "sys/bus/rpmsg/devices/virtio0.rpmsg-openamp-demo-channel.-1.0");

    let probe = CannedProbe {
        dts: Some("mailbox@ff990000 {\n\tinterrupts = <0 29 4>;\n};\n"),
        log: Some("virtio_rpmsg_bus virtio0: rpmsg host is online"),
    };
    let paths = DiagPaths::under(root);
    let first = Pipeline::new(paths.clone(), &probe).run();
    let second = Pipeline::new(paths, &probe).run();
    assert_eq!(first, second);
    assert!(!first.halted());
}
