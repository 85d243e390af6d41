// CLASSIFICATION: COMMUNITY
// Filename: topology.rs v0.5
// Author: Lukas Bower
// Date Modified: 2027-11-24

//! Device-tree topology scanner.
//!
//! One recursive walk of the flattened device tree collects every node the
//! later stages care about: remote processors, mailbox controllers and the
//! virtio resources (vdev buffers, vrings, resource tables). Matching is by
//! name substring/prefix, case-sensitive, first category wins per node. A
//! missing or empty tree is a warning, not a failure: the platform may not
//! boot through a device tree at all.

use std::path::{Path, PathBuf};

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

use crate::probe::ExternalProbe;
use crate::report::{Finding, Stage};

/// A matched device-tree node: full path plus leaf name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtNode {
    pub path: PathBuf,
    pub name: String,
}

impl DtNode {
    fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        Some(DtNode {
            path: path.to_path_buf(),
            name,
        })
    }
}

/// Snapshot of one topology walk; discarded once the report is built.
#[derive(Debug, Default)]
pub struct Topology {
    pub remoteproc_nodes: Vec<DtNode>,
    pub mailbox_nodes: Vec<DtNode>,
    pub vdev_buffers: Vec<DtNode>,
    pub vdev_vrings: Vec<DtNode>,
    pub rsc_tables: Vec<DtNode>,
}

/// Walk `root` and sort every directory node into its category.
pub fn scan(root: &Path) -> Topology {
    let mut topo = Topology::default();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir())
    {
        let Some(node) = DtNode::from_path(entry.path()) else {
            continue;
        };
        if node.name.contains("remoteproc") {
            topo.remoteproc_nodes.push(node);
        } else if node.name.starts_with("mailbox") {
            topo.mailbox_nodes.push(node);
        } else if node.name.contains("vdev") && node.name.contains("buffer") {
            topo.vdev_buffers.push(node);
        } else if node.name.contains("vdev") && node.name.contains("vring") {
            topo.vdev_vrings.push(node);
        } else if node.name.contains("rsc-table") {
            topo.rsc_tables.push(node);
        }
    }
    debug!(
        "topology: {} remoteproc, {} mailbox, {} vdev-buffer, {} vring, {} rsc-table",
        topo.remoteproc_nodes.len(),
        topo.mailbox_nodes.len(),
        topo.vdev_buffers.len(),
        topo.vdev_vrings.len(),
        topo.rsc_tables.len(),
    );
    topo
}

static INTERRUPTS_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\binterrupts\s*=\s*<[^>]+>\s*;").expect("interrupts pattern"));

/// True when the decoded node text carries an `interrupts = <...>;` declaration.
pub fn has_interrupts_decl(dts: &str) -> bool {
    INTERRUPTS_DECL.is_match(dts)
}

fn paths(nodes: &[DtNode]) -> Vec<String> {
    nodes.iter().map(|n| n.path.display().to_string()).collect()
}

fn names(nodes: &[DtNode]) -> Vec<String> {
    nodes.iter().map(|n| n.name.clone()).collect()
}

/// Findings for the remote-processor node category.
pub fn remoteproc_findings(topo: &Topology) -> Vec<Finding> {
    if topo.remoteproc_nodes.is_empty() {
        vec![Finding::warning(
            Stage::Topology,
            "remoteproc is not defined in device tree",
        )]
    } else {
        vec![
            Finding::ok(Stage::Topology, "remoteproc nodes defined in device tree")
                .with_entities(paths(&topo.remoteproc_nodes)),
        ]
    }
}

/// Findings for the mailbox node category, decoding each node's interrupt
/// property through `probe`. Decode trouble never aborts the walk.
pub fn mailbox_findings<P: ExternalProbe>(topo: &Topology, probe: &P) -> Vec<Finding> {
    let mut findings = Vec::new();
    if topo.mailbox_nodes.is_empty() {
        findings.push(Finding::warning(
            Stage::Topology,
            "no mailbox is defined in device tree",
        ));
        return findings;
    }
    findings.push(
        Finding::ok(Stage::Topology, "mailbox nodes defined in device tree")
            .with_entities(paths(&topo.mailbox_nodes)),
    );
    for node in &topo.mailbox_nodes {
        match probe.decode_node(&node.path) {
            Some(dts) if has_interrupts_decl(&dts) => {
                findings.push(
                    Finding::ok(Stage::Topology, format!("mailbox {}: interrupts declared", node.name)),
                );
            }
            Some(_) => {
                findings.push(Finding::warning(
                    Stage::Topology,
                    format!("mailbox {}: no interrupts declared", node.name),
                ));
            }
            None => {
                findings.push(Finding::warning(
                    Stage::Topology,
                    format!("mailbox {}: interrupt decode unavailable", node.name),
                ));
            }
        }
    }
    findings
}

/// Findings for the three virtio resource categories.
pub fn vdev_findings(topo: &Topology) -> Vec<Finding> {
    let categories = [
        (&topo.vdev_buffers, "vdev buffers", "vdev buffer is not defined"),
        (&topo.vdev_vrings, "vdev vrings", "vdev vrings are not defined"),
        (&topo.rsc_tables, "resource table", "resource table is not defined"),
    ];
    categories
        .iter()
        .map(|(nodes, what, missing)| {
            if nodes.is_empty() {
                Finding::warning(Stage::Topology, *missing)
            } else {
                Finding::ok(Stage::Topology, format!("{what} defined in device tree"))
                    .with_entities(names(nodes))
            }
        })
        .collect()
}
