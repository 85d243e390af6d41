// CLASSIFICATION: COMMUNITY
// Filename: probe.rs v0.3
// Author: Lukas Bower
// Date Modified: 2027-11-21

//! Best-effort external command capability.
//!
//! Both host commands the pipeline leans on (the device-tree decoder and
//! the kernel log query) sit behind [`ExternalProbe`] so tests can swap in
//! canned output. Neither method can fail: a missing tool, a non-zero exit
//! or empty output all collapse to "no data".

use std::path::Path;
use std::process::Command;

use log::debug;

/// Capability seam for the two one-shot host commands.
pub trait ExternalProbe {
    /// Decode a device-tree node directory to dts text, or no data.
    fn decode_node(&self, node: &Path) -> Option<String>;

    /// Kernel log lines containing `keyword` (case-insensitive), or no data.
    fn kernel_log(&self, keyword: &str) -> Option<String>;
}

/// Production probe backed by `dtc` and `dmesg`.
pub struct HostProbe;

impl ExternalProbe for HostProbe {
    fn decode_node(&self, node: &Path) -> Option<String> {
        let output = Command::new("dtc")
            .args(["-qqq", "-f", "-I", "fs", "-O", "dts"])
            .arg(node)
            .output()
            .ok()?;
        if !output.status.success() {
            debug!("dtc failed for {}", node.display());
            return None;
        }
        let text = String::from_utf8(output.stdout).ok()?;
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn kernel_log(&self, keyword: &str) -> Option<String> {
        let output = Command::new("dmesg").output().ok()?;
        let text = String::from_utf8_lossy(&output.stdout);
        let needle = keyword.to_ascii_lowercase();
        let hits: Vec<&str> = text
            .lines()
            .filter(|line| line.to_ascii_lowercase().contains(&needle))
            .collect();
        if hits.is_empty() {
            None
        } else {
            Some(hits.join("\n"))
        }
    }
}
