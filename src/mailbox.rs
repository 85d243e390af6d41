// CLASSIFICATION: COMMUNITY
// Filename: mailbox.rs v0.4
// Author: Lukas Bower
// Date Modified: 2027-11-26

//! Mailbox / IPC driver binding classifier.
//!
//! Nothing in sysfs tags a platform driver as "this is an IPC mailbox", so
//! the classifier matches driver names against the vendor vocabulary
//! instead: `mailbox`, `ipcc`, `msgbox`, `hsp`, `mhu`, a suffix-anchored
//! `-ipi`/`_ipi` and a delimiter-bounded `mu` token. The anchoring rules
//! are load-bearing: suffix-only `ipi` keeps `ipiomat` out, the bounded
//! `mu` token keeps `multiplexer` out. A name match alone is not enough —
//! the driver must also have at least one bound device entry (a directory
//! or symlink named by a platform device address, i.e. starting with a hex
//! digit) before it counts.

use std::fs;
use std::path::Path;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::DiagPaths;
use crate::report::{Finding, Stage};
use crate::runtime::{EntityKind, RuntimeEntity};

static MAILBOX_FAMILY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"mailbox|ipcc|msgbox|hsp|mhu|[-_]ipi$|(?:^|[-_])mu(?:[-_]|$)")
        .expect("mailbox family pattern")
});

/// True when `name` belongs to the mailbox/IPC driver family.
pub fn is_mailbox_family(name: &str) -> bool {
    MAILBOX_FAMILY.is_match(name)
}

/// True when the driver directory holds at least one bound device entry.
pub fn has_bound_device(driver_dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(driver_dir) else {
        return false;
    };
    entries.filter_map(Result::ok).any(|entry| {
        let bindable = entry
            .file_type()
            .map(|t| t.is_dir() || t.is_symlink())
            .unwrap_or(false);
        let addressed = entry
            .file_name()
            .to_str()
            .and_then(|n| n.chars().next())
            .map(|c| c.is_ascii_hexdigit())
            .unwrap_or(false);
        bindable && addressed
    })
}

/// Platform drivers that both name-match the family and have a bound device.
pub fn bound_mailbox_drivers(paths: &DiagPaths) -> Vec<RuntimeEntity> {
    let Ok(entries) = fs::read_dir(&paths.platform_drivers) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .filter(|entry| {
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                return false;
            };
            if !is_mailbox_family(&name) {
                return false;
            }
            let bound = has_bound_device(&entry.path());
            debug!("mailbox candidate {name}: bound={bound}");
            bound
        })
        .map(|entry| RuntimeEntity {
            kind: EntityKind::PlatformDriver,
            path: entry.path(),
            driver: None,
        })
        .collect()
}

/// Classifier findings. Absence is a warning only: polling-kick platforms
/// validly ship without a mailbox.
pub fn findings(drivers: &[RuntimeEntity]) -> Vec<Finding> {
    if drivers.is_empty() {
        vec![Finding::warning(
            Stage::DriverBinding,
            "no bound mailbox or IPC platform driver found",
        )]
    } else {
        let names = drivers
            .iter()
            .filter_map(|d| d.path.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        vec![
            Finding::ok(Stage::DriverBinding, "mailbox/IPC platform driver bound")
                .with_entities(names),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_substrings_match() {
        for name in [
            "omap-mailbox",
            "bcm2835-mailbox",
            "mailbox-test",
            "qcom-ipcc",
            "sun6i-msgbox",
            "tegra-hsp",
            "arm-mhu",
            "mhuv2",
        ] {
            assert!(is_mailbox_family(name), "{name} should match");
        }
    }

    #[test]
    fn ipi_matches_only_as_suffix() {
        assert!(is_mailbox_family("zynqmp-ipi"));
        assert!(is_mailbox_family("zynqmp_ipi"));
        assert!(!is_mailbox_family("ipiomat"));
        assert!(!is_mailbox_family("zynqmp-ipi-timer"));
    }

    #[test]
    fn mu_token_is_delimiter_bounded() {
        assert!(is_mailbox_family("imx-mu"));
        assert!(is_mailbox_family("imx_mu_rproc"));
        assert!(is_mailbox_family("mu-mailbox"));
        assert!(!is_mailbox_family("multiplexer"));
        assert!(!is_mailbox_family("emulator"));
        assert!(!is_mailbox_family("music"));
    }

    #[test]
    fn unrelated_drivers_do_not_match() {
        for name in ["i2c-designware", "ehci-platform", "snd-soc-dummy"] {
            assert!(!is_mailbox_family(name), "{name} should not match");
        }
    }
}
