// CLASSIFICATION: COMMUNITY
// Filename: main.rs v0.3
// Author: Lukas Bower
// Date Modified: 2027-11-28

use std::io;

use clap::Parser;

use rprocdiag::{DiagPaths, HostProbe, Pipeline};

/// Diagnose the remoteproc / virtio / RPMsg stack on a running platform.
///
/// Takes no arguments: every run is a fresh read-only snapshot of the
/// device tree and the kernel class/bus directories. Warnings and
/// failures are reported, never turned into a non-zero exit.
#[derive(Parser)]
#[command(name = "rprocdiag", version, about = "remoteproc / virtio / RPMsg stack diagnostics")]
struct Cli {}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let _cli = Cli::parse();

    let pipeline = Pipeline::new(DiagPaths::default(), &HostProbe);
    let report = pipeline.run();

    let stdout = io::stdout();
    report.render(&mut stdout.lock())?;
    Ok(())
}
