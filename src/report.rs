// CLASSIFICATION: COMMUNITY
// Filename: report.rs v0.3
// Author: Lukas Bower
// Date Modified: 2027-11-20

//! Finding model and ordered diagnostic report.
//!
//! Each pipeline stage returns its findings as an ordered batch; the
//! report is the concatenation of those batches in stage order. Nothing
//! is reordered, merged or dropped on the way to the renderer.

use std::fmt;
use std::io::{self, Write};

/// Severity of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Ok,
    Warning,
    Fail,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Fail => "FAIL",
            Severity::Info => "INFO",
        };
        write!(f, "{tag}")
    }
}

/// Pipeline stage a finding originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Topology,
    RuntimeState,
    DriverBinding,
    Transport,
    LogTrace,
    RpmsgBus,
}

/// One diagnostic statement about the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub stage: Stage,
    pub message: String,
    /// Paths or names of the entities the statement is about.
    pub entities: Vec<String>,
    /// Set only on the remoteproc-class-absent failure; truncates the run.
    pub gating: bool,
}

impl Finding {
    pub fn new(severity: Severity, stage: Stage, message: impl Into<String>) -> Self {
        Finding {
            severity,
            stage,
            message: message.into(),
            entities: Vec::new(),
            gating: false,
        }
    }

    pub fn ok(stage: Stage, message: impl Into<String>) -> Self {
        Finding::new(Severity::Ok, stage, message)
    }

    pub fn warning(stage: Stage, message: impl Into<String>) -> Self {
        Finding::new(Severity::Warning, stage, message)
    }

    pub fn fail(stage: Stage, message: impl Into<String>) -> Self {
        Finding::new(Severity::Fail, stage, message)
    }

    pub fn info(stage: Stage, message: impl Into<String>) -> Self {
        Finding::new(Severity::Info, stage, message)
    }

    /// Attach the matched entity list.
    pub fn with_entities(mut self, entities: Vec<String>) -> Self {
        self.entities = entities;
        self
    }

    /// Mark the finding as gating. Only the runtime reader uses this.
    pub fn gating(mut self) -> Self {
        self.gating = true;
        self
    }
}

/// Ordered sequence of findings plus the terminal summary.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Report {
    findings: Vec<Finding>,
}

impl Report {
    /// Append one stage's batch, preserving order.
    pub fn extend(&mut self, batch: Vec<Finding>) {
        self.findings.extend(batch);
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// True when a gating failure truncated the pipeline.
    pub fn halted(&self) -> bool {
        self.findings.iter().any(|f| f.gating)
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    /// Render the banner, every finding in order and the summary line.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "=== RPMsg / remoteproc runtime validation ===")?;
        for finding in &self.findings {
            writeln!(out, "{}: {}", finding.severity, finding.message)?;
            for entity in &finding.entities {
                writeln!(out, "    {entity}")?;
            }
        }
        let fails = self.count(Severity::Fail);
        let warnings = self.count(Severity::Warning);
        writeln!(
            out,
            "summary: {} ok, {} warnings, {} failures, {} info",
            self.count(Severity::Ok),
            warnings,
            fails,
            self.count(Severity::Info),
        )?;
        if fails == 0 && !self.halted() {
            writeln!(out, "=== ALL CHECKS COMPLETED ===")?;
        }
        Ok(())
    }
}
