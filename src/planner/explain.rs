//! Explain output per QUERY.md §1
//!
//! Produces deterministic, human-readable resolution output: which
//! candidate (if any) a filter resolved to, and what executing it
//! would touch.

use std::fmt;

use super::candidate::IndexCandidate;

/// Explained outcome of a resolution attempt
#[derive(Debug, Clone)]
pub struct ResolutionExplain {
    /// Whether a candidate was found
    pub resolved: bool,
    /// Compact rendering of the candidate tree (if resolved)
    pub plan: Option<String>,
    /// Index names probed, in tree order (if resolved)
    pub indexes: Vec<String>,
    /// Number of index probes the candidate implies (if resolved)
    pub probes: Option<usize>,
}

impl ResolutionExplain {
    /// Explains a resolved candidate
    pub fn from_candidate(candidate: &IndexCandidate) -> Self {
        let mut indexes = Vec::new();
        collect_indexes(candidate, &mut indexes);

        Self {
            resolved: true,
            plan: Some(candidate.to_string()),
            indexes,
            probes: Some(candidate.probe_count()),
        }
    }

    /// Explains a filter no index could serve
    pub fn from_miss() -> Self {
        Self {
            resolved: false,
            plan: None,
            indexes: Vec::new(),
            probes: None,
        }
    }
}

fn collect_indexes(candidate: &IndexCandidate, out: &mut Vec<String>) {
    match candidate {
        IndexCandidate::Leaf { .. } | IndexCandidate::Chain { .. } | IndexCandidate::Range { .. } => {
            out.push(candidate.name());
        }
        IndexCandidate::And { children } | IndexCandidate::Or { children } => {
            for child in children {
                collect_indexes(child, out);
            }
        }
    }
}

impl fmt::Display for ResolutionExplain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== RESOLUTION ===")?;

        if self.resolved {
            writeln!(f, "Status: RESOLVED")?;
            if let Some(plan) = &self.plan {
                writeln!(f, "Plan: {}", plan)?;
            }
            if !self.indexes.is_empty() {
                writeln!(f, "Indexes:")?;
                for index in &self.indexes {
                    writeln!(f, "  - {}", index)?;
                }
            }
            if let Some(probes) = self.probes {
                writeln!(f, "Probes: {}", probes)?;
            }
        } else {
            writeln!(f, "Status: FULL_SCAN")?;
            writeln!(f, "Reason: no declared index serves the filter")?;
        }

        Ok(())
    }
}
