//! Plain-text assembly reports.

use std::fmt;

use reactor_assembly::{Assembly, BodyRole};
use reactor_kernel::{BoundingBox, KernelIntrospect};
use reactor_types::Color;

use crate::helpers::HarnessError;
use crate::oracle::{run_structure_checks, OracleVerdict};

/// A measured assembly with its oracle results.
pub struct AssemblyReport {
    pub entries: Vec<BodyEntry>,
    pub bounding_box: Option<BoundingBox>,
    pub warnings: Vec<String>,
    pub oracle_results: Vec<OracleVerdict>,
}

/// A single body's report entry.
pub struct BodyEntry {
    pub index: usize,
    pub name: String,
    pub role: BodyRole,
    pub color: Color,
    pub volume: f64,
    pub bounding_box: BoundingBox,
}

impl AssemblyReport {
    /// Measure every body and run the structural oracles.
    pub fn build(
        assembly: &Assembly,
        introspect: &dyn KernelIntrospect,
    ) -> Result<Self, HarnessError> {
        let mut entries = Vec::with_capacity(assembly.len());
        let mut overall: Option<BoundingBox> = None;
        for (index, body) in assembly.bodies().iter().enumerate() {
            let bounding_box = introspect.bounding_box(&body.solid)?;
            overall = Some(match overall {
                Some(bb) => bb.union(&bounding_box),
                None => bounding_box,
            });
            entries.push(BodyEntry {
                index,
                name: body.name.clone(),
                role: body.role,
                color: body.color,
                volume: introspect.volume(&body.solid)?,
                bounding_box,
            });
        }
        Ok(Self {
            entries,
            bounding_box: overall,
            warnings: assembly.warnings().iter().map(|w| w.to_string()).collect(),
            oracle_results: run_structure_checks(assembly),
        })
    }

    /// Append the verdicts of further oracles.
    pub fn with_results(mut self, results: impl IntoIterator<Item = OracleVerdict>) -> Self {
        self.oracle_results.extend(results);
        self
    }

    pub fn all_passed(&self) -> bool {
        self.oracle_results.iter().all(|v| v.passed)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Reactor Assembly Report ===\n\n");

        out.push_str(&format!("Bodies ({}):\n", self.entries.len()));
        for entry in &self.entries {
            let channels: Vec<String> = entry
                .color
                .channels()
                .iter()
                .map(|c| format!("{:.3}", c))
                .collect();
            out.push_str(&format!(
                "  [{}] \"{}\" {:?}\n      volume {:.3} | color ({})\n",
                entry.index,
                entry.name,
                entry.role,
                entry.volume,
                channels.join(", "),
            ));
            let (min, max) = (entry.bounding_box.min, entry.bounding_box.max);
            out.push_str(&format!(
                "      bounds ({:.1}, {:.1}, {:.1}) -> ({:.1}, {:.1}, {:.1})\n",
                min[0], min[1], min[2], max[0], max[1], max[2],
            ));
        }

        if let Some(bb) = self.bounding_box {
            out.push_str(&format!(
                "\nBounding Box: ({:.1}, {:.1}, {:.1}) -> ({:.1}, {:.1}, {:.1})\n",
                bb.min[0], bb.min[1], bb.min[2], bb.max[0], bb.max[1], bb.max[2],
            ));
        }

        if !self.oracle_results.is_empty() {
            out.push_str(&format!(
                "\nOracle Results ({} checks):\n",
                self.oracle_results.len()
            ));
            for v in &self.oracle_results {
                let status = if v.passed { "PASS" } else { "FAIL" };
                out.push_str(&format!("  [{}] {}: {}\n", status, v.oracle_name, v.detail));
            }
        }

        if self.warnings.is_empty() {
            out.push_str("\nWarnings: none\n");
        } else {
            out.push_str(&format!("\nWarnings ({}):\n", self.warnings.len()));
            for w in &self.warnings {
                out.push_str(&format!("  {}\n", w));
            }
        }

        out
    }
}

impl fmt::Display for AssemblyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
