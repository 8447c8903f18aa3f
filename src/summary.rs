//! Run summary rendering.
//!
//! Builds the console block printed after a run: the completion message,
//! region count, and the diagnostic listings for unmatched provinces,
//! skipped geometries, and metadata conflicts.

use crate::aggregate::{MetadataConflict, SkippedGeometry};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Everything the operator sees after a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub input: PathBuf,
    /// None for a dry run (nothing was written).
    pub output: Option<PathBuf>,
    pub provinces_read: usize,
    pub regions_created: usize,
    pub unmatched: Vec<String>,
    pub unsupported: Vec<SkippedGeometry>,
    pub conflicts: Vec<MetadataConflict>,
    pub duration_seconds: f64,
    pub completed_at: DateTime<Utc>,
}

impl RunSummary {
    /// Render the summary block for stdout.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "✅ Merged {} province features into {} regions.",
            self.provinces_read, self.regions_created
        ));
        lines.push(format!("   Input:  {}", self.input.display()));

        match &self.output {
            Some(path) => lines.push(format!("   Output: {}", path.display())),
            None => lines.push("   Dry run: no output written.".to_string()),
        }

        if !self.unmatched.is_empty() {
            lines.push(format!(
                "⚠️  {} province(s) had no region entry:",
                self.unmatched.len()
            ));
            for province in &self.unmatched {
                lines.push(format!("     - {}", province));
            }
        }

        if !self.unsupported.is_empty() {
            lines.push(format!(
                "⚠️  {} province(s) skipped for unsupported geometry:",
                self.unsupported.len()
            ));
            for skipped in &self.unsupported {
                lines.push(format!(
                    "     - {} ({})",
                    skipped.province, skipped.geometry_type
                ));
            }
        }

        if !self.conflicts.is_empty() {
            lines.push("⚠️  Metadata conflicts (first-seen values kept):".to_string());
            for conflict in &self.conflicts {
                lines.push(format!("     - {} ({})", conflict.province, conflict.region));
            }
        }

        lines.push(format!(
            "   Completed at {} in {:.1}s",
            self.completed_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.duration_seconds
        ));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_summary() -> RunSummary {
        RunSummary {
            input: PathBuf::from("data/provinces.geojson"),
            output: Some(PathBuf::from("data/regions.geojson")),
            provinces_read: 81,
            regions_created: 17,
            unmatched: Vec::new(),
            unsupported: Vec::new(),
            conflicts: Vec::new(),
            duration_seconds: 0.4,
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_clean_run_has_no_warnings() {
        let rendered = base_summary().render();
        assert!(rendered.contains("Merged 81 province features into 17 regions"));
        assert!(rendered.contains("data/regions.geojson"));
        assert!(!rendered.contains("⚠️"));
    }

    #[test]
    fn test_unmatched_provinces_are_listed() {
        let mut summary = base_summary();
        summary.unmatched = vec!["Unknown Province".to_string()];

        let rendered = summary.render();
        assert!(rendered.contains("1 province(s) had no region entry"));
        assert!(rendered.contains("- Unknown Province"));
    }

    #[test]
    fn test_skipped_geometry_lists_type_name() {
        let mut summary = base_summary();
        summary.unsupported = vec![SkippedGeometry {
            province: "Abra".to_string(),
            geometry_type: "GeometryCollection".to_string(),
        }];

        let rendered = summary.render();
        assert!(rendered.contains("- Abra (GeometryCollection)"));
    }

    #[test]
    fn test_dry_run_notes_nothing_written() {
        let mut summary = base_summary();
        summary.output = None;

        let rendered = summary.render();
        assert!(rendered.contains("Dry run: no output written."));
    }
}
