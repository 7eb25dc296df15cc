//! Table output formatting for CLI commands
//!
//! Summary tables for sweep runs and the code catalogue using comfy-table.

use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::env;

use crate::adapters::sinks::format_scientific;
use crate::domain::ports::StructureInfo;
use crate::services::{AggregatedCurve, SkippedCombination, SweepReport};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// One row per finished sweep
    pub fn format_sweeps(&self, sweeps: &[SweepReport]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&[
            "Structure", "Z", "Seed", "Points", "Recorded", "Degenerate", "Trials", "Final SNR",
            "Final BLER",
        ]));

        for sweep in sweeps {
            let last = sweep.result.last();
            let final_snr = last.map_or_else(|| "-".to_string(), |p| format!("{:.2}", p.snr_db()));
            let final_bler = last
                .and_then(|p| p.bler())
                .map_or_else(|| "-".to_string(), format_scientific);

            table.add_row(vec![
                Cell::new(&sweep.params.code.structure),
                Cell::new(sweep.params.code.scaling).set_alignment(CellAlignment::Right),
                Cell::new(sweep.params.seed).set_alignment(CellAlignment::Right),
                Cell::new(sweep.result.len()).set_alignment(CellAlignment::Right),
                Cell::new(sweep.result.recorded().count()).set_alignment(CellAlignment::Right),
                Cell::new(sweep.result.degenerate_count()).set_alignment(CellAlignment::Right),
                Cell::new(sweep.result.total_trials()).set_alignment(CellAlignment::Right),
                Cell::new(final_snr).set_alignment(CellAlignment::Right),
                self.colored(Cell::new(final_bler), Color::Green),
            ]);
        }

        table.to_string()
    }

    /// Seed-pooled BLER curve of one (structure, scaling) combination
    pub fn format_curve(&self, curve: &AggregatedCurve) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["SNR (dB)", "Trials", "Errors", "BLER"]));

        for point in &curve.points {
            let bler = point.bler().map_or_else(|| "-".to_string(), format_scientific);
            table.add_row(vec![
                Cell::new(format!("{:.2}", point.snr_db())).set_alignment(CellAlignment::Right),
                Cell::new(point.trial_count()).set_alignment(CellAlignment::Right),
                Cell::new(point.error_count()).set_alignment(CellAlignment::Right),
                Cell::new(bler).set_alignment(CellAlignment::Right),
            ]);
        }

        table.to_string()
    }

    /// Combinations that were skipped as unsupported
    pub fn format_skipped(&self, skipped: &[SkippedCombination]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Structure", "Z", "Seed", "Reason"]));

        for skip in skipped {
            table.add_row(vec![
                Cell::new(&skip.structure),
                Cell::new(skip.scaling).set_alignment(CellAlignment::Right),
                Cell::new(skip.seed).set_alignment(CellAlignment::Right),
                self.colored(Cell::new(&skip.reason), Color::Yellow),
            ]);
        }

        table.to_string()
    }

    /// Built-in code structures
    pub fn format_structures(&self, structures: &[StructureInfo]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Structure", "Rate", "Scaling parameter", "Supported"]));

        for info in structures {
            let rate = info
                .rate
                .map_or_else(|| "1/factor".to_string(), |rate| format!("{rate:.3}"));
            table.add_row(vec![
                self.colored(Cell::new(info.name), Color::Cyan),
                Cell::new(rate).set_alignment(CellAlignment::Right),
                Cell::new(info.scaling_meaning),
                Cell::new(&info.supported_scalings),
            ]);
        }

        table.to_string()
    }

    fn colored(&self, cell: Cell, color: Color) -> Cell {
        if self.use_colors {
            cell.fg(color)
        } else {
            cell
        }
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        // Use UTF-8 preset for nice borders
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect()
}

/// Check if color output is supported
fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}
