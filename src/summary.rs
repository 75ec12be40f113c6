//! Run statistics and the end-of-run summary table

use std::fmt;

/// Why a reference was not updated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The repository does not exist
    NotFound,
    /// The registry's request budget was exhausted
    RateLimited,
    /// Transport failure or unexpected response
    Network,
    /// The file could not be written (or its backup could not be)
    WriteFailed,
    /// `--max-bump` needs a version comment the reference does not have
    UnknownCurrentVersion,
    /// The repository has no version tags
    NoRelease,
}

/// Counters accumulated over one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub files_updated: usize,
    pub files_failed: usize,
    pub references_checked: usize,
    pub references_updated: usize,
    pub references_up_to_date: usize,
    pub references_skipped: usize,
    pub not_found: usize,
    pub rate_limited: usize,
    pub network_errors: usize,
    pub write_errors: usize,
    pub unknown_versions: usize,
    pub no_releases: usize,
}

impl RunSummary {
    pub fn record_skip(&mut self, reason: SkipReason) {
        self.record_skips(reason, 1);
    }

    /// Record `count` references skipped for the same reason
    pub fn record_skips(&mut self, reason: SkipReason, count: usize) {
        self.references_skipped += count;
        let counter = match reason {
            SkipReason::NotFound => &mut self.not_found,
            SkipReason::RateLimited => &mut self.rate_limited,
            SkipReason::Network => &mut self.network_errors,
            SkipReason::WriteFailed => &mut self.write_errors,
            SkipReason::UnknownCurrentVersion => &mut self.unknown_versions,
            SkipReason::NoRelease => &mut self.no_releases,
        };
        *counter += count;
    }

    fn rows(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("Total Files Scanned", self.files_scanned),
            ("Total Files Updated", self.files_updated),
            ("Files Failed", self.files_failed),
            ("References Checked", self.references_checked),
            ("References Updated", self.references_updated),
            ("References Up To Date", self.references_up_to_date),
            ("References Skipped", self.references_skipped),
            ("  Not Found", self.not_found),
            ("  Rate Limited", self.rate_limited),
            ("  Network Errors", self.network_errors),
            ("  Write Errors", self.write_errors),
            ("  Unknown Current Version", self.unknown_versions),
            ("  No Version Tags", self.no_releases),
        ]
    }
}

impl fmt::Display for RunSummary {
    /// Grid table in the style of `tabulate(tablefmt="grid")`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const HEADER: (&str, &str) = ("Statistic", "Count");

        let rows = self.rows();
        let name_width = rows
            .iter()
            .map(|(name, _)| name.len())
            .chain([HEADER.0.len()])
            .max()
            .unwrap_or_default();
        let count_width = rows
            .iter()
            .map(|(_, count)| count.to_string().len())
            .chain([HEADER.1.len()])
            .max()
            .unwrap_or_default();

        let border = |fill: char| {
            format!(
                "+{}+{}+",
                fill.to_string().repeat(name_width + 2),
                fill.to_string().repeat(count_width + 2)
            )
        };

        writeln!(f, "{}", border('-'))?;
        writeln!(
            f,
            "| {:<name_width$} | {:<count_width$} |",
            HEADER.0, HEADER.1
        )?;
        writeln!(f, "{}", border('='))?;
        for (i, (name, count)) in rows.iter().enumerate() {
            writeln!(f, "| {:<name_width$} | {:>count_width$} |", name, count)?;
            let last = i + 1 == rows.len();
            if last {
                write!(f, "{}", border('-'))?;
            } else {
                writeln!(f, "{}", border('-'))?;
            }
        }
        Ok(())
    }
}
