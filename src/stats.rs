//! Row accounting and the end-of-run summary.

use std::io::{self, Write};

/// Row accounting for one run over an input file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub parsed: usize,
    pub failed_to_parse: usize,
    pub missing_delay_coerced: usize,
}

impl ProcessingStats {
    /// Total data rows seen, header excluded.
    pub fn processed(&self) -> usize {
        self.parsed + self.failed_to_parse
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn missing_delay_pct(&self) -> f64 {
        Self::pct(self.missing_delay_coerced, self.processed())
    }

    pub fn failed_pct(&self) -> f64 {
        Self::pct(self.failed_to_parse, self.processed())
    }

    /// `true` when every row parsed.
    pub fn is_success(&self) -> bool {
        self.failed_to_parse == 0
    }

    /// Writes the processed row count to `out` and any coercion or failure
    /// counts to `err`.
    pub fn report(&self, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Processed total of {} rows", self.processed())?;

        if self.missing_delay_coerced > 0 {
            writeln!(
                err,
                "Coerced missing \"delay\" to 0 in {} ({:.2}%) rows",
                self.missing_delay_coerced,
                self.missing_delay_pct()
            )?;
        }

        if self.failed_to_parse > 0 {
            writeln!(
                err,
                "Failed to parse {} ({:.2}%) rows",
                self.failed_to_parse,
                self.failed_pct()
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_to_strings(stats: &ProcessingStats) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        stats.report(&mut out, &mut err).unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(ProcessingStats::pct(10, 0), 0.0);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(ProcessingStats::pct(50, 100), 50.0);
        assert_eq!(ProcessingStats::pct(1, 4), 25.0);
    }

    #[test]
    fn test_processed_is_sum() {
        let stats = ProcessingStats {
            parsed: 7,
            failed_to_parse: 3,
            missing_delay_coerced: 2,
        };
        assert_eq!(stats.processed(), 10);
        assert!(!stats.is_success());
    }

    #[test]
    fn test_report_clean_run() {
        let stats = ProcessingStats {
            parsed: 4,
            ..Default::default()
        };
        let (out, err) = report_to_strings(&stats);

        assert_eq!(out, "Processed total of 4 rows\n");
        assert!(err.is_empty());
        assert!(stats.is_success());
    }

    #[test]
    fn test_report_with_coercions_and_failures() {
        let stats = ProcessingStats {
            parsed: 2,
            failed_to_parse: 1,
            missing_delay_coerced: 1,
        };
        let (out, err) = report_to_strings(&stats);

        assert_eq!(out, "Processed total of 3 rows\n");
        assert_eq!(
            err,
            "Coerced missing \"delay\" to 0 in 1 (33.33%) rows\nFailed to parse 1 (33.33%) rows\n"
        );
    }
}
