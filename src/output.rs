//! Console output for the end-of-run summary.
//!
//! Per-file progress goes through `tracing`; this module prints the final
//! table and short status lines with consistent styling.

use crate::file_organizer::OrganizeSummary;
use colored::*;
use std::collections::BTreeMap;

/// Styled CLI output.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Green check line on stdout.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Red cross line on stderr.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Yellow `[DRY RUN]` line.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Prints the destination table and totals for one run.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidymeta::file_organizer::OrganizeSummary;
    /// use tidymeta::output::OutputFormatter;
    ///
    /// let mut summary = OrganizeSummary::default();
    /// summary.moved = 2;
    /// summary.buckets.insert("Images/NoDate".to_string(), 2);
    /// OutputFormatter::summary(&summary, false);
    /// ```
    pub fn summary(summary: &OrganizeSummary, dry_run: bool) {
        Self::header(if dry_run { "DRY RUN SUMMARY" } else { "SUMMARY" });
        Self::bucket_table(&summary.buckets, summary.organized());

        if summary.skipped_non_files > 0 {
            println!("Skipped non-files: {}", summary.skipped_non_files);
        }
        if summary.filtered > 0 {
            println!("Excluded by filters: {}", summary.filtered);
        }
        if summary.duplicates_skipped > 0 {
            println!(
                "Duplicates left in place: {}",
                summary.duplicates_skipped.to_string().yellow()
            );
        }
        println!("Distinct contents seen: {}", summary.seen_hashes.len());

        if summary.failed > 0 {
            Self::warning(&format!(
                "{} {} could not be organized. See the log for details.",
                summary.failed,
                plural(summary.failed)
            ));
        }
    }

    fn bucket_table(buckets: &BTreeMap<String, usize>, total_files: usize) {
        let width = buckets
            .keys()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Destination".len());

        println!(
            "{:<width$} | {}",
            "Destination".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));
        for (bucket, count) in buckets {
            println!(
                "{:<width$} | {} {}",
                bucket,
                count.to_string().green(),
                plural(*count),
                width = width
            );
        }
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = width
        );
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
