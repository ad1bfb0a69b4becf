//! Progress reporting for the organizer loop.
//!
//! The loop never logs directly; it calls a [`Reporter`] handed in by the
//! caller. [`TracingReporter`] turns each event into a `tracing` record, which
//! the binary routes to the console and the per-run log file.

use crate::file_category::Category;
use crate::file_organizer::OrganizeError;
use crate::hasher::ContentHash;
use crate::metadata::{ExtractError, MetadataRecord};
use std::io;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Receives one call per step of the organizer loop.
pub trait Reporter {
    fn folder_started(&mut self, root: &Path);
    fn checking(&mut self, name: &str);
    fn skipped_non_file(&mut self, name: &str);
    fn filtered(&mut self, name: &str);
    fn hashed(&mut self, name: &str, hash: &ContentHash);
    fn duplicate_skipped(&mut self, name: &str, first_seen: &Path);
    fn extraction_failed(&mut self, name: &str, category: Category, error: &ExtractError);
    fn metadata(&mut self, name: &str, category: Category, record: &MetadataRecord);
    fn destination(&mut self, name: &str, destination: &Path);
    fn moved(&mut self, name: &str, destination: &Path);
    fn planned(&mut self, name: &str, destination: &Path);
    fn file_failed(&mut self, name: &str, error: &OrganizeError);
    fn folder_failed(&mut self, root: &Path, error: &io::Error);
}

/// Reports through `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn folder_started(&mut self, root: &Path) {
        info!("Processing folder: {}", root.display());
    }

    fn checking(&mut self, name: &str) {
        info!("Checking file: {}", name);
    }

    fn skipped_non_file(&mut self, name: &str) {
        info!("Skipping non-file: {}", name);
    }

    fn filtered(&mut self, name: &str) {
        info!("Skipping excluded file: {}", name);
    }

    fn hashed(&mut self, name: &str, hash: &ContentHash) {
        debug!("Content hash for {}: {}", name, hash);
    }

    fn duplicate_skipped(&mut self, name: &str, first_seen: &Path) {
        warn!(
            "Skipping {}: same content as {}",
            name,
            first_seen.display()
        );
    }

    fn extraction_failed(&mut self, name: &str, category: Category, error: &ExtractError) {
        error!("Failed to get {} metadata for {}: {}", category, name, error);
    }

    fn metadata(&mut self, name: &str, category: Category, record: &MetadataRecord) {
        if category.has_extractor() {
            info!("Metadata for {}: {}", name, record);
        } else {
            info!("Metadata for {}: none", name);
        }
    }

    fn destination(&mut self, name: &str, destination: &Path) {
        info!("Destination for {}: {}", name, destination.display());
    }

    fn moved(&mut self, name: &str, destination: &Path) {
        info!("Moved {} to {}", name, destination.display());
    }

    fn planned(&mut self, name: &str, destination: &Path) {
        info!("[DRY RUN] Would move {} to {}", name, destination.display());
    }

    fn file_failed(&mut self, name: &str, error: &OrganizeError) {
        error!("Error processing {}: {}", name, error);
    }

    fn folder_failed(&mut self, root: &Path, error: &io::Error) {
        error!("Error accessing folder {}: {}", root.display(), error);
    }
}
