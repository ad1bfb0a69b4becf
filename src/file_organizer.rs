/// The organizer loop: one pass over the immediate entries of a folder.
///
/// For every regular file the loop hashes its content, looks up its category
/// by extension, extracts metadata, builds and sanitizes a destination folder,
/// creates it and moves the file there. A failure on one file is reported and
/// the loop moves on; only a failure to list the folder itself ends the run.
///
/// Progress is reported through a [`Reporter`] passed in by the caller, so the
/// loop has no ambient logging state.
use crate::config::CompiledFilters;
use crate::file_category::{Category, sanitize_destination};
use crate::hasher::{ContentHash, SeenHashes, content_hash};
use crate::metadata::MetadataRecord;
use crate::reporter::Reporter;
use std::collections::BTreeMap;
use std::fs::{self, DirEntry};
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while organizing.
#[derive(Debug)]
pub enum OrganizeError {
    /// The folder could not be resolved or listed.
    FolderAccess { path: PathBuf, source: io::Error },
    /// The file's content could not be hashed.
    Hash { path: PathBuf, source: io::Error },
    /// Failed to create a destination directory.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file to its destination.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// The entry has no usable file name.
    InvalidFileName { path: PathBuf },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FolderAccess { path, source } => {
                write!(f, "Cannot access folder {}: {}", path.display(), source)
            }
            Self::Hash { path, source } => {
                write!(f, "Failed to hash {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(f, "Failed to create directory {}: {}", path.display(), source)
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => write!(
                f,
                "Failed to move {} to {}: {}",
                source.display(),
                destination.display(),
                source_error
            ),
            Self::InvalidFileName { path } => {
                write!(f, "Entry has no file name: {}", path.display())
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FolderAccess { source, .. }
            | Self::Hash { source, .. }
            | Self::DirectoryCreationFailed { source, .. } => Some(source),
            Self::FileMoveFailure { source_error, .. } => Some(source_error),
            Self::InvalidFileName { .. } => None,
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Options for one organizer pass.
#[derive(Debug, Clone, Default)]
pub struct OrganizeSettings {
    /// Report planned destinations without creating folders or moving files.
    pub dry_run: bool,
    /// Leave a file in place when its content was already seen in this run.
    pub skip_duplicates: bool,
    /// Infer a type from content for files without an extension.
    pub sniff_content: bool,
    /// Which entries to organize.
    pub filters: CompiledFilters,
    /// Files that must never be moved (e.g. the active log file).
    pub protected_paths: Vec<PathBuf>,
}

/// What one pass did.
#[derive(Debug, Default)]
pub struct OrganizeSummary {
    /// Files moved into a destination folder.
    pub moved: usize,
    /// Files that would have been moved (dry run).
    pub planned: usize,
    /// Files left in place because a step failed.
    pub failed: usize,
    /// Directories and other non-regular entries.
    pub skipped_non_files: usize,
    /// Files excluded by filters or protection.
    pub filtered: usize,
    /// Files left in place as duplicates.
    pub duplicates_skipped: usize,
    /// Destination folder (relative to the root, `/`-separated) to file count.
    pub buckets: BTreeMap<String, usize>,
    /// Every content hash seen during the pass.
    pub seen_hashes: SeenHashes,
}

impl OrganizeSummary {
    /// Files that reached (or would reach) a destination.
    pub fn organized(&self) -> usize {
        self.moved + self.planned
    }

    fn count_bucket(&mut self, relative: &Path) {
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        *self.buckets.entry(key).or_insert(0) += 1;
    }
}

/// Organizes the immediate entries of `folder`.
///
/// # Errors
///
/// Returns [`OrganizeError::FolderAccess`] when the folder cannot be listed.
/// The failure has already been passed to `reporter`. Per-file failures are
/// never returned; they are reported and counted in the summary.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tidymeta::file_organizer::{OrganizeSettings, organize};
/// use tidymeta::reporter::TracingReporter;
///
/// let summary = organize(
///     Path::new("/home/me/Downloads"),
///     &OrganizeSettings::default(),
///     &mut TracingReporter,
/// );
/// match summary {
///     Ok(s) => println!("moved {} files", s.moved),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
pub fn organize(
    folder: &Path,
    settings: &OrganizeSettings,
    reporter: &mut dyn Reporter,
) -> OrganizeResult<OrganizeSummary> {
    FileOrganizer::new(folder, settings, reporter)?.run()
}

/// State for a single pass.
pub struct FileOrganizer<'a> {
    root: PathBuf,
    settings: &'a OrganizeSettings,
    reporter: &'a mut dyn Reporter,
    summary: OrganizeSummary,
}

impl<'a> FileOrganizer<'a> {
    /// Resolves `folder` to an absolute root.
    pub fn new(
        folder: &Path,
        settings: &'a OrganizeSettings,
        reporter: &'a mut dyn Reporter,
    ) -> OrganizeResult<Self> {
        let root = match std::path::absolute(folder) {
            Ok(root) => root,
            Err(source) => {
                reporter.folder_failed(folder, &source);
                return Err(OrganizeError::FolderAccess {
                    path: folder.to_path_buf(),
                    source,
                });
            }
        };
        Ok(Self {
            root,
            settings,
            reporter,
            summary: OrganizeSummary::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs the pass and returns its summary.
    pub fn run(mut self) -> OrganizeResult<OrganizeSummary> {
        self.reporter.folder_started(&self.root);

        let entries = match self.list_entries() {
            Ok(entries) => entries,
            Err(source) => {
                self.reporter.folder_failed(&self.root, &source);
                return Err(OrganizeError::FolderAccess {
                    path: self.root,
                    source,
                });
            }
        };

        for entry in &entries {
            self.process_entry(entry);
        }

        Ok(self.summary)
    }

    /// Lists the folder once, sorted by name for a stable order.
    fn list_entries(&self) -> io::Result<Vec<DirEntry>> {
        let mut entries = fs::read_dir(&self.root)?.collect::<io::Result<Vec<_>>>()?;
        entries.sort_by_key(|e| e.file_name());
        Ok(entries)
    }

    fn process_entry(&mut self, entry: &DirEntry) {
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        self.reporter.checking(&name);

        // follows symlinks, so a link to a regular file is organized like one
        let is_file = fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            self.reporter.skipped_non_file(&name);
            self.summary.skipped_non_files += 1;
            return;
        }

        if self.is_protected(&path) || !self.settings.filters.should_include(&path) {
            self.reporter.filtered(&name);
            self.summary.filtered += 1;
            return;
        }

        let hash = match content_hash(&path) {
            Ok(hash) => hash,
            Err(source) => {
                let error = OrganizeError::Hash { path, source };
                self.reporter.file_failed(&name, &error);
                self.summary.failed += 1;
                return;
            }
        };
        self.reporter.hashed(&name, &hash);

        if let Some(first) = self.record_hash(hash, &path) {
            self.reporter.duplicate_skipped(&name, &first);
            self.summary.duplicates_skipped += 1;
            return;
        }

        if let Err(error) = self.route(&name, &path) {
            self.reporter.file_failed(&name, &error);
            self.summary.failed += 1;
        }
    }

    /// Records the hash; returns the first path only when duplicates are skipped.
    fn record_hash(&mut self, hash: ContentHash, path: &Path) -> Option<PathBuf> {
        let earlier = self.summary.seen_hashes.record(hash, path.to_path_buf());
        if self.settings.skip_duplicates {
            earlier
        } else {
            None
        }
    }

    fn is_protected(&self, path: &Path) -> bool {
        self.settings
            .protected_paths
            .iter()
            .any(|protected| same_file(protected, path))
    }

    /// Extension lookup, metadata extraction, destination, and move.
    fn route(&mut self, name: &str, path: &Path) -> OrganizeResult<()> {
        let category = Category::from_extension(&self.extension_of(path));
        let record = self.extract(name, category, path);
        self.reporter.metadata(name, category, &record);

        let destination =
            sanitize_destination(&self.root, &category.destination(&record, &self.root));
        self.reporter.destination(name, &destination);
        let relative = destination
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| destination.clone());

        if self.settings.dry_run {
            self.reporter.planned(name, &destination);
            self.summary.planned += 1;
            self.summary.count_bucket(&relative);
            return Ok(());
        }

        fs::create_dir_all(&destination).map_err(|source| {
            OrganizeError::DirectoryCreationFailed {
                path: destination.clone(),
                source,
            }
        })?;

        let file_name = path
            .file_name()
            .ok_or_else(|| OrganizeError::InvalidFileName {
                path: path.to_path_buf(),
            })?;
        move_file(path, &destination.join(file_name))?;

        self.reporter.moved(name, &destination);
        self.summary.moved += 1;
        self.summary.count_bucket(&relative);
        Ok(())
    }

    fn extension_of(&self, path: &Path) -> String {
        if let Some(ext) = path.extension() {
            return ext.to_string_lossy().to_lowercase();
        }
        if self.settings.sniff_content {
            if let Ok(Some(kind)) = infer::get_from_path(path) {
                return kind.extension().to_string();
            }
        }
        String::new()
    }

    fn extract(&mut self, name: &str, category: Category, path: &Path) -> MetadataRecord {
        match category.extract(path) {
            Ok(record) => record,
            Err(error) => {
                self.reporter.extraction_failed(name, category, &error);
                category.default_record()
            }
        }
    }
}

/// Moves `source` to `target`, replacing any file already there.
///
/// Falls back to copy-and-remove when a rename crosses filesystems.
pub fn move_file(source: &Path, target: &Path) -> OrganizeResult<()> {
    let failure = |source_error| OrganizeError::FileMoveFailure {
        source: source.to_path_buf(),
        destination: target.to_path_buf(),
        source_error,
    };

    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            copy_then_remove(source, target, |p| fs::remove_file(p)).map_err(failure)
        }
        Err(e) => Err(failure(e)),
    }
}

/// Copies `source` to `target`, then removes `source` with `remove_source`.
///
/// If `source` cannot be removed the fresh copy at `target` is deleted again,
/// so the file is never left in both places.
fn copy_then_remove(
    source: &Path,
    target: &Path,
    remove_source: impl FnOnce(&Path) -> io::Result<()>,
) -> io::Result<()> {
    fs::copy(source, target)?;
    if let Err(e) = remove_source(source) {
        let _ = fs::remove_file(target);
        return Err(e);
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
