//! tidymeta - organize a folder by file type and embedded metadata
//!
//! This library sorts the immediate entries of a directory into subfolders:
//! images by EXIF capture date, PDFs by author, word documents and text files
//! by month, spreadsheets by title, and everything else into `Others`. Every
//! file is hashed on the way so duplicate content can be detected (and, when
//! asked, left in place).

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod hasher;
pub mod logging;
pub mod metadata;
pub mod output;
pub mod reporter;

pub use config::{AppConfig, CompiledFilters, ConfigError, FilterRules};
pub use file_category::Category;
pub use file_organizer::{OrganizeError, OrganizeSettings, OrganizeSummary, organize};
pub use hasher::{ContentHash, SeenHashes, content_hash};
pub use metadata::{ExtractError, MetadataRecord};
pub use reporter::{Reporter, TracingReporter};

pub use cli::{Cli, RunOptions, run_cli};
