use crate::error::{GitekiError, Result};
use crate::mapper::{map_row, RowMapping, SkipReason};
use crate::planner::ImportPlanner;
use crate::source::RowSource;
use crate::store::{InsertOutcome, Store};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Extension of the listing files the publisher distributes.
pub const DEFAULT_EXTENSION: &str = "xls";

/// What happened to a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Inserted { id: i64 },
    SkippedDuplicate,
    SkippedMalformed(SkipReason),
}

/// What happened to a single source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    AlreadyImported,
    Imported(FileReport),
}

/// Per-row tallies for one imported file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub file: String,
    pub inserted: usize,
    pub duplicates: usize,
    pub malformed: usize,
}

impl FileReport {
    fn new(file: &str) -> Self {
        FileReport {
            file: file.to_string(),
            ..Default::default()
        }
    }

    fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Inserted { .. } => self.inserted += 1,
            RowOutcome::SkippedDuplicate => self.duplicates += 1,
            RowOutcome::SkippedMalformed(_) => self.malformed += 1,
        }
    }
}

/// Totals for a whole run over a source directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub files_imported: usize,
    pub files_skipped: usize,
    pub rows_inserted: usize,
    pub rows_duplicate: usize,
    pub rows_malformed: usize,
    pub skipped_files: Vec<String>,
    pub reports: Vec<FileReport>,
}

impl ImportSummary {
    fn record(&mut self, file: String, outcome: FileOutcome) {
        match outcome {
            FileOutcome::AlreadyImported => {
                self.files_skipped += 1;
                self.skipped_files.push(file);
            }
            FileOutcome::Imported(report) => {
                self.files_imported += 1;
                self.rows_inserted += report.inserted;
                self.rows_duplicate += report.duplicates;
                self.rows_malformed += report.malformed;
                self.reports.push(report);
            }
        }
    }
}

/// Sequential ingestion of a source directory into a store.
///
/// Files are visited in name order and rows in source order, so each insert
/// sees the uniqueness state left by everything before it. Nothing is rolled
/// back on a fatal error: rows committed before the failure stay in the store.
pub struct Pipeline<'a> {
    store: &'a Store,
    source: &'a dyn RowSource,
    extension: String,
}

impl<'a> Pipeline<'a> {
    pub fn new(store: &'a Store, source: &'a dyn RowSource) -> Self {
        Pipeline {
            store,
            source,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Only files ending in `.<extension>` are candidates.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Import every candidate file in `src_dir`.
    pub fn run(&self, src_dir: &Path) -> Result<ImportSummary> {
        let files = self.candidate_files(src_dir)?;
        let mut summary = ImportSummary::default();

        for path in &files {
            let outcome = self.import_file(path)?;
            summary.record(file_name(path), outcome);
        }

        log::info!(
            "import finished: {} files imported, {} skipped; {} rows inserted, {} duplicate, {} malformed",
            summary.files_imported,
            summary.files_skipped,
            summary.rows_inserted,
            summary.rows_duplicate,
            summary.rows_malformed,
        );
        Ok(summary)
    }

    /// Regular files in `src_dir` carrying the expected extension, sorted by name.
    pub fn candidate_files(&self, src_dir: &Path) -> Result<Vec<PathBuf>> {
        let listing_error = |message: String| GitekiError::SourceDirectory {
            path: src_dir.display().to_string(),
            message,
        };

        // glob yields nothing for a missing directory; probe it first
        std::fs::read_dir(src_dir).map_err(|e| listing_error(e.to_string()))?;

        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(&src_dir.to_string_lossy()),
            self.extension
        );
        let entries =
            glob::glob(&pattern).map_err(|e| listing_error(format!("Glob error: {e}")))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| listing_error(e.to_string()))?;
            if path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }

    /// Import one file unless its name already appears as provenance.
    pub fn import_file(&self, path: &Path) -> Result<FileOutcome> {
        let name = file_name(path);

        let imported = ImportPlanner::new(self.store)
            .already_imported(&name)
            .map_err(|e| e.in_file(&name))?;
        if imported {
            log::info!("skipping import: {name}");
            return Ok(FileOutcome::AlreadyImported);
        }

        log::info!("open {name}");
        let rows = self.source.extract_rows(path).map_err(|e| match e {
            err @ GitekiError::Extraction { .. } => err,
            other => GitekiError::extraction(path.display().to_string(), other),
        })?;

        let mut report = FileReport::new(&name);
        for row in &rows {
            let outcome = self.import_row(row, &name)?;
            report.record(&outcome);
        }

        log::info!(
            "imported {name}: {} inserted, {} duplicate, {} malformed",
            report.inserted,
            report.duplicates,
            report.malformed
        );
        Ok(FileOutcome::Imported(report))
    }

    /// Map and insert a single row. Only store failures are errors.
    pub fn import_row(&self, row: &[String], file: &str) -> Result<RowOutcome> {
        let record = match map_row(row, file) {
            RowMapping::Record(record) => record,
            RowMapping::Skip(reason) => {
                log::debug!("skipping row in {file}: {reason}");
                return Ok(RowOutcome::SkippedMalformed(reason));
            }
        };

        let outcome = self
            .store
            .insert_record(&record)
            .map_err(|e| e.in_file(file))?;
        match outcome {
            InsertOutcome::Inserted { id } => {
                log::debug!("insert #{id}: {}", record.natural_key());
                Ok(RowOutcome::Inserted { id })
            }
            InsertOutcome::Duplicate => {
                log::info!("skipping insert: duplicate {}", record.natural_key());
                Ok(RowOutcome::SkippedDuplicate)
            }
        }
    }
}

/// Open the store at `db_path`, import `src_dir` into it and close it again.
/// The store is released on the error path as well.
pub fn load(
    src_dir: &Path,
    db_path: &Path,
    source: &dyn RowSource,
    extension: &str,
) -> Result<ImportSummary> {
    let store = Store::open(db_path)?;
    let summary = Pipeline::new(&store, source)
        .with_extension(extension)
        .run(src_dir)?;
    store.close()?;
    Ok(summary)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
