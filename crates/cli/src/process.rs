//! Per-file processing: backup, rewrite, save.

use crate::audit_log::{log_path, FileAuditSink};
use fontnorm_core::{process_document, Error, Result, RewriteOptions, RewriteStats};
use fontnorm_pptx::PptxPackage;
use std::fs;
use std::path::{Path, PathBuf};

/// Rewrite every file in turn and return how many failed.
///
/// A failed file never stops the batch.
pub fn run_files(files: &[PathBuf], options: &RewriteOptions, echo: bool) -> usize {
    files
        .iter()
        .filter(|file| !run_file(file, options, echo))
        .count()
}

/// Rewrite one presentation in place, reporting to its `.log` file.
///
/// Returns whether the file was processed successfully. Failures are written
/// to the log file and to stderr.
pub fn run_file(file: &Path, options: &RewriteOptions, echo: bool) -> bool {
    let mut sink = match FileAuditSink::open(&log_path(file)) {
        Ok(sink) if echo => sink,
        Ok(sink) => sink.quiet(),
        Err(e) => {
            eprintln!("Failed to process {}: {:#}", file.display(), e);
            return false;
        }
    };

    match process_file(file, options, &mut sink) {
        Ok(stats) => {
            if let Some(e) = sink.take_write_error() {
                eprintln!(
                    "Failed to process {}: audit log is incomplete: {}",
                    file.display(),
                    e
                );
                return false;
            }
            log::info!(
                "{}: {} fonts replaced, {} code fonts preserved",
                file.display(),
                stats.replaced,
                stats.preserved
            );
            true
        }
        Err(err) => {
            sink.note_failure(&failure_message(file, &err));
            false
        }
    }
}

/// Back up, open, rewrite and save one presentation.
pub fn process_file(
    file: &Path,
    options: &RewriteOptions,
    sink: &mut FileAuditSink,
) -> Result<RewriteStats> {
    if !file.is_file() {
        return Err(Error::FileNotFound(file.to_path_buf()));
    }

    let backup = backup_file(file)?;
    sink.note(&format!(
        "{} was backed up to {}.",
        file.display(),
        backup.display()
    ));

    let mut package = PptxPackage::open(file)?;
    sink.note(&format!("{} was opened.", file.display()));

    let stats = process_document(package.document_mut(), options, sink)?;

    package.save(file)?;
    sink.note(&format!("{} was saved.", file.display()));

    log::debug!(
        "{}: {} replaced, {} preserved",
        file.display(),
        stats.replaced,
        stats.preserved
    );
    Ok(stats)
}

/// The user-facing line for a failed file.
pub fn failure_message(file: &Path, err: &Error) -> String {
    match err {
        Error::FileNotFound(_) => format!("{} was not found.", file.display()),
        Error::InvalidPackage(_) => format!("{} is not a valid PowerPoint file.", file.display()),
        other => format!("Failed to process {}: {}", file.display(), other),
    }
}

/// Copy `file` to the first free backup name and return that name.
pub fn backup_file(file: &Path) -> Result<PathBuf> {
    let mut attempt = 1;
    let mut backup = backup_path(file, attempt);
    while backup.exists() {
        attempt += 1;
        backup = backup_path(file, attempt);
    }
    fs::copy(file, &backup)?;
    Ok(backup)
}

/// `<stem> - backup.<ext>` for the first attempt, `<stem> - backup (N).<ext>` after.
fn backup_path(file: &Path, attempt: usize) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name = if attempt <= 1 {
        format!("{} - backup", stem)
    } else {
        format!("{} - backup ({})", stem, attempt)
    };
    if let Some(ext) = file.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    file.with_file_name(name)
}
