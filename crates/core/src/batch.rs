use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::admission::{Admission, AdmissionBounds, admit};
use crate::discovery::find_files;
use crate::error::{AstgenError, Result};
use crate::flatten::flatten;
use crate::model::{BatchSummary, FileOutcome, NodeRecord, RejectReason};
use crate::parser::{ParseMode, SourceParser};

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    pub bounds: AdmissionBounds,
    pub mode: ParseMode,
    /// Worker pool size; 0 means available hardware parallelism.
    pub workers: usize,
}

/// The two correlated sinks live behind one mutex: line *i* of the AST sink
/// and line *i* of the file-list sink must always name the same file, so the
/// pair write has to be atomic with respect to other workers.
struct AcceptedSinks {
    ast: BufWriter<File>,
    files: BufWriter<File>,
}

/// Processes every file matched by `pattern` over a bounded worker pool and
/// persists results under `prefix` (`<prefix>.json`, `<prefix>.txt`,
/// `<prefix>_failed.txt`).
///
/// Per-file failures are isolated into the failure log and never abort the
/// batch; only discovery, sink-open and sink-write failures are fatal.
pub fn run_batch(
    parser: &dyn SourceParser,
    pattern: &str,
    prefix: &Path,
    options: &BatchOptions,
) -> Result<BatchSummary> {
    let files = find_files(pattern)?;
    let total = files.len();
    info!("starting to process {total} files");

    // Sinks open before any file work; failure here aborts the whole batch.
    let accepted_sinks = Mutex::new(AcceptedSinks {
        ast: BufWriter::new(File::create(sink_path(prefix, ".json"))?),
        files: BufWriter::new(File::create(sink_path(prefix, ".txt"))?),
    });
    let failed_sink = Mutex::new(BufWriter::new(File::create(sink_path(
        prefix,
        "_failed.txt",
    ))?));

    let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let processed = AtomicUsize::new(0);
    let accepted = AtomicUsize::new(0);
    let rejected = AtomicUsize::new(0);
    let sink_error: Mutex<Option<io::Error>> = Mutex::new(None);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .build()
        .map_err(|e| AstgenError::Internal(e.to_string()))?;

    pool.install(|| {
        files.par_iter().for_each(|path| {
            match evaluate_file(parser, path, options) {
                FileOutcome::Accepted { path, records } => match serde_json::to_string(&records) {
                    Ok(line) => {
                        let rel = relativize(&path, &root);
                        match accepted_sinks.lock() {
                            Ok(mut sinks) => {
                                let written = writeln!(sinks.ast, "{line}")
                                    .and_then(|_| writeln!(sinks.files, "{}", rel.display()));
                                match written {
                                    Ok(()) => {
                                        accepted.fetch_add(1, Ordering::Relaxed);
                                    }
                                    Err(err) => record_sink_error(&sink_error, err),
                                }
                            }
                            Err(_) => record_sink_error(
                                &sink_error,
                                io::Error::other("accepted sinks poisoned"),
                            ),
                        }
                    }
                    Err(err) => {
                        // Should not happen for well-formed records; skip the
                        // file rather than abort the batch.
                        warn!("failed to serialize {}: {}", path.display(), err);
                        rejected.fetch_add(1, Ordering::Relaxed);
                    }
                },
                FileOutcome::Rejected { path, reason } => {
                    debug!("failed to process {}: {}", path.display(), reason);
                    let rel = relativize(&path, &root);
                    match failed_sink.lock() {
                        Ok(mut sink) => {
                            if let Err(err) = writeln!(sink, "{}\t{}", rel.display(), reason) {
                                record_sink_error(&sink_error, err);
                            }
                        }
                        Err(_) => record_sink_error(
                            &sink_error,
                            io::Error::other("failure sink poisoned"),
                        ),
                    }
                    rejected.fetch_add(1, Ordering::Relaxed);
                }
            }

            let current = processed.fetch_add(1, Ordering::Relaxed);
            if current % 1000 == 0 {
                info!("progress: {current}/{total}");
            }
        });
    });

    let mut sinks = accepted_sinks
        .into_inner()
        .map_err(|_| AstgenError::Internal("accepted sinks poisoned".to_string()))?;
    sinks.ast.flush()?;
    sinks.files.flush()?;
    failed_sink
        .into_inner()
        .map_err(|_| AstgenError::Internal("failure sink poisoned".to_string()))?
        .flush()?;

    if let Some(err) = sink_error
        .into_inner()
        .map_err(|_| AstgenError::Internal("sink error slot poisoned".to_string()))?
    {
        return Err(AstgenError::Io(err));
    }

    let summary = BatchSummary {
        total,
        accepted: accepted.into_inner(),
        rejected: rejected.into_inner(),
    };
    info!("done: accepted {}/{} files", summary.accepted, summary.total);
    Ok(summary)
}

/// Parse, flatten and admit one file. Every failure mode collapses into a
/// tagged outcome; nothing unwinds past the worker.
pub fn evaluate_file(
    parser: &dyn SourceParser,
    path: &Path,
    options: &BatchOptions,
) -> FileOutcome {
    let records = match parse_and_flatten(parser, path, options.mode) {
        Ok(records) => records,
        Err(message) => {
            return FileOutcome::Rejected {
                path: path.to_path_buf(),
                reason: RejectReason::ParseFailed(message),
            };
        }
    };

    let count = records.len();
    match admit(count, &options.bounds) {
        Admission::Accept => FileOutcome::Accepted {
            path: path.to_path_buf(),
            records,
        },
        Admission::TooFew => FileOutcome::Rejected {
            path: path.to_path_buf(),
            reason: RejectReason::TooFewNodes(count),
        },
        Admission::TooMany => FileOutcome::Rejected {
            path: path.to_path_buf(),
            reason: RejectReason::TooManyNodes(count),
        },
    }
}

fn parse_and_flatten(
    parser: &dyn SourceParser,
    path: &Path,
    mode: ParseMode,
) -> std::result::Result<Vec<NodeRecord>, String> {
    let source = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let tree = parser.parse(&source, mode).map_err(|e| e.to_string())?;
    Ok(flatten(&tree))
}

fn record_sink_error(slot: &Mutex<Option<io::Error>>, err: io::Error) {
    if let Ok(mut guard) = slot.lock() {
        guard.get_or_insert(err);
    }
}

fn sink_path(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

fn relativize(path: &Path, root: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    match absolute.strip_prefix(root) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => absolute,
    }
}
