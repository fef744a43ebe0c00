//! Best-effort Q&A transcript sink.
//!
//! One append-only text record per completed turn. Failures to write are
//! contractually unobservable to callers: they are logged at warn level
//! and swallowed, never affecting the reply or session state.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::prompt::Mode;

/// Capability interface for recording completed turns.
pub trait TranscriptSink: Send + Sync {
    /// Record one completed turn. Must never fail observably.
    fn record(&self, question: &str, answer: &str, mode: Mode);
}

/// File-backed transcript, appending to a plain text log.
pub struct FileTranscript {
    path: PathBuf,
}

impl FileTranscript {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn append(&self, question: &str, answer: &str, mode: Mode) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        write!(file, "[{timestamp}] MODE={mode}\nQ: {question}\nA: {answer}\n\n")
    }
}

impl TranscriptSink for FileTranscript {
    fn record(&self, question: &str, answer: &str, mode: Mode) {
        if let Err(e) = self.append(question, answer, mode) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to append chat transcript"
            );
        }
    }
}
