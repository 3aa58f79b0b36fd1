//! Handing finished workouts to the backend.
//!
//! The remote endpoint sits behind [`SubmissionSink`]. [`OutboxSink`] is the
//! file-backed implementation: each document is appended to a JSONL outbox
//! under an exclusive lock, to be picked up by whatever ships it.

use crate::{Error, Result, WorkoutSubmissionDocument};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Acknowledgement of an accepted workout
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// Reward points earned, when the backend grants any
    #[serde(default)]
    pub reward_points: Option<u32>,
}

/// Destination for submission documents
///
/// Failures must come back as [`Error::Submission`] carrying the backend's
/// detail message unchanged.
pub trait SubmissionSink {
    fn submit(&mut self, document: &WorkoutSubmissionDocument) -> Result<SubmissionReceipt>;
}

/// JSONL outbox with file locking
pub struct OutboxSink {
    path: PathBuf,
}

impl OutboxSink {
    /// Create a new outbox sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, document: &WorkoutSubmissionDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(document)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;
        Ok(())
    }
}

impl SubmissionSink for OutboxSink {
    fn submit(&mut self, document: &WorkoutSubmissionDocument) -> Result<SubmissionReceipt> {
        self.append(document)
            .map_err(|e| Error::Submission(format!("could not write outbox: {}", e)))?;
        tracing::debug!(
            "Queued workout for client {} on {} in {:?}",
            document.client_id,
            document.date,
            self.path
        );
        Ok(SubmissionReceipt::default())
    }
}

/// Read every queued document from an outbox file
pub fn read_outbox(path: &Path) -> Result<Vec<WorkoutSubmissionDocument>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut documents = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<WorkoutSubmissionDocument>(&line) {
            Ok(document) => documents.push(document),
            Err(e) => {
                tracing::warn!("Failed to parse outbox line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} documents from outbox", documents.len());
    Ok(documents)
}
