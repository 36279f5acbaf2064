#![forbid(unsafe_code)]

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use atelier_contracts::contact::ContactSubmissionInput;
use atelier_contracts::gallery::{Category, GalleryItemInput};
use atelier_contracts::{MonotonicTimeNs, Principal};
use atelier_storage::store::{StorageError, StudioStore};

use crate::AdapterError;

pub const JOURNAL_SCHEMA_VERSION: u8 = 1;

/// One state change, written before it is applied in memory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JournalEvent {
    OwnerClaimed {
        principal: String,
        claimed_at_ns: u64,
    },
    ContactSubmitted {
        name: String,
        email: String,
        message: String,
        submitted_at_ns: u64,
    },
    GalleryItemAdded {
        title: String,
        category: Category,
        description: String,
        image_url: String,
    },
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct JournalEntry {
    pub schema_version: u8,
    pub event: JournalEvent,
}

impl JournalEntry {
    pub fn v1(event: JournalEvent) -> Self {
        Self {
            schema_version: JOURNAL_SCHEMA_VERSION,
            event,
        }
    }
}

#[derive(Debug, Default)]
struct WriteState {
    /// Length of the last complete line when replay found a torn tail.
    /// The next append cuts the file back to it first.
    truncate_to: Option<u64>,
    /// Set when a failed append could not be rolled back. The on-disk tail
    /// is unknown, so every later append is refused.
    wedged: bool,
}

/// Append-only JSONL file backing a [`StudioStore`].
///
/// Each entry is one `write_all` of the encoded line plus `\n`, followed by
/// `sync_data`. A failed append truncates the file back to its previous
/// length, so a refused write never leaves an entry behind for replay.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
    state: Arc<Mutex<WriteState>>,
}

impl Journal {
    /// Creates the parent directory and an empty journal file if missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AdapterError> {
        let journal = Self {
            path: path.into(),
            state: Arc::new(Mutex::new(WriteState::default())),
        };
        journal.ensure_ready()?;
        Ok(journal)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_state(&self) -> MutexGuard<'_, WriteState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn io_error(&self, action: &str, err: std::io::Error) -> AdapterError {
        AdapterError::Journal(format!(
            "failed {} studio journal '{}': {}",
            action,
            self.path.display(),
            err
        ))
    }

    fn ensure_ready(&self) -> Result<(), AdapterError> {
        let path = &self.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                AdapterError::Journal(format!(
                    "failed to create studio store directory '{}': {}",
                    parent.display(),
                    err
                ))
            })?;
        }
        if !path.exists() {
            File::create(path).map_err(|err| self.io_error("creating", err))?;
        }
        Ok(())
    }

    /// Rebuilds `store` from the journal. Returns the number of events applied.
    ///
    /// Bytes after the last newline are a torn append and are skipped; the
    /// file itself is only repaired by the next [`Journal::append`]. Any
    /// complete line that is unreadable, has an unknown schema version, or
    /// is refused by the store (including a second owner claim) aborts.
    pub fn replay_into(&self, store: &mut StudioStore) -> Result<usize, AdapterError> {
        let bytes = fs::read(&self.path).map_err(|err| self.io_error("reading", err))?;
        let complete_len = bytes
            .iter()
            .rposition(|b| *b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let tail = &bytes[complete_len..];
        if !tail.is_empty() {
            tracing::warn!(
                path = %self.path.display(),
                torn_bytes = tail.len(),
                "skipping torn studio journal tail"
            );
            self.lock_state().truncate_to = Some(complete_len as u64);
        }

        let mut applied = 0usize;
        for (idx, raw) in bytes[..complete_len].split(|b| *b == b'\n').enumerate() {
            let line_no = idx + 1;
            let line = std::str::from_utf8(raw).map_err(|err| {
                AdapterError::Journal(format!(
                    "failed reading studio journal '{}' at line {}: {}",
                    self.path.display(),
                    line_no,
                    err
                ))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: JournalEntry = serde_json::from_str(line).map_err(|err| {
                AdapterError::Journal(format!(
                    "failed parsing studio journal '{}' at line {}: {}",
                    self.path.display(),
                    line_no,
                    err
                ))
            })?;
            if entry.schema_version != JOURNAL_SCHEMA_VERSION {
                return Err(AdapterError::Journal(format!(
                    "unsupported studio journal schema_version={} at line {}",
                    entry.schema_version, line_no
                )));
            }
            apply_event(store, entry.event).map_err(|err| {
                AdapterError::Journal(format!("journal replay failed at line {line_no}: {err}"))
            })?;
            applied += 1;
        }
        Ok(applied)
    }

    pub fn append(&self, event: JournalEvent) -> Result<(), AdapterError> {
        let entry = JournalEntry::v1(event);
        let mut line = serde_json::to_vec(&entry).map_err(|err| {
            AdapterError::Journal(format!("failed to encode studio journal entry: {err}"))
        })?;
        line.push(b'\n');

        let mut state = self.lock_state();
        if state.wedged {
            return Err(AdapterError::Journal(format!(
                "studio journal '{}' has an unrecoverable partial write; restart required",
                self.path.display()
            )));
        }
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|err| self.io_error("opening for append", err))?;
        if let Some(len) = state.truncate_to {
            file.set_len(len)
                .and_then(|_| file.sync_data())
                .map_err(|err| self.io_error("repairing torn tail of", err))?;
            state.truncate_to = None;
        }
        let start = file
            .metadata()
            .map(|m| m.len())
            .map_err(|err| self.io_error("inspecting", err))?;

        if let Err(err) = file.write_all(&line).and_then(|_| file.sync_data()) {
            if let Err(rollback_err) = file.set_len(start).and_then(|_| file.sync_data()) {
                state.wedged = true;
                tracing::error!(
                    path = %self.path.display(),
                    error = %rollback_err,
                    "studio journal rollback failed; refusing further appends"
                );
            }
            return Err(self.io_error("writing", err));
        }
        Ok(())
    }
}

fn apply_event(store: &mut StudioStore, event: JournalEvent) -> Result<(), String> {
    match event {
        JournalEvent::OwnerClaimed {
            principal,
            claimed_at_ns,
        } => {
            let principal = Principal::new(principal).map_err(|err| err.to_string())?;
            match store.set_owner_once(principal, MonotonicTimeNs(claimed_at_ns)) {
                Ok(()) => Ok(()),
                Err(StorageError::AppendOnlyViolation { .. }) => {
                    Err("owner already claimed earlier in the journal".to_string())
                }
                Err(err) => Err(err.to_string()),
            }
        }
        JournalEvent::ContactSubmitted {
            name,
            email,
            message,
            submitted_at_ns,
        } => {
            let input =
                ContactSubmissionInput::v1(name, email, message, MonotonicTimeNs(submitted_at_ns))
                    .map_err(|err| err.to_string())?;
            store
                .append_contact_submission(input)
                .map(|_| ())
                .map_err(|err| err.to_string())
        }
        JournalEvent::GalleryItemAdded {
            title,
            category,
            description,
            image_url,
        } => {
            let input = GalleryItemInput::v1(title, category, description, image_url)
                .map_err(|err| err.to_string())?;
            store
                .append_gallery_item(input)
                .map(|_| ())
                .map_err(|err| err.to_string())
        }
    }
}
