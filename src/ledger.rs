//! Finished-run score records
//!
//! The ledger is append-only apart from `clear_all`, and always hands records
//! back sorted by score, best first. Equal scores keep insertion order.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (ms) when the run ended
    pub timestamp: u64,
}

/// Why a record could not be stored
#[derive(Debug)]
pub enum LedgerError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Io(e) => write!(f, "ledger I/O failed: {e}"),
            LedgerError::Serialize(e) => write!(f, "ledger encoding failed: {e}"),
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerError::Io(e) => Some(e),
            LedgerError::Serialize(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(e: std::io::Error) -> Self {
        LedgerError::Io(e)
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::Serialize(e)
    }
}

/// Persistence collaborator for finished runs
pub trait ScoreLedger: Send {
    /// Record one finished run, keeping best-first order
    fn append(&mut self, record: ScoreRecord) -> Result<(), LedgerError>;

    /// Every record, best score first. Unreadable storage loads as empty.
    fn load_all(&self) -> Vec<ScoreRecord>;

    /// Forget every record. Clearing an empty ledger succeeds.
    fn clear_all(&mut self) -> Result<(), LedgerError>;

    /// Best `n` records
    fn top(&self, n: usize) -> Vec<ScoreRecord> {
        let mut records = self.load_all();
        records.truncate(n);
        records
    }

    /// Highest record, if any
    fn best(&self) -> Option<ScoreRecord> {
        self.load_all().first().copied()
    }

    /// 1-indexed position a score would take if appended now
    fn rank_of(&self, score: u64) -> usize {
        self.load_all().iter().take_while(|r| r.score >= score).count() + 1
    }
}

/// Insert keeping descending score order, after any equal scores
fn insert_sorted(records: &mut Vec<ScoreRecord>, record: ScoreRecord) -> usize {
    let pos = records
        .iter()
        .position(|r| record.score > r.score)
        .unwrap_or(records.len());
    records.insert(pos, record);
    pos
}

/// Ledger that lives and dies with the process
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    records: Vec<ScoreRecord>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ScoreLedger for MemoryLedger {
    fn append(&mut self, record: ScoreRecord) -> Result<(), LedgerError> {
        insert_sorted(&mut self.records, record);
        Ok(())
    }

    fn load_all(&self) -> Vec<ScoreRecord> {
        self.records.clone()
    }

    fn clear_all(&mut self) -> Result<(), LedgerError> {
        self.records.clear();
        Ok(())
    }
}

/// Ledger stored as a JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileLedger {
    path: PathBuf,
}

impl JsonFileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<ScoreRecord>, LedgerError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&self.path)?;
        let mut records: Vec<ScoreRecord> = serde_json::from_str(&json)?;
        // Hand-edited files may be out of order
        records.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(records)
    }

    fn write(&self, records: &[ScoreRecord]) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(records)?;
        // Write to a sibling temp file first so a crash never leaves half a ledger
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScoreLedger for JsonFileLedger {
    fn append(&mut self, record: ScoreRecord) -> Result<(), LedgerError> {
        let mut records = self.read().unwrap_or_else(|e| {
            log::warn!("Discarding unreadable ledger {}: {e}", self.path.display());
            Vec::new()
        });
        let rank = insert_sorted(&mut records, record) + 1;
        self.write(&records)?;
        log::info!(
            "Score {} recorded at rank {} ({} entries)",
            record.score,
            rank,
            records.len()
        );
        Ok(())
    }

    fn load_all(&self) -> Vec<ScoreRecord> {
        match self.read() {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Ledger {} unreadable: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    fn clear_all(&mut self) -> Result<(), LedgerError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
