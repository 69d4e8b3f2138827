//! Load-once record store cache keyed on the source file's fingerprint.
//!
//! Callers use [`StoreCache::get`] to obtain the current [`RecordStore`]; the
//! cache reloads only when the file's modification time or length changes, or
//! after [`StoreCache::invalidate`]. A failed reload keeps serving the last
//! good store and records the error for display.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use sales_core::error::{Result, SalesError};
use sales_data::reader::load_sales_file;
use sales_data::store::RecordStore;

// ── Fingerprint ───────────────────────────────────────────────────────────────

/// Modification time and byte length of the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl Fingerprint {
    /// `None` when the file cannot be stat'ed.
    pub fn of(path: &Path) -> Option<Self> {
        let meta = std::fs::metadata(path).ok()?;
        Some(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

// ── StoreCache ────────────────────────────────────────────────────────────────

/// Explicit owner of the process-wide record store.
///
/// # Example
/// ```no_run
/// use sales_runtime::store_cache::StoreCache;
///
/// let mut cache = StoreCache::new("urbanmart_sales.csv");
/// if let Ok(store) = cache.get() {
///     println!("{} rows", store.len());
/// }
/// ```
#[derive(Debug)]
pub struct StoreCache {
    path: PathBuf,
    store: Option<RecordStore>,
    /// Fingerprint observed at the last load attempt.
    fingerprint: Option<Fingerprint>,
    force_reload: bool,
    loaded_at: Option<Instant>,
    last_error: Option<String>,
    /// Bumped on every successful load.
    generation: u64,
}

impl StoreCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            store: None,
            fingerprint: None,
            force_reload: false,
            loaded_at: None,
            last_error: None,
            generation: 0,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the store, loading or reloading it when the source changed.
    ///
    /// Fails only when no store has ever loaded successfully.
    pub fn get(&mut self) -> Result<&RecordStore> {
        self.ensure_loaded()?;
        self.store
            .as_ref()
            .ok_or_else(|| SalesError::Config(format!("no data loaded from {}", self.path.display())))
    }

    /// Check the source and reload when needed. Returns `true` when a new
    /// store replaced the previous one.
    pub fn refresh(&mut self) -> bool {
        let before = self.generation;
        if let Err(e) = self.ensure_loaded() {
            tracing::debug!(error = %e, "refresh found no loadable data");
        }
        self.generation != before
    }

    /// Force the next [`get`](Self::get) to reload. The current store stays
    /// available as a fallback until the reload succeeds.
    pub fn invalidate(&mut self) {
        self.force_reload = true;
        tracing::debug!("store cache invalidated");
    }

    /// The last successfully loaded store, without touching the file system.
    pub fn store(&self) -> Option<&RecordStore> {
        self.store.as_ref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Description of the last load failure, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Time since the current store was loaded.
    pub fn cache_age(&self) -> Option<Duration> {
        self.loaded_at.map(|ts| ts.elapsed())
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn is_current(&self, fingerprint: Option<Fingerprint>) -> bool {
        self.store.is_some() && !self.force_reload && self.fingerprint == fingerprint
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        let current = Fingerprint::of(&self.path);
        if self.is_current(current) {
            return Ok(());
        }

        self.fingerprint = current;
        self.force_reload = false;

        match load_sales_file(&self.path) {
            Ok(store) => {
                tracing::debug!(
                    rows = store.len(),
                    skipped = store.report().rows_skipped(),
                    "record store loaded"
                );
                self.store = Some(store);
                self.loaded_at = Some(Instant::now());
                self.last_error = None;
                self.generation += 1;
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                if self.store.is_some() {
                    tracing::warn!(error = %e, "reload failed; keeping previous data");
                    Ok(())
                } else {
                    tracing::warn!(error = %e, "initial load failed");
                    Err(e)
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
