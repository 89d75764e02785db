//! Immutable project snapshots, copy-on-write overlays, and the
//! memoizing caches behind them.
//!
//! A `Project` is a frozen view of file contents. Its semantic bundle is
//! computed at most once, behind single-flight coalescing: concurrent
//! readers of an unbuilt bundle wait for the one in-flight build instead
//! of duplicating it. A file change never patches a snapshot; it creates
//! a new one with fresh caches, and in-flight queries against the old
//! snapshot keep running against the old immutable values.

use crate::error::{SemaError, SemaResult};
use crate::semantic::Semantics;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// What the frontend oracle produced for one snapshot. A non-`None`
/// bundle alongside a non-`None` error is best-effort partial data and
/// must not be discarded.
pub struct AnalysisOutcome {
    pub semantics: Option<Arc<Semantics>>,
    pub error: Option<SemaError>,
}

/// The external parser/type-checker. This crate never parses source
/// itself; it consumes whatever the oracle returns, partial or not.
pub trait Frontend: Send + Sync {
    fn analyze(&self, files: &BTreeMap<String, Arc<[u8]>>) -> AnalysisOutcome;
}

/// Opaque value stored in the typed cache.
pub type CacheValue = Arc<dyn Any + Send + Sync>;

/// Builder invoked at most once per (kind, key) pair per snapshot.
pub type CacheBuilder = Arc<dyn Fn(&Project, &str) -> SemaResult<CacheValue> + Send + Sync>;

type CacheCell = Arc<OnceLock<Result<CacheValue, SemaError>>>;

/// An immutable snapshot of project file contents plus its memoized
/// semantic state.
pub struct Project {
    files: BTreeMap<String, Arc<[u8]>>,
    frontend: Arc<dyn Frontend>,
    sema: OnceLock<(Option<Arc<Semantics>>, Option<SemaError>)>,
    /// Builder registry, shared across snapshots: registering a cache
    /// kind is program wiring, not snapshot state.
    builders: Arc<RwLock<HashMap<&'static str, CacheBuilder>>>,
    /// Per-snapshot cache entries. The OnceLock inside each cell gives
    /// the single-flight guarantee per (kind, key).
    cache: DashMap<(&'static str, String), CacheCell>,
}

impl Project {
    pub fn new(
        frontend: Arc<dyn Frontend>,
        files: impl IntoIterator<Item = (String, Arc<[u8]>)>,
    ) -> Self {
        Self {
            files: files.into_iter().collect(),
            frontend,
            sema: OnceLock::new(),
            builders: Arc::new(RwLock::new(HashMap::new())),
            cache: DashMap::new(),
        }
    }

    /// Content of one file, or `None` when the path is unknown.
    pub fn file_content(&self, path: &str) -> Option<Arc<[u8]>> {
        self.files.get(path).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Enumerate file paths; the visitor returns `false` to stop early.
    pub fn range_files(&self, mut visit: impl FnMut(&str) -> bool) {
        for path in self.files.keys() {
            if !visit(path) {
                return;
            }
        }
    }

    /// A new snapshot with `overlay` contents layered over this one.
    /// The receiver is untouched; the new snapshot starts with empty
    /// caches and an unbuilt semantic bundle.
    pub fn snapshot_with_overlay(
        &self,
        overlay: impl IntoIterator<Item = (String, Arc<[u8]>)>,
    ) -> Self {
        let mut files = self.files.clone();
        for (path, content) in overlay {
            files.insert(path, content);
        }
        Self {
            files,
            frontend: self.frontend.clone(),
            sema: OnceLock::new(),
            builders: self.builders.clone(),
            cache: DashMap::new(),
        }
    }

    /// The semantic bundle for this snapshot, building it on first use.
    ///
    /// Concurrent callers before the first build are coalesced onto one
    /// frontend invocation. A frontend panic is contained here and
    /// surfaced as [`SemaError::FrontendPanic`]; it never crosses to the
    /// caller as an unwind.
    pub fn semantics(&self) -> (Option<Arc<Semantics>>, Option<SemaError>) {
        let (sema, err) = self.sema.get_or_init(|| {
            debug!(files = self.files.len(), "building semantic bundle");
            match catch_unwind(AssertUnwindSafe(|| self.frontend.analyze(&self.files))) {
                Ok(outcome) => (outcome.semantics, outcome.error),
                Err(payload) => {
                    let message = payload
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    (None, Some(SemaError::FrontendPanic { message }))
                }
            }
        });
        (sema.clone(), err.clone())
    }

    /// The semantic bundle when one was produced, partial or not.
    pub fn semantics_ok(&self) -> Option<Arc<Semantics>> {
        self.semantics().0
    }

    /// Install the builder for a cache kind. Later registrations for the
    /// same kind replace the builder for entries not yet built.
    pub fn register_cache(&self, kind: &'static str, builder: CacheBuilder) {
        self.builders.write().insert(kind, builder);
    }

    /// Memoized per-(kind, key) value. Querying a kind with no
    /// registered builder is a distinguished, recoverable error —
    /// register the builder and retry. A builder failure is memoized and
    /// replayed to every later caller of the same entry.
    pub fn typed_cache(&self, kind: &'static str, key: &str) -> SemaResult<CacheValue> {
        let Some(builder) = self.builders.read().get(kind).cloned() else {
            return Err(SemaError::UnknownCacheKind { kind });
        };
        let cell = self
            .cache
            .entry((kind, key.to_string()))
            .or_default()
            .clone();
        cell.get_or_init(|| {
            builder(self, key).map_err(|e| SemaError::CacheBuildFailed {
                kind,
                key: key.to_string(),
                reason: e.to_string(),
            })
        })
        .clone()
    }
}
