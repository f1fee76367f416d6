//! Engine facade: operation entry points, serialization, cancellation
//!
//! Each long-running operation runs on its own spawned task and streams
//! progress over a bounded channel returned next to the task's join handle.
//! A root-scoped lock serializes the operation classes: concurrent moves and
//! catalog writes against the same paths would race.

use crate::path_template::{PathTemplate, TemplateValidation, DEFAULT_TEMPLATE};
use crate::types::{
    BulkImportProgress, BulkImportSummary, DiscoverProgress, DiscoveredFolder, ImportRequest,
    ImportResult, RelocationPreview, RelocationProgress, RelocationSummary, RescanSummary,
    ScanProgress,
};
use crate::{importer, relocator, rescan, scanner, Result, SyncError};
use folio_core::types::{AppSettings, WorkMetadata};
use folio_core::{CatalogStore, SettingsProvider};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// Capacity of progress channels; senders back off when a consumer lags
pub(crate) const PROGRESS_CHANNEL_CAPACITY: usize = 100;

/// Cooperative cancellation signal shared with a running operation
///
/// Operations check the flag before starting each item and before their
/// terminal event; an item already mid-transfer completes first, so no
/// partially written files are left behind. A cancelled operation emits no
/// further events and its task resolves to `SyncError::Cancelled`.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Library synchronization engine
///
/// Explicitly constructed with its collaborators; holds no global state.
/// Only one of discovery, import, relocation, or rescan runs against the
/// library root at a time, and batch items are processed strictly
/// sequentially so failures stay attributable to a single item.
pub struct SyncEngine {
    store: Arc<dyn CatalogStore>,
    settings: Arc<dyn SettingsProvider>,
    op_lock: Arc<Mutex<()>>,
}

impl SyncEngine {
    /// Create an engine over a catalog store and a settings provider
    pub fn new(store: Arc<dyn CatalogStore>, settings: Arc<dyn SettingsProvider>) -> Self {
        Self {
            store,
            settings,
            op_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn settings_with_root(&self) -> Result<(AppSettings, PathBuf)> {
        let settings = self.settings.app_settings().await?;
        let root = settings.library_root.clone().ok_or_else(|| {
            SyncError::Configuration("library root is not configured".to_string())
        })?;
        Ok((settings, root))
    }

    fn template_from(settings: &AppSettings) -> PathTemplate {
        PathTemplate::new(
            settings
                .directory_template
                .as_deref()
                .unwrap_or(DEFAULT_TEMPLATE),
        )
    }

    /// Validate a directory template string
    pub fn validate_template(&self, template: &str) -> TemplateValidation {
        PathTemplate::new(template).validate()
    }

    /// Render the destination an import with this metadata would use,
    /// without touching the filesystem
    pub async fn preview_import_path(&self, metadata: &WorkMetadata) -> Result<PathBuf> {
        let (settings, root) = self.settings_with_root().await?;
        let relative = Self::template_from(&settings).render(metadata)?;
        Ok(root.join(relative))
    }

    /// Discover importable folders under `root`
    ///
    /// Streams `DiscoverProgress` and resolves to the list of candidates.
    /// Fails immediately, before any event is emitted, when no library root
    /// is configured or `root` is not a directory.
    pub async fn discover(
        &self,
        root: impl Into<PathBuf>,
        cancel: CancelFlag,
    ) -> Result<(
        mpsc::Receiver<DiscoverProgress>,
        JoinHandle<Result<Vec<DiscoveredFolder>>>,
    )> {
        let (_, library_root) = self.settings_with_root().await?;
        let root = root.into();
        if !root.is_dir() {
            return Err(SyncError::InvalidSource(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        let registered: HashSet<PathBuf> = self
            .store
            .list_works()
            .await?
            .into_iter()
            .map(|work| work.path)
            .collect();

        let (tx, rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);
        let guard = self.op_lock.clone().lock_owned().await;
        let handle = tokio::spawn(async move {
            let _guard = guard;
            scanner::run_discovery(root, library_root, registered, cancel, tx).await
        });

        Ok((rx, handle))
    }

    /// Import one work into managed storage
    pub async fn import_one(&self, request: ImportRequest) -> Result<ImportResult> {
        let settings = self.settings.app_settings().await?;
        let _guard = self.op_lock.lock().await;
        importer::import_one(self.store.as_ref(), &settings, &request).await
    }

    /// Import a batch of works, streaming progress
    ///
    /// Per-item failures are absorbed into the summary's `failed` count; the
    /// terminal event is always `Completed` unless the batch is cancelled.
    pub async fn import_bulk(
        &self,
        requests: Vec<ImportRequest>,
        cancel: CancelFlag,
    ) -> Result<(
        mpsc::Receiver<BulkImportProgress>,
        JoinHandle<Result<BulkImportSummary>>,
    )> {
        let (settings, _) = self.settings_with_root().await?;

        let (tx, rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);
        let guard = self.op_lock.clone().lock_owned().await;
        let store = self.store.clone();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            importer::run_bulk_import(store, settings, requests, cancel, tx).await
        });

        Ok((rx, handle))
    }

    /// Compute the relocation plan a template would produce, without moving
    /// anything
    pub async fn preview_relocation(&self, template: &str) -> Result<Vec<RelocationPreview>> {
        let (_, root) = self.settings_with_root().await?;

        let template = PathTemplate::new(template);
        template.ensure_valid()?;

        let works = self.store.list_works().await?;
        relocator::compute_relocation_plan(&works, &root, &template)
    }

    /// Relocate the library under a new template, streaming progress
    pub async fn commit_relocation(
        &self,
        template: impl Into<String>,
        cancel: CancelFlag,
    ) -> Result<(
        mpsc::Receiver<RelocationProgress>,
        JoinHandle<Result<RelocationSummary>>,
    )> {
        let (_, root) = self.settings_with_root().await?;
        let template = template.into();

        let (tx, rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);
        let guard = self.op_lock.clone().lock_owned().await;
        let store = self.store.clone();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            relocator::run_relocation(store, root, template, cancel, tx).await
        });

        Ok((rx, handle))
    }

    /// Reconcile the catalog with the managed root, streaming progress
    pub async fn rescan(
        &self,
        cancel: CancelFlag,
    ) -> Result<(mpsc::Receiver<ScanProgress>, JoinHandle<Result<RescanSummary>>)> {
        let (_, root) = self.settings_with_root().await?;

        let (tx, rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);
        let guard = self.op_lock.clone().lock_owned().await;
        let store = self.store.clone();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            rescan::run_rescan(store, root, cancel, tx).await
        });

        Ok((rx, handle))
    }
}
