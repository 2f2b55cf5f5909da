//! Sync Orchestrator - 카탈로그 수집, 병합, 비교, 반영, 이벤트 발행
//!
//! ```text
//! sync(source, operator)
//!   ├─ scan / read          (source 선택)
//!   ├─ CatalogMerger        (우선순위, 검증)
//!   ├─ PermissionStore      (현재 권한 조회)
//!   ├─ PermissionDiffEngine (변경 계획)
//!   ├─ PermissionStore      (계획 반영)
//!   └─ EventBus             (항목 이벤트 + SYNC 이벤트 1건)
//! ```

use permsync_foundation::event::{created, deleted, synced, updated};
use permsync_foundation::{Error, EventBus, PermissionSyncConfig, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::diff::{DiffResult, PermissionDiffEngine};
use crate::merge::{CatalogMerger, MergeConflict, MergeOutcome};
use crate::reader::ConfigCatalogReader;
use crate::scanner::AnnotationCatalogScanner;
use crate::store::{AppliedChanges, PermissionStore};

// ============================================================================
// SyncSource
// ============================================================================

/// 동기화 대상 카탈로그
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncSource {
    Annotation,
    Config,
    All,
}

impl SyncSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Annotation => "annotation",
            Self::Config => "config",
            Self::All => "all",
        }
    }

    fn includes_annotation(&self) -> bool {
        matches!(self, Self::Annotation | Self::All)
    }

    fn includes_config(&self) -> bool {
        matches!(self, Self::Config | Self::All)
    }
}

impl fmt::Display for SyncSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annotation" => Ok(Self::Annotation),
            "config" => Ok(Self::Config),
            "all" => Ok(Self::All),
            other => Err(Error::InvalidInput(format!(
                "unknown sync source '{}' (expected annotation, config or all)",
                other
            ))),
        }
    }
}

// ============================================================================
// SyncReport
// ============================================================================

/// 동기화 실행 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub source: SyncSource,
    pub operator_id: i64,
    /// 설정에서 비활성화되어 아무것도 하지 않았음
    pub skipped: bool,
    pub conflicts: Vec<MergeConflict>,
    pub applied: AppliedChanges,
    pub events_published: usize,
}

impl SyncReport {
    fn skipped(source: SyncSource, operator_id: i64) -> Self {
        Self {
            source,
            operator_id,
            skipped: true,
            conflicts: Vec::new(),
            applied: AppliedChanges::default(),
            events_published: 0,
        }
    }

    pub fn created(&self) -> usize {
        self.applied.created.len()
    }

    pub fn updated(&self) -> usize {
        self.applied.updated.len()
    }

    pub fn deleted(&self) -> usize {
        self.applied.deleted.len()
    }

    pub fn total_changes(&self) -> usize {
        self.created() + self.updated() + self.deleted()
    }
}

// ============================================================================
// SyncOrchestrator
// ============================================================================

/// 권한 동기화 오케스트레이터
pub struct SyncOrchestrator {
    scanner: AnnotationCatalogScanner,
    reader: ConfigCatalogReader,
    store: Arc<dyn PermissionStore>,
    events: Arc<EventBus>,
    config: PermissionSyncConfig,
    engine: PermissionDiffEngine,
    // 동시 sync 직렬화
    sync_lock: Mutex<()>,
}

impl SyncOrchestrator {
    pub fn new(
        scanner: AnnotationCatalogScanner,
        reader: ConfigCatalogReader,
        store: Arc<dyn PermissionStore>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            scanner,
            reader,
            store,
            events,
            config: PermissionSyncConfig::default(),
            engine: PermissionDiffEngine::new(),
            sync_lock: Mutex::new(()),
        }
    }

    /// 동기화 동작 설정 (enabled, precedence, strict, item events)
    pub fn with_config(mut self, config: PermissionSyncConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PermissionSyncConfig {
        &self.config
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn store(&self) -> &Arc<dyn PermissionStore> {
        &self.store
    }

    /// 선택한 카탈로그 수집 및 병합
    pub fn collect(&self, source: SyncSource) -> Result<MergeOutcome> {
        collect_catalogs(
            &self.scanner,
            &self.reader,
            CatalogMerger::from_config(&self.config),
            source,
        )
    }

    // 설정 소스가 파일을 동기 I/O로 읽으므로 blocking 스레드에서 수집
    async fn collect_blocking(&self, source: SyncSource) -> Result<MergeOutcome> {
        let scanner = self.scanner.clone();
        let reader = self.reader.clone();
        let merger = CatalogMerger::from_config(&self.config);

        tokio::task::spawn_blocking(move || collect_catalogs(&scanner, &reader, merger, source))
            .await
            .map_err(|e| Error::Internal(format!("catalog collection task failed: {}", e)))?
    }

    /// 반영 없이 변경 계획만 계산
    pub async fn preview(&self, source: SyncSource) -> Result<DiffResult> {
        let outcome = self.collect_blocking(source).await?;
        let existing = self.store.all_permissions().await?;
        Ok(self.engine.compute(&existing, &outcome.descriptors))
    }

    /// 문자열 source로 동기화 ("annotation" | "config" | "all")
    pub async fn sync_named(&self, source: &str, operator_id: i64) -> Result<SyncReport> {
        self.sync(source.parse()?, operator_id).await
    }

    /// 동기화 실행
    pub async fn sync(&self, source: SyncSource, operator_id: i64) -> Result<SyncReport> {
        let _guard = self.sync_lock.lock().await;

        if !self.config.enabled {
            warn!(source = %source, "Permission sync disabled by configuration");
            return Ok(SyncReport::skipped(source, operator_id));
        }

        info!(source = %source, operator_id, "Starting permission sync");

        let outcome = self.collect_blocking(source).await?;
        let existing = self.store.all_permissions().await?;
        let plan = self.engine.compute(&existing, &outcome.descriptors);

        let applied = if plan.is_empty() {
            AppliedChanges::default()
        } else {
            self.store.apply_plan(&plan).await?
        };

        let events_published = self.publish(source, &applied, operator_id).await;

        let report = SyncReport {
            source,
            operator_id,
            skipped: false,
            conflicts: outcome.conflicts,
            applied,
            events_published,
        };

        info!(
            source = %source,
            created = report.created(),
            updated = report.updated(),
            deleted = report.deleted(),
            "Permission sync complete"
        );

        Ok(report)
    }

    async fn publish(&self, source: SyncSource, applied: &AppliedChanges, operator_id: i64) -> usize {
        let mut count = 0;

        if self.config.emit_item_events {
            for permission in &applied.created {
                self.events
                    .publish(created(&permission.event_key(), &permission.code, operator_id))
                    .await;
                count += 1;
            }
            for update in &applied.updated {
                let permission = &update.permission;
                let fields: Vec<&str> = update.changed.iter().map(|f| f.as_str()).collect();
                self.events
                    .publish(updated(&permission.event_key(), &permission.code, &fields, operator_id))
                    .await;
                count += 1;
            }
            for permission in &applied.deleted {
                self.events
                    .publish(deleted(&permission.event_key(), &permission.code, operator_id))
                    .await;
                count += 1;
            }
        }

        self.events
            .publish(synced(
                source.as_str(),
                applied.created.len(),
                applied.updated.len(),
                applied.deleted.len(),
                operator_id,
            ))
            .await;

        count + 1
    }
}

fn collect_catalogs(
    scanner: &AnnotationCatalogScanner,
    reader: &ConfigCatalogReader,
    merger: CatalogMerger,
    source: SyncSource,
) -> Result<MergeOutcome> {
    let annotation = if source.includes_annotation() {
        scanner.scan()
    } else {
        Vec::new()
    };
    let config = if source.includes_config() {
        reader.read()?
    } else {
        Vec::new()
    };

    merger.merge(annotation, config)
}
