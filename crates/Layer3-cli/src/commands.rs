//! Subcommand implementations
//!
//! CLI에는 등록된 라우트 핸들러가 없으므로 annotation 카탈로그는 비어 있다.

use anyhow::{Context, Result};
use permsync_foundation::{EventBus, PermissionSyncConfig};
use permsync_sync::{
    AnnotationCatalogScanner, ConfigCatalogReader, HandlerRegistry,
    InMemoryPermissionStore, PermissionSnapshot, SyncOrchestrator, SyncSource,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 설정 로드 (파일 지정 시 해당 파일, 아니면 글로벌 + 프로젝트)
pub fn load_config(path: Option<&Path>) -> Result<PermissionSyncConfig> {
    match path {
        Some(path) => PermissionSyncConfig::load_from(path)
            .with_context(|| format!("loading permission config {}", path.display())),
        None => PermissionSyncConfig::load().context("loading permission config"),
    }
}

fn load_store(existing: Option<&Path>) -> Result<InMemoryPermissionStore> {
    let snapshot = match existing {
        Some(path) => PermissionSnapshot::load(path)
            .with_context(|| format!("loading snapshot {}", path.display()))?,
        None => PermissionSnapshot::default(),
    };
    info!(count = snapshot.permissions.len(), "Loaded stored permissions");
    Ok(InMemoryPermissionStore::from_snapshot(snapshot)?)
}

fn orchestrator(config: PermissionSyncConfig, store: Arc<InMemoryPermissionStore>) -> SyncOrchestrator {
    let settings = config.clone();
    SyncOrchestrator::new(
        AnnotationCatalogScanner::new(Arc::new(HandlerRegistry::new())),
        ConfigCatalogReader::new(Arc::new(config)),
        store,
        Arc::new(EventBus::new()),
    )
    .with_config(settings)
}

/// 검증된 설정 카탈로그
pub fn catalog(config: PermissionSyncConfig) -> Result<Value> {
    let outcome = orchestrator(config, Arc::new(InMemoryPermissionStore::new()))
        .collect(SyncSource::Config)?;
    Ok(serde_json::to_value(outcome.descriptors)?)
}

/// 변경 계획 (저장소는 바뀌지 않음)
pub async fn diff(config: PermissionSyncConfig, existing: Option<&Path>) -> Result<Value> {
    let store = Arc::new(load_store(existing)?);
    let plan = orchestrator(config, store)
        .preview(SyncSource::Config)
        .await?;
    Ok(serde_json::to_value(plan)?)
}

/// 동기화 실행 후 보고서와 발행된 이벤트 출력
pub async fn sync(
    config: PermissionSyncConfig,
    existing: Option<&Path>,
    source: &str,
    operator_id: i64,
    out: Option<&Path>,
) -> Result<Value> {
    let store = Arc::new(load_store(existing)?);
    let orch = orchestrator(config, store.clone());

    let report = orch.sync_named(source, operator_id).await?;

    let mut events = orch.events().history(None).await;
    events.reverse();

    if let Some(out) = out {
        store
            .snapshot()
            .await
            .save(out)
            .with_context(|| format!("writing snapshot {}", out.display()))?;
        info!(path = %out.display(), "Snapshot written");
    }

    Ok(json!({
        "report": report,
        "events": events,
    }))
}
