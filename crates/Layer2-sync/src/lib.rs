//! permsync-sync: Permission Synchronization
//!
//! Layer2 - 권한 카탈로그 수집/비교/반영 레이어
//!
//! # 주요 모듈
//!
//! - `scanner`: 핸들러가 선언한 권한 마커 수집 (AnnotationCatalogScanner)
//! - `reader`: 설정 파일 권한 선언 읽기 (ConfigCatalogReader)
//! - `merge`: 두 카탈로그 병합과 코드 검증 (CatalogMerger)
//! - `diff`: 저장된 권한과의 차이 계산 (PermissionDiffEngine)
//! - `store`: 권한 저장소 trait과 메모리 구현
//! - `orchestrator`: 전체 동기화 실행과 이벤트 발행 (SyncOrchestrator)
//!
//! # 사용 예시
//!
//! ```ignore
//! use permsync_sync::*;
//!
//! let registry = Arc::new(HandlerRegistry::new());
//! registry.register(
//!     HandlerKind::Rest,
//!     Arc::new(DeclaredHandler::new("ArchiveController")
//!         .method("list", PermissionMarker::new("archive:read"))),
//! );
//!
//! let orchestrator = SyncOrchestrator::new(
//!     AnnotationCatalogScanner::new(registry),
//!     ConfigCatalogReader::new(Arc::new(FileConfigSource::new("permissions.toml"))),
//!     Arc::new(InMemoryPermissionStore::new()),
//!     Arc::new(EventBus::new()),
//! );
//!
//! let report = orchestrator.sync(SyncSource::All, operator_id).await?;
//! ```

pub mod diff;
pub mod merge;
pub mod orchestrator;
pub mod reader;
pub mod scanner;
pub mod store;

// Re-exports: Scanner
pub use scanner::{
    AnnotationCatalogScanner, DeclaredHandler, HandlerKind, HandlerPermissions, HandlerRegistry,
    MethodPermission, PermissionHandler, PermissionMarker,
};

// Re-exports: Reader
pub use reader::{ConfigCatalogReader, ConfigSource, FileConfigSource};

// Re-exports: Merge
pub use merge::{CatalogMerger, MergeConflict, MergeOutcome};

// Re-exports: Diff
pub use diff::{changed_fields, compute_diff, ChangedField, DiffResult, PermissionDiffEngine, PermissionUpdate};

// Re-exports: Store
pub use store::{
    AppliedChanges, AppliedUpdate, InMemoryPermissionStore, PermissionSnapshot, PermissionStore,
};

// Re-exports: Orchestrator
pub use orchestrator::{SyncOrchestrator, SyncReport, SyncSource};
