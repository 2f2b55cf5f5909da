//! # permsync-foundation
//!
//! Foundation layer for permsync:
//! - Permission: 출처 무관 권한 디스크립터, 저장 레코드, 코드 검증
//! - Config: 권한 동기화 설정 (PermissionSyncConfig)
//! - Storage: JSON/TOML 파일 저장소
//! - Event: 권한 변경 이벤트 버스
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Route Handlers (markers)      permissions.toml          │
//! │          │                            │                  │
//! │          ▼                            ▼                  │
//! │   AnnotationCatalogScanner    ConfigCatalogReader        │
//! │          └──────────┬─────────────────┘                  │
//! │                     ▼                                    │
//! │          CatalogMerger (precedence, validation)          │
//! │                     ▼                                    │
//! │   PermissionStore ─▶ PermissionDiffEngine ─▶ DiffResult  │
//! │                     ▼                                    │
//! │           SyncOrchestrator ─▶ EventBus                   │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod permission;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Permission (권한 모델)
// ============================================================================
pub use permission::{
    is_valid_code, validate_code, PermissionDescriptor, PermissionSource, PermissionType,
    StoredPermission,
};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{PermissionConfigRecord, PermissionSyncConfig, Precedence, PERMISSION_SYNC_FILE};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::{load_file, save_file, ConfigStore, FileFormat};

// ============================================================================
// Event (이벤트 시스템)
// ============================================================================
pub use event::{
    ChangeAction, EventBus, EventBusConfig, EventFilter, EventId, EventListener, ListenerId,
    PermissionChangedEvent,
};
