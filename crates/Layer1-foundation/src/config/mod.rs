//! Config - 설정 관리
//!
//! - `sync.rs` - 권한 동기화 설정 (PermissionSyncConfig)

mod sync;

pub use sync::{PermissionConfigRecord, PermissionSyncConfig, Precedence, PERMISSION_SYNC_FILE};
