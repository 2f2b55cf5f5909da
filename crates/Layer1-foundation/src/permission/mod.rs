//! Permission catalog model for permsync
//!
//! - `types`: 출처 무관 권한 디스크립터 (PermissionDescriptor)
//! - `stored`: 저장소 권한 레코드 (StoredPermission)
//! - `code`: 권한 코드 형식 검증
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use permsync_foundation::permission::{PermissionDescriptor, PermissionSource, PermissionType};
//!
//! let desc = PermissionDescriptor::new("SYSTEM_MANAGE", PermissionSource::Config)
//!     .name("System")
//!     .permission_type(PermissionType::Menu)
//!     .path("/system");
//! ```

mod code;
mod stored;
mod types;

pub use code::{is_valid_code, validate_code, CODE_MAX_LEN, CODE_MIN_LEN};
pub use stored::StoredPermission;
pub use types::{PermissionDescriptor, PermissionSource, PermissionType};
