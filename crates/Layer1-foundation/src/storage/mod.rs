//! Storage module for permsync
//!
//! - `store`: JSON/TOML 파일 저장/로드 (설정, 권한 스냅샷)

mod store;

pub use store::{load_file, save_file, ConfigStore, FileFormat};
