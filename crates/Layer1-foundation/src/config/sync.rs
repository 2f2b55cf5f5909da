//! Permission Sync Config - 권한 동기화 설정
//!
//! ```toml
//! enabled = true
//! precedence = "config-over-annotation"
//! strictValidation = true
//! emitItemEvents = false
//!
//! [[permissions]]
//! code = "SYSTEM_MANAGE"
//! name = "System"
//! type = "MENU"
//! path = "/system"
//! icon = "setting"
//! sort = 1
//! ```

use crate::permission::PermissionType;
use crate::storage::{load_file, ConfigStore};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 설정 파일명
pub const PERMISSION_SYNC_FILE: &str = "permissions.toml";

// ============================================================================
// Precedence
// ============================================================================

/// "all" 동기화 시 같은 코드가 양쪽에 있을 때의 우선순위
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Precedence {
    /// 설정 파일이 어노테이션을 덮어씀
    ConfigOverAnnotation,
    /// 어노테이션이 설정 파일을 덮어씀
    AnnotationOverConfig,
}

impl Default for Precedence {
    fn default() -> Self {
        Self::ConfigOverAnnotation
    }
}

// ============================================================================
// PermissionConfigRecord
// ============================================================================

/// 설정 파일에 선언된 권한 한 건 (모든 필드 선택)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionConfigRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub permission_type: Option<PermissionType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
}

impl PermissionConfigRecord {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn permission_type(mut self, permission_type: PermissionType) -> Self {
        self.permission_type = Some(permission_type);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn sort(mut self, sort: i32) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn parent_code(mut self, parent: impl Into<String>) -> Self {
        self.parent_code = Some(parent.into());
        self
    }
}

// ============================================================================
// PermissionSyncConfig
// ============================================================================

/// 권한 동기화 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSyncConfig {
    /// 동기화 활성화 여부
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// 병합 우선순위
    #[serde(default)]
    pub precedence: Precedence,

    /// 빈 코드/형식 오류/중복 코드를 거부 (false면 그대로 통과)
    #[serde(default = "default_true")]
    pub strict_validation: bool,

    /// 항목별 CREATE/UPDATE/DELETE 이벤트 발행 여부
    #[serde(default)]
    pub emit_item_events: bool,

    /// 선언된 권한 목록 (순서 유지)
    #[serde(default)]
    pub permissions: Vec<PermissionConfigRecord>,
}

impl Default for PermissionSyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            precedence: Precedence::default(),
            strict_validation: true,
            emit_item_events: false,
            permissions: Vec::new(),
        }
    }
}

impl PermissionSyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// 지정 파일에서 로드
    pub fn load_from(path: &Path) -> Result<Self> {
        load_file(path)
    }

    /// 글로벌 + 프로젝트 병합 로드
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        if let Ok(global) = ConfigStore::global() {
            if let Some(global_config) = global.load_optional::<Self>(PERMISSION_SYNC_FILE)? {
                config.merge(global_config);
            }
        }

        if let Ok(project) = ConfigStore::current_project() {
            if let Some(project_config) = project.load_optional::<Self>(PERMISSION_SYNC_FILE)? {
                config.merge(project_config);
            }
        }

        Ok(config)
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 다른 설정과 병합 (other가 우선, 권한 목록은 비어있지 않을 때만 교체)
    pub fn merge(&mut self, other: PermissionSyncConfig) {
        self.enabled = other.enabled;
        self.precedence = other.precedence;
        self.strict_validation = other.strict_validation;
        self.emit_item_events = other.emit_item_events;
        if !other.permissions.is_empty() {
            self.permissions = other.permissions;
        }
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    pub fn emit_item_events(mut self, emit: bool) -> Self {
        self.emit_item_events = emit;
        self
    }

    pub fn permission(mut self, record: PermissionConfigRecord) -> Self {
        self.permissions.push(record);
        self
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
precedence = "annotation-over-config"
emitItemEvents = true

[[permissions]]
code = "SYSTEM_MANAGE"
name = "System"
description = "System management"
type = "MENU"
path = "/system"
icon = "setting"
sort = 1

[[permissions]]
code = "USER_CREATE"
type = "BUTTON"
parentCode = "USER_MANAGE"
"#;

    #[test]
    fn test_parse_toml() {
        let config: PermissionSyncConfig = toml::from_str(SAMPLE).unwrap();

        assert!(config.enabled);
        assert!(config.strict_validation);
        assert!(config.emit_item_events);
        assert_eq!(config.precedence, Precedence::AnnotationOverConfig);
        assert_eq!(config.permissions.len(), 2);

        let first = &config.permissions[0];
        assert_eq!(first.code.as_deref(), Some("SYSTEM_MANAGE"));
        assert_eq!(first.permission_type, Some(PermissionType::Menu));
        assert_eq!(first.sort, Some(1));
        assert!(first.parent_code.is_none());

        let second = &config.permissions[1];
        assert_eq!(second.parent_code.as_deref(), Some("USER_MANAGE"));
        assert!(second.path.is_none());
        assert!(second.icon.is_none());
    }

    #[test]
    fn test_unknown_type_rejected_at_load() {
        let bad = "[[permissions]]\ncode = \"X_Y\"\ntype = \"WIDGET\"\n";
        assert!(toml::from_str::<PermissionSyncConfig>(bad).is_err());
    }

    #[test]
    fn test_merge_keeps_permissions_when_other_empty() {
        let mut base = PermissionSyncConfig::new().permission(PermissionConfigRecord::new("A_A"));
        base.merge(PermissionSyncConfig::new().strict_validation(false));

        assert!(!base.strict_validation);
        assert_eq!(base.permissions.len(), 1);

        base.merge(PermissionSyncConfig::new().permission(PermissionConfigRecord::new("B_B")));
        assert_eq!(base.permissions[0].code.as_deref(), Some("B_B"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PERMISSION_SYNC_FILE);
        std::fs::write(&path, SAMPLE).unwrap();

        let config = PermissionSyncConfig::load_from(&path).unwrap();
        assert_eq!(config.permissions.len(), 2);
    }
}
