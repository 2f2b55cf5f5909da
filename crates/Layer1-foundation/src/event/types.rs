//! Event Types - 권한 변경 알림 이벤트 정의
//!
//! 동기화 한 번마다 SYNC 이벤트 하나가 발행되고, 설정에 따라
//! 항목별 CREATE/UPDATE/DELETE 이벤트가 함께 발행됩니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Event ID
// ============================================================================

/// 이벤트 고유 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

impl EventId {
    /// 새 이벤트 ID 생성
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Change Action
// ============================================================================

/// 변경 액션 태그
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
    Sync,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Sync => "SYNC",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PermissionChangedEvent
// ============================================================================

/// 권한 변경 이벤트
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionChangedEvent {
    /// 이벤트 ID
    pub id: EventId,

    /// 대상 권한 ID (저장 ID가 없으면 코드, SYNC 이벤트는 None)
    pub permission_id: Option<String>,

    /// 액션 태그
    pub action: ChangeAction,

    /// 작업자 ID
    pub operator_id: i64,

    /// 설명
    pub description: String,

    /// 발생 시간
    pub timestamp: DateTime<Utc>,
}

impl PermissionChangedEvent {
    /// 새 이벤트 생성
    pub fn new(action: ChangeAction, operator_id: i64) -> Self {
        Self {
            id: EventId::new(),
            permission_id: None,
            action,
            operator_id,
            description: String::new(),
            timestamp: Utc::now(),
        }
    }

    /// 대상 권한 설정
    pub fn with_permission(mut self, permission_id: impl Into<String>) -> Self {
        self.permission_id = Some(permission_id.into());
        self
    }

    /// 설명 설정
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

// ============================================================================
// 사전 정의된 이벤트
// ============================================================================

/// 권한 생성 이벤트
pub fn created(permission_id: &str, code: &str, operator_id: i64) -> PermissionChangedEvent {
    PermissionChangedEvent::new(ChangeAction::Create, operator_id)
        .with_permission(permission_id)
        .with_description(format!("permission {} created by sync", code))
}

/// 권한 수정 이벤트
pub fn updated(
    permission_id: &str,
    code: &str,
    fields: &[&str],
    operator_id: i64,
) -> PermissionChangedEvent {
    PermissionChangedEvent::new(ChangeAction::Update, operator_id)
        .with_permission(permission_id)
        .with_description(format!(
            "permission {} updated by sync ({})",
            code,
            fields.join(", ")
        ))
}

/// 권한 삭제 이벤트
pub fn deleted(permission_id: &str, code: &str, operator_id: i64) -> PermissionChangedEvent {
    PermissionChangedEvent::new(ChangeAction::Delete, operator_id)
        .with_permission(permission_id)
        .with_description(format!("permission {} removed by sync", code))
}

/// 동기화 완료 이벤트
pub fn synced(
    source: &str,
    created: usize,
    updated: usize,
    deleted: usize,
    operator_id: i64,
) -> PermissionChangedEvent {
    PermissionChangedEvent::new(ChangeAction::Sync, operator_id).with_description(format!(
        "permission sync from {}: {} created, {} updated, {} deleted",
        source, created, updated, deleted
    ))
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id() {
        let id1 = EventId::new();
        let id2 = EventId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_sync_event() {
        let event = synced("all", 3, 1, 0, 1);
        assert_eq!(event.action, ChangeAction::Sync);
        assert_eq!(event.operator_id, 1);
        assert!(event.permission_id.is_none());
        assert!(event.description.contains("3 created"));
    }

    #[test]
    fn test_item_events() {
        let event = updated("12", "test:read", &["name", "path"], 2);
        assert_eq!(event.action, ChangeAction::Update);
        assert_eq!(event.permission_id.as_deref(), Some("12"));
        assert!(event.description.ends_with("(name, path)"));

        assert_eq!(created("x:y", "x:y", 1).action, ChangeAction::Create);
        assert_eq!(deleted("5", "x:y", 1).action, ChangeAction::Delete);
    }

    #[test]
    fn test_wire_shape() {
        let event = created("7", "test:read", 3);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "CREATE");
        assert_eq!(json["permissionId"], "7");
        assert_eq!(json["operatorId"], 3);
    }
}
