//! 저장된 권한 레코드
//!
//! 영속 계층이 소유하며 코어는 읽기 전용으로 소비한다.

use serde::{Deserialize, Serialize};

use super::types::{PermissionDescriptor, PermissionType};

/// 저장소의 권한 한 건
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPermission {
    /// 저장소 ID (아직 저장되지 않았으면 None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub code: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default, rename = "type")]
    pub permission_type: Option<PermissionType>,

    #[serde(default)]
    pub sort: Option<i32>,

    #[serde(default)]
    pub parent_code: Option<String>,

    /// 시스템 내장 권한 (자동 삭제 대상에서 제외)
    #[serde(default)]
    pub is_system_permission: bool,
}

impl StoredPermission {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: None,
            description: None,
            path: None,
            icon: None,
            permission_type: None,
            sort: None,
            parent_code: None,
            is_system_permission: false,
        }
    }

    /// 디스크립터로부터 새 레코드 생성
    pub fn from_descriptor(id: Option<i64>, desc: &PermissionDescriptor) -> Self {
        Self {
            id,
            code: desc.code.clone(),
            name: desc.name.clone(),
            description: desc.description.clone(),
            path: desc.path.clone(),
            icon: desc.icon.clone(),
            permission_type: desc.permission_type,
            sort: desc.sort,
            parent_code: desc.parent_code.clone(),
            is_system_permission: false,
        }
    }

    /// 디스크립터 내용으로 덮어쓰기 (id, 시스템 플래그는 유지)
    pub fn apply_descriptor(&mut self, desc: &PermissionDescriptor) {
        self.name = desc.name.clone();
        self.description = desc.description.clone();
        self.path = desc.path.clone();
        self.icon = desc.icon.clone();
        if desc.permission_type.is_some() {
            self.permission_type = desc.permission_type;
        }
        if desc.sort.is_some() {
            self.sort = desc.sort;
        }
        if desc.parent_code.is_some() {
            self.parent_code = desc.parent_code.clone();
        }
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
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

    pub fn permission_type(mut self, permission_type: PermissionType) -> Self {
        self.permission_type = Some(permission_type);
        self
    }

    pub fn system(mut self, is_system: bool) -> Self {
        self.is_system_permission = is_system;
        self
    }

    /// 이벤트에 실을 식별자 (id가 없으면 code)
    pub fn event_key(&self) -> String {
        self.id
            .map(|id| id.to_string())
            .unwrap_or_else(|| self.code.clone())
    }
}
