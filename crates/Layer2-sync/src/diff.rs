//! Permission Diff Engine - 저장된 권한과 목표 카탈로그 비교
//!
//! 결과는 생성/수정/삭제 세 갈래로 나뉜다. 시스템 권한은 목표 카탈로그에
//! 없더라도 삭제 대상이 되지 않는다.

use permsync_foundation::{PermissionDescriptor, StoredPermission};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::info;

// ============================================================================
// ChangedField
// ============================================================================

/// 수정 판정에 쓰이는 필드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangedField {
    Name,
    Description,
    Path,
    Icon,
}

impl ChangedField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Path => "path",
            Self::Icon => "icon",
        }
    }
}

impl fmt::Display for ChangedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 비교 대상 필드 중 값이 다른 것 (None과 Some("")은 다르다)
pub fn changed_fields(existing: &StoredPermission, target: &PermissionDescriptor) -> Vec<ChangedField> {
    let mut changed = Vec::new();
    if existing.name != target.name {
        changed.push(ChangedField::Name);
    }
    if existing.description != target.description {
        changed.push(ChangedField::Description);
    }
    if existing.path != target.path {
        changed.push(ChangedField::Path);
    }
    if existing.icon != target.icon {
        changed.push(ChangedField::Icon);
    }
    changed
}

// ============================================================================
// DiffResult
// ============================================================================

/// 수정 대상 한 건
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionUpdate {
    pub existing: StoredPermission,
    pub target: PermissionDescriptor,
    pub changed: Vec<ChangedField>,
}

impl PermissionUpdate {
    pub fn code(&self) -> &str {
        &self.existing.code
    }

    pub fn changed_names(&self) -> Vec<&'static str> {
        self.changed.iter().map(ChangedField::as_str).collect()
    }
}

/// 변경 계획
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    /// 저장소에 없는 코드
    pub to_create: Vec<PermissionDescriptor>,
    /// 코드는 같지만 name/description/path/icon 중 하나라도 다른 것
    pub to_update: Vec<PermissionUpdate>,
    /// 목표에 없는 비시스템 권한
    pub to_delete: Vec<StoredPermission>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    pub fn total_changes(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len()
    }

    pub fn update_for(&self, code: &str) -> Option<&PermissionUpdate> {
        self.to_update.iter().find(|u| u.code() == code)
    }
}

// ============================================================================
// PermissionDiffEngine
// ============================================================================

/// 차이 계산기 (상태 없음)
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionDiffEngine;

impl PermissionDiffEngine {
    pub fn new() -> Self {
        Self
    }

    /// 차이 계산
    ///
    /// 같은 코드가 여러 번 나오면 마지막 것이 이긴다. 생성/수정은 목표 순서,
    /// 삭제는 저장소 순서를 따른다.
    pub fn compute(&self, existing: &[StoredPermission], target: &[PermissionDescriptor]) -> DiffResult {
        info!(
            existing = existing.len(),
            target = target.len(),
            "Computing permission diff"
        );

        let existing_by_code: HashMap<&str, &StoredPermission> =
            existing.iter().map(|p| (p.code.as_str(), p)).collect();

        let target_by_code: HashMap<&str, usize> = target
            .iter()
            .enumerate()
            .map(|(i, d)| (d.code.as_str(), i))
            .collect();

        let mut result = DiffResult::default();

        for (index, desc) in target.iter().enumerate() {
            // 뒤에 같은 코드가 있으면 이 항목은 무시
            if target_by_code.get(desc.code.as_str()) != Some(&index) {
                continue;
            }

            match existing_by_code.get(desc.code.as_str()) {
                None => result.to_create.push(desc.clone()),
                Some(stored) => {
                    let changed = changed_fields(stored, desc);
                    if !changed.is_empty() {
                        result.to_update.push(PermissionUpdate {
                            existing: (*stored).clone(),
                            target: desc.clone(),
                            changed,
                        });
                    }
                }
            }
        }

        for stored in existing {
            if !target_by_code.contains_key(stored.code.as_str()) && !stored.is_system_permission {
                result.to_delete.push(stored.clone());
            }
        }

        info!(
            create = result.to_create.len(),
            update = result.to_update.len(),
            delete = result.to_delete.len(),
            "Permission diff complete"
        );

        result
    }
}

/// 편의 함수
pub fn compute_diff(existing: &[StoredPermission], target: &[PermissionDescriptor]) -> DiffResult {
    PermissionDiffEngine::new().compute(existing, target)
}
