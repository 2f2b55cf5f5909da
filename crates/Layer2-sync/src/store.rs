//! Permission Store - 권한 테이블 추상화
//!
//! 영속 계층은 trait으로만 표현한다. `InMemoryPermissionStore`는 테스트와
//! CLI에서 스냅샷 파일을 기반으로 동작한다.

use async_trait::async_trait;
use permsync_foundation::{load_file, save_file, Error, Result, StoredPermission};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::diff::{ChangedField, DiffResult};

// ============================================================================
// AppliedChanges
// ============================================================================

/// 반영된 수정 한 건
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedUpdate {
    pub permission: StoredPermission,
    pub changed: Vec<ChangedField>,
}

/// 저장소에 실제로 반영된 변경 (이벤트용 ID 포함)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedChanges {
    pub created: Vec<StoredPermission>,
    pub updated: Vec<AppliedUpdate>,
    pub deleted: Vec<StoredPermission>,
}

impl AppliedChanges {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

// ============================================================================
// PermissionStore
// ============================================================================

/// 권한 저장소
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// 현재 저장된 권한 전체
    async fn all_permissions(&self) -> Result<Vec<StoredPermission>>;

    /// 변경 계획 반영 (전부 성공하거나 아무것도 바뀌지 않는다)
    async fn apply_plan(&self, plan: &DiffResult) -> Result<AppliedChanges>;
}

// ============================================================================
// Snapshot
// ============================================================================

/// 저장소 스냅샷 파일 형식 (JSON 또는 TOML)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSnapshot {
    #[serde(default)]
    pub permissions: Vec<StoredPermission>,
}

impl PermissionSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        load_file(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_file(path, self)
    }
}

// ============================================================================
// InMemoryPermissionStore
// ============================================================================

/// 메모리 기반 저장소
pub struct InMemoryPermissionStore {
    permissions: RwLock<Vec<StoredPermission>>,
    next_id: AtomicI64,
}

impl Default for InMemoryPermissionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPermissionStore {
    pub fn new() -> Self {
        Self {
            permissions: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// 기존 권한으로 초기화 (ID가 없는 항목에는 새 ID 부여)
    pub fn with_permissions(permissions: Vec<StoredPermission>) -> Result<Self> {
        let max_id = permissions.iter().filter_map(|p| p.id).max().unwrap_or(0);
        let mut next_id = following_id(max_id)?;

        let mut rows = Vec::with_capacity(permissions.len());
        for mut permission in permissions {
            if permission.id.is_none() {
                permission.id = Some(next_id);
                next_id = following_id(next_id)?;
            }
            rows.push(permission);
        }

        Ok(Self {
            permissions: RwLock::new(rows),
            next_id: AtomicI64::new(next_id),
        })
    }

    pub fn from_snapshot(snapshot: PermissionSnapshot) -> Result<Self> {
        Self::with_permissions(snapshot.permissions)
    }

    pub async fn snapshot(&self) -> PermissionSnapshot {
        PermissionSnapshot {
            permissions: self.permissions.read().await.clone(),
        }
    }

    pub async fn len(&self) -> usize {
        self.permissions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.permissions.read().await.is_empty()
    }

    pub async fn find_by_code(&self, code: &str) -> Option<StoredPermission> {
        self.permissions
            .read()
            .await
            .iter()
            .rev()
            .find(|p| p.code == code)
            .cloned()
    }

    fn position_of(rows: &[StoredPermission], target: &StoredPermission) -> Option<usize> {
        match target.id {
            Some(id) => rows.iter().position(|p| p.id == Some(id)),
            None => rows.iter().rposition(|p| p.code == target.code),
        }
    }
}

/// 다음 ID (i64 범위를 넘으면 Storage 에러)
fn following_id(id: i64) -> Result<i64> {
    id.checked_add(1)
        .ok_or_else(|| Error::Storage(format!("permission id space exhausted after {}", id)))
}

#[async_trait]
impl PermissionStore for InMemoryPermissionStore {
    async fn all_permissions(&self) -> Result<Vec<StoredPermission>> {
        Ok(self.permissions.read().await.clone())
    }

    async fn apply_plan(&self, plan: &DiffResult) -> Result<AppliedChanges> {
        let mut guard = self.permissions.write().await;
        // 작업 사본에 반영한 뒤 성공하면 교체
        let mut rows = guard.clone();
        let mut applied = AppliedChanges::default();

        for update in &plan.to_update {
            let index = Self::position_of(&rows, &update.existing).ok_or_else(|| {
                Error::Storage(format!(
                    "permission '{}' no longer exists",
                    update.existing.code
                ))
            })?;
            rows[index].apply_descriptor(&update.target);
            applied.updated.push(AppliedUpdate {
                permission: rows[index].clone(),
                changed: update.changed.clone(),
            });
        }

        for stored in &plan.to_delete {
            let index = Self::position_of(&rows, stored).ok_or_else(|| {
                Error::Storage(format!("permission '{}' no longer exists", stored.code))
            })?;
            applied.deleted.push(rows.remove(index));
        }

        let mut next_id = self.next_id.load(Ordering::SeqCst);
        for desc in &plan.to_create {
            let created = StoredPermission::from_descriptor(Some(next_id), desc);
            debug!(code = %created.code, id = next_id, "Permission created");
            next_id = following_id(next_id)?;
            rows.push(created.clone());
            applied.created.push(created);
        }

        self.next_id.store(next_id, Ordering::SeqCst);
        *guard = rows;

        info!(
            created = applied.created.len(),
            updated = applied.updated.len(),
            deleted = applied.deleted.len(),
            "Permission plan applied"
        );

        Ok(applied)
    }
}
