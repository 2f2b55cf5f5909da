//! Config Catalog Reader - 설정 파일 권한 선언을 디스크립터로 변환

use permsync_foundation::{
    PermissionConfigRecord, PermissionDescriptor, PermissionSource, PermissionSyncConfig, Result,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// 권한 선언 공급자
pub trait ConfigSource: Send + Sync {
    /// 순서가 유지된 권한 선언 목록
    ///
    /// 공급자가 사용할 수 없으면 에러 (재시도하지 않는다)
    fn permission_declarations(&self) -> Result<Vec<PermissionConfigRecord>>;
}

impl ConfigSource for PermissionSyncConfig {
    fn permission_declarations(&self) -> Result<Vec<PermissionConfigRecord>> {
        Ok(self.permissions.clone())
    }
}

/// 호출할 때마다 파일을 읽는 공급자
///
/// 동기 파일 I/O를 한다. `SyncOrchestrator`는 blocking 스레드에서 호출한다.
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigSource for FileConfigSource {
    fn permission_declarations(&self) -> Result<Vec<PermissionConfigRecord>> {
        debug!(path = %self.path.display(), "Loading permission declarations");
        Ok(PermissionSyncConfig::load_from(&self.path)?.permissions)
    }
}

/// 설정 카탈로그 리더
///
/// 검증/중복 제거 없이 값을 그대로 옮긴다. 빈 값은 None으로 유지된다.
#[derive(Clone)]
pub struct ConfigCatalogReader {
    source: Arc<dyn ConfigSource>,
}

impl ConfigCatalogReader {
    pub fn new(source: Arc<dyn ConfigSource>) -> Self {
        Self { source }
    }

    pub fn read(&self) -> Result<Vec<PermissionDescriptor>> {
        info!("Reading configured permissions");

        let permissions: Vec<_> = self
            .source
            .permission_declarations()?
            .into_iter()
            .map(record_to_descriptor)
            .collect();

        info!(count = permissions.len(), "Configured permission read complete");
        Ok(permissions)
    }
}

fn record_to_descriptor(record: PermissionConfigRecord) -> PermissionDescriptor {
    PermissionDescriptor {
        code: record.code.unwrap_or_default(),
        name: record.name,
        description: record.description,
        permission_type: record.permission_type,
        path: record.path,
        icon: record.icon,
        sort: record.sort,
        parent_code: record.parent_code,
        source: PermissionSource::Config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use permsync_foundation::{Error, PermissionType};

    fn reader_for(config: PermissionSyncConfig) -> ConfigCatalogReader {
        ConfigCatalogReader::new(Arc::new(config))
    }

    struct UnavailableSource;

    impl ConfigSource for UnavailableSource {
        fn permission_declarations(&self) -> Result<Vec<PermissionConfigRecord>> {
            Err(Error::Config("permission config not loaded".to_string()))
        }
    }

    #[test]
    fn test_read_full_record() {
        let config = PermissionSyncConfig::new().permission(
            PermissionConfigRecord::new("SYSTEM_MANAGE")
                .name("System")
                .description("System management")
                .permission_type(PermissionType::Menu)
                .path("/system")
                .icon("setting")
                .sort(1),
        );

        let permissions = reader_for(config).read().unwrap();
        assert_eq!(permissions.len(), 1);

        let system = &permissions[0];
        assert_eq!(system.code, "SYSTEM_MANAGE");
        assert_eq!(system.name.as_deref(), Some("System"));
        assert_eq!(system.description.as_deref(), Some("System management"));
        assert_eq!(system.permission_type, Some(PermissionType::Menu));
        assert_eq!(system.path.as_deref(), Some("/system"));
        assert_eq!(system.icon.as_deref(), Some("setting"));
        assert_eq!(system.sort, Some(1));
        assert!(system.parent_code.is_none());
        assert_eq!(system.source, PermissionSource::Config);
    }

    #[test]
    fn test_empty_config() {
        assert!(reader_for(PermissionSyncConfig::new()).read().unwrap().is_empty());
    }

    #[test]
    fn test_partial_record_keeps_nulls() {
        let config = PermissionSyncConfig::new()
            .permission(PermissionConfigRecord::new("PARTIAL_CONFIG").name("Partial"));

        let permission = &reader_for(config).read().unwrap()[0];
        assert_eq!(permission.code, "PARTIAL_CONFIG");
        assert!(permission.description.is_none());
        assert!(permission.permission_type.is_none());
        assert!(permission.path.is_none());
        assert!(permission.icon.is_none());
        assert!(permission.sort.is_none());
        assert!(permission.parent_code.is_none());
    }

    #[test]
    fn test_order_and_hierarchy_preserved() {
        let config = PermissionSyncConfig::new()
            .permission(
                PermissionConfigRecord::new("SYSTEM_MANAGE").permission_type(PermissionType::Menu),
            )
            .permission(
                PermissionConfigRecord::new("USER_MANAGE")
                    .permission_type(PermissionType::Menu)
                    .parent_code("SYSTEM_MANAGE"),
            )
            .permission(
                PermissionConfigRecord::new("USER_CREATE")
                    .permission_type(PermissionType::Button)
                    .parent_code("USER_MANAGE"),
            );

        let permissions = reader_for(config).read().unwrap();
        let codes: Vec<_> = permissions.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, vec!["SYSTEM_MANAGE", "USER_MANAGE", "USER_CREATE"]);
        assert_eq!(permissions[2].parent_code.as_deref(), Some("USER_MANAGE"));
        assert_eq!(permissions[2].permission_type, Some(PermissionType::Button));
    }

    #[test]
    fn test_missing_code_passes_through_as_blank() {
        let config = PermissionSyncConfig::new().permission(PermissionConfigRecord::default());
        let permissions = reader_for(config).read().unwrap();
        assert_eq!(permissions[0].code, "");
    }

    #[test]
    fn test_unavailable_source_propagates() {
        let reader = ConfigCatalogReader::new(Arc::new(UnavailableSource));
        assert!(matches!(reader.read(), Err(Error::Config(_))));
    }

    #[test]
    fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("permissions.toml");
        std::fs::write(
            &path,
            "[[permissions]]\ncode = \"ARCHIVE_MANAGE\"\ntype = \"MENU\"\n",
        )
        .unwrap();

        let reader = ConfigCatalogReader::new(Arc::new(FileConfigSource::new(&path)));
        let permissions = reader.read().unwrap();
        assert_eq!(permissions[0].code, "ARCHIVE_MANAGE");

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(reader.read(), Err(Error::Config(_))));
    }
}
