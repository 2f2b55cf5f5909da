//! 설정/스냅샷 파일 저장소 (JSON, TOML)

use crate::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};

/// 파일 포맷 (확장자로 결정)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    /// 확장자로 포맷 판별 (.toml 외에는 JSON)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }

    pub fn parse<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        match self {
            Self::Json => Ok(serde_json::from_str(content)?),
            Self::Toml => Ok(toml::from_str(content)?),
        }
    }

    pub fn render<T: Serialize>(&self, data: &T) -> Result<String> {
        match self {
            Self::Json => Ok(serde_json::to_string_pretty(data)?),
            Self::Toml => toml::to_string_pretty(data)
                .map_err(|e| Error::Config(format!("Failed to serialize: {}", e))),
        }
    }
}

/// 설정 저장소
#[derive(Debug, Clone)]
pub struct ConfigStore {
    base_dir: PathBuf,
}

impl ConfigStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// 글로벌 설정 (~/.config/permsync/)
    pub fn global() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Cannot find config directory".to_string()))?
            .join("permsync");
        Ok(Self::new(dir))
    }

    /// 프로젝트 설정 (.permsync/)
    pub fn project(root: impl Into<PathBuf>) -> Self {
        Self::new(root.into().join(".permsync"))
    }

    /// 현재 디렉토리 프로젝트 설정
    pub fn current_project() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| Error::Config(format!("Cannot get current directory: {}", e)))?;
        Ok(Self::project(cwd))
    }

    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.base_dir.join(filename)
    }

    /// 파일 로드 (Optional)
    pub fn load_optional<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<T>> {
        let path = self.file_path(filename);
        if !path.exists() {
            return Ok(None);
        }
        load_file(&path).map(Some)
    }
}

/// 임의 경로의 파일 로드 (확장자로 포맷 결정)
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    FileFormat::from_path(path)
        .parse(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// 임의 경로에 파일 저장
pub fn save_file<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let content = FileFormat::from_path(path).render(data)?;
    std::fs::write(path, content)
        .map_err(|e| Error::Config(format!("Failed to write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path(Path::new("a/b.toml")), FileFormat::Toml);
        assert_eq!(FileFormat::from_path(Path::new("a/b.TOML")), FileFormat::Toml);
        assert_eq!(FileFormat::from_path(Path::new("a/b.json")), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("a/b")), FileFormat::Json);
    }

    #[test]
    fn test_save_and_load_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());
        let sample = Sample {
            name: "perm".to_string(),
            count: 3,
        };

        save_file(&store.file_path("sample.json"), &sample).unwrap();
        save_file(&store.file_path("sample.toml"), &sample).unwrap();

        assert_eq!(store.load_optional::<Sample>("sample.json").unwrap(), Some(sample));
        let toml_text = std::fs::read_to_string(store.file_path("sample.toml")).unwrap();
        assert!(toml_text.contains("name = \"perm\""));
    }

    #[test]
    fn test_load_optional_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());
        let loaded: Option<Sample> = store.load_optional("missing.toml").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_project_dir() {
        let store = ConfigStore::project("/srv/app");
        assert_eq!(
            store.file_path("permissions.toml"),
            Path::new("/srv/app/.permsync/permissions.toml")
        );
    }

    #[test]
    fn test_load_missing_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file::<Sample>(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
