//! 권한 디스크립터 정의
//!
//! 어노테이션 스캔/설정 파일 어느 쪽에서 왔든 동일한 모양으로 표현되는
//! 권한 한 건의 스냅샷. 매 스캔마다 새로 만들어지며 직접 저장되지 않는다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// 권한 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PermissionType {
    /// 메뉴
    Menu,
    /// 버튼
    Button,
    /// API 엔드포인트
    Api,
    /// 데이터 범위
    Data,
}

impl PermissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Menu => "MENU",
            Self::Button => "BUTTON",
            Self::Api => "API",
            Self::Data => "DATA",
        }
    }
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MENU" => Ok(Self::Menu),
            "BUTTON" => Ok(Self::Button),
            "API" => Ok(Self::Api),
            "DATA" => Ok(Self::Data),
            other => Err(Error::InvalidInput(format!(
                "unknown permission type: {}",
                other
            ))),
        }
    }
}

/// 디스크립터 출처 (provenance 용도, diff 로직에는 사용하지 않음)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PermissionSource {
    /// 핸들러에 선언된 마커
    Annotation,
    /// 설정 파일
    Config,
}

impl PermissionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Annotation => "ANNOTATION",
            Self::Config => "CONFIG",
        }
    }
}

impl fmt::Display for PermissionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 권한 디스크립터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDescriptor {
    /// 권한 코드 (예: "archive:read", "SYSTEM_MANAGE")
    pub code: String,

    /// 표시 이름
    pub name: Option<String>,

    /// 설명
    pub description: Option<String>,

    /// 권한 타입
    #[serde(rename = "type")]
    pub permission_type: Option<PermissionType>,

    /// 라우트/메뉴 경로
    pub path: Option<String>,

    /// 메뉴 아이콘
    pub icon: Option<String>,

    /// 정렬 순서
    pub sort: Option<i32>,

    /// 상위 권한 코드
    pub parent_code: Option<String>,

    /// 출처
    pub source: PermissionSource,
}

impl PermissionDescriptor {
    pub fn new(code: impl Into<String>, source: PermissionSource) -> Self {
        Self {
            code: code.into(),
            name: None,
            description: None,
            permission_type: None,
            path: None,
            icon: None,
            sort: None,
            parent_code: None,
            source,
        }
    }

    /// 어노테이션 출처 API 권한
    pub fn api(code: impl Into<String>) -> Self {
        Self::new(code, PermissionSource::Annotation).permission_type(PermissionType::Api)
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

    pub fn is_root(&self) -> bool {
        self.parent_code.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_builder() {
        let desc = PermissionDescriptor::new("SYSTEM_MANAGE", PermissionSource::Config)
            .name("System")
            .permission_type(PermissionType::Menu)
            .path("/system")
            .icon("setting")
            .sort(1);

        assert_eq!(desc.code, "SYSTEM_MANAGE");
        assert_eq!(desc.permission_type, Some(PermissionType::Menu));
        assert_eq!(desc.sort, Some(1));
        assert!(desc.description.is_none());
        assert!(desc.is_root());
    }

    #[test]
    fn test_api_shortcut() {
        let desc = PermissionDescriptor::api("test:read");
        assert_eq!(desc.source, PermissionSource::Annotation);
        assert_eq!(desc.permission_type, Some(PermissionType::Api));
    }

    #[test]
    fn test_permission_type_parse() {
        assert_eq!("menu".parse::<PermissionType>().unwrap(), PermissionType::Menu);
        assert_eq!(" BUTTON ".parse::<PermissionType>().unwrap(), PermissionType::Button);
        assert!("WIDGET".parse::<PermissionType>().is_err());
    }

    #[test]
    fn test_serde_shape() {
        let desc = PermissionDescriptor::new("USER_CREATE", PermissionSource::Config)
            .permission_type(PermissionType::Button)
            .parent_code("USER_MANAGE");

        let json = serde_json::to_value(&desc).unwrap();
        assert_eq!(json["type"], "BUTTON");
        assert_eq!(json["parentCode"], "USER_MANAGE");
        assert_eq!(json["source"], "CONFIG");
        assert!(json["path"].is_null());
    }
}
