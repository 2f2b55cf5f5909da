//! Catalog Merger - 어노테이션/설정 카탈로그 병합과 코드 검증

use permsync_foundation::{
    validate_code, Error, PermissionDescriptor, PermissionSource, PermissionSyncConfig,
    Precedence, Result,
};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// 양쪽 카탈로그가 같은 코드를 선언한 경우
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeConflict {
    pub code: String,
    pub kept: PermissionSource,
    pub dropped: PermissionSource,
}

/// 병합 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    /// 어노테이션 항목 다음 설정 항목 (충돌에서 진 쪽은 제외)
    pub descriptors: Vec<PermissionDescriptor>,
    pub conflicts: Vec<MergeConflict>,
}

impl MergeOutcome {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// 카탈로그 병합기
#[derive(Debug, Clone, Copy)]
pub struct CatalogMerger {
    precedence: Precedence,
    strict: bool,
}

impl Default for CatalogMerger {
    fn default() -> Self {
        Self {
            precedence: Precedence::default(),
            strict: true,
        }
    }
}

impl CatalogMerger {
    pub fn new(precedence: Precedence) -> Self {
        Self {
            precedence,
            ..Self::default()
        }
    }

    pub fn from_config(config: &PermissionSyncConfig) -> Self {
        Self::new(config.precedence).strict(config.strict_validation)
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// 단일 카탈로그 검증
    ///
    /// strict 모드에서만 동작: 빈/잘못된 코드, 같은 카탈로그 안의 중복 코드를 거부
    ///
    /// 한 핸들러의 클래스 마커와 메서드 마커가 같은 코드를 쓰는 경우도 중복으로
    /// 거부한다. lenient 모드에서는 그대로 통과하고 diff에서 마지막 항목이 채택된다.
    pub fn validate(&self, catalog: &[PermissionDescriptor], label: &str) -> Result<()> {
        if !self.strict {
            return Ok(());
        }

        let mut seen = HashSet::new();
        for desc in catalog {
            validate_code(&desc.code)
                .map_err(|e| Error::Validation(format!("{} catalog: {}", label, e)))?;
            if !seen.insert(desc.code.as_str()) {
                return Err(Error::Validation(format!(
                    "{} catalog: duplicate permission code '{}'",
                    label, desc.code
                )));
            }
        }
        Ok(())
    }

    /// 두 카탈로그 병합
    pub fn merge(
        &self,
        annotation: Vec<PermissionDescriptor>,
        config: Vec<PermissionDescriptor>,
    ) -> Result<MergeOutcome> {
        self.validate(&annotation, "annotation")?;
        self.validate(&config, "config")?;

        let config_codes: HashSet<&str> = config.iter().map(|d| d.code.as_str()).collect();

        let (kept, dropped) = match self.precedence {
            Precedence::ConfigOverAnnotation => (PermissionSource::Config, PermissionSource::Annotation),
            Precedence::AnnotationOverConfig => (PermissionSource::Annotation, PermissionSource::Config),
        };

        let mut conflicting = HashSet::new();
        let mut conflicts = Vec::new();
        for desc in &annotation {
            if config_codes.contains(desc.code.as_str()) && conflicting.insert(desc.code.clone()) {
                warn!(code = %desc.code, kept = %kept, dropped = %dropped, "Permission declared by both catalogs");
                conflicts.push(MergeConflict {
                    code: desc.code.clone(),
                    kept,
                    dropped,
                });
            }
        }

        let drop_annotation = dropped == PermissionSource::Annotation;
        let descriptors: Vec<_> = annotation
            .into_iter()
            .filter(|d| !(drop_annotation && conflicting.contains(&d.code)))
            .chain(
                config
                    .into_iter()
                    .filter(|d| drop_annotation || !conflicting.contains(&d.code)),
            )
            .collect();

        info!(
            count = descriptors.len(),
            conflicts = conflicts.len(),
            "Permission catalogs merged"
        );

        Ok(MergeOutcome {
            descriptors,
            conflicts,
        })
    }
}
