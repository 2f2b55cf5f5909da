//! Annotation Catalog Scanner - 핸들러에 선언된 권한 마커 수집
//!
//! 런타임 리플렉션 대신 각 핸들러가 `PermissionHandler`를 구현해
//! 자신의 권한 요구사항을 명시적으로 선언한다. 스캐너는 `HandlerRegistry`에
//! 등록된 핸들러들을 돌며 선언을 디스크립터로 바꾸는 집계기일 뿐이다.

use parking_lot::RwLock;
use permsync_foundation::{PermissionDescriptor, PermissionSource, PermissionType, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

// ============================================================================
// PermissionMarker
// ============================================================================

/// 권한 요구 마커 (value = 권한 코드)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionMarker {
    pub value: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl PermissionMarker {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name: None,
            description: None,
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

    fn to_descriptor(&self) -> PermissionDescriptor {
        PermissionDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            ..PermissionDescriptor::new(&self.value, PermissionSource::Annotation)
                .permission_type(PermissionType::Api)
        }
    }
}

/// 메서드 단위 마커
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodPermission {
    pub method: String,
    pub marker: PermissionMarker,
}

/// 핸들러 하나가 선언한 마커 전체
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerPermissions {
    /// 타입(클래스) 레벨 마커
    pub class: Option<PermissionMarker>,
    /// 메서드 레벨 마커 (선언 순서)
    pub methods: Vec<MethodPermission>,
}

impl HandlerPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(mut self, marker: PermissionMarker) -> Self {
        self.class = Some(marker);
        self
    }

    pub fn method(mut self, method: impl Into<String>, marker: PermissionMarker) -> Self {
        self.methods.push(MethodPermission {
            method: method.into(),
            marker,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.class.is_none() && self.methods.is_empty()
    }
}

// ============================================================================
// PermissionHandler
// ============================================================================

/// 권한 마커를 선언하는 라우트 핸들러
pub trait PermissionHandler: Send + Sync {
    /// 핸들러 이름 (로그용)
    fn handler_name(&self) -> &str;

    /// 선언된 마커 조회
    ///
    /// 에러를 반환하면 해당 핸들러만 건너뛰고 스캔은 계속된다.
    fn declared_permissions(&self) -> Result<HandlerPermissions>;
}

// 래퍼가 마커를 가리지 않도록 그대로 위임
impl<H: PermissionHandler + ?Sized> PermissionHandler for Box<H> {
    fn handler_name(&self) -> &str {
        (**self).handler_name()
    }

    fn declared_permissions(&self) -> Result<HandlerPermissions> {
        (**self).declared_permissions()
    }
}

impl<H: PermissionHandler + ?Sized> PermissionHandler for Arc<H> {
    fn handler_name(&self) -> &str {
        (**self).handler_name()
    }

    fn declared_permissions(&self) -> Result<HandlerPermissions> {
        (**self).declared_permissions()
    }
}

/// 선언 테이블 기반 핸들러
///
/// ```ignore
/// let handler = DeclaredHandler::new("ArchiveController")
///     .class(PermissionMarker::new("archive:manage"))
///     .method("list", PermissionMarker::new("archive:read").name("Read archives"));
/// ```
#[derive(Debug, Clone)]
pub struct DeclaredHandler {
    name: String,
    permissions: HandlerPermissions,
}

impl DeclaredHandler {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permissions: HandlerPermissions::new(),
        }
    }

    pub fn class(mut self, marker: PermissionMarker) -> Self {
        self.permissions = self.permissions.class(marker);
        self
    }

    pub fn method(mut self, method: impl Into<String>, marker: PermissionMarker) -> Self {
        self.permissions = self.permissions.method(method, marker);
        self
    }
}

impl PermissionHandler for DeclaredHandler {
    fn handler_name(&self) -> &str {
        &self.name
    }

    fn declared_permissions(&self) -> Result<HandlerPermissions> {
        Ok(self.permissions.clone())
    }
}

// ============================================================================
// HandlerRegistry
// ============================================================================

/// 핸들러 태그 (두 그룹은 겹칠 수 있다)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// REST 스타일 핸들러
    Rest,
    /// 일반 라우트 매핑 핸들러
    Route,
}

impl HandlerKind {
    pub const ALL: [HandlerKind; 2] = [HandlerKind::Rest, HandlerKind::Route];
}

/// 라이브 핸들러 레지스트리
#[derive(Default)]
pub struct HandlerRegistry {
    groups: RwLock<HashMap<HandlerKind, Vec<Arc<dyn PermissionHandler>>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 핸들러 등록 (같은 객체를 여러 태그로 등록 가능)
    pub fn register(&self, kind: HandlerKind, handler: Arc<dyn PermissionHandler>) {
        debug!(handler = handler.handler_name(), kind = ?kind, "Registering handler");
        self.groups.write().entry(kind).or_default().push(handler);
    }

    /// 태그별 핸들러 조회 (등록 순서)
    pub fn handlers_tagged_as(&self, kind: HandlerKind) -> Vec<Arc<dyn PermissionHandler>> {
        self.groups.read().get(&kind).cloned().unwrap_or_default()
    }

    /// 모든 태그의 핸들러 (객체 동일성 기준 중복 제거)
    pub fn all_handlers(&self) -> Vec<Arc<dyn PermissionHandler>> {
        let mut seen = HashSet::new();
        let mut handlers = Vec::new();

        for kind in HandlerKind::ALL {
            for handler in self.handlers_tagged_as(kind) {
                if seen.insert(Arc::as_ptr(&handler).cast::<()>()) {
                    handlers.push(handler);
                }
            }
        }

        handlers
    }

    /// 등록된 (중복 제거 전) 핸들러 수
    pub fn count(&self) -> usize {
        self.groups.read().values().map(Vec::len).sum()
    }
}

// ============================================================================
// AnnotationCatalogScanner
// ============================================================================

/// 어노테이션 카탈로그 스캐너
#[derive(Clone)]
pub struct AnnotationCatalogScanner {
    registry: Arc<HandlerRegistry>,
}

impl AnnotationCatalogScanner {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// 전체 핸들러 스캔 (발견 순서 유지, 코드 중복 제거 없음)
    pub fn scan(&self) -> Vec<PermissionDescriptor> {
        info!("Scanning handler permission markers");

        let mut permissions = Vec::new();
        for handler in self.registry.all_handlers() {
            scan_handler(handler.as_ref(), &mut permissions);
        }

        info!(count = permissions.len(), "Handler permission scan complete");
        permissions
    }
}

fn scan_handler(handler: &dyn PermissionHandler, permissions: &mut Vec<PermissionDescriptor>) {
    let declared = match handler.declared_permissions() {
        Ok(declared) => declared,
        Err(e) => {
            warn!(handler = handler.handler_name(), error = %e, "Skipping handler");
            return;
        }
    };

    if let Some(ref marker) = declared.class {
        debug!(
            handler = handler.handler_name(),
            code = %marker.value,
            "Found class-level permission"
        );
        permissions.push(marker.to_descriptor());
    }

    for method in &declared.methods {
        debug!(
            handler = handler.handler_name(),
            method = %method.method,
            code = %method.marker.value,
            "Found method-level permission"
        );
        permissions.push(method.marker.to_descriptor());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use permsync_foundation::Error;

    fn test_controller() -> DeclaredHandler {
        DeclaredHandler::new("TestController")
            .method(
                "read",
                PermissionMarker::new("test:read")
                    .name("Read test data")
                    .description("Permission to read test data"),
            )
            .method("write", PermissionMarker::new("test:write").name("Write test data"))
            .method("delete", PermissionMarker::new("test:delete"))
    }

    struct BrokenHandler;

    impl PermissionHandler for BrokenHandler {
        fn handler_name(&self) -> &str {
            "BrokenHandler"
        }

        fn declared_permissions(&self) -> Result<HandlerPermissions> {
            Err(Error::scan("BrokenHandler", "metadata unavailable"))
        }
    }

    fn entry(
        kind: HandlerKind,
        handler: impl PermissionHandler + 'static,
    ) -> (HandlerKind, Arc<dyn PermissionHandler>) {
        (kind, Arc::new(handler))
    }

    fn scanner_with(
        handlers: Vec<(HandlerKind, Arc<dyn PermissionHandler>)>,
    ) -> AnnotationCatalogScanner {
        let registry = Arc::new(HandlerRegistry::new());
        for (kind, handler) in handlers {
            registry.register(kind, handler);
        }
        AnnotationCatalogScanner::new(registry)
    }

    fn codes(permissions: &[PermissionDescriptor]) -> Vec<&str> {
        permissions.iter().map(|p| p.code.as_str()).collect()
    }

    #[test]
    fn test_scan_method_markers() {
        let scanner = scanner_with(vec![entry(HandlerKind::Rest, test_controller())]);
        let permissions = scanner.scan();

        assert_eq!(codes(&permissions), vec!["test:read", "test:write", "test:delete"]);

        let read = &permissions[0];
        assert_eq!(read.name.as_deref(), Some("Read test data"));
        assert_eq!(read.description.as_deref(), Some("Permission to read test data"));
        assert_eq!(read.permission_type, Some(PermissionType::Api));
        assert_eq!(read.source, PermissionSource::Annotation);

        let delete = &permissions[2];
        assert!(delete.name.is_none());
        assert!(delete.path.is_none());
    }

    #[test]
    fn test_class_and_method_markers() {
        let handler = DeclaredHandler::new("AdminController")
            .class(PermissionMarker::new("admin:manage").name("Admin"))
            .method("read", PermissionMarker::new("test:read"))
            .method("write", PermissionMarker::new("test:write"));

        let permissions = scanner_with(vec![entry(HandlerKind::Rest, handler)]).scan();

        assert_eq!(permissions.len(), 3);
        assert_eq!(codes(&permissions), vec!["admin:manage", "test:read", "test:write"]);
        assert!(permissions
            .iter()
            .all(|p| p.source == PermissionSource::Annotation
                && p.permission_type == Some(PermissionType::Api)));
    }

    #[test]
    fn test_empty_registry() {
        assert!(scanner_with(vec![]).scan().is_empty());
    }

    #[test]
    fn test_handler_without_markers() {
        let scanner = scanner_with(vec![entry(
            HandlerKind::Rest,
            DeclaredHandler::new("EmptyController"),
        )]);
        assert!(scanner.scan().is_empty());
    }

    #[test]
    fn test_route_group_is_scanned() {
        let legacy = DeclaredHandler::new("LegacyController")
            .method("access", PermissionMarker::new("legacy:access"));
        let scanner = scanner_with(vec![entry(HandlerKind::Route, legacy)]);

        assert_eq!(codes(&scanner.scan()), vec!["legacy:access"]);
    }

    #[test]
    fn test_overlapping_groups_deduplicated_by_identity() {
        let shared: Arc<dyn PermissionHandler> = Arc::new(test_controller());
        let scanner = scanner_with(vec![
            (HandlerKind::Rest, shared.clone()),
            (HandlerKind::Route, shared),
        ]);

        assert_eq!(scanner.registry().count(), 2);
        assert_eq!(scanner.registry().all_handlers().len(), 1);
        assert_eq!(scanner.scan().len(), 3);
    }

    #[test]
    fn test_distinct_objects_with_same_markers_not_deduplicated() {
        let scanner = scanner_with(vec![
            entry(HandlerKind::Rest, test_controller()),
            entry(HandlerKind::Route, test_controller()),
        ]);

        assert_eq!(scanner.scan().len(), 6);
    }

    #[test]
    fn test_wrapped_handler_is_transparent() {
        let direct = scanner_with(vec![entry(HandlerKind::Rest, test_controller())]).scan();

        let wrapped: Arc<dyn PermissionHandler> =
            Arc::new(Box::new(Arc::new(test_controller())));
        let via_wrapper = scanner_with(vec![(HandlerKind::Rest, wrapped)]).scan();

        assert_eq!(direct, via_wrapper);
    }

    #[test]
    fn test_failing_handler_is_skipped() {
        let scanner = scanner_with(vec![
            entry(HandlerKind::Rest, BrokenHandler),
            entry(HandlerKind::Rest, test_controller()),
        ]);

        assert_eq!(scanner.scan().len(), 3);
    }
}
