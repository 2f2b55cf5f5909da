//! Event Bus - 권한 변경 이벤트 브로드캐스트
//!
//! 비동기 이벤트 발행/구독 시스템을 제공합니다. 전역 버스는 두지 않고
//! 소유자가 `Arc<EventBus>`를 명시적으로 넘겨 사용합니다.

use super::types::{ChangeAction, PermissionChangedEvent};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, trace};

// ============================================================================
// EventListener Trait
// ============================================================================

/// 이벤트 리스너 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// 이벤트 리스너 trait
///
/// 캐시 갱신, 클라이언트 알림 등 변경 후속 처리를 하는 컴포넌트가 구현합니다.
#[async_trait]
pub trait EventListener: Send + Sync {
    /// 리스너 이름 (디버깅용)
    fn name(&self) -> &str;

    /// 관심 있는 액션 (None이면 모든 이벤트)
    fn actions(&self) -> Option<Vec<ChangeAction>> {
        None
    }

    /// 이벤트 처리
    async fn on_event(&self, event: &PermissionChangedEvent);
}

// ============================================================================
// EventFilter
// ============================================================================

/// 이벤트 필터
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// 액션 필터
    pub actions: Option<Vec<ChangeAction>>,

    /// 작업자 필터
    pub operators: Option<Vec<i64>>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actions(mut self, actions: Vec<ChangeAction>) -> Self {
        self.actions = Some(actions);
        self
    }

    pub fn with_operators(mut self, operators: Vec<i64>) -> Self {
        self.operators = Some(operators);
        self
    }

    /// 이벤트가 필터를 통과하는지 확인
    pub fn matches(&self, event: &PermissionChangedEvent) -> bool {
        if let Some(ref actions) = self.actions {
            if !actions.contains(&event.action) {
                return false;
            }
        }

        if let Some(ref operators) = self.operators {
            if !operators.contains(&event.operator_id) {
                return false;
            }
        }

        true
    }
}

// ============================================================================
// EventBus
// ============================================================================

/// 이벤트 버스 설정
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// 브로드캐스트 채널 용량
    pub channel_capacity: usize,

    /// 이벤트 히스토리 보관 개수
    pub history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            history_size: 100,
        }
    }
}

struct RegisteredListener {
    listener: Arc<dyn EventListener>,
    filter: Option<EventFilter>,
}

/// 이벤트 버스
///
/// ```ignore
/// let bus = Arc::new(EventBus::new());
/// let id = bus.subscribe(my_listener).await;
/// bus.publish(event::synced("all", 1, 0, 0, operator_id)).await;
/// bus.unsubscribe(id).await;
/// ```
pub struct EventBus {
    config: EventBusConfig,
    sender: broadcast::Sender<PermissionChangedEvent>,
    listeners: RwLock<HashMap<ListenerId, RegisteredListener>>,
    listener_counter: AtomicU64,
    history: RwLock<VecDeque<PermissionChangedEvent>>,
    event_count: AtomicU64,
}

impl EventBus {
    /// 기본 설정으로 이벤트 버스 생성
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// 커스텀 설정으로 이벤트 버스 생성
    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));

        Self {
            config,
            sender,
            listeners: RwLock::new(HashMap::new()),
            listener_counter: AtomicU64::new(0),
            history: RwLock::new(VecDeque::new()),
            event_count: AtomicU64::new(0),
        }
    }

    /// 리스너 등록
    pub async fn subscribe(&self, listener: Arc<dyn EventListener>) -> ListenerId {
        self.subscribe_with_filter(listener, None).await
    }

    /// 필터와 함께 리스너 등록
    pub async fn subscribe_with_filter(
        &self,
        listener: Arc<dyn EventListener>,
        filter: Option<EventFilter>,
    ) -> ListenerId {
        let id = ListenerId(self.listener_counter.fetch_add(1, Ordering::SeqCst));

        debug!(
            listener_name = listener.name(),
            listener_id = %id,
            "Registering event listener"
        );

        let mut listeners = self.listeners.write().await;
        listeners.insert(id, RegisteredListener { listener, filter });

        id
    }

    /// 리스너 해제
    pub async fn unsubscribe(&self, id: ListenerId) -> bool {
        let removed = self.listeners.write().await.remove(&id).is_some();
        if removed {
            debug!(listener_id = %id, "Unregistered event listener");
        }
        removed
    }

    /// 이벤트 발행
    pub async fn publish(&self, event: PermissionChangedEvent) {
        let event_count = self.event_count.fetch_add(1, Ordering::SeqCst);

        trace!(
            event_id = %event.id,
            action = %event.action,
            operator_id = event.operator_id,
            "Publishing event #{}", event_count + 1
        );

        {
            let mut history = self.history.write().await;
            history.push_back(event.clone());
            while history.len() > self.config.history_size {
                history.pop_front();
            }
        }

        // 수신자가 없으면 실패하지만 무시
        let _ = self.sender.send(event.clone());

        let listeners = self.listeners.read().await;
        for (id, registered) in listeners.iter() {
            let should_deliver = match &registered.filter {
                Some(filter) => filter.matches(&event),
                None => match registered.listener.actions() {
                    Some(actions) => actions.contains(&event.action),
                    None => true,
                },
            };

            if should_deliver {
                trace!(
                    listener_id = %id,
                    listener_name = registered.listener.name(),
                    action = %event.action,
                    "Delivering event to listener"
                );
                registered.listener.on_event(&event).await;
            }
        }
    }

    /// 브로드캐스트 수신자 생성 (스트림 방식)
    pub fn receiver(&self) -> broadcast::Receiver<PermissionChangedEvent> {
        self.sender.subscribe()
    }

    /// 최근 이벤트 히스토리 조회 (최신순)
    pub async fn history(&self, limit: Option<usize>) -> Vec<PermissionChangedEvent> {
        let history = self.history.read().await;
        let limit = limit.unwrap_or(history.len());
        history.iter().rev().take(limit).cloned().collect()
    }

    /// 필터로 히스토리 검색 (발행순)
    pub async fn search_history(&self, filter: &EventFilter) -> Vec<PermissionChangedEvent> {
        let history = self.history.read().await;
        history
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    /// 등록된 리스너 수
    pub async fn listener_count(&self) -> usize {
        self.listeners.read().await.len()
    }

    /// 총 발행된 이벤트 수
    pub fn event_count(&self) -> u64 {
        self.event_count.load(Ordering::SeqCst)
    }

    /// 히스토리 클리어
    pub async fn clear_history(&self) {
        self.history.write().await.clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::types;
    use std::sync::atomic::AtomicUsize;

    struct TestListener {
        name: String,
        actions: Option<Vec<ChangeAction>>,
        count: AtomicUsize,
    }

    impl TestListener {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                actions: None,
                count: AtomicUsize::new(0),
            }
        }

        fn sync_only(name: &str) -> Self {
            Self {
                actions: Some(vec![ChangeAction::Sync]),
                ..Self::new(name)
            }
        }

        fn call_count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EventListener for TestListener {
        fn name(&self) -> &str {
            &self.name
        }

        fn actions(&self) -> Option<Vec<ChangeAction>> {
            self.actions.clone()
        }

        async fn on_event(&self, _event: &PermissionChangedEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_event_bus_basic() {
        let bus = EventBus::new();

        let listener = Arc::new(TestListener::new("test"));
        let id = bus.subscribe(listener.clone()).await;
        assert_eq!(bus.listener_count().await, 1);

        bus.publish(types::synced("all", 0, 0, 0, 1)).await;
        assert_eq!(listener.call_count(), 1);
        assert_eq!(bus.event_count(), 1);

        assert!(bus.unsubscribe(id).await);
        assert!(!bus.unsubscribe(id).await);
        assert_eq!(bus.listener_count().await, 0);
    }

    #[tokio::test]
    async fn test_listener_action_interest() {
        let bus = EventBus::new();
        let listener = Arc::new(TestListener::sync_only("sync-only"));
        bus.subscribe(listener.clone()).await;

        bus.publish(types::created("1", "a:b", 1)).await;
        bus.publish(types::synced("config", 1, 0, 0, 1)).await;

        assert_eq!(listener.call_count(), 1);
    }

    #[tokio::test]
    async fn test_event_filter() {
        let filter = EventFilter::new()
            .with_actions(vec![ChangeAction::Delete])
            .with_operators(vec![7]);

        assert!(filter.matches(&types::deleted("1", "a:b", 7)));
        assert!(!filter.matches(&types::deleted("1", "a:b", 8)));
        assert!(!filter.matches(&types::created("1", "a:b", 7)));
    }

    #[tokio::test]
    async fn test_receiver_gets_published_events() {
        let bus = EventBus::new();
        let mut rx = bus.receiver();

        bus.publish(types::synced("annotation", 2, 0, 0, 3)).await;

        let event = rx.recv().await.unwrap();
        assert_eq!(event.action, ChangeAction::Sync);
        assert_eq!(event.operator_id, 3);
    }

    #[tokio::test]
    async fn test_event_history() {
        let bus = EventBus::with_config(EventBusConfig {
            history_size: 5,
            ..Default::default()
        });

        for i in 0..10 {
            bus.publish(types::created(&i.to_string(), "a:b", 1)).await;
        }

        let history = bus.history(None).await;
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].permission_id.as_deref(), Some("9"));

        let found = bus
            .search_history(&EventFilter::new().with_actions(vec![ChangeAction::Create]))
            .await;
        assert_eq!(found.len(), 5);

        bus.clear_history().await;
        assert!(bus.history(None).await.is_empty());
    }
}
