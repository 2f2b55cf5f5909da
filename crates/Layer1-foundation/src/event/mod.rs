//! Event System - 권한 변경 이벤트 발행/구독
//!
//! ## 사용법
//!
//! ```ignore
//! use permsync_foundation::event::{self, EventBus, EventListener, PermissionChangedEvent};
//!
//! struct CacheInvalidator;
//!
//! #[async_trait]
//! impl EventListener for CacheInvalidator {
//!     fn name(&self) -> &str { "cache_invalidator" }
//!
//!     async fn on_event(&self, event: &PermissionChangedEvent) {
//!         // 권한 캐시 비우기...
//!     }
//! }
//!
//! let bus = Arc::new(EventBus::new());
//! bus.subscribe(Arc::new(CacheInvalidator)).await;
//! bus.publish(event::synced("all", 3, 1, 0, operator_id)).await;
//! ```

pub mod bus;
pub mod types;

pub use bus::{EventBus, EventBusConfig, EventFilter, EventListener, ListenerId};

pub use types::{
    // Event constructors
    created,
    deleted,
    synced,
    updated,
    // Core types
    ChangeAction,
    EventId,
    PermissionChangedEvent,
};
