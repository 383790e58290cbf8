//! Event Bus - 타입 기반 발행/구독 디스패처
//!
//! 레지스트리는 `이벤트 타입 -> 구독자 목록`이며 목록 순서가 곧 호출 순서입니다.
//!
//! ## Publish 순서
//!
//! 1. 현재 구독자 목록의 스냅샷을 뜬다 (이후 구독/해제는 이번 디스패치에 영향 없음)
//! 2. 동기 구독자를 순서대로 실행. 실패/패닉은 로깅만 하고 계속 진행
//! 3. 비동기 구독자를 순서대로 하나씩 await. 실패는 모아둔다
//! 4. 비동기 실패가 있으면 `Error::Dispatch`로 한꺼번에 반환
//!
//! ## 사용법
//!
//! ```ignore
//! let bus = Arc::new(EventBus::new());
//!
//! let id = bus.subscribe(|e: &ImageUpdated| {
//!     println!("image: {}", e.path());
//!     Ok(())
//! });
//!
//! bus.subscribe_async(|op: Arc<Operation<OpenCollection>>| async move {
//!     op.progress("Reading manifest", 5);
//!     op.complete();
//!     Ok(())
//! });
//!
//! bus.publish(ImageUpdated::new("/photos/a.jpg")?).await?;
//! bus.unsubscribe::<ImageUpdated>(id);
//! ```

use super::query::{PendingResponse, Query, Request};
use super::types::{Event, EventKey, SubscriberKind, SubscriptionId};
use crate::config::BusConfig;
use crate::logging::{Logger, TracingLogger};
use crate::{Error, HandlerFailure, Result};
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

const LOG_CATEGORY: &str = "EventBus";

// ============================================================================
// EventHandler Trait
// ============================================================================

/// 객체형 비동기 구독자
///
/// `subscribe_handler`로 등록하며, 같은 `Arc`로 `unsubscribe_handler` 할 수 있습니다.
#[async_trait]
pub trait EventHandler<E: Event>: Send + Sync {
    /// 핸들러 이름 (로그/에러용)
    fn name(&self) -> &str {
        "handler"
    }

    /// 이벤트 처리
    async fn handle(&self, event: Arc<E>) -> Result<()>;
}

// ============================================================================
// Registry
// ============================================================================

type AnyEvent = dyn Any + Send + Sync;
type SyncCallback = Arc<dyn Fn(&AnyEvent) -> Result<()> + Send + Sync>;
type AsyncCallback = Arc<dyn Fn(Arc<AnyEvent>) -> BoxFuture<'static, Result<()>> + Send + Sync>;

#[derive(Clone)]
enum Callback {
    Sync(SyncCallback),
    Async(AsyncCallback),
}

impl Callback {
    fn kind(&self) -> SubscriberKind {
        match self {
            Self::Sync(_) => SubscriberKind::Sync,
            Self::Async(_) => SubscriberKind::Async,
        }
    }
}

#[derive(Clone)]
struct SubscriberEntry {
    id: SubscriptionId,
    name: String,
    /// `subscribe_handler`로 등록된 경우 핸들러 `Arc`의 주소
    identity: Option<usize>,
    callback: Callback,
}

struct EventSlot {
    key: EventKey,
    entries: Vec<SubscriberEntry>,
}

/// 디스패치 결과 요약
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// 이벤트 타입 이름
    pub event_type: String,

    /// 스냅샷에 포함된 구독자 수
    pub subscribers: usize,

    /// 실행된 동기 구독자 수
    pub sync_invoked: usize,

    /// 실패(에러/패닉)한 동기 구독자 수
    pub sync_failed: usize,

    /// 실행된 비동기 구독자 수
    pub async_invoked: usize,
}

impl PublishReport {
    /// 구독자가 없었는지
    pub fn is_unhandled(&self) -> bool {
        self.subscribers == 0
    }
}

// ============================================================================
// EventBus
// ============================================================================

/// 이벤트 버스
///
/// 별도 스레드나 액터 없이 `publish` 호출자의 태스크에서 실행됩니다.
/// 여러 모듈이 공유하므로 보통 `Arc<EventBus>`로 다룹니다.
pub struct EventBus {
    /// 설정
    config: BusConfig,

    /// 진단 로그 싱크
    logger: Arc<dyn Logger>,

    /// 이벤트 타입별 구독자 목록
    registry: RwLock<HashMap<TypeId, EventSlot>>,

    /// 구독 ID 카운터
    subscription_counter: AtomicU64,

    /// 발행된 이벤트 수
    publish_count: AtomicU64,
}

impl EventBus {
    /// 기본 설정으로 이벤트 버스 생성
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// 커스텀 설정으로 이벤트 버스 생성
    pub fn with_config(config: BusConfig) -> Self {
        Self {
            config,
            logger: Arc::new(TracingLogger::new()),
            registry: RwLock::new(HashMap::new()),
            subscription_counter: AtomicU64::new(1),
            publish_count: AtomicU64::new(0),
        }
    }

    /// 로거 교체
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    pub fn logger(&self) -> Arc<dyn Logger> {
        Arc::clone(&self.logger)
    }

    // ========================================================================
    // Subscribe
    // ========================================================================

    /// 동기 구독자 등록
    pub fn subscribe<E, F>(&self, handler: F) -> SubscriptionId
    where
        E: Event,
        F: Fn(&E) -> Result<()> + Send + Sync + 'static,
    {
        let callback: SyncCallback = Arc::new(move |event: &AnyEvent| match event.downcast_ref::<E>() {
            Some(event) => handler(event),
            None => Err(type_mismatch::<E>()),
        });

        self.register::<E>(std::any::type_name::<F>(), None, Callback::Sync(callback))
    }

    /// 비동기 구독자 등록
    pub fn subscribe_async<E, F, Fut>(&self, handler: F) -> SubscriptionId
    where
        E: Event,
        F: Fn(Arc<E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let callback: AsyncCallback =
            Arc::new(move |event: Arc<AnyEvent>| match event.downcast::<E>() {
                Ok(event) => handler(event).boxed(),
                Err(_) => futures::future::ready(Err(type_mismatch::<E>())).boxed(),
            });

        self.register::<E>(std::any::type_name::<F>(), None, Callback::Async(callback))
    }

    /// 핸들러 객체 등록 (비동기)
    pub fn subscribe_handler<E: Event>(&self, handler: Arc<dyn EventHandler<E>>) -> SubscriptionId {
        let identity = handler_identity(&handler);
        let name = handler.name().to_string();

        let callback: AsyncCallback = Arc::new(move |event: Arc<AnyEvent>| {
            let handler = Arc::clone(&handler);
            match event.downcast::<E>() {
                Ok(event) => async move { handler.handle(event).await }.boxed(),
                Err(_) => futures::future::ready(Err(type_mismatch::<E>())).boxed(),
            }
        });

        self.register::<E>(&name, Some(identity), Callback::Async(callback))
    }

    fn register<E: Event>(
        &self,
        name: &str,
        identity: Option<usize>,
        callback: Callback,
    ) -> SubscriptionId {
        let id = SubscriptionId::new(self.subscription_counter.fetch_add(1, Ordering::SeqCst));
        let key = EventKey::of::<E>();
        let kind = callback.kind();

        {
            let mut registry = self.registry.write();
            registry
                .entry(key.type_id())
                .or_insert_with(|| EventSlot {
                    key,
                    entries: Vec::new(),
                })
                .entries
                .push(SubscriberEntry {
                    id,
                    name: name.to_string(),
                    identity,
                    callback,
                });
        }

        debug!(
            event_type = %key,
            subscription_id = %id,
            kind = kind.as_str(),
            "Registered subscriber"
        );

        id
    }

    // ========================================================================
    // Unsubscribe
    // ========================================================================

    /// 구독 해제. 일치하는 항목이 없으면 false (에러 아님)
    pub fn unsubscribe<E: Event>(&self, id: SubscriptionId) -> bool {
        self.remove_first::<E>(|entry| entry.id == id)
    }

    /// 핸들러 객체 기준 구독 해제 - 처음 일치하는 항목 하나만 제거
    pub fn unsubscribe_handler<E: Event>(&self, handler: &Arc<dyn EventHandler<E>>) -> bool {
        let identity = handler_identity(handler);
        self.remove_first::<E>(|entry| entry.identity == Some(identity))
    }

    fn remove_first<E: Event>(&self, matches: impl Fn(&SubscriberEntry) -> bool) -> bool {
        let type_id = TypeId::of::<E>();
        let mut registry = self.registry.write();

        let Some(slot) = registry.get_mut(&type_id) else {
            return false;
        };
        let Some(position) = slot.entries.iter().position(|entry| matches(entry)) else {
            return false;
        };

        let removed = slot.entries.remove(position);
        if slot.entries.is_empty() {
            registry.remove(&type_id);
        }

        debug!(subscription_id = %removed.id, "Unregistered subscriber");
        true
    }

    // ========================================================================
    // Publish
    // ========================================================================

    /// 이벤트 발행
    pub async fn publish<E: Event>(&self, event: E) -> Result<PublishReport> {
        self.publish_shared(Arc::new(event)).await
    }

    /// 이미 공유된 이벤트 발행 - 호출자가 publish 이후에도 이벤트를 들고 있을 때
    pub async fn publish_shared<E: Event>(&self, event: Arc<E>) -> Result<PublishReport> {
        let key = EventKey::of::<E>();
        let publish_number = self.publish_count.fetch_add(1, Ordering::SeqCst) + 1;

        let snapshot: Vec<SubscriberEntry> = {
            let registry = self.registry.read();
            registry
                .get(&key.type_id())
                .map(|slot| slot.entries.clone())
                .unwrap_or_default()
        };

        let mut report = PublishReport {
            event_type: key.short_name(),
            subscribers: snapshot.len(),
            ..Default::default()
        };

        if snapshot.is_empty() {
            if self.config.debug_mode {
                trace!(event_type = %key, "Published #{} with no subscribers", publish_number);
            }
            return Ok(report);
        }

        if self.config.debug_mode {
            self.logger.debug(
                &format!(
                    "Publishing #{} {} to {} subscriber(s)",
                    publish_number,
                    report.event_type,
                    snapshot.len()
                ),
                LOG_CATEGORY,
            );
        }

        let event: Arc<AnyEvent> = event;

        // 1. 동기 구독자
        for entry in &snapshot {
            let Callback::Sync(callback) = &entry.callback else {
                continue;
            };
            report.sync_invoked += 1;

            let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| callback(event.as_ref())));
            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(panic) => Some(format!("panicked: {}", panic_message(panic.as_ref()))),
            };

            if let Some(message) = failure {
                report.sync_failed += 1;
                let error = Error::Handler(HandlerFailure {
                    subscription: entry.id.to_string(),
                    handler: entry.name.clone(),
                    message,
                });
                self.logger
                    .error(&format!("{} while publishing {}", error, report.event_type), LOG_CATEGORY);
            }
        }

        // 2. 비동기 구독자 - 하나씩 순서대로
        let mut failures = Vec::new();
        for entry in &snapshot {
            let Callback::Async(callback) = &entry.callback else {
                continue;
            };
            report.async_invoked += 1;

            trace!(
                event_type = %key,
                subscription_id = %entry.id,
                "Awaiting async subscriber"
            );

            let outcome = AssertUnwindSafe(async { callback(Arc::clone(&event)).await })
                .catch_unwind()
                .await;
            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(panic) => Some(format!("panicked: {}", panic_message(panic.as_ref()))),
            };

            if let Some(message) = failure {
                self.logger.error(
                    &format!(
                        "Async handler {} ({}) failed on {}: {}",
                        entry.name, entry.id, report.event_type, message
                    ),
                    LOG_CATEGORY,
                );
                failures.push(HandlerFailure {
                    subscription: entry.id.to_string(),
                    handler: entry.name.clone(),
                    message,
                });
            }
        }

        if !failures.is_empty() {
            return Err(Error::Dispatch {
                event_type: report.event_type,
                failures,
            });
        }

        if self.config.debug_mode {
            debug!(
                event_type = %key,
                sync = report.sync_invoked,
                sync_failed = report.sync_failed,
                async_invoked = report.async_invoked,
                "Publish finished"
            );
        }

        Ok(report)
    }

    /// Query 발행 후 응답 대기 핸들 반환
    ///
    /// 구독자가 없으면 핸들은 완료되지 않습니다. 필요하면 `with_timeout`을 사용하세요.
    pub async fn query<R: Request>(&self, request: R) -> Result<PendingResponse<R::Response>> {
        let (query, pending) = Query::new(request);
        self.publish(query).await?;
        Ok(pending)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// 이벤트 타입의 구독자 수
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.registry
            .read()
            .get(&TypeId::of::<E>())
            .map(|slot| slot.entries.len())
            .unwrap_or(0)
    }

    pub fn has_subscribers<E: Event>(&self) -> bool {
        self.subscriber_count::<E>() > 0
    }

    /// 구독자가 있는 이벤트 타입 이름 (정렬됨)
    pub fn event_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .registry
            .read()
            .values()
            .map(|slot| slot.key.short_name())
            .collect();
        names.sort();
        names
    }

    /// 총 발행된 이벤트 수
    pub fn publish_count(&self) -> u64 {
        self.publish_count.load(Ordering::SeqCst)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("config", &self.config)
            .field("event_types", &self.event_types())
            .field("publish_count", &self.publish_count())
            .finish()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn handler_identity<E: Event>(handler: &Arc<dyn EventHandler<E>>) -> usize {
    Arc::as_ptr(handler) as *const () as usize
}

fn type_mismatch<E: Event>() -> Error {
    Error::Internal(format!(
        "event type mismatch, expected {}",
        std::any::type_name::<E>()
    ))
}

/// 패닉 payload에서 메시지 추출
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::operation::{Operation, OperationOutcome, OperationSignal, Progress};
    use crate::logging::{LogLevel, MemoryLogger};
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;

    struct Ping;
    impl Event for Ping {}

    struct Pong;
    impl Event for Pong {}

    struct Ask;
    impl Request for Ask {
        type Response = &'static str;
    }

    struct CountingHandler {
        count: AtomicUsize,
    }

    #[async_trait]
    impl EventHandler<Ping> for CountingHandler {
        fn name(&self) -> &str {
            "counting"
        }

        async fn handle(&self, _event: Arc<Ping>) -> Result<()> {
            self.count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let bus = EventBus::new();

        let report = bus.publish(Ping).await.unwrap();
        assert!(report.is_unhandled());
        assert_eq!(report.event_type, "Ping");
        assert_eq!(bus.publish_count(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_then_unsubscribe() {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&calls);
        bus.subscribe(move |_: &Ping| {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let before = bus.subscriber_count::<Ping>();

        let c = Arc::clone(&calls);
        let id = bus.subscribe(move |_: &Ping| {
            c.fetch_add(100, Ordering::SeqCst);
            Ok(())
        });
        assert_eq!(bus.subscriber_count::<Ping>(), before + 1);

        assert!(bus.unsubscribe::<Ping>(id));
        assert!(!bus.unsubscribe::<Ping>(id));
        assert_eq!(bus.subscriber_count::<Ping>(), before);

        bus.publish(Ping).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dispatch_matches_exact_type() {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&calls);
        bus.subscribe(move |_: &Ping| {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let report = bus.publish(Pong).await.unwrap();
        assert!(report.is_unhandled());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(bus.event_types(), vec!["Ping".to_string()]);
    }

    #[tokio::test]
    async fn test_sync_order_and_error_isolation() {
        let logger = Arc::new(MemoryLogger::new());
        let bus = EventBus::new().with_logger(logger.clone());
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let order = Arc::clone(&order);
            bus.subscribe(move |_: &Ping| {
                order.lock().push(i);
                match i {
                    1 => Err("handler refused".into()),
                    3 => panic!("handler blew up"),
                    _ => Ok(()),
                }
            });
        }

        let report = bus.publish(Ping).await.unwrap();

        assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
        assert_eq!(report.sync_invoked, 5);
        assert_eq!(report.sync_failed, 2);
        assert_eq!(logger.at_least(LogLevel::Error).len(), 2);
        assert!(logger.contains("handler refused"));
        assert!(logger.contains("handler blew up"));
        assert!(logger.contains("Handler error: "));
        assert!(logger.contains("while publishing Ping"));
    }

    #[tokio::test]
    async fn test_sync_runs_before_async() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o = Arc::clone(&order);
        bus.subscribe_async(move |_: Arc<Ping>| {
            let o = Arc::clone(&o);
            async move {
                o.lock().push("async-1");
                Ok(())
            }
        });
        let o = Arc::clone(&order);
        bus.subscribe(move |_: &Ping| {
            o.lock().push("sync");
            Ok(())
        });
        let o = Arc::clone(&order);
        bus.subscribe_async(move |_: Arc<Ping>| {
            let o = Arc::clone(&o);
            async move {
                tokio::task::yield_now().await;
                o.lock().push("async-2");
                Ok(())
            }
        });

        bus.publish(Ping).await.unwrap();
        assert_eq!(*order.lock(), vec!["sync", "async-1", "async-2"]);
    }

    #[tokio::test]
    async fn test_async_failures_are_aggregated() {
        let bus = EventBus::new().with_logger(Arc::new(MemoryLogger::new()));
        let reached = Arc::new(AtomicUsize::new(0));

        bus.subscribe_async(|_: Arc<Ping>| async { Err::<(), _>(Error::from("first")) });
        let r = Arc::clone(&reached);
        bus.subscribe_async(move |_: Arc<Ping>| {
            let r = Arc::clone(&r);
            async move {
                r.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });
        bus.subscribe_async(|_: Arc<Ping>| async {
            if true {
                panic!("second");
            }
            Ok(())
        });

        let err = bus.publish(Ping).await.unwrap_err();

        assert_eq!(reached.load(Ordering::SeqCst), 1);
        let failures = err.handler_failures();
        assert_eq!(failures.len(), 2);
        assert!(failures[0].message.contains("first"));
        assert!(failures[1].message.contains("second"));
        assert!(matches!(err, Error::Dispatch { ref event_type, .. } if event_type == "Ping"));
    }

    #[tokio::test]
    async fn test_subscribe_during_dispatch_uses_snapshot() {
        let bus = Arc::new(EventBus::new());
        let late_calls = Arc::new(AtomicUsize::new(0));

        let inner_bus = Arc::clone(&bus);
        let late = Arc::clone(&late_calls);
        bus.subscribe(move |_: &Ping| {
            let late = Arc::clone(&late);
            inner_bus.subscribe(move |_: &Ping| {
                late.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
            Ok(())
        });

        let report = bus.publish(Ping).await.unwrap();
        assert_eq!(report.subscribers, 1);
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);
        assert_eq!(bus.subscriber_count::<Ping>(), 2);

        bus.publish(Ping).await.unwrap();
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unsubscribe_during_dispatch_uses_snapshot() {
        let bus = Arc::new(EventBus::new());
        let order = Arc::new(Mutex::new(Vec::new()));
        let targets: Arc<Mutex<Vec<SubscriptionId>>> = Arc::new(Mutex::new(Vec::new()));

        // 첫 동기 구독자가 뒤의 동기/비동기 구독자를 모두 해제
        let inner_bus = Arc::clone(&bus);
        let (o, t) = (Arc::clone(&order), Arc::clone(&targets));
        bus.subscribe(move |_: &Ping| {
            o.lock().push("remover");
            for id in t.lock().drain(..) {
                inner_bus.unsubscribe::<Ping>(id);
            }
            Ok(())
        });

        let o = Arc::clone(&order);
        let sync_id = bus.subscribe(move |_: &Ping| {
            o.lock().push("sync");
            Ok(())
        });
        let o = Arc::clone(&order);
        let async_id = bus.subscribe_async(move |_: Arc<Ping>| {
            let o = Arc::clone(&o);
            async move {
                o.lock().push("async");
                Ok(())
            }
        });
        targets.lock().extend([sync_id, async_id]);

        let report = bus.publish(Ping).await.unwrap();
        assert_eq!(report.subscribers, 3);
        assert_eq!(report.async_invoked, 1);
        assert_eq!(*order.lock(), vec!["remover", "sync", "async"]);
        assert_eq!(bus.subscriber_count::<Ping>(), 1);

        order.lock().clear();
        bus.publish(Ping).await.unwrap();
        assert_eq!(*order.lock(), vec!["remover"]);
    }

    #[tokio::test]
    async fn test_async_unsubscribe_of_later_async_uses_snapshot() {
        let bus = Arc::new(EventBus::new());
        let later_calls = Arc::new(AtomicUsize::new(0));
        let target: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));

        let inner_bus = Arc::clone(&bus);
        let t = Arc::clone(&target);
        bus.subscribe_async(move |_: Arc<Ping>| {
            let id = t.lock().take();
            let inner_bus = Arc::clone(&inner_bus);
            async move {
                if let Some(id) = id {
                    inner_bus.unsubscribe::<Ping>(id);
                }
                Ok(())
            }
        });

        let c = Arc::clone(&later_calls);
        let later = bus.subscribe_async(move |_: Arc<Ping>| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });
        *target.lock() = Some(later);

        bus.publish(Ping).await.unwrap();
        assert_eq!(later_calls.load(Ordering::SeqCst), 1);

        bus.publish(Ping).await.unwrap();
        assert_eq!(later_calls.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count::<Ping>(), 1);
    }

    #[tokio::test]
    async fn test_handler_subscribe_and_unsubscribe_by_identity() {
        let bus = EventBus::new();
        let handler = Arc::new(CountingHandler {
            count: AtomicUsize::new(0),
        });
        let as_dyn: Arc<dyn EventHandler<Ping>> = handler.clone();

        // 중복 등록은 독립 항목 두 개
        bus.subscribe_handler(Arc::clone(&as_dyn));
        bus.subscribe_handler(Arc::clone(&as_dyn));
        bus.publish(Ping).await.unwrap();
        assert_eq!(handler.count.load(Ordering::SeqCst), 2);

        assert!(bus.unsubscribe_handler(&as_dyn));
        bus.publish(Ping).await.unwrap();
        assert_eq!(handler.count.load(Ordering::SeqCst), 3);

        assert!(bus.unsubscribe_handler(&as_dyn));
        assert!(!bus.unsubscribe_handler(&as_dyn));
        assert!(!bus.has_subscribers::<Ping>());
    }

    #[tokio::test]
    async fn test_query_single_responder() {
        let bus = EventBus::new();
        bus.subscribe(|q: &Query<Ask>| {
            q.respond("V");
            Ok(())
        });

        let answer = bus.query(Ask).await.unwrap().await.unwrap();
        assert_eq!(answer, "V");
    }

    #[tokio::test]
    async fn test_query_first_responder_wins() {
        let bus = EventBus::new();
        let second_accepted = Arc::new(AtomicUsize::new(0));

        bus.subscribe_async(|q: Arc<Query<Ask>>| async move {
            q.respond("first");
            Ok(())
        });
        let s = Arc::clone(&second_accepted);
        bus.subscribe_async(move |q: Arc<Query<Ask>>| {
            let s = Arc::clone(&s);
            async move {
                if q.respond("second") {
                    s.fetch_add(1, Ordering::SeqCst);
                }
                Ok(())
            }
        });

        let answer = bus.query(Ask).await.unwrap().await.unwrap();
        assert_eq!(answer, "first");
        assert_eq!(second_accepted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_operation_ticks_then_single_completion() {
        let bus = EventBus::new();
        bus.subscribe_async(|op: Arc<Operation<&'static str>>| async move {
            for i in 1..=3u8 {
                op.progress(format!("step {}", i), i * 30);
            }
            op.complete();
            op.fail("ignored");
            Ok(())
        });

        let (op, mut tracker) = Operation::tracked("job");
        let op = Arc::new(op);
        bus.publish_shared(Arc::clone(&op)).await.unwrap();

        let signals = tracker.drain();
        assert_eq!(signals.len(), 4);
        assert_eq!(
            signals[0],
            OperationSignal::Progress(Progress::new("step 1", 30))
        );
        assert_eq!(signals[3], OperationSignal::Completed);
        assert_eq!(op.outcome(), Some(OperationOutcome::Completed));
    }
}
