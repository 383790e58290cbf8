//! Event Types - 버스에 흐르는 이벤트의 공통 계약
//!
//! 레지스트리 키는 이벤트 값의 정확한 런타임 타입(`TypeId`)입니다.
//! 상위 타입이나 트레이트 단위의 매칭은 없습니다.

use std::any::TypeId;

// ============================================================================
// Event Trait
// ============================================================================

/// 버스로 발행 가능한 이벤트
///
/// 이벤트 작성자는 payload 타입에 `impl Event for X {}` 만 선언하면 됩니다.
/// Query / Operation 패턴은 `Query<R>` / `Operation<P>` 봉투 타입을 사용합니다.
pub trait Event: Send + Sync + 'static {
    /// 로그/에러용 이벤트 이름 (모듈 경로 제외)
    fn event_name() -> String
    where
        Self: Sized,
    {
        short_type_name(std::any::type_name::<Self>())
    }
}

// ============================================================================
// EventKey
// ============================================================================

/// 레지스트리 키 - 이벤트 타입 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl EventKey {
    /// 이벤트 타입의 키
    pub fn of<E: Event>() -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            type_name: std::any::type_name::<E>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// 전체 타입 경로
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 모듈 경로를 뗀 이름 (예: `Query<FilterCatalogRequest>`)
    pub fn short_name(&self) -> String {
        short_type_name(self.type_name)
    }
}

impl std::fmt::Display for EventKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.short_name())
    }
}

/// `a::b::Outer<c::Inner>` -> `Outer<Inner>`
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                out.truncate(segment_start);
            }
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';' => {
                out.push(c);
                segment_start = out.len();
            }
            _ => out.push(c),
        }
    }

    out
}

// ============================================================================
// SubscriptionId / SubscriberKind
// ============================================================================

/// 구독 핸들 - Subscribe가 반환하고 Unsubscribe에 사용
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "subscription-{}", self.0)
    }
}

/// 구독자 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriberKind {
    /// 동기 콜백 - publish 중 즉시 실행
    Sync,
    /// 비동기 콜백 - 순서대로 하나씩 await
    Async,
}

impl SubscriberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Async => "async",
        }
    }
}
