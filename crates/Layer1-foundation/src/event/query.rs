//! Query - 요청/응답 패턴
//!
//! 요청 payload는 불변 값이고, 응답 슬롯은 봉투(`Query<R>`)가 따로 들고 다닙니다.
//! 호출자는 `Query::new`가 돌려준 `PendingResponse`를 소유하고 await 합니다.
//!
//! ```ignore
//! let (query, pending) = Query::new(FilterCatalogRequest);
//! bus.publish(query).await?;
//! let filters = pending.with_timeout(Duration::from_secs(1)).await?;
//! ```
//!
//! 슬롯은 단일 할당입니다. 첫 응답만 유효하고 이후 응답은 무시됩니다.
//! 아무도 응답하지 않으면 `PendingResponse`는 완료되지 않습니다.
//! 버스는 이를 감지하지 않으므로 필요하면 호출자가 `with_timeout`을 씁니다.

use super::types::Event;
use crate::{Error, Result};
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;

// ============================================================================
// Request Trait
// ============================================================================

/// Query로 보낼 수 있는 요청 타입
pub trait Request: Send + Sync + 'static {
    /// 응답 타입
    type Response: Send + 'static;
}

// ============================================================================
// ResponseSlot / Responder
// ============================================================================

/// 단일 할당 응답 슬롯
struct ResponseSlot<T> {
    sender: Mutex<Option<oneshot::Sender<T>>>,
}

impl<T> ResponseSlot<T> {
    fn fulfill(&self, value: T) -> bool {
        let Some(sender) = self.sender.lock().take() else {
            return false;
        };
        // 수신측이 이미 사라졌어도 슬롯은 소비된 것으로 본다
        let _ = sender.send(value);
        true
    }

    fn is_fulfilled(&self) -> bool {
        self.sender.lock().is_none()
    }
}

/// 응답 핸들 - 구독자가 나중에 응답하기 위해 보관 가능
pub struct Responder<T> {
    slot: Arc<ResponseSlot<T>>,
}

impl<T> Responder<T> {
    /// 응답. 첫 호출이면 true, 이미 응답된 경우 아무 일도 하지 않고 false
    pub fn respond(&self, value: T) -> bool {
        self.slot.fulfill(value)
    }

    pub fn is_answered(&self) -> bool {
        self.slot.is_fulfilled()
    }
}

impl<T> Clone for Responder<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

// ============================================================================
// Query
// ============================================================================

/// Query 봉투 - 요청 payload + 응답 슬롯
pub struct Query<R: Request> {
    request: R,
    responder: Responder<R::Response>,
}

impl<R: Request> Query<R> {
    /// 봉투와 호출자용 대기 핸들 생성
    pub fn new(request: R) -> (Self, PendingResponse<R::Response>) {
        let (sender, receiver) = oneshot::channel();
        let slot = Arc::new(ResponseSlot {
            sender: Mutex::new(Some(sender)),
        });

        let query = Self {
            request,
            responder: Responder {
                slot: Arc::clone(&slot),
            },
        };
        let pending = PendingResponse {
            receiver,
            _slot: slot,
        };

        (query, pending)
    }

    /// 요청 payload
    pub fn request(&self) -> &R {
        &self.request
    }

    /// 응답 (첫 응답만 유효)
    pub fn respond(&self, value: R::Response) -> bool {
        self.responder.respond(value)
    }

    /// 이미 응답되었는지
    pub fn is_answered(&self) -> bool {
        self.responder.is_answered()
    }

    /// publish 이후에도 응답할 수 있도록 핸들 복제
    pub fn responder(&self) -> Responder<R::Response> {
        self.responder.clone()
    }
}

impl<R: Request> Event for Query<R> {}

// ============================================================================
// PendingResponse
// ============================================================================

/// 호출자가 소유하는 응답 대기 핸들
///
/// 슬롯을 함께 붙잡고 있으므로 응답이 없으면 영원히 대기합니다.
pub struct PendingResponse<T> {
    receiver: oneshot::Receiver<T>,
    _slot: Arc<ResponseSlot<T>>,
}

impl<T> PendingResponse<T> {
    /// 대기 없이 확인
    pub fn try_take(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// 외부 타임아웃을 걸고 대기
    pub async fn with_timeout(self, timeout: Duration) -> Result<T> {
        match tokio::time::timeout(timeout, self).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(format!(
                "no response within {}ms",
                timeout.as_millis()
            ))),
        }
    }
}

impl<T> Future for PendingResponse<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.receiver)
            .poll(cx)
            .map(|result| result.map_err(|_| Error::Internal("response slot closed".to_string())))
    }
}
