//! Event System - 모듈 간 통신
//!
//! 모듈은 서로를 직접 참조하지 않고 공유 `EventBus`로만 대화합니다.
//!
//! ## 이벤트 종류
//!
//! ```text
//! ┌──────────────┬────────────────────────────┬───────────────────────────┐
//! │ Notification │ 불변 payload               │ impl Event for X {}       │
//! │ Query        │ payload + 단일 응답 슬롯   │ Query<R: Request>         │
//! │ Operation    │ payload + 진행/종료 신호   │ Operation<P>              │
//! └──────────────┴────────────────────────────┴───────────────────────────┘
//! ```
//!
//! ## 사용법
//!
//! ```ignore
//! use luxoria_foundation::event::{EventBus, Operation, OperationSignal};
//!
//! let bus = Arc::new(EventBus::new());
//!
//! // Query
//! let filters = bus.query(FilterCatalogRequest).await?.await?;
//!
//! // Operation
//! let op = Operation::new(OpenCollection::new("Demo", "/photos"))
//!     .on_progress(|p| println!("{} {:?}", p.message, p.percent))
//!     .on_failed(|reason| eprintln!("import failed: {}", reason));
//! bus.publish(op).await?;
//! ```

pub mod bus;
pub mod operation;
pub mod query;
pub mod types;

pub use bus::{EventBus, EventHandler, PublishReport};
pub use operation::{Operation, OperationOutcome, OperationSignal, OperationTracker, Progress};
pub use query::{PendingResponse, Query, Request, Responder};
pub use types::{short_type_name, Event, EventKey, SubscriberKind, SubscriptionId};
