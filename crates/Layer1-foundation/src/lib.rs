//! # luxoria-foundation
//!
//! Foundation layer for Luxoria:
//! - Event: 타입 기반 EventBus + Query / Operation 이벤트 수명주기
//! - Logging: `(message, category, level)` 로그 싱크
//! - Config: 통합 설정 (LuxoriaConfig)
//! - Storage: JsonStore (전역/프로젝트 설정 파일)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Module A        Module B        Module C               │
//! │     │ subscribe     │ publish       │ query             │
//! │     ▼               ▼               ▼                   │
//! │  ┌───────────────────────────────────────────────┐      │
//! │  │ EventBus (TypeId -> [sync | async entries])   │      │
//! │  └───────────────────────────────────────────────┘      │
//! │            │ 진단 로그                                   │
//! │            ▼                                            │
//! │        Logger (TracingLogger / MemoryLogger)            │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, HandlerFailure, ModuleFailure, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    BusConfig, InitFailurePolicy, LogConfig, LuxoriaConfig, OrchestratorConfig, ShutdownOrder,
    LUXORIA_CONFIG_FILE,
};

// ============================================================================
// Logging (로그)
// ============================================================================
pub use logging::{LogEntry, LogLevel, Logger, MemoryLogger, TracingLogger};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::{JsonStore, APP_DIR_NAME};

// ============================================================================
// Event (이벤트 시스템)
// ============================================================================
pub use event::{
    // Bus
    EventBus,
    EventHandler,
    PublishReport,
    // Types
    Event,
    EventKey,
    SubscriberKind,
    SubscriptionId,
    // Query
    PendingResponse,
    Query,
    Request,
    Responder,
    // Operation
    Operation,
    OperationOutcome,
    OperationSignal,
    OperationTracker,
    Progress,
};
