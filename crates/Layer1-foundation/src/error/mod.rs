//! Error types for Luxoria
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Luxoria 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 이벤트 버스 관련
    // ========================================================================
    /// 동기 핸들러 실패 (버스 내부에서 로깅만 하고 전파하지 않음)
    #[error("Handler error: {0}")]
    Handler(HandlerFailure),

    /// 비동기 핸들러 실패 집계 - publish 호출자에게 전달됨
    #[error("Dispatch of {event_type} failed: {} async handler(s) failed", .failures.len())]
    Dispatch {
        event_type: String,
        failures: Vec<HandlerFailure>,
    },

    // ========================================================================
    // 모듈 관련
    // ========================================================================
    #[error("Module {module} failed to initialize: {source}")]
    ModuleInit {
        module: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Module shutdown failed: {}", format_module_failures(.0))]
    ModuleShutdown(Vec<ModuleFailure>),

    #[error("Module load error: {0}")]
    ModuleLoad(String),

    #[error("Invalid module state: {0}")]
    ModuleState(String),

    // ========================================================================
    // 실행 관련
    // ========================================================================
    #[error("Timeout: {0}")]
    Timeout(String),

    // ========================================================================
    // 일반
    // ========================================================================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 개별 핸들러 실패 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    /// 구독 ID (표시용)
    pub subscription: String,

    /// 핸들러 이름
    pub handler: String,

    /// 실패 메시지
    pub message: String,
}

impl std::fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.handler, self.subscription, self.message)
    }
}

/// 모듈 단위 실패 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFailure {
    pub module: String,
    pub message: String,
}

fn format_module_failures(failures: &[ModuleFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.module, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// 모듈 초기화 에러 생성 헬퍼
    pub fn module_init(module: impl Into<String>, source: Error) -> Self {
        Error::ModuleInit {
            module: module.into(),
            source: Box::new(source),
        }
    }

    /// 비동기 핸들러 실패 목록 (Dispatch 에러가 아니면 빈 슬라이스)
    pub fn handler_failures(&self) -> &[HandlerFailure] {
        match self {
            Error::Dispatch { failures, .. } => failures,
            _ => &[],
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_error_message() {
        let err = Error::Dispatch {
            event_type: "OpenCollection".into(),
            failures: vec![
                HandlerFailure {
                    subscription: "subscription-1".into(),
                    handler: "importer".into(),
                    message: "disk unavailable".into(),
                },
                HandlerFailure {
                    subscription: "subscription-2".into(),
                    handler: "indexer".into(),
                    message: "boom".into(),
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "Dispatch of OpenCollection failed: 2 async handler(s) failed"
        );
        assert_eq!(err.handler_failures().len(), 2);
    }

    #[test]
    fn test_handler_error_message() {
        let err = Error::Handler(HandlerFailure {
            subscription: "subscription-3".into(),
            handler: "thumbnailer".into(),
            message: "decode failed".into(),
        });

        assert_eq!(
            err.to_string(),
            "Handler error: thumbnailer (subscription-3): decode failed"
        );
        assert!(err.handler_failures().is_empty());
    }

    #[test]
    fn test_module_init_keeps_source() {
        let err = Error::module_init("LuxImport", Error::InvalidInput("bad path".into()));

        assert!(err.to_string().contains("LuxImport"));
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Invalid input: bad path"));
    }

    #[test]
    fn test_module_shutdown_lists_modules() {
        let err = Error::ModuleShutdown(vec![
            ModuleFailure { module: "a".into(), message: "x".into() },
            ModuleFailure { module: "b".into(), message: "y".into() },
        ]);
        assert_eq!(err.to_string(), "Module shutdown failed: a: x; b: y");
    }

    #[test]
    fn test_string_conversion() {
        let err: Error = "reason".into();
        assert!(matches!(err, Error::Internal(ref s) if s == "reason"));
        assert!(err.handler_failures().is_empty());
    }
}
