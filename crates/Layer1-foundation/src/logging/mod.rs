//! Logging - 구조화 로그 싱크
//!
//! 버스와 오케스트레이터, 그리고 각 모듈이 진단 메시지를 남기는 통로.
//! `(message, category, level)` 하나만 약속하며 포맷은 구현체가 정합니다.
//!
//! - `TracingLogger`: `tracing`으로 전달 (기본)
//! - `MemoryLogger`: 메모리에 기록 (테스트/진단 화면용)

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// LogLevel
// ============================================================================

/// 로그 심각도
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// 디버그 정보
    Debug,
    /// 일반 정보
    Info,
    /// 경고
    Warning,
    /// 에러
    Error,
    /// 심각한 에러
    Critical,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }

    /// 문자열 파싱 (대소문자 무시, "warn" 허용)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" | "trace" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            "critical" | "fatal" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Logger Trait
// ============================================================================

/// 로그 싱크
pub trait Logger: Send + Sync {
    /// 로그 기록
    fn log(&self, message: &str, category: &str, level: LogLevel);

    fn debug(&self, message: &str, category: &str) {
        self.log(message, category, LogLevel::Debug);
    }

    fn info(&self, message: &str, category: &str) {
        self.log(message, category, LogLevel::Info);
    }

    fn warning(&self, message: &str, category: &str) {
        self.log(message, category, LogLevel::Warning);
    }

    fn error(&self, message: &str, category: &str) {
        self.log(message, category, LogLevel::Error);
    }
}

// ============================================================================
// TracingLogger
// ============================================================================

/// `tracing` 매크로로 전달하는 기본 로거
#[derive(Debug, Clone)]
pub struct TracingLogger {
    min_level: LogLevel,
}

impl TracingLogger {
    pub fn new() -> Self {
        Self::with_min_level(LogLevel::Debug)
    }

    /// 최소 레벨 지정 (미만은 버림)
    pub fn with_min_level(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn shared() -> Arc<dyn Logger> {
        Arc::new(Self::new())
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for TracingLogger {
    fn log(&self, message: &str, category: &str, level: LogLevel) {
        if level < self.min_level {
            return;
        }

        match level {
            LogLevel::Debug => tracing::debug!(category, "{}", message),
            LogLevel::Info => tracing::info!(category, "{}", message),
            LogLevel::Warning => tracing::warn!(category, "{}", message),
            LogLevel::Error | LogLevel::Critical => {
                tracing::error!(category, severity = level.as_str(), "{}", message)
            }
        }
    }
}

// ============================================================================
// MemoryLogger
// ============================================================================

/// 기록된 로그 항목
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub message: String,
    pub category: String,
    pub level: LogLevel,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// 메모리 로거 - 모든 항목을 순서대로 보관
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 기록된 항목 복사본
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// 특정 레벨 이상의 항목
    pub fn at_least(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.level >= level)
            .cloned()
            .collect()
    }

    /// 메시지에 `needle`이 포함된 항목이 있는지
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.lock().iter().any(|e| e.message.contains(needle))
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Logger for MemoryLogger {
    fn log(&self, message: &str, category: &str, level: LogLevel) {
        self.entries.lock().push(LogEntry {
            message: message.to_string(),
            category: category.to_string(),
            level,
            timestamp: chrono::Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering_and_parse() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Error < LogLevel::Critical);
        assert_eq!(LogLevel::parse("WARN"), Some(LogLevel::Warning));
        assert_eq!(LogLevel::parse("nope"), None);
    }

    #[test]
    fn test_memory_logger_records_in_order() {
        let logger = MemoryLogger::new();
        logger.info("first", "Test");
        logger.error("second", "Test");

        let entries = logger.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[1].level, LogLevel::Error);
        assert_eq!(logger.at_least(LogLevel::Warning).len(), 1);
        assert!(logger.contains("sec"));
    }
}
