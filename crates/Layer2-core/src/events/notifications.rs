//! Notification 이벤트 - 불변 payload, 응답 없음

use super::models::Asset;
use chrono::{DateTime, Utc};
use luxoria_foundation::{Error, Event, LogLevel, ModuleFailure, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

// ============================================================================
// Collection
// ============================================================================

/// 컬렉션 내용이 갱신됨
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionUpdated {
    pub name: String,
    pub path: PathBuf,
    pub assets: Vec<Asset>,
}

impl CollectionUpdated {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, assets: Vec<Asset>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            assets,
        }
    }
}

impl Event for CollectionUpdated {}

/// 컬렉션 평가 완료 - asset 별 점수
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEvaluationCompleted {
    pub scores: HashMap<Uuid, f64>,
    pub computed_at: DateTime<Utc>,
}

impl CollectionEvaluationCompleted {
    pub fn new(scores: HashMap<Uuid, f64>) -> Self {
        Self {
            scores,
            computed_at: Utc::now(),
        }
    }
}

impl Event for CollectionEvaluationCompleted {}

/// 내보내기 요청
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequested {
    pub assets: Vec<Asset>,
}

impl Event for ExportRequested {}

/// 웹 컬렉션 선택됨
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebCollectionSelected {
    pub collection_id: Uuid,
}

impl Event for WebCollectionSelected {}

// ============================================================================
// Image / Input
// ============================================================================

/// 현재 이미지가 바뀜
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpdated {
    path: PathBuf,
}

impl ImageUpdated {
    /// 공백 경로는 InvalidInput
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.to_string_lossy().trim().is_empty() {
            return Err(Error::InvalidInput("image path cannot be empty".to_string()));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Event for ImageUpdated {}

/// 텍스트 입력
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextInput {
    text: String,
}

impl TextInput {
    /// 공백 텍스트는 InvalidInput
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("text cannot be empty".to_string()));
        }
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Event for TextInput {}

// ============================================================================
// UI / Log
// ============================================================================

/// 토스트 알림
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastNotification {
    pub title: String,
    pub message: String,
}

impl ToastNotification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl Event for ToastNotification {}

/// 모듈이 남기는 로그 메시지
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    pub message: String,
    pub category: String,
    pub level: LogLevel,
}

impl Event for LogMessage {}

// ============================================================================
// Module lifecycle
// ============================================================================

/// 모듈 초기화 완료
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInitialized {
    pub name: String,
    pub version: String,
}

impl Event for ModuleInitialized {}

/// 모듈 종료됨 (실패한 경우 `failure`에 사유)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleShutDown {
    pub name: String,
    pub failure: Option<ModuleFailure>,
}

impl Event for ModuleShutDown {}
