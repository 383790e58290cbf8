//! Luxoria Config - 통합 설정
//!
//! 버스/오케스트레이터/로그 설정을 하나로 관리

use crate::logging::LogLevel;
use crate::storage::{load_file, JsonStore};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 설정 파일명
pub const LUXORIA_CONFIG_FILE: &str = "config.json";

// ============================================================================
// Luxoria Config (통합)
// ============================================================================

/// Luxoria 통합 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LuxoriaConfig {
    /// 버전 (마이그레이션용)
    #[serde(default = "default_version")]
    pub version: u32,

    /// 이벤트 버스 설정
    #[serde(default)]
    pub bus: BusConfig,

    /// 모듈 오케스트레이터 설정
    #[serde(default)]
    pub modules: OrchestratorConfig,

    /// 로그 설정
    #[serde(default)]
    pub log: LogConfig,
}

fn default_version() -> u32 {
    1
}

impl LuxoriaConfig {
    pub fn new() -> Self {
        Self {
            version: default_version(),
            ..Default::default()
        }
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// 글로벌 + 프로젝트 병합 로드
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        // 1. 글로벌 설정
        if let Ok(global) = JsonStore::global() {
            if let Some(global_config) = global.load_optional::<LuxoriaConfig>(LUXORIA_CONFIG_FILE)? {
                config.merge(global_config);
            }
        }

        // 2. 프로젝트 설정
        if let Ok(project) = JsonStore::current_project() {
            if let Some(project_config) = project.load_optional::<LuxoriaConfig>(LUXORIA_CONFIG_FILE)? {
                config.merge(project_config);
            }
        }

        Ok(config)
    }

    /// 지정 경로에서 로드
    pub fn load_from(path: &Path) -> Result<Self> {
        load_file(path)
    }

    /// 저장소에서 로드 (없으면 기본값)
    pub fn load_from_store(store: &JsonStore) -> Result<Self> {
        Ok(store
            .load_optional::<LuxoriaConfig>(LUXORIA_CONFIG_FILE)?
            .unwrap_or_else(Self::new))
    }

    /// 저장소에 저장
    pub fn save_to(&self, store: &JsonStore) -> Result<()> {
        store.save(LUXORIA_CONFIG_FILE, self)
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 다른 설정과 병합 (other가 우선, 기본값인 항목은 덮어쓰지 않음)
    pub fn merge(&mut self, other: LuxoriaConfig) {
        self.version = self.version.max(other.version);
        self.bus.merge(other.bus);
        self.modules.merge(other.modules);
        self.log.merge(other.log);
    }
}

// ============================================================================
// Bus Config
// ============================================================================

/// 이벤트 버스 설정
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusConfig {
    /// 디버그 모드 (모든 publish 추적)
    #[serde(default)]
    pub debug_mode: bool,
}

impl BusConfig {
    pub fn merge(&mut self, other: BusConfig) {
        if other.debug_mode {
            self.debug_mode = true;
        }
    }
}

// ============================================================================
// Orchestrator Config
// ============================================================================

/// 모듈 초기화 실패 시 정책
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InitFailurePolicy {
    /// 첫 실패에서 중단하고 에러 전파
    #[default]
    FailFast,
    /// 실패한 모듈만 격리하고 나머지 계속 초기화
    Isolate,
}

/// 종료 순서
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShutdownOrder {
    /// 등록 역순
    #[default]
    Reverse,
    /// 등록 순서
    Registration,
}

/// 모듈 오케스트레이터 설정
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorConfig {
    #[serde(default)]
    pub init_failure_policy: InitFailurePolicy,

    #[serde(default)]
    pub shutdown_order: ShutdownOrder,
}

impl OrchestratorConfig {
    pub fn merge(&mut self, other: OrchestratorConfig) {
        if other.init_failure_policy != InitFailurePolicy::default() {
            self.init_failure_policy = other.init_failure_policy;
        }
        if other.shutdown_order != ShutdownOrder::default() {
            self.shutdown_order = other.shutdown_order;
        }
    }
}

// ============================================================================
// Log Config
// ============================================================================

/// 로그 설정
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    /// 최소 로그 레벨
    #[serde(default)]
    pub level: LogLevel,
}

impl LogConfig {
    pub fn merge(&mut self, other: LogConfig) {
        if other.level != LogLevel::default() {
            self.level = other.level;
        }
    }
}
