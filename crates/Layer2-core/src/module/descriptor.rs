//! Module Descriptor - 모듈 메타데이터와 상태

use serde::{Deserialize, Serialize};

/// 모듈 버전
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ModuleVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// 버전 문자열 파싱 (예: "1.2.3", "v1.2.3")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('v');
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return None;
        }

        Some(Self {
            major: parts[0].parse().ok()?,
            minor: parts[1].parse().ok()?,
            patch: parts[2].parse().ok()?,
        })
    }

    /// 같은 메이저 버전이면 호환
    pub fn is_compatible_with(&self, other: &ModuleVersion) -> bool {
        self.major == other.major
    }
}

impl std::fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Default for ModuleVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// 모듈 디스크립터 - 이름/버전/설명
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// 고유 모듈 이름 (예: "LuxImport")
    pub name: String,

    /// 버전
    pub version: ModuleVersion,

    /// 설명
    pub description: String,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>, version: ModuleVersion) -> Self {
        Self {
            name: name.into(),
            version,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl std::fmt::Display for ModuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}

/// 모듈 상태
///
/// ```text
/// Unregistered ─add─▶ Registered ─initialize─▶ Initialized ─shutdown─▶ ShutDown
///                          │
///                          └─initialize 실패 (isolate 정책)─▶ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleState {
    /// 오케스트레이터에 없음
    Unregistered,

    /// 등록됨 (아직 초기화 안됨)
    Registered,

    /// 초기화 완료
    Initialized,

    /// 초기화 실패로 격리됨
    Failed,

    /// 종료됨
    ShutDown,
}

impl ModuleState {
    /// 이벤트를 처리할 수 있는 상태인지
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Initialized)
    }
}

impl std::fmt::Display for ModuleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unregistered => write!(f, "unregistered"),
            Self::Registered => write!(f, "registered"),
            Self::Initialized => write!(f, "initialized"),
            Self::Failed => write!(f, "failed"),
            Self::ShutDown => write!(f, "shut down"),
        }
    }
}
