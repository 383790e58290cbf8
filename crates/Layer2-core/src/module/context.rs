//! Module Context - 모듈이 공유하는 명시적 컨텍스트
//!
//! 전역 싱글톤 대신 초기화 시점에 모든 모듈에 같은 컨텍스트를 넘깁니다.
//! 서비스는 타입으로 조회합니다 (`insert_service::<T>` / `service::<T>`).

use luxoria_foundation::{Error, Logger, Result, TracingLogger};
use parking_lot::RwLock;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const LOG_CATEGORY: &str = "Module";

/// 모듈 컨텍스트
pub struct ModuleContext {
    /// 타입별 공유 서비스
    services: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,

    /// 모듈 설정 (key/value)
    config: RwLock<HashMap<String, Value>>,

    /// 현재 선택된 이미지
    current_image: RwLock<Option<PathBuf>>,

    /// 작업 디렉토리
    working_dir: PathBuf,

    /// 로그 싱크
    logger: Arc<dyn Logger>,
}

impl ModuleContext {
    /// 새 컨텍스트 생성
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
            config: RwLock::new(HashMap::new()),
            current_image: RwLock::new(None),
            working_dir: working_dir.into(),
            logger: Arc::new(TracingLogger::new()),
        }
    }

    /// 로거 교체
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    // ========================================================================
    // 서비스
    // ========================================================================

    /// 서비스 등록 (같은 타입이면 교체되고 이전 값 반환)
    pub fn insert_service<T: Send + Sync + 'static>(&self, service: Arc<T>) -> Option<Arc<T>> {
        let previous = self.services.write().insert(TypeId::of::<T>(), service);
        previous.and_then(|p| p.downcast::<T>().ok())
    }

    /// 서비스 조회
    pub fn service<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let services = self.services.read();
        let service = services.get(&TypeId::of::<T>())?;
        Arc::clone(service).downcast::<T>().ok()
    }

    /// 서비스 조회 (없으면 NotFound)
    pub fn require_service<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.service::<T>().ok_or_else(|| {
            Error::NotFound(format!("service {}", std::any::type_name::<T>()))
        })
    }

    // ========================================================================
    // 설정
    // ========================================================================

    /// 설정 값 가져오기
    pub fn get_config(&self, key: &str) -> Option<Value> {
        self.config.read().get(key).cloned()
    }

    /// 설정 값 설정
    pub fn set_config(&self, key: impl Into<String>, value: Value) {
        self.config.write().insert(key.into(), value);
    }

    /// 설정 로드 (외부에서 주입)
    pub fn load_config(&self, config: HashMap<String, Value>) {
        *self.config.write() = config;
    }

    // ========================================================================
    // 현재 이미지
    // ========================================================================

    pub fn current_image(&self) -> Option<PathBuf> {
        self.current_image.read().clone()
    }

    /// 현재 이미지 교체. 빈 경로는 InvalidInput
    pub fn update_image(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidInput("image path cannot be empty".to_string()));
        }

        *self.current_image.write() = Some(path);
        Ok(())
    }

    // ========================================================================
    // 유틸리티
    // ========================================================================

    /// 작업 디렉토리
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn logger(&self) -> Arc<dyn Logger> {
        Arc::clone(&self.logger)
    }

    /// 모듈 로그. 공백뿐인 메시지는 InvalidInput
    pub fn log_message(&self, message: &str) -> Result<()> {
        if message.trim().is_empty() {
            return Err(Error::InvalidInput("log message cannot be empty".to_string()));
        }

        self.logger.info(message, LOG_CATEGORY);
        Ok(())
    }
}

impl std::fmt::Debug for ModuleContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleContext")
            .field("working_dir", &self.working_dir)
            .field("current_image", &self.current_image())
            .field("services", &self.services.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luxoria_foundation::MemoryLogger;

    struct Vault {
        name: &'static str,
    }

    #[test]
    fn test_typed_services() {
        let ctx = ModuleContext::new("/tmp");
        assert!(ctx.service::<Vault>().is_none());
        assert!(ctx.require_service::<Vault>().is_err());

        ctx.insert_service(Arc::new(Vault { name: "primary" }));
        let previous = ctx.insert_service(Arc::new(Vault { name: "secondary" }));

        assert_eq!(previous.map(|v| v.name), Some("primary"));
        assert_eq!(ctx.service::<Vault>().map(|v| v.name), Some("secondary"));
    }

    #[test]
    fn test_config_values() {
        let ctx = ModuleContext::new("/tmp");
        ctx.set_config("key", serde_json::json!("value"));

        assert_eq!(ctx.get_config("key"), Some(serde_json::json!("value")));
        assert_eq!(ctx.get_config("missing"), None);
    }

    #[test]
    fn test_current_image() {
        let ctx = ModuleContext::new("/tmp");
        assert!(ctx.current_image().is_none());
        assert!(ctx.update_image("").is_err());

        ctx.update_image("/photos/a.jpg").unwrap();
        assert_eq!(ctx.current_image(), Some(PathBuf::from("/photos/a.jpg")));
    }

    #[test]
    fn test_log_message_forwards_to_logger() {
        let logger = Arc::new(MemoryLogger::new());
        let ctx = ModuleContext::new("/tmp").with_logger(logger.clone());

        ctx.log_message("imported 3 assets").unwrap();
        assert!(matches!(ctx.log_message("   "), Err(Error::InvalidInput(_))));

        let entries = logger.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, "Module");
    }
}
