//! Module trait - 모든 모듈이 구현하는 계약

use super::context::ModuleContext;
use super::descriptor::ModuleDescriptor;
use async_trait::async_trait;
use luxoria_foundation::{EventBus, Logger, Result};
use std::any::Any;
use std::sync::Arc;

/// 모듈 트레이트
///
/// 버스와 컨텍스트는 `initialize`에서 한 번만 전달되며 모듈 수명 동안 유효합니다.
/// 모듈은 여기서 필요한 이벤트를 구독합니다.
#[async_trait]
pub trait Module: Send + Sync {
    /// 이름/버전/설명
    fn descriptor(&self) -> ModuleDescriptor;

    /// 초기화 - 구독 등록
    async fn initialize(
        &self,
        bus: Arc<EventBus>,
        context: Arc<ModuleContext>,
        logger: Arc<dyn Logger>,
    ) -> Result<()>;

    /// 실행 (초기화 이후)
    async fn execute(&self) -> Result<()> {
        Ok(())
    }

    /// 종료 - 구독 해제 및 정리
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    /// 다운캐스팅용
    fn as_any(&self) -> &dyn Any;
}
