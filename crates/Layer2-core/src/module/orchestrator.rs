//! Module Orchestrator - 모듈 라이프사이클 관리
//!
//! - 등록 순서대로 하나씩 초기화 (앞선 모듈의 구독이 끝난 뒤 다음 모듈 시작)
//! - 초기화 실패 정책: fail-fast (기본) 또는 isolate
//! - 종료는 기본적으로 등록 역순, 실패해도 나머지를 계속 종료하고 집계
//!
//! 등록/제거/초기화는 `&mut self`를 요구합니다. 애플리케이션 시작 시점에
//! 한 태스크에서 구성하는 것을 전제로 합니다.

use super::context::ModuleContext;
use super::descriptor::{ModuleDescriptor, ModuleState};
use super::loader::ModuleLoader;
use super::traits::Module;
use crate::events::{ModuleInitialized, ModuleShutDown};
use luxoria_foundation::{
    Error, EventBus, InitFailurePolicy, Logger, ModuleFailure, OrchestratorConfig, Result,
    ShutdownOrder,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

const LOG_CATEGORY: &str = "ModuleOrchestrator";

/// 등록된 모듈
struct ModuleEntry {
    module: Arc<dyn Module>,
    descriptor: ModuleDescriptor,
    state: ModuleState,
    /// 마지막 실패 사유 (isolate 정책에서 기록)
    failure: Option<String>,
}

/// 모듈 요약 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub descriptor: ModuleDescriptor,
    pub state: ModuleState,
    pub failure: Option<String>,
}

/// 초기화 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitializeReport {
    /// 이번 호출에서 초기화된 모듈 (순서대로)
    pub initialized: Vec<String>,

    /// isolate 정책으로 격리된 모듈
    pub isolated: Vec<ModuleFailure>,
}

/// 모듈 오케스트레이터
pub struct ModuleOrchestrator {
    /// 등록 순서대로 보관
    entries: Vec<ModuleEntry>,

    /// 공유 이벤트 버스
    bus: Arc<EventBus>,

    /// 모듈에 넘기는 로거
    logger: Arc<dyn Logger>,

    /// 설정
    config: OrchestratorConfig,
}

impl ModuleOrchestrator {
    /// 새 오케스트레이터 생성 (버스의 로거를 공유)
    pub fn new(bus: Arc<EventBus>) -> Self {
        let logger = bus.logger();
        Self {
            entries: Vec::new(),
            bus,
            logger,
            config: OrchestratorConfig::default(),
        }
    }

    /// 설정 지정
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// 로거 교체
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    // ========================================================================
    // 등록/제거
    // ========================================================================

    /// 모듈 등록. 같은 이름이 이미 있으면 AlreadyExists
    pub fn add_module(&mut self, module: Arc<dyn Module>) -> Result<()> {
        let descriptor = module.descriptor();

        if self.position(&descriptor.name).is_some() {
            return Err(Error::AlreadyExists(format!("module {}", descriptor.name)));
        }

        debug!(module = %descriptor.name, version = %descriptor.version, "Module registered");
        self.entries.push(ModuleEntry {
            module,
            descriptor,
            state: ModuleState::Registered,
            failure: None,
        });

        Ok(())
    }

    /// 로더로 생성해서 등록
    pub fn add_from_loader(&mut self, loader: &dyn ModuleLoader, name: &str) -> Result<()> {
        let module = loader.load(name)?;
        self.add_module(module)
    }

    /// 모듈 제거. 초기화된 모듈은 먼저 종료
    ///
    /// 종료 실패는 로그로 남기고 제거는 계속합니다.
    pub async fn remove_module(&mut self, name: &str) -> Result<Arc<dyn Module>> {
        let index = self
            .position(name)
            .ok_or_else(|| Error::NotFound(format!("module {}", name)))?;

        if self.entries[index].state == ModuleState::Initialized {
            if let Err(failure) = self.shutdown_entry(index).await {
                self.logger.warning(
                    &format!("Module {} removed after failed shutdown: {}", name, failure.message),
                    LOG_CATEGORY,
                );
            }
        }

        let entry = self.entries.remove(index);
        debug!(module = %name, "Module removed");
        Ok(entry.module)
    }

    // ========================================================================
    // 조회
    // ========================================================================

    /// 등록 순서대로 모듈 정보
    pub fn modules(&self) -> Vec<ModuleInfo> {
        self.entries
            .iter()
            .map(|entry| ModuleInfo {
                descriptor: entry.descriptor.clone(),
                state: entry.state,
                failure: entry.failure.clone(),
            })
            .collect()
    }

    /// 모듈 상태 (없으면 Unregistered)
    pub fn state(&self, name: &str) -> ModuleState {
        self.position(name)
            .map(|index| self.entries[index].state)
            .unwrap_or(ModuleState::Unregistered)
    }

    /// 이름으로 모듈 조회
    pub fn get(&self, name: &str) -> Option<Arc<dyn Module>> {
        self.position(name)
            .map(|index| Arc::clone(&self.entries[index].module))
    }

    /// 타입으로 첫 번째 모듈 조회
    pub fn find<T: Module + 'static>(&self) -> Option<&T> {
        self.entries
            .iter()
            .find_map(|entry| entry.module.as_any().downcast_ref::<T>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.descriptor.name == name)
    }

    // ========================================================================
    // 라이프사이클
    // ========================================================================

    /// Registered 상태인 모듈을 등록 순서대로 초기화
    pub async fn initialize_modules(
        &mut self,
        context: Arc<ModuleContext>,
    ) -> Result<InitializeReport> {
        let mut report = InitializeReport::default();

        for index in 0..self.entries.len() {
            if self.entries[index].state != ModuleState::Registered {
                continue;
            }

            let module = Arc::clone(&self.entries[index].module);
            let descriptor = self.entries[index].descriptor.clone();

            self.logger.debug(
                &format!("Initializing module {}", descriptor),
                LOG_CATEGORY,
            );

            let result = module
                .initialize(
                    Arc::clone(&self.bus),
                    Arc::clone(&context),
                    Arc::clone(&self.logger),
                )
                .await;

            match result {
                Ok(()) => {
                    self.entries[index].state = ModuleState::Initialized;
                    self.logger.info(
                        &format!("Module {} initialized", descriptor),
                        LOG_CATEGORY,
                    );
                    self.notify(ModuleInitialized {
                        name: descriptor.name.clone(),
                        version: descriptor.version.to_string(),
                    })
                    .await;
                    report.initialized.push(descriptor.name);
                }
                Err(e) => {
                    self.logger.error(
                        &format!("Module {} failed to initialize: {}", descriptor.name, e),
                        LOG_CATEGORY,
                    );

                    match self.config.init_failure_policy {
                        InitFailurePolicy::FailFast => {
                            return Err(Error::module_init(descriptor.name, e));
                        }
                        InitFailurePolicy::Isolate => {
                            let message = e.to_string();
                            self.entries[index].state = ModuleState::Failed;
                            self.entries[index].failure = Some(message.clone());
                            report.isolated.push(ModuleFailure {
                                module: descriptor.name,
                                message,
                            });
                        }
                    }
                }
            }
        }

        info!(
            initialized = report.initialized.len(),
            isolated = report.isolated.len(),
            "Module initialization finished"
        );

        Ok(report)
    }

    /// 초기화된 모듈을 등록 순서대로 실행. 첫 실패에서 중단
    pub async fn execute_modules(&self) -> Result<()> {
        for entry in &self.entries {
            if entry.state != ModuleState::Initialized {
                continue;
            }

            if let Err(e) = entry.module.execute().await {
                self.logger.error(
                    &format!("Module {} failed to execute: {}", entry.descriptor.name, e),
                    LOG_CATEGORY,
                );
                return Err(e);
            }
        }

        Ok(())
    }

    /// 초기화된 모듈 종료. 실패해도 나머지를 계속 종료하고 집계해서 반환
    pub async fn shutdown_modules(&mut self) -> Result<()> {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        if self.config.shutdown_order == ShutdownOrder::Reverse {
            order.reverse();
        }

        let mut failures = Vec::new();
        for index in order {
            if self.entries[index].state != ModuleState::Initialized {
                continue;
            }
            if let Err(failure) = self.shutdown_entry(index).await {
                failures.push(failure);
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::ModuleShutdown(failures))
        }
    }

    /// 모듈 하나 종료. 성공/실패와 관계없이 ShutDown으로 전이
    async fn shutdown_entry(&mut self, index: usize) -> std::result::Result<(), ModuleFailure> {
        let module = Arc::clone(&self.entries[index].module);
        let name = self.entries[index].descriptor.name.clone();

        let failure = match module.shutdown().await {
            Ok(()) => {
                self.logger.info(&format!("Module {} shut down", name), LOG_CATEGORY);
                None
            }
            Err(e) => {
                self.logger.error(
                    &format!("Module {} failed to shut down: {}", name, e),
                    LOG_CATEGORY,
                );
                Some(ModuleFailure {
                    module: name.clone(),
                    message: e.to_string(),
                })
            }
        };

        self.entries[index].state = ModuleState::ShutDown;
        self.notify(ModuleShutDown {
            name,
            failure: failure.clone(),
        })
        .await;

        match failure {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    /// 라이프사이클 알림 발행. 구독자 실패는 경고만 남김
    async fn notify<E: luxoria_foundation::Event>(&self, event: E) {
        if let Err(e) = self.bus.publish(event).await {
            warn!(error = %e, "Lifecycle notification subscriber failed");
        }
    }
}
