//! Non-interactive commands

use anyhow::Context;
use luxoria_core::{
    BuiltinModuleLoader, FilterCatalogRequest, ModuleContext, ModuleLoader, ModuleOrchestrator,
    OpenCollection,
};
use luxoria_foundation::{
    EventBus, Logger, LuxoriaConfig, Operation, OperationOutcome, OperationSignal, TracingLogger,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// 필터 카탈로그 응답 대기 시간
const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// 버스 + 초기화된 모듈
struct Runtime {
    bus: Arc<EventBus>,
    orchestrator: ModuleOrchestrator,
}

impl Runtime {
    /// 기본 모듈을 등록하고 초기화
    async fn start(config: &LuxoriaConfig) -> anyhow::Result<Self> {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger::with_min_level(config.log.level));
        let bus = Arc::new(
            EventBus::with_config(config.bus.clone()).with_logger(Arc::clone(&logger)),
        );

        let mut orchestrator =
            ModuleOrchestrator::new(Arc::clone(&bus)).with_config(config.modules.clone());
        let loader = BuiltinModuleLoader::with_builtins();
        for name in loader.available() {
            orchestrator.add_from_loader(&loader, &name)?;
        }

        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let context = Arc::new(ModuleContext::new(working_dir).with_logger(logger));

        let report = orchestrator
            .initialize_modules(context)
            .await
            .context("module startup failed")?;
        for failure in &report.isolated {
            eprintln!("Warning: module {} disabled: {}", failure.module, failure.message);
        }

        Ok(Self { bus, orchestrator })
    }

    async fn stop(mut self) -> anyhow::Result<()> {
        self.orchestrator.shutdown_modules().await?;
        tracing::debug!(published = self.bus.publish_count(), "Runtime stopped");
        Ok(())
    }
}

/// `luxoria modules`
pub async fn list_modules(config: &LuxoriaConfig) -> anyhow::Result<()> {
    let runtime = Runtime::start(config).await?;

    println!("\nModules\n");
    println!("{:<14} {:<10} {:<13} {}", "Name", "Version", "State", "Description");
    println!("{}", "-".repeat(72));

    for info in runtime.orchestrator.modules() {
        println!(
            "{:<14} {:<10} {:<13} {}",
            info.descriptor.name,
            info.descriptor.version.to_string(),
            info.state.to_string(),
            info.failure.as_deref().unwrap_or(&info.descriptor.description)
        );
    }
    println!();

    runtime.stop().await
}

/// `luxoria import <name> <path>`
pub async fn import_collection(
    config: &LuxoriaConfig,
    name: &str,
    path: PathBuf,
) -> anyhow::Result<()> {
    let runtime = Runtime::start(config).await?;
    println!("Importing collection {} from {}\n", name, path.display());

    match run_import(runtime, OpenCollection::new(name, path)).await? {
        Some(OperationOutcome::Completed) => {
            println!("\n✓ Import completed");
            Ok(())
        }
        Some(OperationOutcome::Failed(reason)) => anyhow::bail!("Import failed: {}", reason),
        None => anyhow::bail!("Import finished without reporting an outcome"),
    }
}

/// OpenCollection 발행 후 진행 상황 출력. 디스패치가 실패해도 출력 태스크와 모듈 종료는 마무리
async fn run_import(
    runtime: Runtime,
    request: OpenCollection,
) -> anyhow::Result<Option<OperationOutcome>> {
    let (op, mut tracker) = Operation::tracked(request);

    // Spawn progress printer
    let printer = tokio::spawn(async move {
        let mut outcome = None;
        while let Some(signal) = tracker.next().await {
            match signal {
                OperationSignal::Progress(progress) => match progress.percent {
                    Some(percent) => println!("[{:>3}%] {}", percent, progress.message),
                    None => println!("[    ] {}", progress.message),
                },
                OperationSignal::Completed => outcome = Some(OperationOutcome::Completed),
                OperationSignal::Failed(reason) => outcome = Some(OperationOutcome::Failed(reason)),
            }
        }
        outcome
    });

    let dispatched = runtime.bus.publish(op).await;
    let outcome = printer.await;
    runtime.stop().await?;

    let report = dispatched?;
    let outcome = outcome?;
    if report.is_unhandled() {
        anyhow::bail!("No module handles collection imports");
    }
    Ok(outcome)
}

/// `luxoria filters`
pub async fn list_filters(config: &LuxoriaConfig) -> anyhow::Result<()> {
    let runtime = Runtime::start(config).await?;

    let filters = runtime
        .bus
        .query(FilterCatalogRequest)
        .await?
        .with_timeout(QUERY_TIMEOUT)
        .await
        .context("filter catalog query was not answered")?;

    println!("\nFilters\n");
    println!("{:<14} {:<10} {}", "Name", "Version", "Description");
    println!("{}", "-".repeat(60));
    for filter in &filters {
        println!("{:<14} {:<10} {}", filter.name, filter.version, filter.description);
    }
    println!();

    runtime.stop().await
}
