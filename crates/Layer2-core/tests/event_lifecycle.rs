//! 모듈 오케스트레이션과 이벤트 수명주기 통합 테스트

use async_trait::async_trait;
use luxoria_core::{
    FilterCatalogRequest, FilterModule, ImportModule, Module, ModuleContext, ModuleDescriptor,
    ModuleOrchestrator, ModuleState, ModuleVersion, OpenCollection, OpenCollectionOperation,
};
use luxoria_foundation::{
    Event, EventBus, Logger, MemoryLogger, Operation, OperationOutcome, Result,
};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct X;
impl Event for X {}

/// 초기화 중에 X를 발행하는 모듈
struct Publisher;

#[async_trait]
impl Module for Publisher {
    fn descriptor(&self) -> ModuleDescriptor {
        ModuleDescriptor::new("A", ModuleVersion::new(1, 0, 0))
    }

    async fn initialize(
        &self,
        bus: Arc<EventBus>,
        _context: Arc<ModuleContext>,
        _logger: Arc<dyn Logger>,
    ) -> Result<()> {
        let report = bus.publish(X).await?;
        assert!(report.is_unhandled());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// 초기화 때 X를 구독하는 모듈
struct Listener {
    hits: Arc<AtomicUsize>,
}

#[async_trait]
impl Module for Listener {
    fn descriptor(&self) -> ModuleDescriptor {
        ModuleDescriptor::new("B", ModuleVersion::new(1, 0, 0))
    }

    async fn initialize(
        &self,
        bus: Arc<EventBus>,
        _context: Arc<ModuleContext>,
        _logger: Arc<dyn Logger>,
    ) -> Result<()> {
        let hits = Arc::clone(&self.hits);
        bus.subscribe(move |_: &X| {
            hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn quiet_bus() -> Arc<EventBus> {
    Arc::new(EventBus::new().with_logger(Arc::new(MemoryLogger::new())))
}

#[tokio::test]
async fn sequential_init_ordering_contract() {
    let bus = quiet_bus();
    let hits = Arc::new(AtomicUsize::new(0));

    let mut orchestrator = ModuleOrchestrator::new(Arc::clone(&bus));
    orchestrator.add_module(Arc::new(Publisher)).unwrap();
    orchestrator
        .add_module(Arc::new(Listener {
            hits: Arc::clone(&hits),
        }))
        .unwrap();

    orchestrator
        .initialize_modules(Arc::new(ModuleContext::new("/tmp")))
        .await
        .unwrap();

    // A가 초기화 중에 발행한 X는 B에게 가지 않음
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(orchestrator.state("B"), ModuleState::Initialized);

    bus.publish(X).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn import_demo_collection_end_to_end() {
    let bus = quiet_bus();
    bus.subscribe_async(|op: Arc<OpenCollectionOperation>| async move {
        assert_eq!(op.payload().name, "Demo");
        op.progress("Reading manifest", 5);
        op.progress("Indexing files", 50);
        op.progress("Done", 100);
        op.complete();
        Ok(())
    });

    let progress = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    let p = Arc::clone(&progress);
    let c = Arc::clone(&completed);
    let f = Arc::clone(&failed);
    let op = Operation::new(OpenCollection::new("Demo", "/photos"))
        .on_progress(move |tick| p.lock().push((tick.message.clone(), tick.percent)))
        .on_completed(move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
        .on_failed(move |_| {
            f.fetch_add(1, Ordering::SeqCst);
        });

    bus.publish(op).await.unwrap();

    assert_eq!(
        *progress.lock(),
        vec![
            ("Reading manifest".to_string(), Some(5)),
            ("Indexing files".to_string(), Some(50)),
            ("Done".to_string(), Some(100)),
        ]
    );
    assert_eq!(completed.load(Ordering::SeqCst), 1);
    assert_eq!(failed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn builtin_modules_through_orchestrator() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("shot.arw"), b"raw").unwrap();

    let logger = Arc::new(MemoryLogger::new());
    let bus = Arc::new(EventBus::new().with_logger(logger.clone()));
    let mut orchestrator = ModuleOrchestrator::new(Arc::clone(&bus));
    orchestrator.add_module(Arc::new(FilterModule::new())).unwrap();
    orchestrator.add_module(Arc::new(ImportModule::new())).unwrap();
    orchestrator
        .initialize_modules(Arc::new(ModuleContext::new(dir.path())))
        .await
        .unwrap();

    let catalog = bus
        .query(FilterCatalogRequest)
        .await
        .unwrap()
        .with_timeout(Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(catalog.len(), 3);

    let op = Arc::new(Operation::new(OpenCollection::new("Demo", dir.path())));
    bus.publish_shared(Arc::clone(&op)).await.unwrap();
    assert_eq!(op.outcome(), Some(OperationOutcome::Completed));

    let import = orchestrator.find::<ImportModule>().unwrap();
    assert_eq!(import.latest_assets().len(), 1);

    orchestrator.shutdown_modules().await.unwrap();
    assert!(bus.event_types().is_empty());
    assert!(logger.contains("Module LuxImport v1.0.0 initialized"));
}

#[tokio::test]
async fn unanswered_query_needs_external_timeout() {
    let bus = quiet_bus();

    let pending = bus.query(FilterCatalogRequest).await.unwrap();
    let result = pending.with_timeout(Duration::from_millis(20)).await;

    assert!(result.is_err());
}
