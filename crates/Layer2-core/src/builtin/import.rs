//! LuxImport - 컬렉션 가져오기 모듈
//!
//! - `Operation<OpenCollection>`: 디렉토리를 스캔해 지원 이미지 목록을 만들고
//!   `CollectionUpdated`를 발행한 뒤 완료. 경로가 없거나 디렉토리가 아니면
//!   operation을 실패로 표시 (디스패치 자체는 성공)
//! - `Query<LatestCollectionRequest>`: 마지막으로 가져온 asset 목록 응답

use crate::events::{
    Asset, CollectionUpdated, LatestCollectionQuery, OpenCollection, OpenCollectionOperation,
};
use crate::module::{Module, ModuleContext, ModuleDescriptor, ModuleVersion};
use async_trait::async_trait;
use luxoria_foundation::{Error, EventBus, Logger, Result, SubscriptionId};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::path::Path;
use std::sync::{Arc, Weak};
use tracing::debug;

const LOG_CATEGORY: &str = "LuxImport";

/// 가져오기 결과 (모듈 내부 공유 상태)
#[derive(Default)]
struct ImportState {
    latest: RwLock<Vec<Asset>>,
}

/// 초기화 시 받은 버스와 구독 핸들
struct Wiring {
    bus: Arc<EventBus>,
    open_collection: SubscriptionId,
    latest_collection: SubscriptionId,
}

/// 컬렉션 가져오기 모듈
#[derive(Default)]
pub struct ImportModule {
    state: Arc<ImportState>,
    wiring: Mutex<Option<Wiring>>,
}

impl ImportModule {
    pub const NAME: &'static str = "LuxImport";

    pub fn new() -> Self {
        Self::default()
    }

    /// 마지막으로 가져온 asset
    pub fn latest_assets(&self) -> Vec<Asset> {
        self.state.latest.read().clone()
    }
}

#[async_trait]
impl Module for ImportModule {
    fn descriptor(&self) -> ModuleDescriptor {
        ModuleDescriptor::new(Self::NAME, ModuleVersion::new(1, 0, 0))
            .with_description("Imports image collections from a directory")
    }

    async fn initialize(
        &self,
        bus: Arc<EventBus>,
        _context: Arc<ModuleContext>,
        logger: Arc<dyn Logger>,
    ) -> Result<()> {
        let mut wiring = self.wiring.lock();
        if wiring.is_some() {
            return Err(Error::ModuleState(format!("{} already initialized", Self::NAME)));
        }

        // 핸들러가 버스를 강하게 잡으면 순환 참조가 되므로 Weak
        let weak_bus = Arc::downgrade(&bus);
        let state = Arc::clone(&self.state);
        let handler_logger = Arc::clone(&logger);
        let open_collection = bus.subscribe_async(move |op: Arc<OpenCollectionOperation>| {
            let weak_bus = Weak::clone(&weak_bus);
            let state = Arc::clone(&state);
            let logger = Arc::clone(&handler_logger);
            async move { import_collection(op, weak_bus, state, logger).await }
        });

        let state = Arc::clone(&self.state);
        let latest_collection = bus.subscribe(move |query: &LatestCollectionQuery| {
            query.respond(state.latest.read().clone());
            Ok(())
        });

        *wiring = Some(Wiring {
            bus,
            open_collection,
            latest_collection,
        });

        logger.info("Import module ready", LOG_CATEGORY);
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        let wiring = self
            .wiring
            .lock()
            .take()
            .ok_or_else(|| Error::ModuleState(format!("{} is not initialized", Self::NAME)))?;

        wiring
            .bus
            .unsubscribe::<OpenCollectionOperation>(wiring.open_collection);
        wiring
            .bus
            .unsubscribe::<LatestCollectionQuery>(wiring.latest_collection);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// OpenCollection 처리
async fn import_collection(
    op: Arc<OpenCollectionOperation>,
    bus: Weak<EventBus>,
    state: Arc<ImportState>,
    logger: Arc<dyn Logger>,
) -> Result<()> {
    let OpenCollection { name, path } = op.payload().clone();

    op.progress("Reading manifest", 5);

    let is_dir = tokio::fs::metadata(&path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);
    if !is_dir {
        let reason = format!("Collection path {} is not a directory", path.display());
        logger.warning(&reason, LOG_CATEGORY);
        op.fail(reason);
        return Ok(());
    }

    op.progress("Indexing files", 10);
    let assets = match scan_collection(&path, &op).await {
        Ok(assets) => assets,
        Err(e) => {
            let reason = format!("Failed to index {}: {}", path.display(), e);
            logger.error(&reason, LOG_CATEGORY);
            op.fail(reason);
            return Ok(());
        }
    };

    *state.latest.write() = assets.clone();
    logger.info(
        &format!("Imported {} asset(s) into collection {}", assets.len(), name),
        LOG_CATEGORY,
    );

    if let Some(bus) = bus.upgrade() {
        if let Err(e) = bus.publish(CollectionUpdated::new(&name, &path, assets)).await {
            op.fail(format!("Collection update was not delivered: {}", e));
            return Err(e);
        }
    }

    op.progress("Done", 100);
    op.complete();
    Ok(())
}

/// 지원 확장자 파일 수집 (하위 디렉토리 제외, 파일 이름순)
async fn scan_collection(dir: &Path, op: &OpenCollectionOperation) -> Result<Vec<Asset>> {
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let candidates: Vec<Asset> = files.into_iter().filter_map(Asset::from_path).collect();
    let total = candidates.len();
    if total == 0 {
        op.progress("No files found to index.", 90);
        return Ok(candidates);
    }

    for (i, asset) in candidates.iter().enumerate() {
        // 10% ~ 90% 구간
        let percent = 10 + ((i + 1) * 80 / total) as u8;
        op.progress(
            format!("Processing file: {}... ({}/{})", asset.file_name, i + 1, total),
            percent,
        );
        debug!(file = %asset.file_name, "Indexed asset");
    }

    Ok(candidates)
}
