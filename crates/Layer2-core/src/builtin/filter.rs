//! LuxFilter - 필터 알고리즘 카탈로그 모듈
//!
//! `Query<FilterCatalogRequest>`에 등록된 알고리즘 목록으로 응답합니다.

use crate::events::{FilterCatalogQuery, FilterDescriptor};
use crate::module::{Module, ModuleContext, ModuleDescriptor, ModuleVersion};
use async_trait::async_trait;
use luxoria_foundation::{Error, EventBus, Logger, Result, SubscriptionId};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;

/// 필터 카탈로그 모듈
pub struct FilterModule {
    catalog: Arc<Vec<FilterDescriptor>>,
    wiring: Mutex<Option<(Arc<EventBus>, SubscriptionId)>>,
}

impl FilterModule {
    pub const NAME: &'static str = "LuxFilter";

    /// 기본 알고리즘 (Sharpness, Resolution, Brisque)
    pub fn new() -> Self {
        Self::with_catalog(vec![
            FilterDescriptor::new("Sharpness", "Sharpness algorithm", "1.0.0"),
            FilterDescriptor::new("Resolution", "Resolution algorithm", "1.0.0"),
            FilterDescriptor::new("Brisque", "Brisque algorithm", "1.0.0"),
        ])
    }

    pub fn with_catalog(catalog: Vec<FilterDescriptor>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            wiring: Mutex::new(None),
        }
    }

    pub fn catalog(&self) -> &[FilterDescriptor] {
        &self.catalog
    }
}

impl Default for FilterModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for FilterModule {
    fn descriptor(&self) -> ModuleDescriptor {
        ModuleDescriptor::new(Self::NAME, ModuleVersion::new(1, 0, 0))
            .with_description("Scores collection assets with image quality algorithms")
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

        let catalog = Arc::clone(&self.catalog);
        let id = bus.subscribe(move |query: &FilterCatalogQuery| {
            query.respond(catalog.as_ref().clone());
            Ok(())
        });
        *wiring = Some((bus, id));

        logger.info(
            &format!("Filter catalog ready with {} algorithm(s)", self.catalog.len()),
            Self::NAME,
        );
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        if let Some((bus, id)) = self.wiring.lock().take() {
            bus.unsubscribe::<FilterCatalogQuery>(id);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::FilterCatalogRequest;
    use luxoria_foundation::TracingLogger;

    #[tokio::test]
    async fn test_answers_catalog_query() {
        let bus = Arc::new(EventBus::new());
        let module = FilterModule::new();
        module
            .initialize(
                Arc::clone(&bus),
                Arc::new(ModuleContext::new("/tmp")),
                TracingLogger::shared(),
            )
            .await
            .unwrap();

        let catalog = bus.query(FilterCatalogRequest).await.unwrap().await.unwrap();
        let names: Vec<&str> = catalog.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Sharpness", "Resolution", "Brisque"]);

        module.shutdown().await.unwrap();
        assert!(!bus.has_subscribers::<FilterCatalogQuery>());
    }

    #[tokio::test]
    async fn test_double_initialize_rejected() {
        let bus = Arc::new(EventBus::new());
        let ctx = Arc::new(ModuleContext::new("/tmp"));
        let module = FilterModule::with_catalog(Vec::new());

        module
            .initialize(Arc::clone(&bus), Arc::clone(&ctx), TracingLogger::shared())
            .await
            .unwrap();
        let err = module
            .initialize(bus, ctx, TracingLogger::shared())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ModuleState(_)));
    }
}
