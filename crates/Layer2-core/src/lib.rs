//! luxoria-core: Core Runtime for Luxoria
//!
//! Layer2 - 모듈 레이어
//!
//! # 주요 모듈
//!
//! - `module`: Module 계약, ModuleContext, 로더, ModuleOrchestrator
//! - `events`: 모듈 간 이벤트 카탈로그 (Notification / Query / Operation)
//! - `builtin`: 기본 모듈 (LuxImport, LuxFilter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use luxoria_core::{BuiltinModuleLoader, ModuleContext, ModuleOrchestrator, OpenCollection};
//! use luxoria_foundation::{EventBus, Operation};
//!
//! let bus = Arc::new(EventBus::new());
//! let mut orchestrator = ModuleOrchestrator::new(Arc::clone(&bus));
//! orchestrator.add_from_loader(&BuiltinModuleLoader::with_builtins(), "LuxImport")?;
//! orchestrator.initialize_modules(Arc::new(ModuleContext::new("."))).await?;
//!
//! let op = Operation::new(OpenCollection::new("Demo", "/photos"))
//!     .on_progress(|p| println!("{}", p.message));
//! bus.publish(op).await?;
//! ```

pub mod builtin;
pub mod events;
pub mod module;

// Re-exports: Module
pub use module::{
    BuiltinModuleLoader, InitializeReport, Module, ModuleContext, ModuleDescriptor, ModuleInfo,
    ModuleLoader, ModuleOrchestrator, ModuleState, ModuleVersion,
};

// Re-exports: Builtin
pub use builtin::{FilterModule, ImportModule};

// Re-exports: Events
pub use events::{
    Asset, CollectionEvaluationCompleted, CollectionUpdated, ExportRequested, FileExtension,
    FilterCatalogQuery, FilterCatalogRequest, FilterDescriptor, ImageUpdated,
    LatestCollectionQuery, LatestCollectionRequest, LogMessage, ModuleInitialized, ModuleShutDown,
    OpenCollection, OpenCollectionOperation, TextInput, ToastNotification, TokenQuery,
    TokenRequest, WebCollectionSelected, WindowHandleQuery, WindowHandleRequest,
};
