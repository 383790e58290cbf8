//! Module System - 모듈 계약과 라이프사이클
//!
//! ## 구조
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                   ModuleOrchestrator                       │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐    │
//! │  │  Module A    │──▶│  Module B    │──▶│  Module C    │    │
//! │  │ (initialize) │   │ (initialize) │   │ (initialize) │    │
//! │  └──────┬───────┘   └──────┬───────┘   └──────┬───────┘    │
//! │         │ subscribe        │ subscribe        │ publish    │
//! │         ▼                  ▼                  ▼            │
//! │  ┌─────────────────────────────────────────────────────┐   │
//! │  │            EventBus + ModuleContext (공유)           │   │
//! │  └─────────────────────────────────────────────────────┘   │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 사용법
//!
//! ```ignore
//! let bus = Arc::new(EventBus::new());
//! let mut orchestrator = ModuleOrchestrator::new(Arc::clone(&bus));
//!
//! let loader = BuiltinModuleLoader::with_builtins();
//! orchestrator.add_from_loader(&loader, "LuxImport")?;
//! orchestrator.add_from_loader(&loader, "LuxFilter")?;
//!
//! orchestrator.initialize_modules(Arc::new(ModuleContext::new("."))).await?;
//! orchestrator.execute_modules().await?;
//! // ...
//! orchestrator.shutdown_modules().await?;
//! ```

mod context;
mod descriptor;
mod loader;
mod orchestrator;
mod traits;

pub use context::ModuleContext;
pub use descriptor::{ModuleDescriptor, ModuleState, ModuleVersion};
pub use loader::{BuiltinModuleLoader, ModuleLoader};
pub use orchestrator::{InitializeReport, ModuleInfo, ModuleOrchestrator};
pub use traits::Module;
