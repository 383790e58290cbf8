//! Config - 통합 설정 관리
//!
//! - `luxoria.rs` - LuxoriaConfig 통합 설정 (bus, modules, log)

mod luxoria;

pub use luxoria::{
    BusConfig, InitFailurePolicy, LogConfig, LuxoriaConfig, OrchestratorConfig, ShutdownOrder,
    LUXORIA_CONFIG_FILE,
};
