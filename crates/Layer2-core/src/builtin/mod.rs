//! Builtin Modules - 프로세스에 포함된 기본 모듈
//!
//! - `ImportModule` (LuxImport): OpenCollection 처리, 최근 컬렉션 응답
//! - `FilterModule` (LuxFilter): 필터 카탈로그 응답

mod filter;
mod import;

pub use filter::FilterModule;
pub use import::ImportModule;
