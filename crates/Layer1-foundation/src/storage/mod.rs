//! Storage module for Luxoria
//!
//! - `json`: JSON - 설정 파일 저장/로드

mod json;

pub use json::{load_file, JsonStore, APP_DIR_NAME};
