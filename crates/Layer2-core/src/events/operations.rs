//! Operation 이벤트 payload

use luxoria_foundation::Operation;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 컬렉션 열기 (가져오기)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenCollection {
    pub name: String,
    pub path: PathBuf,
}

impl OpenCollection {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

pub type OpenCollectionOperation = Operation<OpenCollection>;
