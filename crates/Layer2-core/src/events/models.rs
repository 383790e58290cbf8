//! 이벤트 payload에서 공유하는 모델

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

// ============================================================================
// FileExtension
// ============================================================================

/// 지원하는 이미지 확장자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileExtension {
    Png,
    Jpg,
    Jpeg,
    Raw,
    Arw,
}

impl FileExtension {
    pub const ALL: [FileExtension; 5] = [Self::Png, Self::Jpg, Self::Jpeg, Self::Raw, Self::Arw];

    /// 확장자 문자열 파싱 (대소문자 무시, 앞의 '.' 허용). 모르는 값이면 None
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().trim_start_matches('.').to_ascii_uppercase();
        Self::ALL.into_iter().find(|ext| ext.as_str() == normalized)
    }

    /// 파일 경로의 확장자
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpg => "JPG",
            Self::Jpeg => "JPEG",
            Self::Raw => "RAW",
            Self::Arw => "ARW",
        }
    }
}

impl std::fmt::Display for FileExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Asset
// ============================================================================

/// 컬렉션에 포함된 이미지 한 장
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Uuid,
    pub file_name: String,
    pub path: PathBuf,
    pub extension: FileExtension,
}

impl Asset {
    /// 지원 확장자인 파일이면 새 ID로 Asset 생성
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let extension = FileExtension::from_path(&path)?;
        let file_name = path.file_name()?.to_string_lossy().into_owned();

        Some(Self {
            id: Uuid::new_v4(),
            file_name,
            path,
            extension,
        })
    }
}

// ============================================================================
// FilterDescriptor
// ============================================================================

/// 필터 카탈로그 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub name: String,
    pub description: String,
    pub version: String,
}

impl FilterDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_parse() {
        assert_eq!(FileExtension::parse("png"), Some(FileExtension::Png));
        assert_eq!(FileExtension::parse(".JpEg"), Some(FileExtension::Jpeg));
        assert_eq!(FileExtension::parse(" arw "), Some(FileExtension::Arw));
        assert_eq!(FileExtension::parse("gif"), None);
        assert_eq!(FileExtension::parse(""), None);
    }

    #[test]
    fn test_asset_from_path() {
        let asset = Asset::from_path("/photos/IMG_0001.JPG").unwrap();
        assert_eq!(asset.file_name, "IMG_0001.JPG");
        assert_eq!(asset.extension, FileExtension::Jpg);

        assert!(Asset::from_path("/photos/notes.txt").is_none());
        assert!(Asset::from_path("/photos/no_extension").is_none());
    }
}
