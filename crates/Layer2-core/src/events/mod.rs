//! Event Catalog - 모듈 사이에 오가는 이벤트 정의
//!
//! - `notifications`: 응답 없는 알림
//! - `queries`: `Query<R>`로 감싸는 요청
//! - `operations`: `Operation<P>`로 감싸는 장기 작업
//! - `models`: 공유 모델 (Asset, FileExtension, FilterDescriptor)

pub mod models;
pub mod notifications;
pub mod operations;
pub mod queries;

pub use models::{Asset, FileExtension, FilterDescriptor};
pub use notifications::{
    CollectionEvaluationCompleted, CollectionUpdated, ExportRequested, ImageUpdated, LogMessage,
    ModuleInitialized, ModuleShutDown, TextInput, ToastNotification, WebCollectionSelected,
};
pub use operations::{OpenCollection, OpenCollectionOperation};
pub use queries::{
    FilterCatalogQuery, FilterCatalogRequest, LatestCollectionQuery, LatestCollectionRequest,
    TokenQuery, TokenRequest, WindowHandleQuery, WindowHandleRequest,
};
