//! Query 이벤트 요청 타입
//!
//! `Query<R>` 봉투로 감싸서 발행합니다. `EventBus::query(R)`을 쓰면 간단합니다.

use super::models::{Asset, FilterDescriptor};
use luxoria_foundation::{Query, Request};

/// 사용 가능한 필터 알고리즘 목록
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterCatalogRequest;

impl Request for FilterCatalogRequest {
    type Response = Vec<FilterDescriptor>;
}

/// 메인 윈도우 핸들
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowHandleRequest;

impl Request for WindowHandleRequest {
    type Response = u64;
}

/// 외부 서비스 인증 토큰
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenRequest;

impl Request for TokenRequest {
    type Response = String;
}

/// 마지막으로 불러온 컬렉션의 asset
#[derive(Debug, Clone, Copy, Default)]
pub struct LatestCollectionRequest;

impl Request for LatestCollectionRequest {
    type Response = Vec<Asset>;
}

pub type FilterCatalogQuery = Query<FilterCatalogRequest>;
pub type WindowHandleQuery = Query<WindowHandleRequest>;
pub type TokenQuery = Query<TokenRequest>;
pub type LatestCollectionQuery = Query<LatestCollectionRequest>;
