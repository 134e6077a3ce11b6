use crate::constants::{
    DEFAULT_NEARBY_RADIUS_KM, DEFAULT_POPULAR_LIMIT, DEFAULT_SEARCH_LIMIT,
};
use crate::error::ApiResult;
use crate::models::{Activity, ActivityCategory, ActivityPage};
use crate::network::{ApiClient, RequestOptions};

impl ApiClient {
    /// `GET /activities/search?destination&category&limit`
    pub async fn search_activities(
        &self,
        destination: &str,
        category: Option<&ActivityCategory>,
        limit: Option<u32>,
    ) -> ApiResult<Vec<Activity>> {
        let options = RequestOptions::get()
            .query("destination", destination)
            .query_opt("category", category.map(ActivityCategory::as_str))
            .query("limit", limit.unwrap_or(DEFAULT_SEARCH_LIMIT));
        self.request("/activities/search", options, None).await
    }

    /// `GET /activities/query?q&page&size`
    pub async fn query_activities(
        &self,
        query: &str,
        page: u32,
        size: Option<u32>,
    ) -> ApiResult<ActivityPage> {
        let options = RequestOptions::get()
            .query("q", query)
            .query("page", page)
            .query("size", size.unwrap_or(DEFAULT_SEARCH_LIMIT));
        self.request("/activities/query", options, None).await
    }

    /// `GET /activities/popular?destination&limit`
    pub async fn popular_activities(
        &self,
        destination: &str,
        limit: Option<u32>,
    ) -> ApiResult<Vec<Activity>> {
        let options = RequestOptions::get()
            .query("destination", destination)
            .query("limit", limit.unwrap_or(DEFAULT_POPULAR_LIMIT));
        self.request("/activities/popular", options, None).await
    }

    /// `GET /activities/nearby?lat&lng&radius&limit`, radius in kilometres
    pub async fn nearby_activities(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
        limit: Option<u32>,
    ) -> ApiResult<Vec<Activity>> {
        let options = RequestOptions::get()
            .query("lat", latitude)
            .query("lng", longitude)
            .query("radius", radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM))
            .query("limit", limit.unwrap_or(DEFAULT_SEARCH_LIMIT));
        self.request("/activities/nearby", options, None).await
    }
}
