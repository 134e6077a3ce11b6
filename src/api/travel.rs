use crate::error::ApiResult;
use crate::models::{TravelTimeRequest, TravelTimeResponse};
use crate::network::{ApiClient, RequestOptions};

impl ApiClient {
    /// `POST /travel/time`
    pub async fn travel_time(
        &self,
        request: &TravelTimeRequest,
        token: Option<&str>,
    ) -> ApiResult<TravelTimeResponse> {
        let options = RequestOptions::post().json(request)?;
        self.request("/travel/time", options, token).await
    }
}
