use serde::de::IgnoredAny;

use crate::constants::DEFAULT_DESTINATION_LIMIT;
use crate::error::ApiResult;
use crate::models::{GenerateItineraryRequest, Itinerary, UpdateItineraryRequest};
use crate::network::{encode_path_segment, ApiClient, RequestOptions};

impl ApiClient {
    /// `POST /itineraries/generate`
    ///
    /// The request is validated locally first; generation itself happens on
    /// the backend. Parameters travel in the query string and the same
    /// request is mirrored in the JSON body.
    pub async fn generate_itinerary(
        &self,
        user_id: &str,
        request: &GenerateItineraryRequest,
        token: Option<&str>,
    ) -> ApiResult<Itinerary> {
        request.validate()?;

        let options = RequestOptions::post()
            .query("userId", user_id)
            .query("destination", &request.destination)
            .query("startDate", request.start_date)
            .query("endDate", request.end_date)
            .query_opt("title", request.title.as_deref())
            .json(request)?;

        let itinerary: Itinerary = self.request("/itineraries/generate", options, token).await?;
        if itinerary.day_plans.len() != request.day_count() {
            tracing::warn!(
                id = %itinerary.id,
                expected = request.day_count(),
                received = itinerary.day_plans.len(),
                "Generated itinerary does not cover every date"
            );
        }
        Ok(itinerary)
    }

    /// `GET /itineraries/my`
    pub async fn my_itineraries(&self, token: Option<&str>) -> ApiResult<Vec<Itinerary>> {
        self.request("/itineraries/my", RequestOptions::get(), token)
            .await
    }

    /// `GET /itineraries/user/{id}`
    pub async fn user_itineraries(
        &self,
        user_id: &str,
        token: Option<&str>,
    ) -> ApiResult<Vec<Itinerary>> {
        let endpoint = format!("/itineraries/user/{}", encode_path_segment(user_id)?);
        self.request(&endpoint, RequestOptions::get(), token).await
    }

    /// `GET /itineraries/{id}`
    pub async fn itinerary(&self, id: &str, token: Option<&str>) -> ApiResult<Itinerary> {
        let endpoint = format!("/itineraries/{}", encode_path_segment(id)?);
        self.request(&endpoint, RequestOptions::get(), token).await
    }

    /// `GET /itineraries/destination/{dest}?limit` (public)
    pub async fn itineraries_by_destination(
        &self,
        destination: &str,
        limit: Option<u32>,
    ) -> ApiResult<Vec<Itinerary>> {
        let endpoint = format!(
            "/itineraries/destination/{}",
            encode_path_segment(destination)?
        );
        let options =
            RequestOptions::get().query("limit", limit.unwrap_or(DEFAULT_DESTINATION_LIMIT));
        self.request(&endpoint, options, None).await
    }

    /// `GET /itineraries/search?destination` (public)
    pub async fn search_itineraries(&self, destination: &str) -> ApiResult<Vec<Itinerary>> {
        let options = RequestOptions::get().query("destination", destination);
        self.request("/itineraries/search", options, None).await
    }

    /// `PUT /itineraries/{id}` with a new title
    pub async fn update_itinerary_title(
        &self,
        id: &str,
        title: &str,
        token: Option<&str>,
    ) -> ApiResult<Itinerary> {
        let endpoint = format!("/itineraries/{}", encode_path_segment(id)?);
        let options = RequestOptions::put().json(&UpdateItineraryRequest {
            title: title.to_string(),
        })?;
        self.request(&endpoint, options, token).await
    }

    /// `DELETE /itineraries/{id}`
    pub async fn delete_itinerary(&self, id: &str, token: Option<&str>) -> ApiResult<()> {
        let endpoint = format!("/itineraries/{}", encode_path_segment(id)?);
        let _: IgnoredAny = self.request(&endpoint, RequestOptions::delete(), token).await?;
        Ok(())
    }
}
