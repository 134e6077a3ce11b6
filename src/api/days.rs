use serde::de::IgnoredAny;

use crate::error::{ApiError, ApiResult};
use crate::models::{ActivityPlacement, ActivityUpdate, DayPlan, ReorderRequest};
use crate::network::{encode_path_segment, ApiClient, RequestOptions};

fn day_endpoint(itinerary_id: &str, day_plan_id: &str) -> ApiResult<String> {
    Ok(format!(
        "/itineraries/{}/days/{}",
        encode_path_segment(itinerary_id)?,
        encode_path_segment(day_plan_id)?
    ))
}

impl ApiClient {
    /// `POST /itineraries/{id}/days/{dayId}/activities`
    pub async fn add_activity(
        &self,
        itinerary_id: &str,
        day_plan_id: &str,
        placement: &ActivityPlacement,
        token: Option<&str>,
    ) -> ApiResult<DayPlan> {
        let endpoint = format!("{}/activities", day_endpoint(itinerary_id, day_plan_id)?);
        let options = RequestOptions::post().json(placement)?;
        self.request(&endpoint, options, token).await
    }

    /// `PUT /itineraries/{id}/days/{dayId}/activities/{activityId}`
    pub async fn update_activity(
        &self,
        itinerary_id: &str,
        day_plan_id: &str,
        activity_id: &str,
        update: &ActivityUpdate,
        token: Option<&str>,
    ) -> ApiResult<DayPlan> {
        let endpoint = format!(
            "{}/activities/{}",
            day_endpoint(itinerary_id, day_plan_id)?,
            encode_path_segment(activity_id)?
        );
        let options = RequestOptions::put().json(update)?;
        self.request(&endpoint, options, token).await
    }

    /// `DELETE /itineraries/{id}/days/{dayId}/activities/{activityId}`
    pub async fn remove_activity(
        &self,
        itinerary_id: &str,
        day_plan_id: &str,
        activity_id: &str,
        token: Option<&str>,
    ) -> ApiResult<()> {
        let endpoint = format!(
            "{}/activities/{}",
            day_endpoint(itinerary_id, day_plan_id)?,
            encode_path_segment(activity_id)?
        );
        let _: IgnoredAny = self
            .request(&endpoint, RequestOptions::delete(), token)
            .await?;
        Ok(())
    }

    /// `PUT /itineraries/{id}/days/{dayId}/reorder`
    ///
    /// The returned day plan must list its activities in exactly the
    /// requested order.
    pub async fn reorder_activities(
        &self,
        itinerary_id: &str,
        day_plan_id: &str,
        activity_ids: &[&str],
        token: Option<&str>,
    ) -> ApiResult<DayPlan> {
        let endpoint = format!("{}/reorder", day_endpoint(itinerary_id, day_plan_id)?);
        let body = ReorderRequest {
            activity_ids: activity_ids.iter().map(|id| id.to_string()).collect(),
        };
        let options = RequestOptions::put().json(&body)?;

        let plan: DayPlan = self.request(&endpoint, options, token).await?;
        if plan.activity_ids() != activity_ids {
            return Err(ApiError::Unknown(format!(
                "reorder of day {} returned {:?}, expected {:?}",
                day_plan_id,
                plan.activity_ids(),
                activity_ids
            )));
        }
        Ok(plan)
    }
}
