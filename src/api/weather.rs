use chrono::NaiveDate;

use crate::error::ApiResult;
use crate::models::WeatherForecast;
use crate::network::{ApiClient, RequestOptions};

impl ApiClient {
    /// `GET /weather/forecast?destination&startDate&endDate`
    pub async fn weather_forecast(
        &self,
        destination: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ApiResult<Vec<WeatherForecast>> {
        let options = RequestOptions::get()
            .query("destination", destination)
            .query("startDate", start_date)
            .query("endDate", end_date);
        self.request("/weather/forecast", options, None).await
    }

    /// Like [`ApiClient::weather_forecast`] but a failure yields no forecasts,
    /// so loading an itinerary never fails because of the weather.
    pub async fn weather_forecast_or_empty(
        &self,
        destination: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Vec<WeatherForecast> {
        match self.weather_forecast(destination, start_date, end_date).await {
            Ok(forecasts) => forecasts,
            Err(e) => {
                tracing::warn!(destination, error = %e, "Weather forecast unavailable");
                Vec::new()
            }
        }
    }
}
