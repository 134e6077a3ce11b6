use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ApiError, ApiResult};

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
        }
    }

    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::POST | HttpMethod::PUT | HttpMethod::PATCH)
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::GET),
            "POST" => Ok(HttpMethod::POST),
            "PUT" => Ok(HttpMethod::PUT),
            "PATCH" => Ok(HttpMethod::PATCH),
            "DELETE" => Ok(HttpMethod::DELETE),
            _ => Err(format!("Unknown HTTP method: {}", s)),
        }
    }
}

/// HTTP Header
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub key: String,
    pub value: String,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Header {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Trims a backend `HH:mm:ss` time to `HH:mm` for display.
pub fn format_time(time: &str) -> &str {
    time.get(..5).unwrap_or(time)
}

/// Accepts RFC 3339 timestamps as well as the zone-less `LocalDateTime`
/// form the backend emits, which is read as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|ts| Some(ts.and_utc()))
        .map_err(serde::de::Error::custom)
}

/// Geographic point attached to an activity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

/// Activity category. Unknown values from the backend are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Sights,
    Food,
    Outdoor,
    Nightlife,
    Shopping,
    Culture,
    Adventure,
    Relaxation,
    #[serde(untagged)]
    Other(String),
}

impl ActivityCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityCategory::Sights => "sights",
            ActivityCategory::Food => "food",
            ActivityCategory::Outdoor => "outdoor",
            ActivityCategory::Nightlife => "nightlife",
            ActivityCategory::Shopping => "shopping",
            ActivityCategory::Culture => "culture",
            ActivityCategory::Adventure => "adventure",
            ActivityCategory::Relaxation => "relaxation",
            ActivityCategory::Other(s) => s,
        }
    }
}

impl From<&str> for ActivityCategory {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "sights" => ActivityCategory::Sights,
            "food" => ActivityCategory::Food,
            "outdoor" => ActivityCategory::Outdoor,
            "nightlife" => ActivityCategory::Nightlife,
            "shopping" => ActivityCategory::Shopping,
            "culture" => ActivityCategory::Culture,
            "adventure" => ActivityCategory::Adventure,
            "relaxation" => ActivityCategory::Relaxation,
            _ => ActivityCategory::Other(s.to_string()),
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A place or experience that can be scheduled
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: ActivityCategory,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// An activity placed at a time slot within a day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledActivity {
    #[serde(flatten)]
    pub activity: Activity,
    /// `HH:mm:ss`
    pub start_time: String,
    /// `HH:mm:ss`
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<u32>,
}

impl ScheduledActivity {
    /// Explicit estimate if present, otherwise the span between start and end.
    pub fn duration_minutes(&self) -> Option<u32> {
        if let Some(minutes) = self.estimated_duration {
            return Some(minutes);
        }
        let start = NaiveTime::from_str(&self.start_time).ok()?;
        let end = NaiveTime::from_str(&self.end_time).ok()?;
        let minutes = (end - start).num_minutes();
        u32::try_from(minutes).ok()
    }

    /// `"09:00 - 10:30"`
    pub fn time_range(&self) -> String {
        format!(
            "{} - {}",
            format_time(&self.start_time),
            format_time(&self.end_time)
        )
    }
}

/// One calendar day of an itinerary
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub activities: Vec<ScheduledActivity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DayPlan {
    pub fn activity_ids(&self) -> Vec<&str> {
        self.activities.iter().map(|a| a.activity.id.as_str()).collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum BudgetLevel {
    Budget,
    #[default]
    MidRange,
    Luxury,
}

impl FromStr for BudgetLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BUDGET" => Ok(BudgetLevel::Budget),
            "MID_RANGE" => Ok(BudgetLevel::MidRange),
            "LUXURY" => Ok(BudgetLevel::Luxury),
            _ => Err(format!("unknown budget level: {}", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum TravelStyle {
    Relaxed,
    #[default]
    Moderate,
    Packed,
}

impl FromStr for TravelStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "RELAXED" => Ok(TravelStyle::Relaxed),
            "MODERATE" | "BALANCED" => Ok(TravelStyle::Moderate),
            "PACKED" => Ok(TravelStyle::Packed),
            _ => Err(format!("unknown travel style: {}", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum PreferredTransport {
    #[default]
    Walking,
    PublicTransport,
    Car,
    Bike,
    Mixed,
}

impl FromStr for PreferredTransport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "WALKING" => Ok(PreferredTransport::Walking),
            "PUBLIC_TRANSPORT" | "PUBLIC" => Ok(PreferredTransport::PublicTransport),
            "CAR" => Ok(PreferredTransport::Car),
            "BIKE" => Ok(PreferredTransport::Bike),
            "MIXED" => Ok(PreferredTransport::Mixed),
            _ => Err(format!("unknown transport: {}", s)),
        }
    }
}

macro_rules! try_from_string {
    ($($ty:ty),*) => {
        $(impl TryFrom<String> for $ty {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        })*
    };
}

try_from_string!(BudgetLevel, TravelStyle, PreferredTransport);

/// Personalisation settings stored per backend user
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub interests: BTreeSet<String>,
    #[serde(default)]
    pub budget_level: BudgetLevel,
    #[serde(default)]
    pub travel_style: TravelStyle,
    #[serde(default)]
    pub dietary_restrictions: BTreeSet<String>,
    #[serde(default)]
    pub preferred_transport: PreferredTransport,
}

/// Backend user record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default, alias = "clerkUserId")]
    pub clerk_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<UserPreferences>,
    #[serde(default, deserialize_with = "deserialize_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItinerarySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_collaboration: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publicly_visible: Option<bool>,
}

/// A full trip plan
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub id: String,
    pub title: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,
    #[serde(default)]
    pub day_plans: Vec<DayPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ItinerarySettings>,
    #[serde(default, deserialize_with = "deserialize_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Itinerary {
    /// Number of calendar days in the trip, both ends inclusive.
    pub fn expected_day_count(&self) -> usize {
        inclusive_days(self.start_date, self.end_date)
    }

    /// Dates in the trip range that have no day plan.
    pub fn missing_dates(&self) -> Vec<NaiveDate> {
        self.start_date
            .iter_days()
            .take(self.expected_day_count())
            .filter(|date| !self.day_plans.iter().any(|plan| plan.date == *date))
            .collect()
    }

    pub fn day_plan(&self, id: &str) -> Option<&DayPlan> {
        self.day_plans.iter().find(|plan| plan.id == id)
    }
}

fn inclusive_days(start: NaiveDate, end: NaiveDate) -> usize {
    if start > end {
        return 0;
    }
    usize::try_from((end - start).num_days() + 1).unwrap_or(0)
}

/// Body/parameters for itinerary generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateItineraryRequest {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl GenerateItineraryRequest {
    pub fn new(destination: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        GenerateItineraryRequest {
            destination: destination.into(),
            start_date,
            end_date,
            title: None,
        }
    }

    pub fn day_count(&self) -> usize {
        inclusive_days(self.start_date, self.end_date)
    }

    pub fn validate(&self) -> ApiResult<()> {
        if self.destination.trim().is_empty() {
            return Err(ApiError::InvalidRequest("destination is required".into()));
        }
        if self.start_date > self.end_date {
            return Err(ApiError::InvalidRequest(format!(
                "start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItineraryRequest {
    pub title: String,
}

/// Places an existing activity into a day plan
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPlacement {
    pub activity_id: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<u32>,
}

/// Partial update of a scheduled activity; absent fields are left unchanged
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub activity_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub min: f64,
    pub max: f64,
}

/// Daily weather summary for a destination
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecast {
    pub date: NaiveDate,
    pub temperature: Temperature,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub humidity: f64,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(default)]
    pub icon: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    Walking,
    Driving,
    Transit,
    Bicycling,
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "WALKING" => Ok(TravelMode::Walking),
            "DRIVING" => Ok(TravelMode::Driving),
            "TRANSIT" => Ok(TravelMode::Transit),
            "BICYCLING" => Ok(TravelMode::Bicycling),
            _ => Err(format!("unknown travel mode: {}", s)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelTimeRequest {
    pub origin: String,
    pub destination: String,
    pub mode: TravelMode,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelTimeResponse {
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<TravelMode>,
}

/// One page of a paged activity query
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPage {
    #[serde(default)]
    pub content: Vec<Activity>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    /// Zero-based page index
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

impl ActivityPage {
    pub fn is_last(&self) -> bool {
        self.number + 1 >= self.total_pages
    }
}

/// Liveness payload; actuator responses only carry `status`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redis: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub clerk_user_id: String,
}
