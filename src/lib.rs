//! # Itinerary Client
//!
//! Typed client for the trip itinerary planning REST service.
//!
//! ## Features
//! - Itinerary generation, listing, renaming and deletion
//! - Day plan activity add/update/remove/reorder
//! - Weather forecasts, travel times, activity search
//! - User lookup/creation and preferences
//! - Bearer auth, per-attempt timeout, exponential backoff
//! - cURL rendering of any prepared request
//!
//! ## Architecture
//! - Network layer: [`ApiClient::request`] owns transport, auth headers and retries
//! - API layer: thin typed wrappers, one module per resource
//! - Identity layer: session cache mapping auth-provider ids to backend ids

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod identity;
pub mod models;
pub mod network;
pub mod render;

// Re-export commonly used types
pub use api::Diagnostics;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use identity::{ExternalUser, UserDirectory};
pub use models::{
    format_time, Activity, ActivityCategory, ActivityPage, ActivityPlacement, ActivityUpdate,
    BudgetLevel, DayPlan, GenerateItineraryRequest, HealthStatus, Itinerary, Location,
    PreferredTransport, ScheduledActivity, TravelMode, TravelStyle, TravelTimeRequest,
    TravelTimeResponse, User, UserPreferences, WeatherForecast,
};
pub use network::{to_curl, ApiClient, PreparedRequest, RequestOptions, RetryPolicy};
