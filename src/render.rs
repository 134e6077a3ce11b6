//! Plain-text rendering for the CLI

use std::fmt::Write;

use crate::api::Diagnostics;
use crate::models::{Activity, DayPlan, Itinerary, UserPreferences, WeatherForecast};

/// Day-by-day schedule, optionally with the matching forecast under each day
pub fn itinerary(itinerary: &Itinerary, weather: &[WeatherForecast]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", itinerary.title, itinerary.id);
    let _ = writeln!(
        out,
        "{}: {} to {}, {} day(s)",
        itinerary.destination,
        itinerary.start_date,
        itinerary.end_date,
        itinerary.expected_day_count()
    );

    for (i, plan) in itinerary.day_plans.iter().enumerate() {
        out.push('\n');
        let forecast = weather.iter().find(|w| w.date == plan.date);
        out.push_str(&day_plan(i + 1, plan, forecast));
    }

    let missing = itinerary.missing_dates();
    if !missing.is_empty() {
        let dates: Vec<String> = missing.iter().map(|d| d.to_string()).collect();
        let _ = writeln!(out, "\nNo plan for: {}", dates.join(", "));
    }
    out
}

fn day_plan(number: usize, plan: &DayPlan, forecast: Option<&WeatherForecast>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Day {} - {} [{}]", number, plan.date.format("%a %b %-d"), plan.id);
    if let Some(forecast) = forecast {
        let _ = writeln!(out, "  {}", weather_line(forecast));
    }
    if plan.activities.is_empty() {
        out.push_str("  (no activities)\n");
    }
    for scheduled in &plan.activities {
        let _ = writeln!(
            out,
            "  {}  {} ({}) [{}]",
            scheduled.time_range(),
            scheduled.activity.name,
            scheduled.activity.category,
            scheduled.activity.id
        );
        if !scheduled.activity.location.address.is_empty() {
            let _ = writeln!(out, "      {}", scheduled.activity.location.address);
        }
    }
    if let Some(notes) = plan.notes.as_deref().filter(|n| !n.is_empty()) {
        let _ = writeln!(out, "  Notes: {}", notes);
    }
    out
}

fn weather_line(forecast: &WeatherForecast) -> String {
    format!(
        "{}: {}, {:.0}°-{:.0}°, humidity {:.0}%, wind {:.0}",
        forecast.date,
        forecast.description,
        forecast.temperature.min,
        forecast.temperature.max,
        forecast.humidity,
        forecast.wind_speed
    )
}

pub fn weather(forecasts: &[WeatherForecast]) -> String {
    if forecasts.is_empty() {
        return "No forecast available\n".to_string();
    }
    forecasts.iter().map(|f| weather_line(f) + "\n").collect()
}

pub fn itinerary_list(itineraries: &[Itinerary]) -> String {
    if itineraries.is_empty() {
        return "No itineraries\n".to_string();
    }
    itineraries
        .iter()
        .map(|it| {
            format!(
                "{}  {} - {}  {} to {}\n",
                it.id, it.title, it.destination, it.start_date, it.end_date
            )
        })
        .collect()
}

pub fn activities(activities: &[Activity]) -> String {
    if activities.is_empty() {
        return "No activities\n".to_string();
    }
    let mut out = String::new();
    for activity in activities {
        let _ = write!(out, "{}  {} ({})", activity.id, activity.name, activity.category);
        if let Some(rating) = activity.rating {
            let _ = write!(out, " {:.1}*", rating);
        }
        if let Some(price) = &activity.price_range {
            let _ = write!(out, " {}", price);
        }
        out.push('\n');
    }
    out
}

pub fn preferences(prefs: &UserPreferences) -> String {
    let join = |set: &std::collections::BTreeSet<String>| {
        if set.is_empty() {
            "-".to_string()
        } else {
            set.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    };
    format!(
        "Interests: {}\nBudget: {:?}\nStyle: {:?}\nDietary: {}\nTransport: {:?}\n",
        join(&prefs.interests),
        prefs.budget_level,
        prefs.travel_style,
        join(&prefs.dietary_restrictions),
        prefs.preferred_transport
    )
}

pub fn diagnostics(report: &Diagnostics) -> String {
    let line = |name: &str, result: &crate::error::ApiResult<crate::models::HealthStatus>| match result {
        Ok(status) => format!("[ok]   {}: {}\n", name, status.status),
        Err(e) => format!("[fail] {}: {}\n", name, e),
    };
    format!(
        "Base URL: {}\n{}{}",
        report.base_url,
        line("/health", &report.health),
        line("/actuator/health", &report.actuator)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Itinerary {
        serde_json::from_value(json!({
            "id": "it-9",
            "title": "Lisbon Long Weekend",
            "destination": "Lisbon",
            "startDate": "2024-06-01",
            "endDate": "2024-06-02",
            "dayPlans": [{
                "id": "d-1",
                "date": "2024-06-01",
                "notes": "Bring sunscreen",
                "activities": [{
                    "id": "a-1",
                    "name": "Belem Tower",
                    "category": "sights",
                    "location": { "latitude": 38.69, "longitude": -9.21, "address": "Av. Brasilia" },
                    "startTime": "09:00:00",
                    "endTime": "10:30:00"
                }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_itinerary_text() {
        let text = itinerary(&sample(), &[]);
        assert!(text.contains("Lisbon Long Weekend (it-9)"));
        assert!(text.contains("2 day(s)"));
        assert!(text.contains("09:00 - 10:30  Belem Tower (sights) [a-1]"));
        assert!(text.contains("Notes: Bring sunscreen"));
        assert!(text.contains("No plan for: 2024-06-02"));
    }

    #[test]
    fn test_itinerary_with_weather() {
        let forecast: WeatherForecast = serde_json::from_value(json!({
            "date": "2024-06-01",
            "temperature": { "min": 61, "max": 77 },
            "condition": "clear",
            "description": "Clear skies",
            "humidity": 40,
            "windSpeed": 8,
            "icon": "01d"
        }))
        .unwrap();
        let text = itinerary(&sample(), &[forecast]);
        assert!(text.contains("Clear skies, 61°-77°, humidity 40%, wind 8"));
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(weather(&[]), "No forecast available\n");
        assert_eq!(activities(&[]), "No activities\n");
        assert_eq!(itinerary_list(&[]), "No itineraries\n");
    }

    #[test]
    fn test_preferences_text() {
        let text = preferences(&UserPreferences::default());
        assert!(text.contains("Budget: MidRange"));
        assert!(text.contains("Interests: -"));
    }
}
