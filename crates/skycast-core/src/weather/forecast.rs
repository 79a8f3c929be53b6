//! Provider payloads and the reduction of a 3-hour series to daily entries.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Most dated entries rendered in one forecast summary.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Samples further than this from 12:00 do not count as a midday sample.
/// A standard 3-hour series has an exact 12:00 entry per day, so only grids
/// shifted off the hour (a 10:30/13:30 series, say) ever use the slack.
const NOON_WINDOW_SECS: i64 = 90 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    #[serde(default)]
    pub humidity: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

/// `GET /data/2.5/weather`
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentPayload {
    pub name: String,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    pub wind: Wind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    pub dt_txt: String,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    pub wind: Wind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastCity {
    pub name: String,
}

/// `GET /data/2.5/forecast`
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    pub list: Vec<ForecastEntry>,
    pub city: ForecastCity,
}

impl ForecastEntry {
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(self.dt_txt.trim(), "%Y-%m-%d %H:%M:%S").ok()
    }

    pub fn description(&self) -> &str {
        self.weather.first().map(|c| c.description.as_str()).unwrap_or("")
    }
}

fn seconds_from_noon(time: NaiveTime) -> i64 {
    (time.num_seconds_from_midnight() as i64 - 12 * 3600).abs()
}

/// Picks one entry per calendar date: the sample closest to 12:00, provided it
/// lies within the midday window. Dates without such a sample are dropped.
/// The result is chronological and holds at most [`MAX_FORECAST_DAYS`] dates.
pub fn select_daily_noon(entries: &[ForecastEntry]) -> Vec<(NaiveDate, &ForecastEntry)> {
    let mut best: BTreeMap<NaiveDate, (i64, NaiveTime, &ForecastEntry)> = BTreeMap::new();

    for entry in entries {
        let Some(ts) = entry.timestamp() else {
            log::debug!("Ignoring forecast entry with unreadable time {:?}", entry.dt_txt);
            continue;
        };
        let distance = seconds_from_noon(ts.time());
        if distance > NOON_WINDOW_SECS {
            continue;
        }

        let replace = match best.get(&ts.date()) {
            Some((best_distance, best_time, _)) => {
                distance < *best_distance || (distance == *best_distance && ts.time() < *best_time)
            }
            None => true,
        };
        if replace {
            best.insert(ts.date(), (distance, ts.time(), entry));
        }
    }

    best.into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(date, (_, _, entry))| (date, entry))
        .collect()
}

pub fn render_current(payload: &CurrentPayload) -> String {
    let description = payload
        .weather
        .first()
        .map(|c| c.description.as_str())
        .unwrap_or("");
    let humidity = payload
        .main
        .humidity
        .map(|h| h.to_string())
        .unwrap_or_else(|| "n/a".to_string());
    format!(
        "Current weather in {}:\n🌡 Temp: {}°C (feels like {}°C)\n☁️ {}\n💧 Humidity: {}%\n💨 Wind: {} m/s",
        payload.name,
        payload.main.temp,
        payload.main.feels_like,
        description,
        humidity,
        payload.wind.speed
    )
}

pub fn render_forecast(payload: &ForecastPayload) -> String {
    let days = select_daily_noon(&payload.list);
    let header = format!("🌦 5-Day Forecast for **{}**:\n\n", payload.city.name);

    if days.is_empty() {
        return format!("{}No midday forecast data available.", header);
    }

    let blocks: Vec<String> = days
        .iter()
        .map(|(date, entry)| {
            format!(
                "📅 {}\n🌡 Temp: {}°C (feels {}°C)\n☁️ {}\n💨 Wind: {} m/s\n",
                date.format("%Y-%m-%d"),
                entry.main.temp,
                entry.main.feels_like,
                entry.description(),
                entry.wind.speed
            )
        })
        .collect();

    format!("{}{}", header, blocks.join("\n"))
}
