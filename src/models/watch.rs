use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

pub const MIN_INTERVAL_MS: u64 = 1000;
pub const MS_PER_MINUTE: u64 = 60_000;
pub const DEFAULT_INTERVAL_MINUTES: f64 = 20.0;

/// A seat-availability watch as the backend stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEntry {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userEmail", default)]
    pub owner_email: String,
    #[serde(rename = "name")]
    pub student_name: String,
    #[serde(rename = "course")]
    pub course_code: String,
    pub section: String,
    #[serde(rename = "emailInterval", deserialize_with = "interval_from_number")]
    pub notify_interval_ms: u64,
}

/// Older entries were stored as `minutes * 60000` without rounding, so the
/// backend may hand back `19800.000000000004`.
fn interval_from_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.max(0.0).round() as u64)
}

impl WatchEntry {
    /// Interval in whole minutes, rounded the way the table shows it.
    pub fn interval_minutes(&self) -> u64 {
        interval_ms_to_minutes(self.notify_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWatchRequest {
    #[serde(rename = "userEmail")]
    pub owner_email: String,
    #[serde(rename = "name")]
    pub student_name: String,
    #[serde(rename = "course")]
    pub course_code: String,
    pub section: String,
    #[serde(rename = "emailInterval")]
    pub notify_interval_ms: u64,
}

/// Raw values of the create-watch form.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchForm {
    pub student_name: String,
    pub course_code: String,
    pub section: String,
    pub interval_minutes: f64,
}

impl Default for WatchForm {
    fn default() -> Self {
        Self {
            student_name: String::new(),
            course_code: String::new(),
            section: String::new(),
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
        }
    }
}

impl WatchForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Validates the form and builds the request body for `owner_email`.
    pub fn to_request(&self, owner_email: &str) -> Result<NewWatchRequest, AppError> {
        let student_name = self.student_name.trim();
        if student_name.is_empty() {
            return Err(AppError::Validation("Name is required.".to_string()));
        }

        Ok(NewWatchRequest {
            owner_email: owner_email.to_string(),
            student_name: student_name.to_string(),
            course_code: normalize_course_code(&self.course_code)?,
            section: normalize_section(&self.section)?,
            notify_interval_ms: minutes_to_interval_ms(self.interval_minutes)?,
        })
    }
}

/// Pads a single-digit section with a leading zero; longer sections pass through.
pub fn normalize_section(raw: &str) -> Result<String, AppError> {
    let section = raw.trim();
    if section.is_empty() {
        return Err(AppError::Validation("Section is required.".to_string()));
    }
    if !section.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(format!("Section must be numeric, got {:?}", section)));
    }

    if section.len() == 1 {
        Ok(format!("0{}", section))
    } else {
        Ok(section.to_string())
    }
}

pub fn normalize_course_code(raw: &str) -> Result<String, AppError> {
    let course = raw.trim();
    if course.is_empty() {
        return Err(AppError::Validation("Course is required.".to_string()));
    }
    Ok(course.to_uppercase())
}

/// `max(minutes * 60000, 1000)`; anything below one second is raised to the floor.
pub fn minutes_to_interval_ms(minutes: f64) -> Result<u64, AppError> {
    if !minutes.is_finite() {
        return Err(AppError::Validation("Interval must be a number of minutes.".to_string()));
    }
    let ms = (minutes * MS_PER_MINUTE as f64).floor();
    if ms < MIN_INTERVAL_MS as f64 {
        return Ok(MIN_INTERVAL_MS);
    }
    Ok(ms as u64)
}

pub fn interval_ms_to_minutes(ms: u64) -> u64 {
    ms.saturating_add(MS_PER_MINUTE / 2) / MS_PER_MINUTE
}
