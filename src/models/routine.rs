use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

/// One section of the class-routine feed. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineEntry {
    pub section_id: serde_json::Value,
    #[serde(default)]
    pub section_name: String,
    pub course_code: String,
    #[serde(default)]
    pub faculties: Option<String>,
    #[serde(default)]
    pub class_schedules: Vec<Schedule>,
    #[serde(default)]
    pub lab_schedules: Vec<Schedule>,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub consumed_seat: u32,
}

impl RoutineEntry {
    pub fn seats_left(&self) -> u32 {
        self.capacity.saturating_sub(self.consumed_seat)
    }

    pub fn matches_course(&self, needle_lower: &str) -> bool {
        self.course_code.to_lowercase().contains(needle_lower)
    }
}
