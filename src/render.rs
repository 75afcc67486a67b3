use std::fmt::Write;

use crate::models::{RoutineEntry, WatchEntry};
use crate::services::view::{Tab, format_schedule};

pub const EMPTY_WATCHES: &str = "No courses found. Please add a course.";
pub const EMPTY_ROUTINE: &str = "No sections match your search.";

pub fn render_tabs(active: Tab) -> String {
    [
        (Tab::AddWatch, "Add Course"),
        (Tab::ListWatches, "Courses"),
        (Tab::BrowseRoutine, "Routine"),
    ]
    .iter()
    .map(|(tab, label)| {
        if *tab == active {
            format!("[{}]", label)
        } else {
            format!(" {} ", label)
        }
    })
    .collect::<Vec<_>>()
    .join(" | ")
}

pub fn render_watch_table(watches: &[WatchEntry]) -> String {
    if watches.is_empty() {
        return EMPTY_WATCHES.to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<26} {:<20} {:<10} {:<8} {:>16}",
        "ID", "Name", "Course", "Section", "Interval (min)"
    );
    for w in watches {
        let _ = writeln!(
            out,
            "{:<26} {:<20} {:<10} {:<8} {:>16}",
            w.id,
            w.student_name,
            w.course_code,
            w.section,
            w.interval_minutes()
        );
    }
    out
}

pub fn render_routine_table(entries: &[RoutineEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_ROUTINE.to_string();
    }

    let mut out = String::new();
    for e in entries {
        let _ = writeln!(
            out,
            "{} [{}] {}  seats left: {}/{}",
            e.course_code,
            e.section_name,
            e.faculties.as_deref().unwrap_or("TBA"),
            e.seats_left(),
            e.capacity
        );
        for s in &e.class_schedules {
            let _ = writeln!(out, "    class {}", format_schedule(s));
        }
        for s in &e.lab_schedules {
            let _ = writeln!(out, "    lab   {}", format_schedule(s));
        }
    }
    out
}
