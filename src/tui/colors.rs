//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Priority, Status};

// Board column palette, To Do through Done.

/// Used for To Do
pub const INDIGO: Color = Color::Rgb(99, 102, 241);
/// Used for In Progress
pub const AMBER: Color = Color::Rgb(245, 158, 11);
/// Used for Review
pub const PINK: Color = Color::Rgb(236, 72, 153);
/// Used for Done
pub const EMERALD: Color = Color::Rgb(16, 185, 129);

pub const HIGH_RED: Color = Color::Rgb(220, 38, 38);
pub const MEDIUM_ORANGE: Color = Color::Rgb(234, 88, 12);
pub const LOW_BLUE: Color = Color::Rgb(37, 99, 235);

pub fn status_color(status: Status) -> Color {
    match status {
        Status::ToDo => INDIGO,
        Status::InProgress => AMBER,
        Status::Review => PINK,
        Status::Done => EMERALD,
    }
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => HIGH_RED,
        Priority::Medium => MEDIUM_ORANGE,
        Priority::Low => LOW_BLUE,
    }
}
