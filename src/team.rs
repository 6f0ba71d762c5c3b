//! Team roster records and birthday lookups.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::task::{blank_as_none, blank_date_as_none};

/// A team member. Tasks reference members by `name`, not by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub joined_at: String,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, deserialize_with = "blank_date_as_none", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}

/// True when `birth_date` falls on the same day and month as `today`.
pub fn is_birthday(birth_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    match birth_date {
        Some(b) => b.day() == today.day() && b.month() == today.month(),
        None => false,
    }
}

pub fn birthdays_today(members: &[Member], today: NaiveDate) -> Vec<&Member> {
    members.iter().filter(|m| is_birthday(m.birth_date, today)).collect()
}
