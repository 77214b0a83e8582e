use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => anyhow::bail!("unknown role: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Contact {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub birth_day: NaiveDate,
    pub data: Option<serde_json::Value>,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub verified: bool,
    pub verification_token: Option<String>,
    pub password_reset_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn profile(&self) -> ContactProfile {
        ContactProfile {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            role: self.role,
            birth_day: self.birth_day,
            data: self.data.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Public projection of a contact. This is what responses and the profile
/// cache carry; credentials and tokens are never part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactProfile {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub birth_day: NaiveDate,
    pub data: Option<serde_json::Value>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub birth_day: NaiveDate,
    pub data: Option<serde_json::Value>,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub verification_token: String,
}

/// Partial update. `data: Some(Value::Null)` clears the stored JSON.
#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub birth_day: Option<NaiveDate>,
    pub data: Option<serde_json::Value>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.birth_day.is_none()
            && self.data.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl ContactFilter {
    /// Builds a filter keeping only non-blank terms.
    pub fn new(
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<String>,
    ) -> Self {
        fn keep(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        Self {
            first_name: keep(first_name),
            last_name: keep(last_name),
            email: keep(email),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        fn contains(hay: &str, needle: &Option<String>) -> bool {
            match needle {
                Some(n) => hay.to_lowercase().contains(&n.to_lowercase()),
                None => true,
            }
        }
        contains(&contact.first_name, &self.first_name)
            && contains(&contact.last_name, &self.last_name)
            && contains(&contact.email, &self.email)
    }
}

pub fn birthday_key(date: NaiveDate) -> String {
    format!("{:02}-{:02}", date.month(), date.day())
}

/// Month-day keys (`MM-DD`) of every day from `today` through `today + days`.
///
/// Feb 29 birthdays are observed on Feb 28 in non-leap years, so that key is
/// added whenever the window covers Feb 28 of a common year.
pub fn birthday_window(today: NaiveDate, days: u32) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    for offset in 0..=i64::from(days) {
        let day = today + Duration::days(offset);
        keys.insert(birthday_key(day));
        if day.month() == 2 && day.day() == 28 && !is_leap_year(day.year()) {
            keys.insert("02-29".to_string());
        }
    }
    keys
}

fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}
