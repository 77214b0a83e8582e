use chrono::NaiveDate;

use crate::application::errors::AppResult;
use crate::application::ports::contact_repository::ContactRepository;
use crate::domain::contacts::contact::{Contact, birthday_window};

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

pub struct UpcomingBirthdays<'a, R: ContactRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ContactRepository + ?Sized> UpcomingBirthdays<'a, R> {
    pub async fn execute(&self, today: NaiveDate, days: u32) -> AppResult<Vec<Contact>> {
        let keys: Vec<String> = birthday_window(today, days).into_iter().collect();
        Ok(self.repo.birthdays_within(&keys).await?)
    }
}
