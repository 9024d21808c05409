pub mod applications;
pub mod dashboard;
pub mod eligibility;
pub mod finance;
pub mod scholarships;
pub mod security;
pub mod seed;
pub mod sessions;
pub mod uploads;
pub mod users;

pub use security::CredentialStore;
pub use uploads::UploadStore;

use chrono::{Datelike, Local, NaiveDate};

/// Today's date in server-local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Calendar year that approvals are booked against
pub fn current_year() -> i32 {
    today().year()
}
