use chrono::{DateTime, Utc};

/// Notification pushed whenever a profile document is written.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileChange {
    pub user_id: String,
    pub updated_at: DateTime<Utc>,
}
