//! Auth token records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub email: String,
    pub expires: DateTime<Utc>,
}

impl Token {
    pub fn is_expired(&self) -> bool {
        self.expires <= Utc::now()
    }
}
