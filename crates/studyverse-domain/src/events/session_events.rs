use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::UserId;

/// Event fired when a user logs in or a stored session is restored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStarted {
    pub user_id: UserId,
    pub restored: bool,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(SessionStarted);

/// Event fired on logout or when the backend rejects the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEnded {
    pub user_id: UserId,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(SessionEnded);
