use serde::{Deserialize, Serialize};

use studyverse_domain::session::Session;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDto {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub expires_at: Option<String>,
    pub expires_soon: bool, // within 24 hours
}

impl From<&Session> for SessionDto {
    fn from(session: &Session) -> Self {
        let user = session.user();
        Self {
            user_id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            expires_at: session.expires_at().map(|t| t.to_rfc3339()),
            expires_soon: session.expires_soon(24),
        }
    }
}
