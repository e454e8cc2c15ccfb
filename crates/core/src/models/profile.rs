use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 用户资料（单例）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub telegram_id: Option<i64>,
    pub slack_user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
