use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 任务日志，按任务追加，不提供修改与删除
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskLog {
    pub id: String,
    pub task_id: String,
    pub action: String,
    pub details: serde_json::Map<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl TaskLog {
    pub const ACTION_CREATED: &'static str = "created";
    pub const ACTION_STATUS_CHANGED: &'static str = "status_changed";
}
