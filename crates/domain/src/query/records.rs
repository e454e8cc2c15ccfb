//! 各资源的列定义

use dispatch_core::models::{DashboardStats, Profile, Project, Task, TaskLog};

use super::value::{Column, FieldValue};
use super::{Embed, Record};

use super::value::ColumnType::{Array, Integer, Object, Text, Timestamp};

const TASK_COLUMNS: &[Column] = &[
    Column::new("id", Text),
    Column::new("owner_id", Text),
    Column::new("project_id", Text),
    Column::new("task_type", Text),
    Column::new("status", Text),
    Column::new("priority", Text),
    Column::new("title", Text),
    Column::new("prompt", Text),
    Column::new("image_urls", Array),
    Column::new("scheduled_at", Timestamp),
    Column::new("executed_at", Timestamp),
    Column::new("lovable_url", Text),
    Column::new("error_message", Text),
    Column::new("source_platform", Text),
    Column::new("source_chat_id", Text),
    Column::new("source_message_id", Text),
    Column::new("created_at", Timestamp),
    Column::new("updated_at", Timestamp),
];

const TASK_EMBEDS: &[Embed] = &[Embed {
    key: "project",
    resource: Project::RESOURCE,
}];

impl Record for Task {
    const RESOURCE: &'static str = "tasks";

    fn columns() -> &'static [Column] {
        TASK_COLUMNS
    }

    fn field(&self, column: &str) -> FieldValue {
        match column {
            "id" => FieldValue::text(&self.id),
            "owner_id" => FieldValue::text(&self.owner_id),
            "project_id" => FieldValue::optional_text(self.project_id.as_deref()),
            "task_type" => FieldValue::text(self.task_type.as_str()),
            "status" => FieldValue::text(self.status.as_str()),
            "priority" => FieldValue::text(self.priority.as_str()),
            "title" => FieldValue::text(&self.title),
            "prompt" => FieldValue::text(&self.prompt),
            "image_urls" => FieldValue::Opaque,
            "scheduled_at" => FieldValue::optional_timestamp(self.scheduled_at.as_ref()),
            "executed_at" => FieldValue::optional_timestamp(self.executed_at.as_ref()),
            "lovable_url" => FieldValue::optional_text(self.target_url.as_deref()),
            "error_message" => FieldValue::optional_text(self.error_message.as_deref()),
            "source_platform" => FieldValue::text(self.source_platform.as_str()),
            "source_chat_id" => FieldValue::optional_text(self.source_chat_id.as_deref()),
            "source_message_id" => FieldValue::optional_text(self.source_message_id.as_deref()),
            "created_at" => FieldValue::Timestamp(self.created_at),
            "updated_at" => FieldValue::Timestamp(self.updated_at),
            _ => FieldValue::Null,
        }
    }

    fn embeds() -> &'static [Embed] {
        TASK_EMBEDS
    }
}

const PROJECT_COLUMNS: &[Column] = &[
    Column::new("id", Text),
    Column::new("owner_id", Text),
    Column::new("name", Text),
    Column::new("lovable_url", Text),
    Column::new("description", Text),
    Column::new("created_at", Timestamp),
    Column::new("updated_at", Timestamp),
];

impl Record for Project {
    const RESOURCE: &'static str = "projects";

    fn columns() -> &'static [Column] {
        PROJECT_COLUMNS
    }

    fn field(&self, column: &str) -> FieldValue {
        match column {
            "id" => FieldValue::text(&self.id),
            "owner_id" => FieldValue::text(&self.owner_id),
            "name" => FieldValue::text(&self.name),
            "lovable_url" => FieldValue::text(&self.target_url),
            "description" => FieldValue::optional_text(self.description.as_deref()),
            "created_at" => FieldValue::Timestamp(self.created_at),
            "updated_at" => FieldValue::Timestamp(self.updated_at),
            _ => FieldValue::Null,
        }
    }
}

const TASK_LOG_COLUMNS: &[Column] = &[
    Column::new("id", Text),
    Column::new("task_id", Text),
    Column::new("action", Text),
    Column::new("details", Object),
    Column::new("created_at", Timestamp),
];

impl Record for TaskLog {
    const RESOURCE: &'static str = "task_logs";

    fn columns() -> &'static [Column] {
        TASK_LOG_COLUMNS
    }

    fn field(&self, column: &str) -> FieldValue {
        match column {
            "id" => FieldValue::text(&self.id),
            "task_id" => FieldValue::text(&self.task_id),
            "action" => FieldValue::text(&self.action),
            "details" => FieldValue::Opaque,
            "created_at" => FieldValue::Timestamp(self.created_at),
            _ => FieldValue::Null,
        }
    }
}

const PROFILE_COLUMNS: &[Column] = &[
    Column::new("id", Text),
    Column::new("display_name", Text),
    Column::new("avatar_url", Text),
    Column::new("telegram_id", Integer),
    Column::new("slack_user_id", Text),
    Column::new("created_at", Timestamp),
    Column::new("updated_at", Timestamp),
];

impl Record for Profile {
    const RESOURCE: &'static str = "profiles";

    fn columns() -> &'static [Column] {
        PROFILE_COLUMNS
    }

    fn field(&self, column: &str) -> FieldValue {
        match column {
            "id" => FieldValue::text(&self.id),
            "display_name" => FieldValue::optional_text(self.display_name.as_deref()),
            "avatar_url" => FieldValue::optional_text(self.avatar_url.as_deref()),
            "telegram_id" => self
                .telegram_id
                .map(FieldValue::Int)
                .unwrap_or(FieldValue::Null),
            "slack_user_id" => FieldValue::optional_text(self.slack_user_id.as_deref()),
            "created_at" => FieldValue::Timestamp(self.created_at),
            "updated_at" => FieldValue::Timestamp(self.updated_at),
            _ => FieldValue::Null,
        }
    }
}

const STATS_COLUMNS: &[Column] = &[
    Column::new("total_tasks", Integer),
    Column::new("pending_tasks", Integer),
    Column::new("completed_today", Integer),
    Column::new("failed_tasks", Integer),
];

impl Record for DashboardStats {
    const RESOURCE: &'static str = "dashboard_stats";

    fn columns() -> &'static [Column] {
        STATS_COLUMNS
    }

    fn field(&self, column: &str) -> FieldValue {
        let count = match column {
            "total_tasks" => self.total_tasks,
            "pending_tasks" => self.pending_tasks,
            "completed_today" => self.completed_today,
            "failed_tasks" => self.failed_tasks,
            _ => return FieldValue::Null,
        };
        FieldValue::Int(i64::try_from(count).unwrap_or(i64::MAX))
    }
}
