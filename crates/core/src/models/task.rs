use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Project, UpdateValue};

open_enum! {
    /// 任务状态
    ///
    /// 存储层接受任意状态写入，状态流转的合法性由调用方（看板界面）负责。
    ///
    /// ```text
    /// pending → ready → generating → completed
    ///                        ↓
    ///                      failed        (任意阶段均可 → cancelled)
    /// ```
    pub enum TaskStatus {
        Pending => "pending",
        Ready => "ready",
        Generating => "generating",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

open_enum! {
    /// 任务优先级
    pub enum TaskPriority {
        Low => "low",
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
}

open_enum! {
    /// 任务类型：新建项目，或在已有项目上继续迭代
    pub enum TaskType {
        NewProject => "new_project",
        ExistingProject => "existing_project",
    }
}

open_enum! {
    /// 任务来源平台
    pub enum PlatformType {
        Telegram => "telegram",
        Slack => "slack",
        Dashboard => "dashboard",
    }
}

impl TaskStatus {
    /// 是否仍在等待执行（统计中的"待处理"）
    pub fn is_waiting(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Ready)
    }
}

/// 任务定义
///
/// 一条提示词任务，派发到外部自动化目标上执行。
///
/// # 字段说明
///
/// - `id`: 任务集合内唯一的标识符，如 `task-007`
/// - `project_id`: 关联项目，可能悬空
/// - `status` / `priority` / `task_type`: 见对应枚举
/// - `scheduled_at`: 计划执行时间，存在时新任务初始状态为 `pending`
/// - `executed_at`: 实际执行时间，用于统计"今日完成"
/// - `target_url`: 执行产出的外部地址，线上字段名为 `lovable_url`
/// - `project`: 读取时解析的项目快照，不参与存储
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub owner_id: String,
    pub project_id: Option<String>,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub title: String,
    pub prompt: String,
    pub image_urls: Vec<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub executed_at: Option<DateTime<Utc>>,
    #[serde(rename = "lovable_url")]
    pub target_url: Option<String>,
    pub error_message: Option<String>,
    pub source_platform: PlatformType,
    pub source_chat_id: Option<String>,
    pub source_message_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_deserializing)]
    pub project: Option<Project>,
}

impl Task {
    /// 新任务的初始状态：有计划时间时为 `pending`，否则为 `ready`
    pub fn initial_status(scheduled_at: Option<&DateTime<Utc>>) -> TaskStatus {
        if scheduled_at.is_some() {
            TaskStatus::Pending
        } else {
            TaskStatus::Ready
        }
    }

    /// 是否在给定日期（UTC）完成
    pub fn completed_on(&self, day: chrono::NaiveDate) -> bool {
        self.status == TaskStatus::Completed
            && self
                .executed_at
                .map(|executed| executed.date_naive() == day)
                .unwrap_or(false)
    }
}

/// 任务插入请求体
///
/// 所有字段可选，未提供的字段由存储层按默认值补齐：
/// 类型 `new_project`、优先级 `normal`、标题 `Untitled`、来源 `dashboard`，
/// 状态按 [`Task::initial_status`] 推导。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewTask {
    pub owner_id: Option<String>,
    pub project_id: Option<String>,
    pub task_type: Option<TaskType>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub title: Option<String>,
    pub prompt: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub executed_at: Option<DateTime<Utc>>,
    #[serde(rename = "lovable_url")]
    pub target_url: Option<String>,
    pub error_message: Option<String>,
    pub source_platform: Option<PlatformType>,
    pub source_chat_id: Option<String>,
    pub source_message_id: Option<String>,
}

/// 任务更新请求体
///
/// 非空字段用 `Option` 表示（缺失或 `null` 均视为不修改），
/// 可空字段用 [`UpdateValue`] 表示（`null` 表示清空）。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskPatch {
    pub project_id: UpdateValue<String>,
    pub task_type: Option<TaskType>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub title: Option<String>,
    pub prompt: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub scheduled_at: UpdateValue<DateTime<Utc>>,
    pub executed_at: UpdateValue<DateTime<Utc>>,
    #[serde(rename = "lovable_url")]
    pub target_url: UpdateValue<String>,
    pub error_message: UpdateValue<String>,
    pub source_platform: Option<PlatformType>,
    pub source_chat_id: UpdateValue<String>,
    pub source_message_id: UpdateValue<String>,
}

impl TaskPatch {
    /// 将补丁合并到任务上，未提供的字段保持不变
    ///
    /// 不修改 `id`、`owner_id`、时间戳，这些由存储层负责。
    pub fn apply_to(self, task: &mut Task) {
        task.project_id = self.project_id.apply_to(task.project_id.take());
        if let Some(task_type) = self.task_type {
            task.task_type = task_type;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(prompt) = self.prompt {
            task.prompt = prompt;
        }
        if let Some(image_urls) = self.image_urls {
            task.image_urls = image_urls;
        }
        task.scheduled_at = self.scheduled_at.apply_to(task.scheduled_at.take());
        task.executed_at = self.executed_at.apply_to(task.executed_at.take());
        task.target_url = self.target_url.apply_to(task.target_url.take());
        task.error_message = self.error_message.apply_to(task.error_message.take());
        if let Some(source_platform) = self.source_platform {
            task.source_platform = source_platform;
        }
        task.source_chat_id = self.source_chat_id.apply_to(task.source_chat_id.take());
        task.source_message_id = self
            .source_message_id
            .apply_to(task.source_message_id.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_task() -> Task {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        Task {
            id: "task-001".to_string(),
            owner_id: "user-1".to_string(),
            project_id: Some("proj-001".to_string()),
            task_type: TaskType::ExistingProject,
            status: TaskStatus::Ready,
            priority: TaskPriority::High,
            title: "Landing page".to_string(),
            prompt: "Build a landing page".to_string(),
            image_urls: vec![],
            scheduled_at: None,
            executed_at: None,
            target_url: None,
            error_message: Some("old error".to_string()),
            source_platform: PlatformType::Telegram,
            source_chat_id: None,
            source_message_id: None,
            created_at: at,
            updated_at: at,
            project: None,
        }
    }

    #[test]
    fn test_status_wire_values() {
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
        assert_eq!(TaskStatus::from("cancelled"), TaskStatus::Cancelled);
        assert_eq!(
            serde_json::to_value(TaskStatus::Generating).unwrap(),
            serde_json::json!("generating")
        );
    }

    #[test]
    fn test_unknown_status_passes_through() {
        let status: TaskStatus = serde_json::from_value(serde_json::json!("archived")).unwrap();
        assert_eq!(status, TaskStatus::Other("archived".to_string()));
        assert!(!status.is_known());
        assert_eq!(serde_json::to_value(&status).unwrap(), "archived");
    }

    #[test]
    fn test_initial_status() {
        assert_eq!(Task::initial_status(None), TaskStatus::Ready);
        assert_eq!(
            Task::initial_status(Some(&Utc::now())),
            TaskStatus::Pending
        );
    }

    #[test]
    fn test_target_url_uses_wire_name() {
        let mut task = sample_task();
        task.target_url = Some("https://example.app".to_string());
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["lovable_url"], "https://example.app");
        assert!(json.get("target_url").is_none());
        assert!(json["project"].is_null());
    }

    #[test]
    fn test_patch_merges_only_supplied_fields() {
        let mut task = sample_task();
        let patch: TaskPatch = serde_json::from_value(serde_json::json!({
            "title": "Landing page v2",
            "error_message": null,
            "status": "generating"
        }))
        .unwrap();

        patch.apply_to(&mut task);

        assert_eq!(task.title, "Landing page v2");
        assert_eq!(task.status, TaskStatus::Generating);
        assert_eq!(task.error_message, None);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.project_id.as_deref(), Some("proj-001"));
        assert_eq!(task.prompt, "Build a landing page");
    }

    #[test]
    fn test_patch_can_clear_project() {
        let mut task = sample_task();
        let patch: TaskPatch =
            serde_json::from_value(serde_json::json!({ "project_id": null })).unwrap();
        assert!(patch.project_id.is_unset());
        patch.apply_to(&mut task);
        assert_eq!(task.project_id, None);
    }

    #[test]
    fn test_completed_on() {
        let mut task = sample_task();
        let day = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
        task.executed_at = Some(day + chrono::Duration::hours(5));
        assert!(!task.completed_on(day.date_naive()));

        task.status = TaskStatus::Completed;
        assert!(task.completed_on(day.date_naive()));
        assert!(!task.completed_on(day.date_naive().succ_opt().unwrap()));
    }
}
