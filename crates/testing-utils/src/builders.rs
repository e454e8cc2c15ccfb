//! 测试实体构建器，带有合理的默认值

use chrono::{DateTime, TimeZone, Utc};
use dispatch_core::models::{
    NewProject, NewTask, PlatformType, Project, Task, TaskPriority, TaskStatus, TaskType,
};

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// 构建 [`Task`]，或转换为插入请求体 [`NewTask`]
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new() -> Self {
        Self {
            task: Task {
                id: "task-001".to_string(),
                owner_id: "user-test".to_string(),
                project_id: None,
                task_type: TaskType::NewProject,
                status: TaskStatus::Ready,
                priority: TaskPriority::Normal,
                title: "test task".to_string(),
                prompt: "do something".to_string(),
                image_urls: vec![],
                scheduled_at: None,
                executed_at: None,
                target_url: None,
                error_message: None,
                source_platform: PlatformType::Dashboard,
                source_chat_id: None,
                source_message_id: None,
                created_at: epoch(),
                updated_at: epoch(),
                project: None,
            },
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.task.id = id.to_string();
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.task.title = title.to_string();
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.task.status = status;
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.task.priority = priority;
        self
    }

    pub fn with_project(mut self, project_id: &str) -> Self {
        self.task.project_id = Some(project_id.to_string());
        self.task.task_type = TaskType::ExistingProject;
        self
    }

    pub fn scheduled_at(mut self, at: DateTime<Utc>) -> Self {
        self.task.scheduled_at = Some(at);
        self
    }

    pub fn executed_at(mut self, at: DateTime<Utc>) -> Self {
        self.task.executed_at = Some(at);
        self
    }

    pub fn with_error(mut self, message: &str) -> Self {
        self.task.error_message = Some(message.to_string());
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.task.created_at = at;
        self.task.updated_at = at;
        self
    }

    pub fn build(self) -> Task {
        self.task
    }

    /// 插入请求体，状态显式带上
    pub fn into_new_task(self) -> NewTask {
        let task = self.task;
        NewTask {
            owner_id: Some(task.owner_id),
            project_id: task.project_id,
            task_type: Some(task.task_type),
            status: Some(task.status),
            priority: Some(task.priority),
            title: Some(task.title),
            prompt: Some(task.prompt),
            image_urls: Some(task.image_urls),
            scheduled_at: task.scheduled_at,
            executed_at: task.executed_at,
            target_url: task.target_url,
            error_message: task.error_message,
            source_platform: Some(task.source_platform),
            source_chat_id: task.source_chat_id,
            source_message_id: task.source_message_id,
        }
    }

    /// 插入请求体的 JSON 形式，不带状态，由存储层推导
    pub fn into_json(self) -> serde_json::Value {
        let task = self.task;
        let mut body = serde_json::json!({
            "title": task.title,
            "prompt": task.prompt,
            "priority": task.priority,
            "task_type": task.task_type,
        });
        if let Some(project_id) = task.project_id {
            body["project_id"] = project_id.into();
        }
        if let Some(at) = task.scheduled_at {
            body["scheduled_at"] = at.to_rfc3339().into();
        }
        body
    }
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 构建 [`Project`]，或转换为插入请求体 [`NewProject`]
pub struct ProjectBuilder {
    project: Project,
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self {
            project: Project {
                id: "proj-001".to_string(),
                owner_id: "user-test".to_string(),
                name: "test project".to_string(),
                target_url: "https://lovable.dev/projects/test".to_string(),
                description: None,
                created_at: epoch(),
                updated_at: epoch(),
            },
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.project.id = id.to_string();
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.project.name = name.to_string();
        self
    }

    pub fn with_target_url(mut self, url: &str) -> Self {
        self.project.target_url = url.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.project.description = Some(description.to_string());
        self
    }

    pub fn build(self) -> Project {
        self.project
    }

    pub fn into_new_project(self) -> NewProject {
        let project = self.project;
        NewProject {
            owner_id: Some(project.owner_id),
            name: Some(project.name),
            target_url: Some(project.target_url),
            description: project.description,
        }
    }
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}
