use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use dispatch_core::config::IdentityConfig;
use dispatch_core::models::{
    DashboardStats, NewProject, NewTask, PlatformType, Profile, Project, ProjectPatch, Task,
    TaskLog, TaskPatch, TaskPriority, TaskType,
};
use dispatch_core::{Clock, DispatchError, DispatchResult};
use dispatch_domain::query::{pipeline, OrderKey, OrderSpec, Page, QueryPlan, Record};
use dispatch_domain::repositories::{
    ProfileRepository, ProjectRepository, StatsRepository, TaskLogRepository, TaskRepository,
};

use crate::seed::{self, NEXT_PROJECT_NUMBER, NEXT_TASK_NUMBER};

/// 集合内顺序编号，生成 `task-007` 形式的标识符
#[derive(Debug, Clone)]
struct IdSequence {
    prefix: &'static str,
    next: usize,
}

impl IdSequence {
    fn starting_at(prefix: &'static str, next: usize) -> Self {
        Self { prefix, next }
    }

    fn next_id(&mut self) -> String {
        let id = format!("{}-{:03}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone)]
struct StoreState {
    /// 最新创建的在前
    tasks: Vec<Task>,
    projects: Vec<Project>,
    task_logs: Vec<TaskLog>,
    profile: Profile,
    task_ids: IdSequence,
    project_ids: IdSequence,
    log_ids: IdSequence,
}

impl StoreState {
    fn seeded(identity: &IdentityConfig, clock: &dyn Clock) -> Self {
        let fixtures = seed::load(identity, clock.now());
        let next_log = fixtures.task_logs.len() + 1;
        Self {
            tasks: fixtures.tasks,
            projects: fixtures.projects,
            task_logs: fixtures.task_logs,
            profile: fixtures.profile,
            task_ids: IdSequence::starting_at("task", NEXT_TASK_NUMBER),
            project_ids: IdSequence::starting_at("proj", NEXT_PROJECT_NUMBER),
            log_ids: IdSequence::starting_at("log", next_log),
        }
    }

    fn empty(identity: &IdentityConfig, clock: &dyn Clock) -> Self {
        Self {
            tasks: Vec::new(),
            projects: Vec::new(),
            task_logs: Vec::new(),
            profile: seed::profile(identity, clock.now()),
            task_ids: IdSequence::starting_at("task", 1),
            project_ids: IdSequence::starting_at("proj", 1),
            log_ids: IdSequence::starting_at("log", 1),
        }
    }

    fn project(&self, id: Option<&str>) -> Option<Project> {
        let id = id?;
        self.projects.iter().find(|project| project.id == id).cloned()
    }

    /// 读取时解析项目快照，悬空引用得到 `None`
    fn resolve(&self, mut task: Task) -> Task {
        task.project = self.project(task.project_id.as_deref());
        task
    }

    fn append_log(
        &mut self,
        task_id: &str,
        action: &str,
        details: Value,
        at: chrono::DateTime<chrono::Utc>,
    ) {
        let details = match details {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let id = self.log_ids.next_id();
        self.task_logs.push(TaskLog {
            id,
            task_id: task_id.to_string(),
            action: action.to_string(),
            details,
            created_at: at,
        });
    }
}

/// 内存夹具存储
///
/// 持有模拟后端的全部集合状态。所有集合共用一把读写锁，
/// "查找下标再替换"这类读改写序列在单次写锁内完成，对调用方是原子的。
///
/// 克隆得到的实例共享同一份状态。
#[derive(Clone)]
pub struct FixtureStore {
    state: Arc<RwLock<StoreState>>,
    identity: IdentityConfig,
    clock: Arc<dyn Clock>,
    seed_on_reset: bool,
}

impl std::fmt::Debug for FixtureStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureStore")
            .field("identity", &self.identity.user_id)
            .field("seed_on_reset", &self.seed_on_reset)
            .finish()
    }
}

impl FixtureStore {
    /// 载入演示数据
    pub fn seeded(identity: IdentityConfig, clock: Arc<dyn Clock>) -> Self {
        let state = StoreState::seeded(&identity, clock.as_ref());
        info!(
            tasks = state.tasks.len(),
            projects = state.projects.len(),
            task_logs = state.task_logs.len(),
            "Fixture store seeded"
        );
        Self {
            state: Arc::new(RwLock::new(state)),
            identity,
            clock,
            seed_on_reset: true,
        }
    }

    /// 空集合，只保留用户资料
    pub fn empty(identity: IdentityConfig, clock: Arc<dyn Clock>) -> Self {
        let state = StoreState::empty(&identity, clock.as_ref());
        Self {
            state: Arc::new(RwLock::new(state)),
            identity,
            clock,
            seed_on_reset: false,
        }
    }

    /// 恢复到初始状态，包括编号计数器
    pub async fn reset(&self) {
        let fresh = if self.seed_on_reset {
            StoreState::seeded(&self.identity, self.clock.as_ref())
        } else {
            StoreState::empty(&self.identity, self.clock.as_ref())
        };
        *self.state.write().await = fresh;
        info!(seeded = self.seed_on_reset, "Fixture store reset");
    }

    pub fn identity(&self) -> &IdentityConfig {
        &self.identity
    }
}

#[async_trait]
impl TaskRepository for FixtureStore {
    async fn list(&self, plan: &QueryPlan) -> DispatchResult<Page<Task>> {
        let state = self.state.read().await;
        let embed = plan.select.embeds(Project::RESOURCE);
        let page = pipeline::run(state.tasks.clone(), plan, |task| {
            if embed {
                task.project = state.project(task.project_id.as_deref());
            }
        });
        debug!(
            filters = plan.filters.len(),
            returned = page.rows.len(),
            content_range = %page.content_range,
            "Listed tasks"
        );
        Ok(page)
    }

    async fn create(&self, input: NewTask) -> DispatchResult<Task> {
        let now = self.clock.now();
        let mut state = self.state.write().await;

        let id = state.task_ids.next_id();
        let status = input
            .status
            .unwrap_or_else(|| Task::initial_status(input.scheduled_at.as_ref()));
        let task = Task {
            id: id.clone(),
            owner_id: input
                .owner_id
                .unwrap_or_else(|| self.identity.user_id.clone()),
            project_id: input.project_id,
            task_type: input.task_type.unwrap_or(TaskType::NewProject),
            status,
            priority: input.priority.unwrap_or(TaskPriority::Normal),
            title: input.title.unwrap_or_else(|| "Untitled".to_string()),
            prompt: input.prompt.unwrap_or_default(),
            image_urls: input.image_urls.unwrap_or_default(),
            scheduled_at: input.scheduled_at,
            executed_at: input.executed_at,
            target_url: input.target_url,
            error_message: input.error_message,
            source_platform: input.source_platform.unwrap_or(PlatformType::Dashboard),
            source_chat_id: input.source_chat_id,
            source_message_id: input.source_message_id,
            created_at: now,
            updated_at: now,
            project: None,
        };

        state.tasks.insert(0, task.clone());
        state.append_log(
            &id,
            TaskLog::ACTION_CREATED,
            json!({ "status": task.status.as_str(), "title": task.title }),
            now,
        );

        info!(task_id = %id, status = %task.status, "Task created");
        Ok(state.resolve(task))
    }

    async fn update(&self, id: &str, patch: TaskPatch) -> DispatchResult<Task> {
        let now = self.clock.now();
        let mut state = self.state.write().await;

        let index = state
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| DispatchError::not_found(Task::RESOURCE, id))?;

        let (before, after, task) = {
            let task = &mut state.tasks[index];
            let before = task.status.clone();
            patch.apply_to(task);
            task.updated_at = now;
            (before, task.status.clone(), task.clone())
        };

        if before != after {
            state.append_log(
                id,
                TaskLog::ACTION_STATUS_CHANGED,
                json!({ "from": before.as_str(), "to": after.as_str() }),
                now,
            );
            info!(task_id = %id, from = %before, to = %after, "Task status changed");
        } else {
            info!(task_id = %id, "Task updated");
        }

        Ok(state.resolve(task))
    }

    async fn delete(&self, id: &str) -> DispatchResult<bool> {
        let mut state = self.state.write().await;
        let before = state.tasks.len();
        state.tasks.retain(|task| task.id != id);
        let removed = state.tasks.len() != before;
        info!(task_id = %id, removed, "Task delete requested");
        Ok(removed)
    }
}

#[async_trait]
impl ProjectRepository for FixtureStore {
    async fn list(&self, plan: &QueryPlan) -> DispatchResult<Page<Project>> {
        let state = self.state.read().await;
        let page = pipeline::run(state.projects.clone(), plan, |_| {});
        debug!(returned = page.rows.len(), content_range = %page.content_range, "Listed projects");
        Ok(page)
    }

    async fn create(&self, input: NewProject) -> DispatchResult<Project> {
        let now = self.clock.now();
        let mut state = self.state.write().await;

        let project = Project {
            id: state.project_ids.next_id(),
            owner_id: input
                .owner_id
                .unwrap_or_else(|| self.identity.user_id.clone()),
            name: input.name.unwrap_or_else(|| "Untitled Project".to_string()),
            target_url: input.target_url.unwrap_or_default(),
            description: input.description,
            created_at: now,
            updated_at: now,
        };
        state.projects.push(project.clone());

        info!(project_id = %project.id, "Project created");
        Ok(project)
    }

    async fn update(&self, id: &str, patch: ProjectPatch) -> DispatchResult<Project> {
        let now = self.clock.now();
        let mut state = self.state.write().await;

        let project = state
            .projects
            .iter_mut()
            .find(|project| project.id == id)
            .ok_or_else(|| DispatchError::not_found(Project::RESOURCE, id))?;
        patch.apply_to(project);
        project.updated_at = now;

        info!(project_id = %id, "Project updated");
        Ok(project.clone())
    }

    async fn delete(&self, id: &str) -> DispatchResult<bool> {
        let mut state = self.state.write().await;
        let before = state.projects.len();
        state.projects.retain(|project| project.id != id);
        let removed = state.projects.len() != before;
        info!(project_id = %id, removed, "Project delete requested");
        Ok(removed)
    }
}

#[async_trait]
impl TaskLogRepository for FixtureStore {
    async fn list(&self, plan: &QueryPlan) -> DispatchResult<Page<TaskLog>> {
        let plan = plan
            .clone()
            .or_order(OrderSpec::single(OrderKey::asc("created_at")));
        let rows = match plan.equality_on("task_id") {
            Some(task_id) => self.list_for_task(task_id).await?,
            None => self.state.read().await.task_logs.clone(),
        };
        Ok(pipeline::run(rows, &plan, |_| {}))
    }

    async fn list_for_task(&self, task_id: &str) -> DispatchResult<Vec<TaskLog>> {
        let state = self.state.read().await;
        let mut logs: Vec<TaskLog> = state
            .task_logs
            .iter()
            .filter(|log| log.task_id == task_id)
            .cloned()
            .collect();
        logs.sort_by_key(|log| log.created_at);
        Ok(logs)
    }
}

#[async_trait]
impl ProfileRepository for FixtureStore {
    async fn list(&self, plan: &QueryPlan) -> DispatchResult<Page<Profile>> {
        let profile = self.state.read().await.profile.clone();
        Ok(pipeline::run(vec![profile], plan, |_| {}))
    }
}

#[async_trait]
impl StatsRepository for FixtureStore {
    async fn compute(&self) -> DispatchResult<DashboardStats> {
        let state = self.state.read().await;
        let stats = DashboardStats::compute(&state.tasks, self.clock.today());
        debug!(?stats, "Dashboard stats computed");
        Ok(stats)
    }
}
