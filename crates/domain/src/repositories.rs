//! 领域仓储抽象
//!
//! 定义模拟后端各资源的数据访问接口，API 层只依赖这些 trait。

use async_trait::async_trait;
use dispatch_core::models::{
    DashboardStats, NewProject, NewTask, Profile, Project, ProjectPatch, Task, TaskLog, TaskPatch,
};
use dispatch_core::DispatchResult;

use crate::query::{Page, QueryPlan};

/// 任务仓储抽象
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// 按查询计划读取，结果中的项目快照按计划的 `select` 解析
    async fn list(&self, plan: &QueryPlan) -> DispatchResult<Page<Task>>;
    async fn create(&self, input: NewTask) -> DispatchResult<Task>;
    /// 记录不存在时返回 `NotFound`
    async fn update(&self, id: &str, patch: TaskPatch) -> DispatchResult<Task>;
    /// 幂等删除，返回是否确有记录被删除
    async fn delete(&self, id: &str) -> DispatchResult<bool>;
}

/// 项目仓储抽象
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn list(&self, plan: &QueryPlan) -> DispatchResult<Page<Project>>;
    async fn create(&self, input: NewProject) -> DispatchResult<Project>;
    async fn update(&self, id: &str, patch: ProjectPatch) -> DispatchResult<Project>;
    /// 不级联删除引用该项目的任务
    async fn delete(&self, id: &str) -> DispatchResult<bool>;
}

/// 任务日志仓储抽象，只读
#[async_trait]
pub trait TaskLogRepository: Send + Sync {
    async fn list(&self, plan: &QueryPlan) -> DispatchResult<Page<TaskLog>>;
    /// 按创建时间升序返回某个任务的日志
    async fn list_for_task(&self, task_id: &str) -> DispatchResult<Vec<TaskLog>>;
}

/// 用户资料仓储抽象
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn list(&self, plan: &QueryPlan) -> DispatchResult<Page<Profile>>;
}

/// 看板统计
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// 每次调用都从当前任务集合重新计算
    async fn compute(&self) -> DispatchResult<DashboardStats>;
}
