//! 演示数据
//!
//! 时间戳相对于载入时刻生成，保证"今日完成"等统计在任何时间启动都有数据。

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Map, Value};

use dispatch_core::config::IdentityConfig;
use dispatch_core::models::{
    PlatformType, Profile, Project, Task, TaskLog, TaskPriority, TaskStatus, TaskType,
};

/// 演示数据载入后下一个任务编号
pub const NEXT_TASK_NUMBER: usize = 7;
/// 演示数据载入后下一个项目编号
pub const NEXT_PROJECT_NUMBER: usize = 4;

/// 一套完整的初始数据
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub profile: Profile,
    pub projects: Vec<Project>,
    /// 按创建时间倒序
    pub tasks: Vec<Task>,
    /// 按创建时间升序
    pub task_logs: Vec<TaskLog>,
}

pub fn profile(identity: &IdentityConfig, now: DateTime<Utc>) -> Profile {
    Profile {
        id: identity.user_id.clone(),
        display_name: Some(identity.display_name.clone()),
        avatar_url: None,
        telegram_id: Some(123_456_789),
        slack_user_id: None,
        created_at: now - Duration::days(30),
        updated_at: now - Duration::days(30),
    }
}

fn project(
    identity: &IdentityConfig,
    number: u32,
    name: &str,
    slug: &str,
    description: Option<&str>,
    created_at: DateTime<Utc>,
) -> Project {
    Project {
        id: format!("proj-{number:03}"),
        owner_id: identity.user_id.clone(),
        name: name.to_string(),
        target_url: format!("https://lovable.dev/projects/{slug}"),
        description: description.map(str::to_string),
        created_at,
        updated_at: created_at,
    }
}

struct TaskSeed {
    number: u32,
    project: Option<u32>,
    task_type: TaskType,
    status: TaskStatus,
    priority: TaskPriority,
    title: &'static str,
    prompt: &'static str,
    platform: PlatformType,
    age: Duration,
    scheduled_in: Option<Duration>,
    /// 执行时刻；`None` 表示未执行
    executed_at: Option<DateTime<Utc>>,
    target_slug: Option<&'static str>,
    error_message: Option<&'static str>,
    /// 从 `ready` 开始经历的状态
    history: &'static [&'static str],
}

pub fn load(identity: &IdentityConfig, now: DateTime<Utc>) -> Fixtures {
    let projects = vec![
        project(
            identity,
            1,
            "Portfolio",
            "portfolio",
            Some("Personal portfolio site"),
            now - Duration::days(21),
        ),
        project(
            identity,
            2,
            "Analytics Dashboard",
            "analytics-dashboard",
            Some("Internal metrics dashboard"),
            now - Duration::days(14),
        ),
        project(
            identity,
            3,
            "E-commerce Store",
            "ecommerce-store",
            None,
            now - Duration::days(7),
        ),
    ];

    // 今日零点之后的某个时刻，保证"今日完成"统计稳定
    let start_of_today = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(now);
    let earlier_today = std::cmp::max(start_of_today, now - Duration::hours(2));

    let seeds = [
        TaskSeed {
            number: 1,
            project: Some(1),
            task_type: TaskType::ExistingProject,
            status: TaskStatus::Completed,
            priority: TaskPriority::Normal,
            title: "Portfolio site refresh",
            prompt: "Refresh the portfolio hero section with a gradient background",
            platform: PlatformType::Dashboard,
            age: Duration::days(3),
            scheduled_in: None,
            executed_at: Some(now - Duration::days(2)),
            target_slug: Some("portfolio"),
            error_message: None,
            history: &["generating", "completed"],
        },
        TaskSeed {
            number: 2,
            project: Some(1),
            task_type: TaskType::ExistingProject,
            status: TaskStatus::Generating,
            priority: TaskPriority::Low,
            title: "Migration plan for blog",
            prompt: "Draft a migration plan moving the blog to the portfolio project",
            platform: PlatformType::Telegram,
            age: Duration::days(2),
            scheduled_in: None,
            executed_at: None,
            target_slug: None,
            error_message: None,
            history: &["generating"],
        },
        TaskSeed {
            number: 3,
            project: None,
            task_type: TaskType::NewProject,
            status: TaskStatus::Completed,
            priority: TaskPriority::Normal,
            title: "Landing page for coffee shop",
            prompt: "Create a landing page for a neighbourhood coffee shop with a menu section",
            platform: PlatformType::Slack,
            age: Duration::days(1),
            scheduled_in: None,
            executed_at: Some(earlier_today),
            target_slug: Some("coffee-shop"),
            error_message: None,
            history: &["generating", "completed"],
        },
        TaskSeed {
            number: 4,
            project: Some(3),
            task_type: TaskType::ExistingProject,
            status: TaskStatus::Failed,
            priority: TaskPriority::Urgent,
            title: "Fix checkout validation",
            prompt: "The checkout form accepts empty postcodes, add validation",
            platform: PlatformType::Slack,
            age: Duration::hours(20),
            scheduled_in: None,
            executed_at: Some(now - Duration::hours(19)),
            target_slug: None,
            error_message: Some("Generation timed out after 300s"),
            history: &["generating", "failed"],
        },
        TaskSeed {
            number: 5,
            project: Some(2),
            task_type: TaskType::ExistingProject,
            status: TaskStatus::Pending,
            priority: TaskPriority::High,
            title: "Plan review dashboard",
            prompt: "Add a review screen summarising weekly plans",
            platform: PlatformType::Telegram,
            age: Duration::hours(5),
            scheduled_in: Some(Duration::days(1)),
            executed_at: None,
            target_slug: None,
            error_message: None,
            history: &[],
        },
        TaskSeed {
            number: 6,
            project: Some(1),
            task_type: TaskType::ExistingProject,
            status: TaskStatus::Ready,
            priority: TaskPriority::Normal,
            title: "Add dark mode toggle",
            prompt: "Add a dark mode toggle to the portfolio navigation bar",
            platform: PlatformType::Dashboard,
            age: Duration::hours(1),
            scheduled_in: None,
            executed_at: None,
            target_slug: None,
            error_message: None,
            history: &[],
        },
    ];

    let mut tasks = Vec::with_capacity(seeds.len());
    let mut logs: Vec<(DateTime<Utc>, String, &'static str, Map<String, Value>)> = Vec::new();

    for seed in &seeds {
        let id = format!("task-{:03}", seed.number);
        let created_at = now - seed.age;
        let scheduled_at = seed.scheduled_in.map(|offset| now + offset);
        let initial = Task::initial_status(scheduled_at.as_ref());

        logs.push((
            created_at,
            id.clone(),
            TaskLog::ACTION_CREATED,
            details(json!({ "status": initial.as_str(), "title": seed.title })),
        ));

        // 状态变更日志均匀落在创建与执行（或现在）之间
        let finished = seed.executed_at.unwrap_or(now);
        let steps = seed.history.len() as i32;
        let mut previous = initial.as_str();
        for (index, next) in seed.history.iter().enumerate() {
            let at = created_at + (finished - created_at) * (index as i32 + 1) / (steps + 1);
            logs.push((
                at,
                id.clone(),
                TaskLog::ACTION_STATUS_CHANGED,
                details(json!({ "from": previous, "to": next })),
            ));
            previous = *next;
        }

        let updated_at = seed.executed_at.unwrap_or(created_at);
        tasks.push(Task {
            id,
            owner_id: identity.user_id.clone(),
            project_id: seed.project.map(|number| format!("proj-{number:03}")),
            task_type: seed.task_type.clone(),
            status: seed.status.clone(),
            priority: seed.priority.clone(),
            title: seed.title.to_string(),
            prompt: seed.prompt.to_string(),
            image_urls: Vec::new(),
            scheduled_at,
            executed_at: seed.executed_at,
            target_url: seed
                .target_slug
                .map(|slug| format!("https://lovable.dev/projects/{slug}")),
            error_message: seed.error_message.map(str::to_string),
            source_platform: seed.platform.clone(),
            source_chat_id: match seed.platform {
                PlatformType::Dashboard => None,
                _ => Some(format!("chat-{}", seed.number)),
            },
            source_message_id: match seed.platform {
                PlatformType::Dashboard => None,
                _ => Some(format!("msg-{}", 1000 + seed.number)),
            },
            created_at,
            updated_at,
            project: None,
        });
    }

    tasks.reverse();
    logs.sort_by_key(|(at, ..)| *at);
    let task_logs = logs
        .into_iter()
        .enumerate()
        .map(|(index, (created_at, task_id, action, details))| TaskLog {
            id: format!("log-{:03}", index + 1),
            task_id,
            action: action.to_string(),
            details,
            created_at,
        })
        .collect();

    Fixtures {
        profile: profile(identity, now),
        projects,
        tasks,
        task_logs,
    }
}

fn details(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use dispatch_core::models::DashboardStats;

    #[test]
    fn test_seed_shape() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 0, 30, 0).unwrap();
        let fixtures = load(&IdentityConfig::default(), now);

        assert_eq!(fixtures.projects.len(), NEXT_PROJECT_NUMBER - 1);
        assert_eq!(fixtures.tasks.len(), NEXT_TASK_NUMBER - 1);
        assert_eq!(fixtures.tasks[0].id, "task-006");
        assert!(fixtures
            .task_logs
            .windows(2)
            .all(|pair| pair[0].created_at <= pair[1].created_at));
        assert_eq!(fixtures.profile.id, IdentityConfig::default().user_id);
    }

    #[test]
    fn test_seed_has_a_completion_today_even_just_after_midnight() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 0, 30, 0).unwrap();
        let fixtures = load(&IdentityConfig::default(), now);
        let stats = DashboardStats::compute(&fixtures.tasks, now.date_naive());
        assert_eq!(
            stats,
            DashboardStats {
                total_tasks: 6,
                pending_tasks: 2,
                completed_today: 1,
                failed_tasks: 1,
            }
        );
    }
}
