use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Task;

/// 看板统计
///
/// 不单独存储，每次读取都从当前任务集合重新计算，避免写入后读到过期数据。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_tasks: u64,
    /// `pending` 与 `ready` 的任务数
    pub pending_tasks: u64,
    /// 当天执行且状态为 `completed` 的任务数
    pub completed_today: u64,
    pub failed_tasks: u64,
}

impl DashboardStats {
    /// 按给定日期（UTC）汇总任务集合
    pub fn compute<'a, I>(tasks: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        tasks
            .into_iter()
            .fold(DashboardStats::default(), |mut stats, task| {
                stats.total_tasks += 1;
                if task.status.is_waiting() {
                    stats.pending_tasks += 1;
                }
                if task.completed_on(today) {
                    stats.completed_today += 1;
                }
                if task.status == super::TaskStatus::Failed {
                    stats.failed_tasks += 1;
                }
                stats
            })
    }
}
