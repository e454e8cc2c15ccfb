use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UpdateValue;

/// 项目
///
/// 用户登记的外部自动化目标。任务通过 `project_id` 引用项目，
/// 删除项目不会删除引用它的任务。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    /// 外部目标地址，线上字段名为 `lovable_url`
    #[serde(rename = "lovable_url")]
    pub target_url: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 项目插入请求体，缺失的名称补为 `Untitled Project`，地址补为空串
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewProject {
    pub owner_id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "lovable_url")]
    pub target_url: Option<String>,
    pub description: Option<String>,
}

/// 项目更新请求体
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    #[serde(rename = "lovable_url")]
    pub target_url: Option<String>,
    pub description: UpdateValue<String>,
}

impl ProjectPatch {
    pub fn apply_to(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(target_url) = self.target_url {
            project.target_url = target_url;
        }
        project.description = self.description.apply_to(project.description.take());
    }
}
