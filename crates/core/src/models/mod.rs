//! # 数据模型
//!
//! 任务派发看板后端所暴露的数据结构：项目、任务、任务日志、用户资料、看板统计
//! 以及认证会话。字段名与线上后端的 JSON 形状保持一致，调用方无需区分对接的是
//! 真实后端还是内存模拟。
//!
//! ## 枚举取值的透传
//!
//! 存储层不校验枚举成员：状态、优先级等字段遇到未登记的取值时落入 `Other(String)`
//! 变体并原样写回，与线上库不做约束的行为一致。状态流转是否合法由调用方负责。
//!
//! ## 关联关系
//!
//! - `Task.project_id` 指向 `Project.id`，允许悬空（删除项目不会级联删除任务）
//! - `Task.project` 是读取时解析出的快照，不随任务存储
//! - `TaskLog.task_id` 指向 `Task.id`
//!
//! ## 部分字段写入
//!
//! `NewTask` / `NewProject` 描述插入请求体，全部字段可选，由存储层补齐默认值；
//! `TaskPatch` / `ProjectPatch` 描述更新请求体，可空字段使用 [`UpdateValue`]
//! 区分"置空"与"不修改"。

/// 定义以字符串形式序列化、对未知取值宽容的枚举
///
/// 每个已知变体绑定一个线上取值，未登记的取值保存在 `Other(String)` 中。
macro_rules! open_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $wire:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
            /// 未登记的取值，按原样保存
            Other(String),
        }

        impl $name {
            /// 线上取值
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $wire, )+
                    $name::Other(raw) => raw.as_str(),
                }
            }

            /// 是否为已登记的取值
            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $( $wire => $name::$variant, )+
                    _ => $name::Other(raw),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::from(raw.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod auth;
pub mod profile;
pub mod project;
pub mod stats;
pub mod task;
pub mod task_log;
pub mod update_value;

pub use auth::*;
pub use profile::*;
pub use project::*;
pub use stats::*;
pub use task::*;
pub use task_log::*;
pub use update_value::UpdateValue;
