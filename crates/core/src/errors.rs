use thiserror::Error;

/// 模拟后端的错误类型定义
///
/// 客户端可见的错误（过滤条件、排序、Range、请求体、资源不存在）与服务端内部错误
/// 明确区分，API 层据此映射 HTTP 状态码。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DispatchError {
    #[error("缺少必需的过滤条件: {field}")]
    MissingFilter { field: String },

    #[error("无效的过滤条件 {field}={raw}: {reason}")]
    InvalidFilter {
        field: String,
        raw: String,
        reason: String,
    },

    #[error("资源 {resource} 不存在列: {column}")]
    UnknownColumn { resource: String, column: String },

    #[error("无效的排序表达式: {0}")]
    InvalidOrder(String),

    #[error("无效的Range: {0}")]
    InvalidRange(String),

    #[error("无效的请求体: {0}")]
    InvalidBody(String),

    #[error("{resource} 未找到: {id}")]
    NotFound { resource: String, id: String },

    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("序列化错误: {0}")]
    Serialization(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 统一的Result类型
pub type DispatchResult<T> = std::result::Result<T, DispatchError>;

impl DispatchError {
    pub fn missing_filter<S: Into<String>>(field: S) -> Self {
        Self::MissingFilter {
            field: field.into(),
        }
    }

    pub fn invalid_filter<F, R, M>(field: F, raw: R, reason: M) -> Self
    where
        F: Into<String>,
        R: Into<String>,
        M: Into<String>,
    {
        Self::InvalidFilter {
            field: field.into(),
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_column<R: Into<String>, C: Into<String>>(resource: R, column: C) -> Self {
        Self::UnknownColumn {
            resource: resource.into(),
            column: column.into(),
        }
    }

    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// 是否由调用方的请求引起（对应 4xx）
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            DispatchError::Configuration(_)
                | DispatchError::Serialization(_)
                | DispatchError::Internal(_)
        )
    }

    /// 面向最终用户的简短提示
    pub fn user_message(&self) -> &str {
        match self {
            DispatchError::MissingFilter { .. } => "请求缺少必需的过滤条件",
            DispatchError::InvalidFilter { .. } => "过滤条件格式有误",
            DispatchError::UnknownColumn { .. } => "查询了不存在的字段",
            DispatchError::InvalidOrder(_) => "排序参数格式有误",
            DispatchError::InvalidRange(_) => "分页范围格式有误",
            DispatchError::InvalidBody(_) => "请求数据格式有误",
            DispatchError::NotFound { .. } => "请求的记录不存在",
            _ => "系统繁忙，请稍后重试",
        }
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for DispatchError {
    fn from(err: anyhow::Error) -> Self {
        DispatchError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(DispatchError::missing_filter("id").is_client_error());
        assert!(DispatchError::not_found("tasks", "task-999").is_client_error());
        assert!(DispatchError::InvalidRange("abc".to_string()).is_client_error());
        assert!(!DispatchError::Internal("boom".to_string()).is_client_error());
        assert!(!DispatchError::config_error("bad").is_client_error());
    }

    #[test]
    fn test_error_display() {
        let err = DispatchError::invalid_filter("status", "zz.done", "未知的操作符 zz");
        assert_eq!(
            err.to_string(),
            "无效的过滤条件 status=zz.done: 未知的操作符 zz"
        );

        let err = DispatchError::not_found("tasks", "task-042");
        assert_eq!(err.to_string(), "tasks 未找到: task-042");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DispatchError = json_err.into();
        assert!(matches!(err, DispatchError::Serialization(_)));
        assert!(!err.is_client_error());
    }
}
