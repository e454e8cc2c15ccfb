//! # 查询协议
//!
//! 以 URL 参数和请求头表达的 PostgREST 风格查询：
//!
//! - 过滤：`<column>=[not.]<op>.<operand>`，操作符见 [`FilterOperator`]
//! - 排序：`order=<column>[.asc|.desc][.nullsfirst|.nullslast],...`
//! - 分页：`Range: <start>-<end>` 请求头，或 `limit` / `offset` 参数
//! - 选择：`select=*,project:projects(*)`
//!
//! 参数先解析为类型化的 [`QueryPlan`]，再由 [`pipeline::run`] 按
//! 过滤 → 排序 → 分页 → 关联解析 的固定顺序作用于记录集合。
//! 各阶段都是纯函数，不依赖存储。

pub mod filter;
pub mod order;
pub mod pipeline;
pub mod plan;
pub mod range;
pub mod records;
pub mod select;
pub mod value;

pub use filter::{Filter, FilterOperator, IsTarget, LikePattern, Operand};
pub use order::{Direction, NullsPlacement, OrderKey, OrderSpec};
pub use pipeline::Page;
pub use plan::{QueryPlan, RESERVED_PARAMS};
pub use range::{ContentRange, RangeSpec};
pub use select::SelectSpec;
pub use value::{Column, ColumnType, FieldValue};

/// 可嵌入的关联资源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Embed {
    /// 记录中承载关联数据的字段名
    pub key: &'static str,
    /// 关联资源名
    pub resource: &'static str,
}

/// 可被查询协议处理的记录
pub trait Record: Clone + Send + Sync + 'static {
    /// 资源名，对应 `/rest/v1/<resource>`
    const RESOURCE: &'static str;

    fn columns() -> &'static [Column];

    /// 读取列值，未知列返回 `Null`
    fn field(&self, column: &str) -> FieldValue;

    fn embeds() -> &'static [Embed] {
        &[]
    }

    fn column(name: &str) -> Option<&'static Column> {
        Self::columns().iter().find(|column| column.name == name)
    }
}
