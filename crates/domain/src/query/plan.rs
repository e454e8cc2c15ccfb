use dispatch_core::{DispatchError, DispatchResult};

use super::filter::Filter;
use super::order::OrderSpec;
use super::range::RangeSpec;
use super::select::SelectSpec;
use super::Record;

/// 不作为过滤条件的保留参数
pub const RESERVED_PARAMS: &[&str] = &["select", "order", "limit", "offset", "columns"];

/// 一次读取或变更请求的完整查询计划
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub filters: Vec<Filter>,
    pub order: Option<OrderSpec>,
    pub range: Option<RangeSpec>,
    pub select: SelectSpec,
}

impl QueryPlan {
    /// 无过滤、无排序、无分页
    pub fn all<R: Record>() -> Self {
        Self {
            filters: Vec::new(),
            order: None,
            range: None,
            select: SelectSpec::everything::<R>(),
        }
    }

    /// 从查询参数和 `Range` 请求头构造
    ///
    /// 同一列可以出现多次，所有条件按 AND 组合。`Range` 请求头优先于
    /// `limit` / `offset` 参数。
    pub fn parse<R: Record>(
        params: &[(String, String)],
        range_header: Option<&str>,
    ) -> DispatchResult<Self> {
        let lookup = |name: &str| {
            params
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        };

        let filters = params
            .iter()
            .filter(|(key, _)| !RESERVED_PARAMS.contains(&key.as_str()))
            .map(|(key, value)| Filter::parse::<R>(key, value))
            .collect::<DispatchResult<Vec<_>>>()?;

        let order = lookup("order").map(OrderSpec::parse::<R>).transpose()?;

        let range = match range_header {
            Some(header) => Some(RangeSpec::parse_header(header)?),
            None => RangeSpec::from_limit_offset(lookup("limit"), lookup("offset"))?,
        };

        let select = SelectSpec::parse::<R>(lookup("select"))?;

        Ok(Self {
            filters,
            order,
            range,
            select,
        })
    }

    pub fn with_range(mut self, range: RangeSpec) -> Self {
        self.range = Some(range);
        self
    }

    /// 请求未指定排序时使用的默认排序
    pub fn or_order(mut self, order: OrderSpec) -> Self {
        if self.order.is_none() {
            self.order = Some(order);
        }
        self
    }

    /// 第一个 `<column>=eq.<text>` 条件的取值
    pub fn equality_on(&self, column: &str) -> Option<&str> {
        self.filters
            .iter()
            .find_map(|filter| filter.as_equality_on(column))
    }

    /// 变更请求的目标标识符
    ///
    /// 必须恰好带一个 `id=eq.<value>` 条件；缺失时为 `MissingFilter`，
    /// 带其他条件时为 `InvalidFilter`。
    pub fn target_id(&self) -> DispatchResult<&str> {
        let mut target = None;
        for filter in &self.filters {
            match filter.as_id_equality() {
                Some(id) if target.is_none() => target = Some(id),
                _ => {
                    return Err(DispatchError::invalid_filter(
                        filter.column.as_str(),
                        filter.raw.as_str(),
                        "变更请求只支持单个 id=eq 条件",
                    ))
                }
            }
        }
        target.ok_or_else(|| DispatchError::missing_filter("id"))
    }
}
