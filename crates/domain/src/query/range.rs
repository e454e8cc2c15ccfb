use std::fmt;

use dispatch_core::{DispatchError, DispatchResult};

/// 分页范围，内部以偏移量加可选条数表示
///
/// 请求头 `Range: 0-9` 对应 `offset=0, limit=10`；`Range: 5-` 表示从第 5 条起的全部。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl RangeSpec {
    /// 闭区间 `[start, end]`，条数超出 `usize` 时视为不限条数
    pub fn inclusive(start: usize, end: usize) -> DispatchResult<Self> {
        if end < start {
            return Err(DispatchError::InvalidRange(format!(
                "结束位置 {end} 小于起始位置 {start}"
            )));
        }
        Ok(Self {
            offset: start,
            limit: (end - start).checked_add(1),
        })
    }

    /// 解析 `Range` 请求头，可带 `items=` 前缀
    pub fn parse_header(raw: &str) -> DispatchResult<Self> {
        let trimmed = raw.trim();
        let spec = trimmed.strip_prefix("items=").unwrap_or(trimmed);
        let invalid = || DispatchError::InvalidRange(raw.to_string());

        let (start, end) = spec.split_once('-').ok_or_else(invalid)?;
        let start: usize = start.trim().parse().map_err(|_| invalid())?;
        let end = end.trim();
        if end.is_empty() {
            return Ok(Self {
                offset: start,
                limit: None,
            });
        }
        let end: usize = end.parse().map_err(|_| invalid())?;
        Self::inclusive(start, end)
    }

    /// 由 `limit` / `offset` 查询参数构造，两者都缺失时返回 `None`
    pub fn from_limit_offset(
        limit: Option<&str>,
        offset: Option<&str>,
    ) -> DispatchResult<Option<Self>> {
        if limit.is_none() && offset.is_none() {
            return Ok(None);
        }
        let parse = |name: &str, raw: &str| {
            raw.trim()
                .parse::<usize>()
                .map_err(|_| DispatchError::InvalidRange(format!("{name}={raw}")))
        };
        let limit = limit.map(|raw| parse("limit", raw)).transpose()?;
        let offset = offset.map(|raw| parse("offset", raw)).transpose()?;
        Ok(Some(Self {
            offset: offset.unwrap_or(0),
            limit,
        }))
    }
}

/// 响应头 `Content-Range` 的取值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRange {
    /// 闭区间 `start-end/total`
    Window {
        start: usize,
        end: usize,
        total: usize,
    },
    /// 窗口内没有数据：`*/total`
    Empty { total: usize },
}

impl ContentRange {
    pub fn total(&self) -> usize {
        match self {
            ContentRange::Window { total, .. } | ContentRange::Empty { total } => *total,
        }
    }
}

impl fmt::Display for ContentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentRange::Window { start, end, total } => write!(f, "{start}-{end}/{total}"),
            ContentRange::Empty { total } => write!(f, "*/{total}"),
        }
    }
}

/// 截取窗口并计算 `Content-Range`
///
/// `total` 是截取前的条数；实际结束位置为 `min(end, total - 1)`。
pub fn slice<R>(rows: Vec<R>, range: Option<&RangeSpec>) -> (Vec<R>, ContentRange) {
    let total = rows.len();
    let (offset, limit) = match range {
        Some(spec) => (spec.offset, spec.limit),
        None => (0, None),
    };

    let window: Vec<R> = rows
        .into_iter()
        .skip(offset)
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    let content_range = if window.is_empty() {
        ContentRange::Empty { total }
    } else {
        ContentRange::Window {
            start: offset,
            end: offset + window.len() - 1,
            total,
        }
    };
    (window, content_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            RangeSpec::parse_header("0-9").unwrap(),
            RangeSpec {
                offset: 0,
                limit: Some(10)
            }
        );
        assert_eq!(
            RangeSpec::parse_header("items=25-49").unwrap(),
            RangeSpec {
                offset: 25,
                limit: Some(25)
            }
        );
        assert_eq!(
            RangeSpec::parse_header("5-").unwrap(),
            RangeSpec {
                offset: 5,
                limit: None
            }
        );
        assert!(RangeSpec::parse_header("9-0").is_err());
        assert!(RangeSpec::parse_header("-5").is_err());
        assert!(RangeSpec::parse_header("abc").is_err());
    }

    #[test]
    fn test_parse_header_at_usize_max() {
        let spec = RangeSpec::parse_header(&format!("0-{}", usize::MAX)).unwrap();
        assert_eq!(
            spec,
            RangeSpec {
                offset: 0,
                limit: None
            }
        );
        let (window, range) = slice(vec![1, 2, 3], Some(&spec));
        assert_eq!(window, vec![1, 2, 3]);
        assert_eq!(range.to_string(), "0-2/3");

        assert_eq!(
            RangeSpec::inclusive(1, usize::MAX).unwrap().limit,
            Some(usize::MAX)
        );
    }

    #[test]
    fn test_limit_offset() {
        assert_eq!(RangeSpec::from_limit_offset(None, None).unwrap(), None);
        assert_eq!(
            RangeSpec::from_limit_offset(Some("10"), Some("20")).unwrap(),
            Some(RangeSpec {
                offset: 20,
                limit: Some(10)
            })
        );
        assert!(RangeSpec::from_limit_offset(Some("-1"), None).is_err());
    }

    #[test]
    fn test_slice_reports_actual_end() {
        let rows: Vec<u32> = (0..5).collect();

        let (window, range) = slice(rows.clone(), Some(&RangeSpec::inclusive(0, 1).unwrap()));
        assert_eq!(window, vec![0, 1]);
        assert_eq!(range.to_string(), "0-1/5");

        let (window, range) = slice(rows.clone(), Some(&RangeSpec::inclusive(4, 10).unwrap()));
        assert_eq!(window, vec![4]);
        assert_eq!(range.to_string(), "4-4/5");

        let (window, range) = slice(rows, None);
        assert_eq!(window.len(), 5);
        assert_eq!(range.to_string(), "0-4/5");
    }

    #[test]
    fn test_empty_windows() {
        let (window, range) = slice(Vec::<u32>::new(), None);
        assert!(window.is_empty());
        assert_eq!(range.to_string(), "*/0");

        let (window, range) = slice(vec![1, 2, 3], Some(&RangeSpec::inclusive(10, 19).unwrap()));
        assert!(window.is_empty());
        assert_eq!(range, ContentRange::Empty { total: 3 });

        let zero = RangeSpec::from_limit_offset(Some("0"), None).unwrap();
        let (window, range) = slice(vec![1, 2, 3], zero.as_ref());
        assert!(window.is_empty());
        assert_eq!(range.to_string(), "*/3");
    }
}
