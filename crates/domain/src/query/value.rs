use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::cmp::Ordering;

/// 列的取值类型，决定过滤操作数如何转换以及排序如何比较
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Boolean,
    Timestamp,
    /// 字符串数组，只支持 `is.null`
    Array,
    /// JSON 对象，只支持 `is.null`
    Object,
}

impl ColumnType {
    /// 是否可以参与比较和排序
    pub fn is_scalar(&self) -> bool {
        !matches!(self, ColumnType::Array | ColumnType::Object)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Boolean => "boolean",
            ColumnType::Timestamp => "timestamptz",
            ColumnType::Array => "text[]",
            ColumnType::Object => "jsonb",
        }
    }
}

/// 可查询的列定义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnType,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnType) -> Self {
        Self { name, kind }
    }
}

/// 记录中某一列的取值
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
    /// 非标量列（数组、对象）的非空取值
    Opaque,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn text<S: Into<String>>(value: S) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map(FieldValue::text).unwrap_or(FieldValue::Null)
    }

    pub fn optional_timestamp(value: Option<&DateTime<Utc>>) -> Self {
        value.copied().map(FieldValue::Timestamp).unwrap_or(FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// 同类型非空值之间的比较
    ///
    /// 任一侧为 `Null`，或类型不一致时返回 `None`。
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => Some(a.cmp(b)),
            (FieldValue::Int(a), FieldValue::Int(b)) => Some(a.cmp(b)),
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// 将 URL 中的原始操作数转换为列类型对应的值
    pub fn coerce(kind: ColumnType, raw: &str) -> Result<FieldValue, String> {
        match kind {
            ColumnType::Text => Ok(FieldValue::text(raw)),
            ColumnType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| format!("无法解析为整数: {raw:?}")),
            ColumnType::Boolean => match raw.trim().to_lowercase().as_str() {
                "true" | "t" | "1" => Ok(FieldValue::Bool(true)),
                "false" | "f" | "0" => Ok(FieldValue::Bool(false)),
                _ => Err(format!("无法解析为布尔值: {raw:?}")),
            },
            ColumnType::Timestamp => parse_timestamp(raw)
                .map(FieldValue::Timestamp)
                .ok_or_else(|| format!("无法解析为时间: {raw:?}")),
            ColumnType::Array | ColumnType::Object => {
                Err(format!("{} 类型的列不支持比较", kind.name()))
            }
        }
    }
}

/// 解析时间操作数
///
/// 支持 RFC 3339、不带时区的 `YYYY-MM-DDTHH:MM:SS`（按 UTC）以及 `YYYY-MM-DD`
/// （当天零点）。查询串中的 `+` 可能已被解码成空格，这里会还原。
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let candidates = [raw.to_string(), raw.replace(' ', "+")];
    for candidate in &candidates {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(candidate) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2025-03-01T08:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01T10:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01T10:30:00 02:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01T08:30:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2025-03-01"),
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_coerce_by_column_type() {
        assert_eq!(
            FieldValue::coerce(ColumnType::Integer, "42"),
            Ok(FieldValue::Int(42))
        );
        assert!(FieldValue::coerce(ColumnType::Integer, "forty-two").is_err());
        assert!(FieldValue::coerce(ColumnType::Integer, "").is_err());
        assert_eq!(
            FieldValue::coerce(ColumnType::Text, ""),
            Ok(FieldValue::text(""))
        );
        assert_eq!(
            FieldValue::coerce(ColumnType::Boolean, "TRUE"),
            Ok(FieldValue::Bool(true))
        );
        assert!(FieldValue::coerce(ColumnType::Array, "x").is_err());
    }

    #[test]
    fn test_compare_requires_same_type() {
        assert_eq!(
            FieldValue::text("a").compare(&FieldValue::text("b")),
            Some(Ordering::Less)
        );
        assert_eq!(FieldValue::Int(3).compare(&FieldValue::Int(3)), Some(Ordering::Equal));
        assert_eq!(FieldValue::Int(3).compare(&FieldValue::text("3")), None);
        assert_eq!(FieldValue::Null.compare(&FieldValue::Null), None);
    }
}
