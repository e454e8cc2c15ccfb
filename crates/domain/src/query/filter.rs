use std::cmp::Ordering;
use std::str::FromStr;

use dispatch_core::{DispatchError, DispatchResult};

use super::value::{ColumnType, FieldValue};
use super::Record;

/// 过滤操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    Ilike,
    Is,
    In,
}

impl FromStr for FilterOperator {
    type Err = ();

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "eq" => Ok(FilterOperator::Eq),
            "neq" => Ok(FilterOperator::Neq),
            "gt" => Ok(FilterOperator::Gt),
            "gte" => Ok(FilterOperator::Gte),
            "lt" => Ok(FilterOperator::Lt),
            "lte" => Ok(FilterOperator::Lte),
            "like" => Ok(FilterOperator::Like),
            "ilike" => Ok(FilterOperator::Ilike),
            "is" => Ok(FilterOperator::Is),
            "in" => Ok(FilterOperator::In),
            _ => Err(()),
        }
    }
}

impl FilterOperator {
    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            FilterOperator::Eq => ordering == Ordering::Equal,
            FilterOperator::Neq => ordering != Ordering::Equal,
            FilterOperator::Gt => ordering == Ordering::Greater,
            FilterOperator::Gte => ordering != Ordering::Less,
            FilterOperator::Lt => ordering == Ordering::Less,
            FilterOperator::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }
}

/// `is` 操作符的目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsTarget {
    Null,
    True,
    False,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternToken {
    Literal(char),
    AnyOne,
    AnyRun,
}

/// `like` / `ilike` 模式
///
/// `%` 匹配任意长度（含空），`_` 匹配单个字符，`*` 等同于 `%`，
/// 反斜杠转义下一个字符。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern {
    tokens: Vec<PatternToken>,
    case_insensitive: bool,
}

impl LikePattern {
    pub fn parse(raw: &str, case_insensitive: bool) -> Self {
        let source = if case_insensitive {
            raw.to_lowercase()
        } else {
            raw.to_string()
        };

        let mut tokens = Vec::new();
        let mut chars = source.chars();
        while let Some(c) = chars.next() {
            let token = match c {
                '%' | '*' => {
                    if tokens.last() == Some(&PatternToken::AnyRun) {
                        continue;
                    }
                    PatternToken::AnyRun
                }
                '_' => PatternToken::AnyOne,
                '\\' => PatternToken::Literal(chars.next().unwrap_or('\\')),
                other => PatternToken::Literal(other),
            };
            tokens.push(token);
        }

        Self {
            tokens,
            case_insensitive,
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        let text: Vec<char> = if self.case_insensitive {
            text.to_lowercase().chars().collect()
        } else {
            text.chars().collect()
        };

        let (mut t, mut p) = (0usize, 0usize);
        // 最近一个 AnyRun 之后的模式位置，以及它当前吞到的文本位置
        let mut backtrack: Option<(usize, usize)> = None;

        while t < text.len() {
            match self.tokens.get(p) {
                Some(PatternToken::AnyRun) => {
                    p += 1;
                    backtrack = Some((p, t));
                }
                Some(PatternToken::AnyOne) => {
                    p += 1;
                    t += 1;
                }
                Some(PatternToken::Literal(c)) if *c == text[t] => {
                    p += 1;
                    t += 1;
                }
                _ => match backtrack {
                    Some((resume_p, resume_t)) => {
                        p = resume_p;
                        t = resume_t + 1;
                        backtrack = Some((resume_p, resume_t + 1));
                    }
                    None => return false,
                },
            }
        }

        self.tokens[p..]
            .iter()
            .all(|token| *token == PatternToken::AnyRun)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(FieldValue),
    Pattern(LikePattern),
    Is(IsTarget),
    List(Vec<FieldValue>),
}

/// 单列过滤条件：`<column>=[not.]<op>.<operand>`
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub operator: FilterOperator,
    pub negated: bool,
    pub operand: Operand,
    /// 原始参数值，用于错误信息
    pub raw: String,
}

impl Filter {
    /// 针对资源 `R` 解析一个查询参数
    pub fn parse<R: Record>(column: &str, raw: &str) -> DispatchResult<Self> {
        let definition =
            R::column(column).ok_or_else(|| DispatchError::unknown_column(R::RESOURCE, column))?;

        let (mut op_token, mut operand) = raw
            .split_once('.')
            .ok_or_else(|| DispatchError::invalid_filter(column, raw, "缺少操作符"))?;

        let negated = op_token == "not";
        if negated {
            (op_token, operand) = operand
                .split_once('.')
                .ok_or_else(|| DispatchError::invalid_filter(column, raw, "not 之后缺少操作符"))?;
        }

        let operator: FilterOperator = op_token.parse().map_err(|_| {
            DispatchError::invalid_filter(column, raw, format!("未知的操作符 {op_token}"))
        })?;

        let invalid = |reason: String| DispatchError::invalid_filter(column, raw, reason);
        let kind = definition.kind;

        let operand = match operator {
            FilterOperator::Like | FilterOperator::Ilike => {
                if kind != ColumnType::Text {
                    return Err(invalid(format!("{} 类型的列不支持模式匹配", kind.name())));
                }
                Operand::Pattern(LikePattern::parse(
                    operand,
                    operator == FilterOperator::Ilike,
                ))
            }
            FilterOperator::Is => match operand.to_lowercase().as_str() {
                "null" => Operand::Is(IsTarget::Null),
                "true" if kind == ColumnType::Boolean => Operand::Is(IsTarget::True),
                "false" if kind == ColumnType::Boolean => Operand::Is(IsTarget::False),
                _ => return Err(invalid(format!("is 不支持的取值 {operand}"))),
            },
            FilterOperator::In => {
                let inner = operand
                    .strip_prefix('(')
                    .and_then(|rest| rest.strip_suffix(')'))
                    .ok_or_else(|| invalid("in 的取值必须用括号包裹".to_string()))?;
                let items = split_list(inner)
                    .iter()
                    .map(|item| FieldValue::coerce(kind, item))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(invalid)?;
                Operand::List(items)
            }
            _ => Operand::Value(FieldValue::coerce(kind, operand).map_err(invalid)?),
        };

        Ok(Self {
            column: definition.name.to_string(),
            operator,
            negated,
            operand,
            raw: raw.to_string(),
        })
    }

    /// 记录是否满足条件
    ///
    /// 与 SQL 一致：列值为空时比较结果未知，无论是否取反都不匹配（`is` 除外）。
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        let value = record.field(&self.column);
        match self.evaluate(&value) {
            Some(outcome) => outcome != self.negated,
            None => false,
        }
    }

    /// 是否为 `id=eq.<value>` 形式，返回其中的标识符
    pub fn as_id_equality(&self) -> Option<&str> {
        self.as_equality_on("id")
    }

    /// 是否为 `<column>=eq.<text>` 形式
    pub fn as_equality_on(&self, column: &str) -> Option<&str> {
        match (&self.operand, self.operator, self.negated) {
            (Operand::Value(value), FilterOperator::Eq, false) if self.column == column => {
                value.as_text()
            }
            _ => None,
        }
    }

    fn evaluate(&self, value: &FieldValue) -> Option<bool> {
        match &self.operand {
            Operand::Is(IsTarget::Null) => Some(value.is_null()),
            Operand::Is(IsTarget::True) => Some(*value == FieldValue::Bool(true)),
            Operand::Is(IsTarget::False) => Some(*value == FieldValue::Bool(false)),
            Operand::Pattern(pattern) => value.as_text().map(|text| pattern.matches(text)),
            Operand::List(items) => {
                if value.is_null() {
                    return None;
                }
                Some(
                    items
                        .iter()
                        .any(|item| value.compare(item) == Some(Ordering::Equal)),
                )
            }
            Operand::Value(expected) => value
                .compare(expected)
                .map(|ordering| self.operator.accepts(ordering)),
        }
    }
}

/// 拆分 `in.(...)` 的列表，双引号内的逗号不作为分隔符
fn split_list(inner: &str) -> Vec<String> {
    if inner.is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => quoted = !quoted,
            '\\' if quoted => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ',' if !quoted => items.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    items.push(current);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::test_support::Row;

    fn row(title: &str, rank: Option<i64>) -> Row {
        Row::new(title, rank)
    }

    #[test]
    fn test_ilike_is_case_insensitive_substring() {
        let filter = Filter::parse::<Row>("title", "ilike.%plan%").unwrap();
        assert!(filter.matches(&row("Migration plan", None)));
        assert!(filter.matches(&row("Plan review", None)));
        assert!(!filter.matches(&row("Execute now", None)));
    }

    #[test]
    fn test_star_is_wildcard_alias() {
        let filter = Filter::parse::<Row>("title", "ilike.*PLAN*").unwrap();
        assert!(filter.matches(&row("migration plan", None)));
    }

    #[test]
    fn test_like_is_case_sensitive_and_anchored() {
        let filter = Filter::parse::<Row>("title", "like.Plan_r%").unwrap();
        assert!(filter.matches(&row("Plan review", None)));
        assert!(!filter.matches(&row("plan review", None)));
        assert!(!filter.matches(&row("A Plan review", None)));
    }

    #[test]
    fn test_pattern_backtracking() {
        let pattern = LikePattern::parse("%a%b", false);
        assert!(pattern.matches("xxaxxab"));
        assert!(pattern.matches("ab"));
        assert!(!pattern.matches("abx"));
        assert!(LikePattern::parse("%", false).matches(""));
        assert!(LikePattern::parse("100\\%", false).matches("100%"));
        assert!(!LikePattern::parse("100\\%", false).matches("1000"));
    }

    #[test]
    fn test_empty_operand_matches_empty_string() {
        let filter = Filter::parse::<Row>("title", "eq.").unwrap();
        assert!(filter.matches(&row("", None)));
        assert!(!filter.matches(&row("x", None)));
    }

    #[test]
    fn test_comparison_coerces_to_column_type() {
        let filter = Filter::parse::<Row>("rank", "gte.10").unwrap();
        assert!(filter.matches(&row("a", Some(10))));
        assert!(filter.matches(&row("a", Some(11))));
        assert!(!filter.matches(&row("a", Some(9))));
        assert!(!filter.matches(&row("a", None)));

        let err = Filter::parse::<Row>("rank", "gte.ten").unwrap_err();
        assert!(matches!(err, DispatchError::InvalidFilter { .. }));
    }

    #[test]
    fn test_negation_and_nulls() {
        let filter = Filter::parse::<Row>("rank", "not.eq.1").unwrap();
        assert!(filter.matches(&row("a", Some(2))));
        assert!(!filter.matches(&row("a", Some(1))));
        assert!(!filter.matches(&row("a", None)));

        let filter = Filter::parse::<Row>("rank", "is.null").unwrap();
        assert!(filter.matches(&row("a", None)));
        let filter = Filter::parse::<Row>("rank", "not.is.null").unwrap();
        assert!(filter.matches(&row("a", Some(1))));
    }

    #[test]
    fn test_in_list_with_quotes() {
        let filter = Filter::parse::<Row>("title", "in.(alpha,\"beta,gamma\")").unwrap();
        assert!(filter.matches(&row("alpha", None)));
        assert!(filter.matches(&row("beta,gamma", None)));
        assert!(!filter.matches(&row("beta", None)));

        let filter = Filter::parse::<Row>("title", "in.()").unwrap();
        assert!(!filter.matches(&row("alpha", None)));
    }

    #[test]
    fn test_grammar_errors() {
        assert!(matches!(
            Filter::parse::<Row>("title", "nodot"),
            Err(DispatchError::InvalidFilter { .. })
        ));
        assert!(matches!(
            Filter::parse::<Row>("title", "zz.done"),
            Err(DispatchError::InvalidFilter { .. })
        ));
        assert!(matches!(
            Filter::parse::<Row>("colour", "eq.red"),
            Err(DispatchError::UnknownColumn { .. })
        ));
        assert!(matches!(
            Filter::parse::<Row>("rank", "ilike.%1%"),
            Err(DispatchError::InvalidFilter { .. })
        ));
        assert!(matches!(
            Filter::parse::<Row>("title", "in.alpha"),
            Err(DispatchError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_id_equality() {
        let filter = Filter::parse::<Row>("id", "eq.row-1").unwrap();
        assert_eq!(filter.as_id_equality(), Some("row-1"));
        let filter = Filter::parse::<Row>("id", "neq.row-1").unwrap();
        assert_eq!(filter.as_id_equality(), None);
    }
}
