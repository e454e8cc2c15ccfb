use std::cmp::Ordering;

use dispatch_core::{DispatchError, DispatchResult};

use super::value::FieldValue;
use super::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsPlacement {
    First,
    Last,
}

/// 单个排序键
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    pub column: String,
    pub direction: Direction,
    pub nulls: NullsPlacement,
}

impl OrderKey {
    /// 升序时空值在后，降序时空值在前
    pub fn new<S: Into<String>>(column: S, direction: Direction) -> Self {
        let nulls = match direction {
            Direction::Asc => NullsPlacement::Last,
            Direction::Desc => NullsPlacement::First,
        };
        Self {
            column: column.into(),
            direction,
            nulls,
        }
    }

    pub fn asc<S: Into<String>>(column: S) -> Self {
        Self::new(column, Direction::Asc)
    }

    pub fn desc<S: Into<String>>(column: S) -> Self {
        Self::new(column, Direction::Desc)
    }

    fn compare(&self, a: &FieldValue, b: &FieldValue) -> Ordering {
        match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => match self.nulls {
                NullsPlacement::First => Ordering::Less,
                NullsPlacement::Last => Ordering::Greater,
            },
            (false, true) => match self.nulls {
                NullsPlacement::First => Ordering::Greater,
                NullsPlacement::Last => Ordering::Less,
            },
            (false, false) => {
                let ordering = a.compare(b).unwrap_or(Ordering::Equal);
                match self.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            }
        }
    }
}

/// 排序规格：`order=<col>[.asc|.desc][.nullsfirst|.nullslast],...`
///
/// 第一个键优先级最高，排序稳定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    pub keys: Vec<OrderKey>,
}

impl OrderSpec {
    pub fn single(key: OrderKey) -> Self {
        Self { keys: vec![key] }
    }

    pub fn parse<R: Record>(raw: &str) -> DispatchResult<Self> {
        let invalid = |reason: String| DispatchError::InvalidOrder(format!("{raw}: {reason}"));

        let mut keys = Vec::new();
        for item in raw.split(',').map(str::trim) {
            if item.is_empty() {
                return Err(invalid("存在空的排序键".to_string()));
            }

            let mut parts = item.split('.');
            let column = parts.next().unwrap_or_default();
            let definition = R::column(column)
                .ok_or_else(|| DispatchError::unknown_column(R::RESOURCE, column))?;
            if !definition.kind.is_scalar() {
                return Err(invalid(format!("列 {column} 不支持排序")));
            }

            let mut direction = None;
            let mut nulls = None;
            for modifier in parts {
                match modifier {
                    "asc" if direction.is_none() => direction = Some(Direction::Asc),
                    "desc" if direction.is_none() => direction = Some(Direction::Desc),
                    "nullsfirst" if nulls.is_none() => nulls = Some(NullsPlacement::First),
                    "nullslast" if nulls.is_none() => nulls = Some(NullsPlacement::Last),
                    other => return Err(invalid(format!("无法识别的修饰 {other:?}"))),
                }
            }

            let mut key = OrderKey::new(definition.name, direction.unwrap_or(Direction::Asc));
            if let Some(nulls) = nulls {
                key.nulls = nulls;
            }
            keys.push(key);
        }

        Ok(Self { keys })
    }

    /// 对行做稳定排序
    pub fn sort<R: Record>(&self, rows: Vec<R>) -> Vec<R> {
        if self.keys.is_empty() {
            return rows;
        }

        let mut keyed: Vec<(Vec<FieldValue>, R)> = rows
            .into_iter()
            .map(|row| {
                let values = self.keys.iter().map(|key| row.field(&key.column)).collect();
                (values, row)
            })
            .collect();

        keyed.sort_by(|(a, _), (b, _)| {
            self.keys
                .iter()
                .zip(a.iter().zip(b.iter()))
                .map(|(key, (left, right))| key.compare(left, right))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        keyed.into_iter().map(|(_, row)| row).collect()
    }
}
