//! PATCH 语义下的三态字段
//!
//! 区分"设置为某值"、"置空"与"不修改"：请求体中缺失的字段保持原值，显式的
//! `null` 清空可空字段。字段需配合 `#[serde(default)]` 使用，缺失时落到
//! [`UpdateValue::NoChange`]。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum UpdateValue<T> {
    /// 设置为指定值
    Set(T),
    /// 置空（仅用于可空字段）
    Unset,
    /// 不修改
    #[default]
    NoChange,
}

impl<T> UpdateValue<T> {
    pub fn is_change(&self) -> bool {
        !matches!(self, UpdateValue::NoChange)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, UpdateValue::Unset)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            UpdateValue::Set(value) => Some(value),
            _ => None,
        }
    }

    /// 将本次更新应用到已有值上
    pub fn apply_to(self, existing: Option<T>) -> Option<T> {
        match self {
            UpdateValue::Set(value) => Some(value),
            UpdateValue::Unset => None,
            UpdateValue::NoChange => existing,
        }
    }
}

impl<'de, T> Deserialize<'de> for UpdateValue<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // 字段缺失由 #[serde(default)] 处理，走到这里说明字段出现在请求体中
        match Option::<T>::deserialize(deserializer)? {
            Some(value) => Ok(UpdateValue::Set(value)),
            None => Ok(UpdateValue::Unset),
        }
    }
}
