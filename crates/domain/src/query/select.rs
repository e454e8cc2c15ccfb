use serde_json::{Map, Value};

use dispatch_core::{DispatchError, DispatchResult};

use super::Record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedColumn {
    pub name: String,
    pub alias: String,
}

/// 请求嵌入的关联资源
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedRequest {
    /// 输出中的键名
    pub alias: String,
    pub resource: String,
    /// 记录序列化后承载关联数据的键名
    source_key: &'static str,
}

/// `select` 参数
///
/// 支持 `*`、列名列表（可写成 `别名:列名`）以及 `别名:资源(*)` 形式的嵌入。
/// 嵌入只能整体返回，括号内不是 `*` 时报 `UnknownColumn`。
/// 未提供 `select` 时返回全部列并嵌入所有关联资源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectSpec {
    /// `None` 表示全部列
    columns: Option<Vec<SelectedColumn>>,
    embeds: Vec<EmbedRequest>,
    embed_keys: Vec<&'static str>,
}

impl SelectSpec {
    /// 全部列，嵌入所有关联资源
    pub fn everything<R: Record>() -> Self {
        Self {
            columns: None,
            embeds: R::embeds()
                .iter()
                .map(|embed| EmbedRequest {
                    alias: embed.key.to_string(),
                    resource: embed.resource.to_string(),
                    source_key: embed.key,
                })
                .collect(),
            embed_keys: R::embeds().iter().map(|embed| embed.key).collect(),
        }
    }

    pub fn parse<R: Record>(raw: Option<&str>) -> DispatchResult<Self> {
        let raw = match raw.map(str::trim) {
            None => return Ok(Self::everything::<R>()),
            Some("") => "*",
            Some(raw) => raw,
        };

        let mut all_columns = false;
        let mut columns = Vec::new();
        let mut embeds = Vec::new();

        for item in split_top_level(raw) {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            if item == "*" {
                all_columns = true;
                continue;
            }

            let (alias, target) = match item.split_once(':') {
                Some((alias, target)) if !target.starts_with(':') => {
                    (Some(alias.trim()), target.trim())
                }
                _ => (None, item),
            };

            if let Some(open) = target.find('(') {
                let resource = target[..open].trim();
                let embed = R::embeds()
                    .iter()
                    .find(|embed| embed.resource == resource || embed.key == resource)
                    .ok_or_else(|| DispatchError::unknown_column(R::RESOURCE, resource))?;
                let inner = target[open + 1..].trim();
                let inner = inner.strip_suffix(')').unwrap_or(inner).trim();
                if inner != "*" {
                    return Err(DispatchError::unknown_column(embed.resource, inner));
                }
                embeds.push(EmbedRequest {
                    alias: alias.unwrap_or(embed.key).to_string(),
                    resource: embed.resource.to_string(),
                    source_key: embed.key,
                });
                continue;
            }

            // 类型转换写法 `col::text` 只取列名
            let name = target.split("::").next().unwrap_or(target).trim();
            let definition =
                R::column(name).ok_or_else(|| DispatchError::unknown_column(R::RESOURCE, name))?;
            columns.push(SelectedColumn {
                name: definition.name.to_string(),
                alias: alias.unwrap_or(definition.name).to_string(),
            });
        }

        Ok(Self {
            columns: if all_columns || columns.is_empty() {
                None
            } else {
                Some(columns)
            },
            embeds,
            embed_keys: R::embeds().iter().map(|embed| embed.key).collect(),
        })
    }

    /// 是否请求嵌入指定资源
    pub fn embeds(&self, resource: &str) -> bool {
        self.embeds.iter().any(|embed| embed.resource == resource)
    }

    /// 按选择裁剪一条已序列化的记录
    pub fn project(&self, value: Value) -> Value {
        let Value::Object(mut source) = value else {
            return value;
        };

        let embedded: Vec<(String, Value)> = self
            .embeds
            .iter()
            .map(|embed| {
                let related = source.get(embed.source_key).cloned().unwrap_or(Value::Null);
                (embed.alias.clone(), related)
            })
            .collect();
        for key in &self.embed_keys {
            source.remove(*key);
        }

        let mut output = match &self.columns {
            None => source,
            Some(columns) => {
                let mut picked = Map::new();
                for column in columns {
                    let value = source.get(&column.name).cloned().unwrap_or(Value::Null);
                    picked.insert(column.alias.clone(), value);
                }
                picked
            }
        };
        output.extend(embedded);
        Value::Object(output)
    }
}

/// 按顶层逗号拆分，括号内的逗号保留
fn split_top_level(raw: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (index, c) in raw.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&raw[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    items.push(&raw[start..]);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::test_support::Row;
    use serde_json::json;

    fn serialized() -> Value {
        json!({
            "id": "row-1",
            "title": "Plan review",
            "rank": 3,
            "parent": { "id": "p-1" }
        })
    }

    #[test]
    fn test_absent_select_embeds_everything() {
        let spec = SelectSpec::parse::<Row>(None).unwrap();
        assert!(spec.embeds("parents"));
        assert_eq!(spec.project(serialized()), serialized());
    }

    #[test]
    fn test_star_drops_embeds() {
        let spec = SelectSpec::parse::<Row>(Some("*")).unwrap();
        assert!(!spec.embeds("parents"));
        let projected = spec.project(serialized());
        assert!(projected.get("parent").is_none());
        assert_eq!(projected["title"], "Plan review");
    }

    #[test]
    fn test_star_with_aliased_embed() {
        let spec = SelectSpec::parse::<Row>(Some("*, owner:parents(*)")).unwrap();
        assert!(spec.embeds("parents"));
        let projected = spec.project(serialized());
        assert_eq!(projected["owner"]["id"], "p-1");
        assert!(projected.get("parent").is_none());
        assert_eq!(projected["rank"], 3);
    }

    #[test]
    fn test_column_list_with_alias() {
        let spec = SelectSpec::parse::<Row>(Some("id,heading:title")).unwrap();
        assert_eq!(
            spec.project(serialized()),
            json!({ "id": "row-1", "heading": "Plan review" })
        );
    }

    #[test]
    fn test_unknown_names_rejected() {
        assert!(matches!(
            SelectSpec::parse::<Row>(Some("id,colour")),
            Err(DispatchError::UnknownColumn { .. })
        ));
        assert!(matches!(
            SelectSpec::parse::<Row>(Some("*,owners(*)")),
            Err(DispatchError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_embed_column_list_rejected() {
        assert!(matches!(
            SelectSpec::parse::<Row>(Some("*,owner:parents(id,name)")),
            Err(DispatchError::UnknownColumn { .. })
        ));
        assert!(SelectSpec::parse::<Row>(Some("id,parents( * )")).is_ok());
    }

    #[test]
    fn test_split_keeps_nested_commas() {
        assert_eq!(
            split_top_level("id,parent:parents(id,name),title"),
            vec!["id", "parent:parents(id,name)", "title"]
        );
    }
}
