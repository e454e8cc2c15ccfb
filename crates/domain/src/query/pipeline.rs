use super::plan::QueryPlan;
use super::range::{self, ContentRange};
use super::Record;

/// 一页查询结果
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub rows: Vec<R>,
    pub content_range: ContentRange,
}

impl<R> Page<R> {
    pub fn total(&self) -> usize {
        self.content_range.total()
    }
}

pub fn filter<R: Record>(rows: Vec<R>, plan: &QueryPlan) -> Vec<R> {
    rows.into_iter()
        .filter(|row| plan.filters.iter().all(|filter| filter.matches(row)))
        .collect()
}

pub fn sort<R: Record>(rows: Vec<R>, plan: &QueryPlan) -> Vec<R> {
    match &plan.order {
        Some(order) => order.sort(rows),
        None => rows,
    }
}

/// 执行查询：过滤 → 排序 → 分页 → 关联解析
///
/// 顺序固定。`resolve` 只对落在窗口内的行调用，用于填充嵌入的关联记录。
pub fn run<R, F>(rows: Vec<R>, plan: &QueryPlan, mut resolve: F) -> Page<R>
where
    R: Record,
    F: FnMut(&mut R),
{
    let rows = sort(filter(rows, plan), plan);
    let (mut rows, content_range) = range::slice(rows, plan.range.as_ref());
    rows.iter_mut().for_each(|row| resolve(row));
    Page {
        rows,
        content_range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::plan::QueryPlan;
    use crate::query::test_support::Row;

    fn rows() -> Vec<Row> {
        vec![
            Row::new("Migration plan", Some(3)),
            Row::new("Execute now", Some(1)),
            Row::new("Plan review", Some(2)),
            Row::new("Release plan", Some(5)),
            Row::new("Planning poker", Some(4)),
            Row::new("Deploy", None),
        ]
    }

    fn plan(pairs: &[(&str, &str)], range: Option<&str>) -> QueryPlan {
        let params: Vec<(String, String)> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        QueryPlan::parse::<Row>(&params, range).unwrap()
    }

    #[test]
    fn test_filter_preserves_relative_order() {
        let page = run(rows(), &plan(&[("title", "ilike.%plan%")], None), |_| {});
        let titles: Vec<_> = page.rows.iter().map(|row| row.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Migration plan", "Plan review", "Release plan", "Planning poker"]
        );
        assert_eq!(page.content_range.to_string(), "0-3/4");
    }

    #[test]
    fn test_order_applies_to_filtered_set_before_range() {
        let page = run(
            rows(),
            &plan(&[("title", "ilike.%plan%"), ("order", "rank.desc")], Some("0-1")),
            |_| {},
        );
        let ranks: Vec<_> = page.rows.iter().map(|row| row.rank).collect();
        assert_eq!(ranks, vec![Some(5), Some(4)]);
        assert_eq!(page.content_range.to_string(), "0-1/4");
    }

    #[test]
    fn test_range_on_five_matches() {
        let five = &[("rank", "not.is.null")];
        let page = run(rows(), &plan(five, Some("0-1")), |_| {});
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.total(), 5);

        let page = run(rows(), &plan(five, Some("4-10")), |_| {});
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.content_range.to_string(), "4-4/5");
    }

    #[test]
    fn test_resolve_only_touches_window() {
        let mut resolved = Vec::new();
        let page = run(rows(), &plan(&[], Some("1-2")), |row| {
            resolved.push(row.title.clone());
            row.parent = Some("p".to_string());
        });
        assert_eq!(resolved, vec!["Execute now", "Plan review"]);
        assert!(page.rows.iter().all(|row| row.parent.is_some()));
    }
}
