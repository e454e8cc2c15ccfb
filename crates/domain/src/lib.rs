pub mod query;
pub mod repositories;

pub use query::{
    ContentRange, Filter, OrderSpec, Page, QueryPlan, RangeSpec, Record, SelectSpec,
};
pub use repositories::*;
