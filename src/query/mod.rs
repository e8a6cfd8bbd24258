pub mod engine;
pub mod pagination;
pub mod state;

// Re-export commonly used types
pub use engine::{filter, run, salary_key, search, sort, FilterState, SortKey};
pub use pagination::{clamp_page, paginate, total_pages, PAGE_SIZE};
pub use state::{Pager, QueryError, QueryParams, QueryState};
