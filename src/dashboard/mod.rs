//! Dashboard module
//!
//! Shows the balance, income and expenses for the selected month, category
//! and type, along with the matching transactions grouped by month.

mod history;
mod page;
mod query;
mod summary_endpoint;

pub(crate) use history::{amount_style, history_view};
pub use page::{DashboardState, get_dashboard_page};
pub use summary_endpoint::get_summary;
