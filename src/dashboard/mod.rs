//! Dashboard module
//!
//! Ties the account and transaction view-models to a backend and renders
//! the overview page with its spending charts.

mod aggregation;
mod charts;
mod controller;
mod view;

pub use charts::{DashboardChart, spending_charts};
pub use controller::Dashboard;
pub use view::render_dashboard;
