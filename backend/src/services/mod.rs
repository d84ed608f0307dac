//! Service layer: aggregation and dashboard composition.
//!
//! Services take an already-loaded record set and turn it into the data the
//! charts and summary cards render. They are pure and never touch I/O.

pub mod aggregation;

pub mod dashboard;

pub mod summary;

pub use aggregation::{
    count_distinct, group_and_count, pie_slices, time_series, CategorySeries, DateCount,
    DateSeries, GroupCount, PieSlice,
};
pub use dashboard::{
    bar_chart, build_dashboard, build_panels, line_chart, pie_chart, Chart, ChartKind, ChartPanel,
    ChartRequest, DashboardView, PanelError,
};
pub use summary::{compute_summary, date_bounds, filter_options, DateBounds, FilterOptions, SummaryMetrics};
