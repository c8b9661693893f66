pub mod dashboard;
pub mod lead;

pub use dashboard::{BreakdownEntry, DashboardCharts, LeadOverview, LeadStats, StatusCount};
pub use lead::{Lead, LeadChanges, LeadStatus, NewLead};
