pub mod poller;

pub use poller::{DashboardPoller, PollerConfig, PollerHandle, ReportSource};
