//! Shared types: the check-in event, weekly report, ID aliases. Use chrono types for timestamps and dates.

pub mod attendance;
pub mod ids;
pub mod report;

pub use attendance::{AttendanceEvent, CheckIn, CheckInRequest};
pub use ids::EventId;
pub use report::{Band, DailyAttendance, DailyTarget, DashboardSnapshot, WeeklyReport};
