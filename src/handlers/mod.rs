pub mod attendance;

pub use attendance::{
    get_attendance,
    get_attendance_summary,
    health_check,
    record_attendance,
    AttendanceListResponse,
    AttendanceParams,
    QueryEcho,
    RecordAttendanceResponse,
    SummaryResponse,
};
