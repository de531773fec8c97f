pub mod aggregator;
pub mod attendance_service;
pub mod eventstore;
pub mod memory_store;
pub mod query;
pub mod seed_data;

pub use attendance_service::AttendanceService;
pub use eventstore::{EventStore, PgEventStore};
pub use memory_store::MemoryEventStore;
pub use query::AttendanceQuery;
