pub mod browse;
pub mod dispatch;
pub mod probe;
pub mod schema;
pub mod shared;
pub mod upload;
pub mod watch;
