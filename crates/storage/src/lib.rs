pub mod db;
pub mod repositories;
pub mod sink;

pub use sink::SqliteSink;
