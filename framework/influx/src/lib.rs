//! Storage of speedtest points in InfluxDB.

mod client;
mod database;
mod encode;
mod init;
mod response;

pub use client::{ConnectionOptions, InfluxDatabase};
pub use database::{Database, DatabaseError};
pub use init::ensure_database;
