//! Database layer - connection pool, schema bootstrap and repositories
//!
//! # Design Principles
//!
//! - Connection pool with an explicit limit - no Arc<Mutex<Connection>>
//! - Counters are incremented in SQL (`votes = votes + 1`) - no read-modify-write
//! - Transactions for multi-step inserts

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
