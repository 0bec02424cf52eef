//! Connection handling: pragmas and the read-only pool.

pub mod pragmas;
pub mod read_pool;

pub use read_pool::ReadPool;
