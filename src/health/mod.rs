//! Health checker implementations.

pub mod http;
pub mod mock;

pub use http::HttpHealthChecker;
pub use mock::MockHealthChecker;
