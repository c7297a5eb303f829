pub mod adapters;
pub mod configuration;
pub mod core;
pub mod error;
pub mod utils;

#[cfg(any(test, feature = "mocks"))]
pub mod testing;

pub use tokio_util::sync::CancellationToken;
