pub mod config;
pub mod logging;

pub mod daemon;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod fsutil;
pub mod resource;
pub mod storage;
pub mod transport;

pub use error::FetchError;
pub use fetch::{FetchOptions, FetchOutcome, Fetcher};
pub use resource::{ImageRef, Resource};
