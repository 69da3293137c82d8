//! Built-in [`DataProvider`](crate::DataProvider) implementations.

mod mock;

pub use mock::{MockListing, MockProvider};
