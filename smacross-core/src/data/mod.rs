//! History access: the provider port and the bundled in-memory provider.

pub mod memory;
pub mod provider;

pub use memory::InMemoryHistory;
pub use provider::{DataError, HistoryProvider, HistoryRequest, HistoryResponse, ProviderError};
