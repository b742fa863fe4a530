//! In-memory document store for marketplace users and listings.
//!
//! Single-process storage with uniqueness enforcement on user
//! credentials and schema validation on advertisements. No external
//! persistence; everything is lost on restart.

mod error;
mod store;
mod types;

pub use error::StoreError;
pub use store::MarketStore;
pub use types::*;
