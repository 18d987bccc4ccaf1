pub mod memstore;

pub use memstore::{MemStore, StoreError};
