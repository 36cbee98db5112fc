//! Outbound adapters: the persistence backends and the payment provider
//! client.

pub mod fedapay;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
