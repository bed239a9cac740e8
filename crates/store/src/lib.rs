//! Document store backends for Marquee
//!
//! Both backends implement `marquee_common::DocumentStore` with the same
//! filter semantics, so domains and tests can swap them freely.

mod memory;
mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
