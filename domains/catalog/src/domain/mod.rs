//! Catalog domain layer: entities

pub mod entities;
