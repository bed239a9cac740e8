//! API endpoint integration tests
//!
//! Drives the composed application router end to end over the in-memory store.

#![allow(dead_code)]

mod auth;
mod common;
mod movies;
mod users;
