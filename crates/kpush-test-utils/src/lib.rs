//! Shared test utilities for the kpush workspace.
//!
//! This crate is a dev-dependency only. [`TestHome`] lays out a throwaway
//! kpush home with descriptor, state and source directories.

pub mod home;

pub use home::TestHome;
