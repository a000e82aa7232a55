//! Command implementations.

pub mod blog;
pub mod cart;
pub mod gallery;
