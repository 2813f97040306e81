//! Site-specific enumerator/parser pairs.

pub mod computeruniverse;

pub use computeruniverse::{CuEnumerator, CuParser};
