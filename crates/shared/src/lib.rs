//! Wire and domain types shared by the contacts client crates.

pub mod domain;
pub mod error;
