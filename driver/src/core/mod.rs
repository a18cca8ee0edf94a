//! Pure orchestration rules: corpus membership/ordering, outcome types, errors.

pub mod corpus;
pub mod error;
pub mod types;
