//! Lenient deserializers for values the backend encodes inconsistently.

pub mod amount;
pub mod string_id;
