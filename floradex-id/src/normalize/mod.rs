//! Leaf normalizers for upstream payload values
//!
//! Every function in this tree is pure and total: any input yields a value,
//! never a panic or an error. Undecodable inputs resolve to `None` or the
//! empty string and the caller decides whether that is worth a log line.

pub mod geometry;
pub mod name;
pub mod timestamp;
