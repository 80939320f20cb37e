//! Pure domain logic (no I/O)

pub mod chat;
pub mod phone;
pub mod schedule;
