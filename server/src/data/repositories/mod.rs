//! Entity repositories
//!
//! Free functions over the SQLite pool, one module per entity. Multi-row
//! mutations open their own transaction and commit or roll back as a unit.

pub mod class;
pub mod material;
pub mod notification;
pub mod student;
pub mod teacher;
pub mod timetable;
pub mod user;
