//! API route handlers

pub mod auth;
pub mod chatbot;
pub mod health;
pub mod materials;
pub mod notifications;
pub mod students;
pub mod teachers;
pub mod timetable;
pub mod users;
