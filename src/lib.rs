//! DayOne task manager: a dual-mode API client that falls back to a local
//! simulation when the backend is unreachable, the client-side state it
//! drives, and the backend it talks to.

pub mod ai;
pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
