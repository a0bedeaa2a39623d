//! Room-scoped chat broadcast server library.
//!
//! This library provides the room router, the per-room broadcast protocol
//! (join announcement, history replay, message fan-out, leave notice) and the
//! WebSocket/HTTP delivery surface built on Axum.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
