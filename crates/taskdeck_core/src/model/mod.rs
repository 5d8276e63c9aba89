//! Domain models shared across repositories and services.
//!
//! Records mirror stored rows one-to-one; sparse patch structs model
//! partial updates where only present fields are applied.

pub mod access;
pub mod comment;
pub mod project;
pub mod task;
pub mod user;
pub mod workspace;
