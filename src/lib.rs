//! Assistant Chat
//!
//! A terminal chat client for an assistant service that exposes assistants,
//! vector stores, and conversation threads over HTTP.
//!
//! # Architecture
//!
//! - **API**: typed client for the four backend calls, behind a backend trait
//! - **Session**: conversation state machine (bootstrap, compose, send)
//! - **View**: transcript rendering, tail-following scroll, input sizing
//! - **REPL**: line-oriented front-end over stdin/stdout
//!
//! # Modules
//!
//! - [`api`]: backend trait, HTTP client, simulated backend
//! - [`config`]: layered CLI/env/file configuration
//! - [`session`]: conversation and selection state
//! - [`view`]: presentation of a session as rows
//! - [`repl`]: terminal front-end

pub mod api;
pub mod config;
pub mod repl;
pub mod session;
pub mod view;
