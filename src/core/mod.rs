//! # Core Application Logic
//!
//! This module contains Duka's conversation logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  update() is pure.      │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!                    ┌───────────┴─────────────┐
//!                    ▼                         ▼
//!             ┌────────────┐            ┌────────────┐
//!             │ Dispatcher │            │    TUI     │
//!             │  (tokio)   │            │ (ratatui)  │
//!             └────────────┘            └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all session state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`transcript`]: Append-only message log and its export format
//! - [`preferences`]: Active language and the text derived from it
//! - [`connection`]: Online/offline indicator
//! - [`config`]: Config file loading and resolution

pub mod action;
pub mod config;
pub mod connection;
pub mod preferences;
pub mod state;
pub mod transcript;

#[cfg(test)]
mod proptests;
