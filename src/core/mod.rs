//! # Core Application Logic
//!
//! This module contains Chatline's business logic.
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
//!                    │  • Identity + storage   │
//!                    └───────────┬─────────────┘
//!                                │
//!                   ┌────────────┴────────────┐
//!                   ▼                         ▼
//!            ┌────────────┐            ┌────────────┐
//!            │    TUI     │            │    chat    │
//!            │  Adapter   │            │   client   │
//!            │ (ratatui)  │            │ (reqwest)  │
//!            └────────────┘            └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct — all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`identity`]: Session id and display name
//! - [`storage`]: Ephemeral and durable key-value stores
//! - [`transcript`]: The conversation log
//! - [`config`]: Settings resolution

pub mod action;
pub mod config;
pub mod identity;
pub mod state;
pub mod storage;
pub mod transcript;
