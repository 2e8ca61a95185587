//! # Core Application Logic
//!
//! The conversation and everything that can happen to it.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Conversation (state) │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`message`]: `Message`, `Author`, `MessageId`
//! - [`state`]: `Conversation`, the aggregate root and its transitions
//! - [`action`]: `Action` / `Effect` and the `update()` reducer
//! - [`script`]: seed transcript and canned assistant replies
//! - [`config`]: settings file, env and CLI resolution

pub mod action;
pub mod config;
pub mod message;
pub mod script;
pub mod state;
