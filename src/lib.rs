//! Barakah
//!
//! Backend service for an Islamic lifestyle app: a Hijri calendar, AI
//! devotional insights and reminders, mood-based self-reflection, growth
//! plans, a learning library and habit tracking.
//!
//! # Features
//!
//! - Tabular Hijri calendar with moon-sighting adjustment and Islamic events
//! - Anthropic-backed Quran and hadith insights, reflection analysis and
//!   growth plan drafts
//! - Daily reminders cached per session for 24 hours, with offline fallbacks
//! - `SQLite` persistence for user data
//!
//! # Quick Start
//!
//! ```bash
//! ANTHROPIC_API_KEY=sk-ant-xxx ./barakah
//! curl -H 'x-user-id: 3f6c2a4e-8b1d-4c5e-9f7a-2b3c4d5e6f70' localhost:3000/api/calendar/today
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   HTTP/JSON   ┌──────────────┐──────▶ Anthropic API
//! │ Mobile/web │──────────────▶│   Barakah    │──────▶ Quran text API
//! │   client   │◀──────────────│    (axum)    │──────▶ Image API
//! └────────────┘               └──────┬───────┘
//!                                     │
//!                                     ▼
//!                                  SQLite
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod anthropic;
pub mod calendar;
pub mod config;
pub mod error;
pub mod image;
pub mod prompts;
pub mod quran;
pub mod reminder;
pub mod server;
pub mod services;
pub mod storage;
pub mod traits;

#[cfg(test)]
mod test_utils;
