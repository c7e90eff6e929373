//! Quran text lookup.
//!
//! Verses are fetched from an alquran.cloud compatible API with the Uthmani
//! Arabic text alongside the user's translation edition.

mod client;
mod types;

pub use client::{QuranClient, ARABIC_EDITION};
pub use types::{normalize_reference, Verse, TOTAL_SURAHS, TOTAL_VERSES};
