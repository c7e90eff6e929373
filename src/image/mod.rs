//! Text-to-image client for insight cards.
//!
//! Talks to an OpenAI-compatible `images/generations` endpoint. The client is
//! only constructed when `IMAGE_API_KEY` is set; without it the image route
//! reports [`ImageError::NotConfigured`](crate::error::ImageError::NotConfigured).

mod client;
mod types;

pub use client::{ImageClient, MAX_PROMPT_LENGTH};
pub use types::{GeneratedImage, ImageRequest, DEFAULT_IMAGE_SIZE};
