//! HTTP client for the public Quran text API.

#![allow(clippy::missing_errors_doc)]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::types::{normalize_reference, AyahEnvelope, Verse};
use crate::error::QuranError;
use crate::traits::QuranClientTrait;

/// Edition providing the Arabic text.
pub const ARABIC_EDITION: &str = "quran-uthmani";

/// Quran text client (alquran.cloud compatible).
#[derive(Debug)]
pub struct QuranClient {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl QuranClient {
    /// Create a new Quran client.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Result<Self, QuranError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| QuranError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout_ms,
        })
    }

    /// Fetch one verse in Arabic and the given translation edition.
    pub async fn verse(&self, reference: &str, translation: &str) -> Result<Verse, QuranError> {
        let reference = normalize_reference(reference)?;
        let url = format!(
            "{}/ayah/{reference}/editions/{ARABIC_EDITION},{translation}",
            self.base_url
        );

        tracing::debug!(url = %url, "Fetching verse");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                QuranError::Timeout {
                    timeout_ms: self.timeout_ms,
                }
            } else {
                QuranError::Network {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if status.as_u16() == 404 || status.as_u16() == 400 {
            return Err(QuranError::NotFound { reference });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuranError::UnexpectedResponse {
                message: format!("Status {status}: {body}"),
            });
        }

        let envelope: AyahEnvelope =
            response
                .json()
                .await
                .map_err(|e| QuranError::UnexpectedResponse {
                    message: format!("Failed to parse response: {e}"),
                })?;

        let mut arabic = None;
        let mut translated = None;
        for edition in envelope.data {
            if edition.edition.identifier == ARABIC_EDITION {
                arabic = Some(edition);
            } else {
                translated = Some(edition);
            }
        }

        let (Some(arabic), Some(translated)) = (arabic, translated) else {
            return Err(QuranError::UnexpectedResponse {
                message: "Response is missing an edition".to_string(),
            });
        };

        Ok(Verse {
            reference: format!("{}:{}", arabic.surah.number, arabic.number_in_surah),
            number: arabic.number,
            surah_number: arabic.surah.number,
            surah_name: arabic.surah.english_name,
            surah_name_arabic: arabic.surah.name,
            ayah: arabic.number_in_surah,
            arabic: arabic.text,
            translation: translated.text,
            translation_edition: translated.edition.identifier,
        })
    }
}

#[async_trait]
impl QuranClientTrait for QuranClient {
    async fn fetch_verse(&self, reference: &str, translation: &str) -> Result<Verse, QuranError> {
        self.verse(reference, translation).await
    }
}
