//! Quran text API response types.

use serde::{Deserialize, Serialize};

use crate::error::QuranError;

/// Number of verses in the Quran.
pub const TOTAL_VERSES: u32 = 6236;
/// Number of surahs in the Quran.
pub const TOTAL_SURAHS: u32 = 114;

/// A verse with its Arabic text and one translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// `surah:ayah` reference.
    pub reference: String,
    /// Absolute verse number (1-6236).
    pub number: u32,
    /// Surah number.
    pub surah_number: u32,
    /// Transliterated surah name.
    pub surah_name: String,
    /// Arabic surah name.
    pub surah_name_arabic: String,
    /// Verse number within the surah.
    pub ayah: u32,
    /// Uthmani Arabic text.
    pub arabic: String,
    /// Translation text.
    pub translation: String,
    /// Translation edition identifier.
    pub translation_edition: String,
}

/// Validate a verse reference.
///
/// Accepts `surah:ayah` (surah 1-114, ayah >= 1) or an absolute verse number.
///
/// # Errors
///
/// Returns [`QuranError::InvalidReference`] for anything else.
pub fn normalize_reference(reference: &str) -> Result<String, QuranError> {
    let invalid = || QuranError::InvalidReference {
        reference: reference.to_string(),
    };
    let trimmed = reference.trim();

    if let Some((surah, ayah)) = trimmed.split_once(':') {
        let surah: u32 = surah.trim().parse().map_err(|_| invalid())?;
        let ayah: u32 = ayah.trim().parse().map_err(|_| invalid())?;
        if !(1..=TOTAL_SURAHS).contains(&surah) || ayah == 0 {
            return Err(invalid());
        }
        return Ok(format!("{surah}:{ayah}"));
    }

    let number: u32 = trimmed.parse().map_err(|_| invalid())?;
    if (1..=TOTAL_VERSES).contains(&number) {
        Ok(number.to_string())
    } else {
        Err(invalid())
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AyahEnvelope {
    pub data: Vec<AyahEdition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AyahEdition {
    pub number: u32,
    pub text: String,
    pub number_in_surah: u32,
    pub surah: SurahInfo,
    pub edition: EditionInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SurahInfo {
    pub number: u32,
    pub name: String,
    pub english_name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct EditionInfo {
    pub identifier: String,
}
