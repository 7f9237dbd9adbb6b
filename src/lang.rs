//! Language tagging for sources that ship without a language column.
//!
//! Detection is a best-effort collaborator: a detector may fail for any
//! reason and the loader never lets that failure escape. Use
//! [`detect_or_unknown`] at call sites.

use log::trace;
use thiserror::Error;

use crate::data::model::UNKNOWN_LANGUAGE;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("no language detector available")]
    Unavailable,
    #[error("could not determine language: {0}")]
    Undetermined(String),
}

/// Classifies a string into a language code.
pub trait LanguageDetector {
    fn detect(&self, text: &str) -> Result<String, DetectError>;
}

impl<F> LanguageDetector for F
where
    F: Fn(&str) -> Result<String, DetectError>,
{
    fn detect(&self, text: &str) -> Result<String, DetectError> {
        self(text)
    }
}

/// Detector used when nothing better is configured; always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDetector;

impl LanguageDetector for NoDetector {
    fn detect(&self, _text: &str) -> Result<String, DetectError> {
        Err(DetectError::Unavailable)
    }
}

/// Trigram-based detection via `whatlang`. Codes are ISO 639-1 where one
/// exists, otherwise whatlang's ISO 639-3 code.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<String, DetectError> {
        let lang = whatlang::detect_lang(text)
            .ok_or_else(|| DetectError::Undetermined(format!("{} chars", text.chars().count())))?;
        let code = lang.code();
        Ok(iso_639_1(code).unwrap_or(code).to_string())
    }
}

fn iso_639_1(code_639_3: &str) -> Option<&'static str> {
    let code = match code_639_3 {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "nb",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        _ => return None,
    };
    Some(code)
}

/// Tags every row with one fixed code (`--assume-lang`).
#[derive(Debug, Clone)]
pub struct FixedLanguage(pub String);

impl LanguageDetector for FixedLanguage {
    fn detect(&self, _text: &str) -> Result<String, DetectError> {
        Ok(self.0.clone())
    }
}

/// Run the detector, mapping any failure (or an empty answer) to `"unk"`.
pub fn detect_or_unknown(detector: &dyn LanguageDetector, text: &str) -> String {
    match detector.detect(text) {
        Ok(code) if !code.trim().is_empty() => code,
        Ok(_) => UNKNOWN_LANGUAGE.to_string(),
        Err(e) => {
            trace!("language detection failed: {e}");
            UNKNOWN_LANGUAGE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_fall_back_to_unknown() {
        assert_eq!(detect_or_unknown(&NoDetector, "hello there"), "unk");
        let flaky = |_: &str| -> Result<String, DetectError> {
            Err(DetectError::Undetermined("too short".into()))
        };
        assert_eq!(detect_or_unknown(&flaky, "hi"), "unk");
    }

    #[test]
    fn empty_answer_is_unknown() {
        let blank = |_: &str| -> Result<String, DetectError> { Ok("  ".into()) };
        assert_eq!(detect_or_unknown(&blank, "text"), "unk");
    }

    #[test]
    fn whatlang_detects_clear_sentences() {
        let en = "The meeting has been moved to Thursday afternoon, please bring the quarterly report with you.";
        let es = "Hola, ¿cómo estás? Mañana vamos a la playa con mis amigos y después comemos en casa de mi abuela.";
        assert_eq!(detect_or_unknown(&WhatlangDetector, en), "en");
        assert_eq!(detect_or_unknown(&WhatlangDetector, es), "es");
    }

    #[test]
    fn whatlang_without_letters_is_unknown() {
        assert_eq!(detect_or_unknown(&WhatlangDetector, "12345 !!! ..."), "unk");
        assert_eq!(detect_or_unknown(&WhatlangDetector, ""), "unk");
    }

    #[test]
    fn fixed_language_tags_everything() {
        let det = FixedLanguage("de".into());
        assert_eq!(detect_or_unknown(&det, "anything"), "de");
    }
}
