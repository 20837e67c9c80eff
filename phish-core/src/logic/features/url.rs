//! URL Feature Extraction
//!
//! Structural, label-agnostic signals computed from a raw URL string.
//! Extraction never fails: a URL that cannot be split yields a zeroed record.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::entropy::shannon_entropy;
use super::layout::{FeatureSlot, STRUCTURAL_COUNT};
use super::split::ParsedUrl;
use super::vector::{FeatureExtractor, FeatureVector};
use crate::constants::SHORTENER_DOMAINS;

static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("valid regex"));
static SPECIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
static IPV4_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+\.\d+$").expect("valid regex"));

/// The 15 structural fields, in layout order
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlFeatures {
    pub length: u32,
    pub num_digits: u32,
    pub num_params: u32,
    pub has_https: bool,
    pub has_ip: bool,
    pub num_special: u32,
    pub domain_len: u32,
    pub path_len: u32,
    pub num_subdomains: u32,
    pub has_at_symbol: bool,
    pub has_hyphen: bool,
    pub url_entropy: f64,
    pub is_shortened: bool,
    pub path_has_exe: bool,
    pub has_redirect: bool,
}

impl UrlFeatures {
    /// Extract structural features from a URL
    pub fn from_url(url: &str) -> Self {
        match ParsedUrl::parse(url) {
            Ok(parsed) => Self::from_parsed(url, &parsed),
            Err(e) => {
                log::debug!("Zeroing features for unparseable URL ({})", e);
                Self::default()
            }
        }
    }

    fn from_parsed(url: &str, parsed: &ParsedUrl) -> Self {
        let netloc = parsed.netloc.as_str();
        let dots = netloc.matches('.').count() as u32;

        Self {
            length: url.chars().count() as u32,
            num_digits: DIGIT.find_iter(url).count() as u32,
            num_params: if parsed.query.is_empty() {
                0
            } else {
                parsed.query.split('&').count() as u32
            },
            has_https: parsed.scheme == "https",
            has_ip: IPV4_HOST.is_match(parsed.host()),
            num_special: SPECIAL.find_iter(url).count() as u32,
            domain_len: netloc.chars().count() as u32,
            path_len: parsed.path.chars().count() as u32,
            num_subdomains: if dots >= 2 { dots - 1 } else { 0 },
            has_at_symbol: url.contains('@'),
            has_hyphen: netloc.contains('-'),
            url_entropy: shannon_entropy(url.as_bytes()),
            is_shortened: SHORTENER_DOMAINS.iter().any(|d| netloc.contains(d)),
            path_has_exe: parsed.path.to_lowercase().contains(".exe"),
            has_redirect: url.replace("://", "").contains("//"),
        }
    }

    /// Values in layout order (slots 0-14)
    pub fn to_array(&self) -> [f32; STRUCTURAL_COUNT] {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        [
            self.length as f32,
            self.num_digits as f32,
            self.num_params as f32,
            flag(self.has_https),
            flag(self.has_ip),
            self.num_special as f32,
            self.domain_len as f32,
            self.path_len as f32,
            self.num_subdomains as f32,
            flag(self.has_at_symbol),
            flag(self.has_hyphen),
            self.url_entropy as f32,
            flag(self.is_shortened),
            flag(self.path_has_exe),
            flag(self.has_redirect),
        ]
    }
}

impl FeatureExtractor for UrlFeatures {
    fn extract(&self, vector: &mut FeatureVector) {
        for (slot, value) in FeatureSlot::ALL.iter().zip(self.to_array()) {
            vector.set(*slot, value);
        }
    }
}
