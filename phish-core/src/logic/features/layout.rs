//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema shared by training and serving.**
//!
//! ## Rules (NEVER break these):
//! 1. Add slot → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove slot → increment FEATURE_VERSION
//!
//! Every artifact written by the trainer records the version and layout hash
//! below. The prediction service refuses artifacts that disagree.

use crc32fast::Hasher;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

/// Structural URL fields at the head of the vector
pub const STRUCTURAL_COUNT: usize = 15;

/// TF-IDF slots following the structural fields
pub const TEXT_FEATURE_COUNT: usize = 32;

/// Total number of features
pub const FEATURE_COUNT: usize = STRUCTURAL_COUNT + TEXT_FEATURE_COUNT;

// ============================================================================
// FEATURE SLOTS (Authoritative source)
// ============================================================================

macro_rules! feature_slots {
    ($($variant:ident = $index:literal => $wire:literal, $label:literal;)*) => {
        /// One position in the feature vector.
        ///
        /// `name()` is the wire key (`feature_N`), `label()` the human name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(usize)]
        pub enum FeatureSlot {
            $($variant = $index,)*
        }

        impl FeatureSlot {
            /// All slots in vector order
            pub const ALL: [FeatureSlot; FEATURE_COUNT] = [$(FeatureSlot::$variant,)*];

            /// Wire name used in request/response maps and dataset columns
            pub const fn name(self) -> &'static str {
                match self {
                    $(FeatureSlot::$variant => $wire,)*
                }
            }

            /// Descriptive name, hashed into the layout
            pub const fn label(self) -> &'static str {
                match self {
                    $(FeatureSlot::$variant => $label,)*
                }
            }
        }

        /// Wire names in exact vector order
        pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [$($wire,)*];

        /// Descriptive names in exact vector order
        /// This is the SINGLE SOURCE OF TRUTH for feature layout
        pub const FEATURE_LAYOUT: [&str; FEATURE_COUNT] = [$($label,)*];
    };
}

feature_slots! {
    // === Structural URL fields (0-14) ===
    Length = 0 => "feature_0", "length";
    NumDigits = 1 => "feature_1", "num_digits";
    NumParams = 2 => "feature_2", "num_params";
    HasHttps = 3 => "feature_3", "has_https";
    HasIp = 4 => "feature_4", "has_ip";
    NumSpecial = 5 => "feature_5", "num_special";
    DomainLen = 6 => "feature_6", "domain_len";
    PathLen = 7 => "feature_7", "path_len";
    NumSubdomains = 8 => "feature_8", "num_subdomains";
    HasAtSymbol = 9 => "feature_9", "has_at_symbol";
    HasHyphen = 10 => "feature_10", "has_hyphen";
    UrlEntropy = 11 => "feature_11", "url_entropy";
    IsShortened = 12 => "feature_12", "is_shortened";
    PathHasExe = 13 => "feature_13", "path_has_exe";
    HasRedirect = 14 => "feature_14", "has_redirect";

    // === Char n-gram TF-IDF (15-46) ===
    Text00 = 15 => "feature_15", "tfidf_00";
    Text01 = 16 => "feature_16", "tfidf_01";
    Text02 = 17 => "feature_17", "tfidf_02";
    Text03 = 18 => "feature_18", "tfidf_03";
    Text04 = 19 => "feature_19", "tfidf_04";
    Text05 = 20 => "feature_20", "tfidf_05";
    Text06 = 21 => "feature_21", "tfidf_06";
    Text07 = 22 => "feature_22", "tfidf_07";
    Text08 = 23 => "feature_23", "tfidf_08";
    Text09 = 24 => "feature_24", "tfidf_09";
    Text10 = 25 => "feature_25", "tfidf_10";
    Text11 = 26 => "feature_26", "tfidf_11";
    Text12 = 27 => "feature_27", "tfidf_12";
    Text13 = 28 => "feature_28", "tfidf_13";
    Text14 = 29 => "feature_29", "tfidf_14";
    Text15 = 30 => "feature_30", "tfidf_15";
    Text16 = 31 => "feature_31", "tfidf_16";
    Text17 = 32 => "feature_32", "tfidf_17";
    Text18 = 33 => "feature_33", "tfidf_18";
    Text19 = 34 => "feature_34", "tfidf_19";
    Text20 = 35 => "feature_35", "tfidf_20";
    Text21 = 36 => "feature_36", "tfidf_21";
    Text22 = 37 => "feature_37", "tfidf_22";
    Text23 = 38 => "feature_38", "tfidf_23";
    Text24 = 39 => "feature_39", "tfidf_24";
    Text25 = 40 => "feature_40", "tfidf_25";
    Text26 = 41 => "feature_41", "tfidf_26";
    Text27 = 42 => "feature_42", "tfidf_27";
    Text28 = 43 => "feature_43", "tfidf_28";
    Text29 = 44 => "feature_44", "tfidf_29";
    Text30 = 45 => "feature_45", "tfidf_30";
    Text31 = 46 => "feature_46", "tfidf_31";
}

impl FeatureSlot {
    /// Position of this slot in the vector
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look a slot up by its wire name (`feature_N`)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|slot| slot.name() == name)
    }

    /// Slot at a vector position
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// TF-IDF slot for a vocabulary column
    pub fn text(column: usize) -> Option<Self> {
        if column < TEXT_FEATURE_COUNT {
            Self::from_index(STRUCTURAL_COUNT + column)
        } else {
            None
        }
    }

    pub fn is_structural(self) -> bool {
        self.index() < STRUCTURAL_COUNT
    }
}

impl std::fmt::Display for FeatureSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Used to detect layout mismatches at load time
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    // Include version in hash
    hasher.update(&[FEATURE_VERSION]);

    // Hash all feature names in order
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when feature layout doesn't match expected
#[derive(Debug, Clone)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature layout mismatch: expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
            self.expected_version,
            self.expected_hash,
            self.actual_version,
            self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate that incoming data matches current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
