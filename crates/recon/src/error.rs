use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// Surah number outside 1..=114.
    InvalidSurah(u32),
    /// Ayah number outside 1..=expected_count(surah).
    InvalidAyah { surah: u32, ayah: u32 },
    /// Key that is not `"surah:ayah"` / `"surah"` with numeric parts.
    MalformedKey(String),
    /// Same key holds structurally different values in the two merge inputs.
    ShapeMismatch {
        key: String,
        primary: &'static str,
        secondary: &'static str,
    },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (ratio out of range, bad key list, etc.).
    ConfigValidation(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSurah(surah) => write!(f, "invalid surah {surah} (expected 1-114)"),
            Self::InvalidAyah { surah, ayah } => {
                write!(f, "invalid ayah {surah}:{ayah} (surah {surah} has no such verse)")
            }
            Self::MalformedKey(key) => write!(f, "malformed verse key: '{key}'"),
            Self::ShapeMismatch { key, primary, secondary } => {
                write!(f, "key '{key}': primary holds {primary}, secondary holds {secondary}")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
