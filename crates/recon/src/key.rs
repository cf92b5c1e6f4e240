use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ReconError;
use crate::index;

// ---------------------------------------------------------------------------
// VerseKey
// ---------------------------------------------------------------------------

/// Canonical `(surah, ayah)` identifier. Always inside the fixed universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VerseKey {
    surah: u8,
    ayah: u16,
}

impl VerseKey {
    /// Validated constructor. Fails for surah outside 1..=114 or ayah outside
    /// 1..=expected_count(surah).
    pub fn new(surah: u32, ayah: u32) -> Result<Self, ReconError> {
        let expected = index::expected_count(surah)?;
        if ayah == 0 || ayah > u32::from(expected) {
            return Err(ReconError::InvalidAyah { surah, ayah });
        }
        Ok(Self {
            surah: surah as u8,
            ayah: ayah as u16,
        })
    }

    /// Constructor for keys already known to be in range (index enumeration).
    pub(crate) const fn from_parts(surah: u8, ayah: u16) -> Self {
        Self { surah, ayah }
    }

    /// Parse `"surah:ayah"`. Non-numeric parts fail with `MalformedKey`,
    /// out-of-range numbers with `InvalidSurah` / `InvalidAyah`.
    pub fn parse(s: &str) -> Result<Self, ReconError> {
        match RawKey::parse(s)? {
            RawKey { surah, ayah: Some(ayah) } => Self::new(surah, ayah),
            RawKey { ayah: None, .. } => Err(ReconError::MalformedKey(s.to_string())),
        }
    }

    pub fn surah(&self) -> u8 {
        self.surah
    }

    pub fn ayah(&self) -> u16 {
        self.ayah
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.surah, self.ayah)
    }
}

impl FromStr for VerseKey {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for VerseKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VerseKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// RawKey
// ---------------------------------------------------------------------------

/// Numerically well-formed key that has not yet been checked against the
/// verse universe. Used to tell malformed keys apart from orphan keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKey {
    pub surah: u32,
    pub ayah: Option<u32>,
}

impl RawKey {
    /// Accepts `"s:a"` and surah-only `"s"`.
    pub fn parse(s: &str) -> Result<Self, ReconError> {
        let malformed = || ReconError::MalformedKey(s.to_string());
        let number = |part: &str| -> Result<u32, ReconError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            // All digits, so the only parse failure is overflow. Saturate and
            // let validation report it as out of range.
            Ok(part.parse::<u32>().unwrap_or(u32::MAX))
        };

        match s.split_once(':') {
            Some((surah, ayah)) => Ok(Self {
                surah: number(surah)?,
                ayah: Some(number(ayah)?),
            }),
            None => Ok(Self {
                surah: number(s)?,
                ayah: None,
            }),
        }
    }

    /// Check against the universe. Errors here mean "orphan", not "malformed".
    pub fn validate(self) -> Result<DatasetKey, ReconError> {
        match self.ayah {
            Some(ayah) => VerseKey::new(self.surah, ayah).map(DatasetKey::Verse),
            None => {
                index::expected_count(self.surah)?;
                Ok(DatasetKey::Surah(self.surah as u8))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// DatasetKey
// ---------------------------------------------------------------------------

/// Key of a SourceDataset entry: a verse, or a whole surah for commentary
/// that is surah-scoped. Surah-scoped keys sort before that surah's verses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKey {
    Surah(u8),
    Verse(VerseKey),
}

impl DatasetKey {
    pub fn parse(s: &str) -> Result<Self, ReconError> {
        RawKey::parse(s)?.validate()
    }

    pub fn surah(&self) -> u8 {
        match self {
            Self::Surah(s) => *s,
            Self::Verse(k) => k.surah(),
        }
    }

    pub fn verse(&self) -> Option<VerseKey> {
        match self {
            Self::Verse(k) => Some(*k),
            Self::Surah(_) => None,
        }
    }

    fn sort_tuple(&self) -> (u8, u16) {
        match self {
            Self::Surah(s) => (*s, 0),
            Self::Verse(k) => (k.surah(), k.ayah()),
        }
    }
}

impl Ord for DatasetKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_tuple().cmp(&other.sort_tuple())
    }
}

impl PartialOrd for DatasetKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl From<VerseKey> for DatasetKey {
    fn from(key: VerseKey) -> Self {
        Self::Verse(key)
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surah(s) => write!(f, "{s}"),
            Self::Verse(k) => write!(f, "{k}"),
        }
    }
}

impl FromStr for DatasetKey {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DatasetKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DatasetKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
