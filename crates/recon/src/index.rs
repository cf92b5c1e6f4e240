//! Verse universe: per-surah verse counts and the full ordered key set.

use crate::error::ReconError;
use crate::key::VerseKey;

pub const SURAH_COUNT: u32 = 114;
pub const TOTAL_VERSES: usize = 6236;

/// Verses per surah, index 0 = surah 1.
const EXPECTED_VERSE_COUNTS: [u16; SURAH_COUNT as usize] = [
    7, 286, 200, 176, 120, 165, 206, 75, 129, 109, //   1-10
    123, 111, 43, 52, 99, 128, 111, 110, 98, 135, //  11-20
    112, 78, 118, 64, 77, 227, 93, 88, 69, 60, //     21-30
    34, 30, 73, 54, 45, 83, 182, 88, 75, 85, //       31-40
    54, 53, 89, 59, 37, 35, 38, 29, 18, 45, //        41-50
    60, 49, 62, 55, 78, 96, 29, 22, 24, 13, //        51-60
    14, 11, 11, 18, 12, 12, 30, 52, 52, 44, //        61-70
    28, 28, 20, 56, 40, 31, 50, 40, 46, 42, //        71-80
    29, 19, 36, 25, 22, 17, 19, 26, 30, 20, //        81-90
    15, 21, 11, 8, 8, 19, 5, 8, 8, 11, //             91-100
    11, 8, 3, 9, 5, 4, 7, 3, 6, 3, //                101-110
    5, 4, 5, 6, //                                   111-114
];

/// Number of verses in `surah`.
pub fn expected_count(surah: u32) -> Result<u16, ReconError> {
    if surah == 0 || surah > SURAH_COUNT {
        return Err(ReconError::InvalidSurah(surah));
    }
    Ok(EXPECTED_VERSE_COUNTS[(surah - 1) as usize])
}

/// True when `surah:ayah` is inside the universe.
pub fn contains(surah: u32, ayah: u32) -> bool {
    expected_count(surah).is_ok_and(|count| ayah >= 1 && ayah <= u32::from(count))
}

/// Surah numbers 1..=114.
pub fn surah_numbers() -> impl Iterator<Item = u8> + Clone {
    1..=SURAH_COUNT as u8
}

/// Every verse key in ascending (surah, ayah) order. Restartable: each call
/// yields a fresh iterator over the static table.
pub fn all_keys() -> impl Iterator<Item = VerseKey> + Clone {
    EXPECTED_VERSE_COUNTS
        .iter()
        .enumerate()
        .flat_map(|(i, &count)| (1..=count).map(move |ayah| VerseKey::from_parts(i as u8 + 1, ayah)))
}

/// Verse keys of one surah in ascending order.
pub fn surah_keys(surah: u32) -> Result<impl Iterator<Item = VerseKey>, ReconError> {
    let count = expected_count(surah)?;
    Ok((1..=count).map(move |ayah| VerseKey::from_parts(surah as u8, ayah)))
}

pub const fn total_verse_count() -> usize {
    TOTAL_VERSES
}
