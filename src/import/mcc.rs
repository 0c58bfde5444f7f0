//! Merchant category code lookup
//!
//! Ranges are checked top to bottom and the first hit wins, so the narrow
//! grocery and restaurant ranges claim their codes before the broad retail
//! range below them.

use std::ops::RangeInclusive;

use crate::models::Category;

const MCC_TABLE: &[(RangeInclusive<u16>, Category)] = &[
    (5411..=5499, Category::Food),
    (5812..=5814, Category::Food),
    (4000..=4199, Category::Transport),
    (4784..=4789, Category::Transport),
    (7800..=7999, Category::Entertainment),
    (4900..=4999, Category::Bills),
    (4812..=4814, Category::Bills),
    (6012..=6012, Category::Bills),
    (5000..=5999, Category::Shopping),
    (8011..=8099, Category::Health),
];

/// Category for a merchant category code; unknown codes map to `Other`
pub fn category_for_mcc(mcc: u16) -> Category {
    MCC_TABLE
        .iter()
        .find(|(range, _)| range.contains(&mcc))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other)
}
