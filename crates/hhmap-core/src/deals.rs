//! Deal curation: drop implausible offers, collapse duplicates.

use std::collections::HashSet;

use regex::Regex;

use crate::venue::DealEntry;

/// Shown when a venue has no deals left after curation.
pub const NO_DEALS_SENTINEL: &str = "No deals listed";

/// Discounts above this are treated as scrape errors, not real offers.
const MAX_PLAUSIBLE_PERCENT: u64 = 80;

/// Curates a venue's deal list.
///
/// Applied in order: drop entries whose price advertises a discount over
/// 80% (`"90% off"`), drop entries whose price text contains `"free"` or
/// `"100% off"` (case-insensitive), then deduplicate on
/// `(category, name, price)` keeping the first occurrence. Entries missing
/// name or price never reach this point — intake already dropped them.
#[must_use]
pub fn curate(deals: &[DealEntry]) -> Vec<DealEntry> {
    let percent = Regex::new(r"(\d+)%").expect("valid percent regex");

    let mut seen: HashSet<(Option<String>, String, String)> = HashSet::new();
    deals
        .iter()
        .filter(|deal| {
            if let Some(caps) = percent.captures(&deal.price) {
                if caps[1].parse::<u64>().is_ok_and(|n| n > MAX_PLAUSIBLE_PERCENT) {
                    return false;
                }
            }
            let lower = deal.price.to_lowercase();
            !(lower.contains("free") || lower.contains("100% off"))
        })
        .filter(|deal| {
            seen.insert((
                deal.category.clone(),
                deal.name.clone(),
                deal.price.clone(),
            ))
        })
        .cloned()
        .collect()
}

/// Splits curated deals into the two display sections: category `"Food"`
/// and everything else (drinks). A pure filter, not part of curation.
#[must_use]
pub fn partition_food(deals: &[DealEntry]) -> (Vec<DealEntry>, Vec<DealEntry>) {
    deals
        .iter()
        .cloned()
        .partition(|deal| deal.category.as_deref() == Some("Food"))
}
