//! Multi-part harvest keys.
//!
//! Long recordings are harvested in parts, each written as
//! `<base>/<index>_<total>/main.m3u8`. A part set is complete once `total`
//! distinct parts exist under `<base>/`.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::prefix::InputPrefix;

static PART_KEY: OnceLock<Regex> = OnceLock::new();

fn part_key_regex() -> &'static Regex {
    PART_KEY.get_or_init(|| {
        Regex::new(r"^(.+)/(\d+)_(\d+)/main\.m3u8$").expect("part key pattern is valid")
    })
}

/// One part of a multi-part harvest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartSet {
    /// Prefix shared by every part of the set
    pub base: InputPrefix,
    pub index: u32,
    pub total: u32,
}

impl PartSet {
    /// Parse a manifest key; `None` when the key is not a part manifest.
    ///
    /// The index must lie in `1..=total`, so a stray `0_2` or `3_2` manifest
    /// never stands in for a missing part.
    pub fn parse(manifest_key: &str) -> Option<Self> {
        let captures = part_key_regex().captures(manifest_key)?;
        let base = captures.get(1)?.as_str();
        let index: u32 = captures.get(2)?.as_str().parse().ok()?;
        let total: u32 = captures.get(3)?.as_str().parse().ok()?;

        if index == 0 || index > total {
            return None;
        }

        // `<base>/x` has `<base>` as its directory portion.
        let base = InputPrefix::from_manifest_key(&format!("{}/x", base)).ok()?;

        Some(Self { base, index, total })
    }

    /// Prefix to list when looking for sibling parts.
    pub fn listing_prefix(&self) -> String {
        self.base.listing_prefix()
    }

    /// Every part manifest of this set, ordered by index, once all parts
    /// are present among `keys`. `None` while parts are still missing.
    ///
    /// Keys belonging to other sets (different base or total) are ignored.
    /// If several keys claim the same index the first one wins.
    pub fn complete_parts<'a, I>(&self, keys: I) -> Option<Vec<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut parts: BTreeMap<u32, &str> = BTreeMap::new();

        for key in keys {
            if let Some(part) = Self::parse(key) {
                if part.base == self.base && part.total == self.total {
                    parts.entry(part.index).or_insert(key);
                }
            }
        }

        if parts.len() < self.total as usize {
            return None;
        }

        Some(parts.into_values().map(str::to_string).collect())
    }

    /// Number of distinct parts of this set found among `keys`.
    pub fn present_count<'a, I>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut indices: Vec<u32> = keys
            .into_iter()
            .filter_map(Self::parse)
            .filter(|part| part.base == self.base && part.total == self.total)
            .map(|part| part.index)
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices.len()
    }
}
