//! # Menu matching
//!
//! Item names arrive as free text: typed by an automation flow, or transcribed from a phone call. The matcher resolves
//! each name to exactly one canonical [`MenuItem`], or to nothing at all.
//!
//! Names on both sides are normalized before they are compared:
//! * lower-cased and trimmed,
//! * a leading ordinal such as `"4. "` or `"12) "` is removed,
//! * the size words `small` and `large` (bare or in parentheses) are removed,
//! * runs of whitespace are collapsed.
//!
//! The size is extracted separately from the raw name by [`extract_size`].
//!
//! Matching then runs three tiers, from strictest to loosest. Each tier is evaluated against the *whole* menu before
//! the next tier is tried, so that a loose match early in the menu can never shadow a strict match further down:
//!
//! | Tier                         | Rule                                                                      |
//! |------------------------------|---------------------------------------------------------------------------|
//! | [`MatchTier::Exact`]         | names equal and sizes equal (no size on either side counts as equal)      |
//! | [`MatchTier::BasePlusSize`]  | names equal, or the menu name contains the order name and sizes are equal |
//! | [`MatchTier::Partial`]       | either name contains the other; size is ignored                           |
//!
//! The catalog is built from the menu snapshot of the current request and is never cached between requests.
use std::fmt::Display;

use log::*;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::db_types::MenuItem;

static LEADING_ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\s*[.):\-]\s*").expect("valid ordinal regex"));
static SIZE_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*(?:small|large)\s*\)|\b(?:small|large)\b").expect("valid size regex"));
static SMALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bsmall\b").expect("valid size regex"));
static LARGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\blarge\b").expect("valid size regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    Small,
    Large,
}

impl Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Size::Small => write!(f, "small"),
            Size::Large => write!(f, "large"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    Exact,
    BasePlusSize,
    Partial,
}

impl Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchTier::Exact => write!(f, "exact"),
            MatchTier::BasePlusSize => write!(f, "base+size"),
            MatchTier::Partial => write!(f, "partial"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuMatch<'a> {
    pub item: &'a MenuItem,
    pub tier: MatchTier,
}

/// Produces the base name used for comparisons.
pub fn normalize_item_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let without_ordinal = LEADING_ORDINAL.replace(&lower, "");
    let without_size = SIZE_WORDS.replace_all(&without_ordinal, " ");
    WHITESPACE.replace_all(without_size.trim(), " ").into_owned()
}

/// Extracts the size qualifier from a raw item name. `small` is checked before `large`.
pub fn extract_size(name: &str) -> Option<Size> {
    let lower = name.to_lowercase();
    if SMALL.is_match(&lower) {
        Some(Size::Small)
    } else if LARGE.is_match(&lower) {
        Some(Size::Large)
    } else {
        None
    }
}

struct CatalogEntry<'a> {
    item: &'a MenuItem,
    normalized: String,
    size: Option<Size>,
}

/// A per-request view of the menu with every name normalized once.
pub struct MenuCatalog<'a> {
    entries: Vec<CatalogEntry<'a>>,
}

impl<'a> MenuCatalog<'a> {
    /// Builds the catalog from a menu snapshot. Unavailable items are left out.
    pub fn new(menu: &'a [MenuItem]) -> Self {
        let entries = menu
            .iter()
            .filter(|item| item.available)
            .map(|item| CatalogEntry { item, normalized: normalize_item_name(&item.name), size: extract_size(&item.name) })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves `name` to a single menu item, trying each tier across the whole menu in turn.
    pub fn find(&self, name: &str) -> Option<MenuMatch<'a>> {
        let wanted = normalize_item_name(name);
        let size = extract_size(name);
        debug!("🔎️ Matching \"{name}\". Normalized: \"{wanted}\", size: {}", describe_size(size));
        if wanted.is_empty() {
            warn!("🔎️ \"{name}\" has nothing left to match on after normalization");
            return None;
        }
        let result = self
            .first_where(MatchTier::Exact, |e| e.normalized == wanted && e.size == size)
            .or_else(|| {
                self.first_where(MatchTier::BasePlusSize, |e| {
                    e.normalized == wanted || (e.normalized.contains(&wanted) && e.size == size)
                })
            })
            .or_else(|| {
                self.first_where(MatchTier::Partial, |e| {
                    !e.normalized.is_empty() && (e.normalized.contains(&wanted) || wanted.contains(&e.normalized))
                })
            });
        match &result {
            Some(m) => debug!("🔎️ {} match for \"{name}\": {} ({})", m.tier, m.item.name, m.item.price),
            None => warn!("🔎️ No menu item matches \"{name}\""),
        }
        result
    }

    fn first_where<F>(&self, tier: MatchTier, predicate: F) -> Option<MenuMatch<'a>>
    where F: Fn(&CatalogEntry<'a>) -> bool {
        self.entries.iter().find(|e| predicate(e)).map(|e| MenuMatch { item: e.item, tier })
    }
}

/// Convenience wrapper for a single lookup against a menu snapshot.
pub fn find_menu_item<'a>(menu: &'a [MenuItem], name: &str) -> Option<MenuMatch<'a>> {
    MenuCatalog::new(menu).find(name)
}

fn describe_size(size: Option<Size>) -> String {
    size.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string())
}
