//! Household profile resolver
//!
//! Turns raw quiz parameters (string keys to string values, all optional)
//! into typed household counts, a normalized exclusion set and the free-text
//! fields echoed back in the summary. Nothing here ever rejects input:
//! anything missing or malformed falls back to a default.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

/// Query key for adult women (13+)
pub const FEMALES_KEY: &str = "females_13_plus";
/// Query key for adult men (13+)
pub const MALES_KEY: &str = "males_13_plus";
/// Query key for kids (0-12)
pub const KIDS_KEY: &str = "kids_0_12";
/// Query key for excluded products (comma-separated)
pub const WONT_USE_KEY: &str = "wontUse";
/// Query key for products the household wants to add
pub const WANT_TO_ADD_KEY: &str = "wantToAdd";
/// Query key for the household's top concerns
pub const TOP_CONCERNS_KEY: &str = "topConcerns";
/// Prefix for scent preference fields (passed through untouched)
pub const SCENT_PREFIX: &str = "scent";

/// Upper bound applied to each household count
pub const MAX_HOUSEHOLD_MEMBERS: u32 = 50;

/// Household composition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HouseholdProfile {
    pub females_adult: u32,
    pub males_adult: u32,
    pub kids: u32,
}

impl HouseholdProfile {
    pub fn new(females_adult: u32, males_adult: u32, kids: u32) -> Self {
        Self {
            females_adult: females_adult.min(MAX_HOUSEHOLD_MEMBERS),
            males_adult: males_adult.min(MAX_HOUSEHOLD_MEMBERS),
            kids: kids.min(MAX_HOUSEHOLD_MEMBERS),
        }
    }

    pub fn has_women(&self) -> bool {
        self.females_adult > 0
    }

    pub fn has_men(&self) -> bool {
        self.males_adult > 0
    }

    pub fn has_kids(&self) -> bool {
        self.kids > 0
    }

    pub fn household_size(&self) -> u32 {
        self.females_adult + self.males_adult + self.kids
    }
}

/// Lowercased product names the household will not use
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExclusionSet(BTreeSet<String>);

impl ExclusionSet {
    /// Parse a comma-separated list
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    /// Exact case-insensitive membership test
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(&name.trim().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Everything the engine and summary need from one quiz submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizAnswers {
    pub profile: HouseholdProfile,
    pub exclusions: ExclusionSet,
    pub want_to_add: String,
    pub top_concerns: String,
    pub scent_preferences: BTreeMap<String, String>,
}

impl QuizAnswers {
    /// Resolve raw query parameters
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let get = |key: &str| params.get(key).map(String::as_str).unwrap_or("");

        let profile = HouseholdProfile::new(
            parse_count(get(FEMALES_KEY)),
            parse_count(get(MALES_KEY)),
            parse_count(get(KIDS_KEY)),
        );

        let scent_preferences = params
            .iter()
            .filter(|(k, _)| k.to_lowercase().starts_with(SCENT_PREFIX))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            profile,
            exclusions: ExclusionSet::parse(get(WONT_USE_KEY)),
            want_to_add: get(WANT_TO_ADD_KEY).to_string(),
            top_concerns: get(TOP_CONCERNS_KEY).to_string(),
            scent_preferences,
        }
    }

    /// Resolve from `key=value` pairs (CLI convenience)
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let params: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::from_params(&params)
    }
}

/// Lenient count parse: leading integer digits, negatives clamp to 0
///
/// `"3"` -> 3, `" 2.5"` -> 2, `"4 kids"` -> 4, `"-1"` -> 0, `"abc"` -> 0.
pub fn parse_count(raw: &str) -> u32 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];

    if digits.is_empty() || negative {
        return 0;
    }

    // Overlong digit strings saturate instead of wrapping
    digits
        .parse::<u64>()
        .map(|n| n.min(MAX_HOUSEHOLD_MEMBERS as u64) as u32)
        .unwrap_or(MAX_HOUSEHOLD_MEMBERS)
}
