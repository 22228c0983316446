//! Guideline retrieval: pick the rows relevant to one patient.
//!
//! A guideline is selected when one of its keywords (or its title) appears
//! in the patient's clinical picture, or when its population matches the
//! patient's demographics. Selection keeps file order.

use careguide_core::models::summary::Summary;
use tracing::debug;

use crate::catalog::{Guideline, GuidelineTable};

/// Upper bound on guidelines pasted into one prompt.
pub const MAX_SELECTED: usize = 15;

/// Number of leading guidelines used when nothing matches.
pub const FALLBACK_COUNT: usize = 10;

pub fn select<'a>(table: &'a GuidelineTable, summary: &Summary) -> Vec<&'a Guideline> {
    let haystack = clinical_haystack(summary);

    let selected: Vec<&Guideline> = table
        .guidelines()
        .iter()
        .filter(|g| matches_keywords(g, &haystack) || matches_demographics(g, summary))
        .take(MAX_SELECTED)
        .collect();

    if selected.is_empty() {
        debug!(table = table.len(), "no guideline matched, using leading rows");
        return table.guidelines().iter().take(FALLBACK_COUNT).collect();
    }

    debug!(table = table.len(), count = selected.len(), "selected guidelines");
    selected
}

fn clinical_haystack(summary: &Summary) -> String {
    let mut haystack = summary.clinical_terms().join("\n");
    haystack.push('\n');
    haystack.push_str(&summary.advanced_summary.to_lowercase());
    haystack
}

fn matches_keywords(guideline: &Guideline, haystack: &str) -> bool {
    guideline
        .keywords
        .iter()
        .chain(std::iter::once(&guideline.title))
        .map(|k| k.trim().to_lowercase())
        .any(|k| !k.is_empty() && haystack.contains(&k))
}

fn matches_demographics(guideline: &Guideline, summary: &Summary) -> bool {
    let population = guideline.population.to_lowercase();
    let words: Vec<&str> = population
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();

    if words.contains(&"all") {
        return true;
    }

    if let Some(age) = summary.age {
        if age >= 18 && words.contains(&"adults") {
            return true;
        }
        if age < 18 && (words.contains(&"children") || words.contains(&"adolescents")) {
            return true;
        }
        if age_range(&population).is_some_and(|(lo, hi)| (lo..=hi).contains(&age)) {
            return true;
        }
    }

    summary
        .sex
        .as_deref()
        .is_some_and(|sex| sex_terms(sex).iter().any(|t| words.contains(t)))
}

/// Words that name a patient's sex in population text.
fn sex_terms(sex: &str) -> &'static [&'static str] {
    match sex.trim().to_lowercase().as_str() {
        "female" | "f" | "woman" | "women" => &["female", "females", "woman", "women"],
        "male" | "m" | "man" | "men" => &["male", "males", "man", "men"],
        _ => &[],
    }
}

/// Parse an explicit age range such as "aged 45 to 75 years",
/// "50-75", "65 years or older" or "younger than 25".
fn age_range(population: &str) -> Option<(u32, u32)> {
    let numbers: Vec<u32> = population
        .split(|c: char| !c.is_ascii_digit())
        .filter_map(|n| n.parse().ok())
        .collect();

    match numbers.as_slice() {
        [lo, hi, ..] if lo <= hi => Some((*lo, *hi)),
        [n] if population.contains("older") || population.contains("over") || population.contains('+') => {
            Some((*n, u32::MAX))
        }
        [n] if population.contains("younger") || population.contains("under") => Some((0, *n)),
        _ => None,
    }
}
