use cadastral::lotplan::{LotPlanToken, PLAN_PREFIXES};
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

fn plan_pattern() -> String {
    format!(r"(?:{})\s*\d+", PLAN_PREFIXES.join("|"))
}

lazy_static! {
    /// `Lot 2 RP12345`, `Lot 3 on DP752379`, `L2RP12345`, with stray
    /// punctuation between the lot number and the plan tolerated.
    static ref LOT_ON_PLAN: Regex = RegexBuilder::new(&format!(
        r"\bL(?:OT)?\s*(\d+[A-Z]?)[\s,.;:]*(?:ON[\s,.;:]+)?({})",
        plan_pattern()
    ))
    .case_insensitive(true)
    .build()
    .expect("Expected LOT_ON_PLAN regex to compile");

    /// Bare `2 RP12345` / `4RP30439` notation.
    static ref BARE_LOT_PLAN: Regex = RegexBuilder::new(&format!(
        r"\b(\d+[A-Z]?)\s*({})\b",
        plan_pattern()
    ))
    .case_insensitive(true)
    .build()
    .expect("Expected BARE_LOT_PLAN regex to compile");

    /// Slash notation, `3/RP12345`.
    static ref SLASH_LOT_PLAN: Regex = RegexBuilder::new(&format!(
        r"\b(\d+[A-Z]?)\s*/\s*({})\b",
        plan_pattern()
    ))
    .case_insensitive(true)
    .build()
    .expect("Expected SLASH_LOT_PLAN regex to compile");
}

/// Best-effort extraction of lot/plan tokens from raw (possibly OCR'd)
/// text. Fragments that do not form a recognisable token are dropped
/// silently; matches are normalized and deduplicated in first-seen order.
///
/// Also serves as the normalizer for explicit comma/space-separated token
/// lists, which are just a cleaner instance of the same notation.
pub fn extract_tokens(text: &str) -> Vec<LotPlanToken> {
    [&*LOT_ON_PLAN, &*BARE_LOT_PLAN, &*SLASH_LOT_PLAN]
        .into_iter()
        .flat_map(|pattern| {
            pattern.captures_iter(text).map(|capture| {
                LotPlanToken::new(
                    capture.get(1).map_or("", |m| m.as_str()),
                    capture.get(2).map_or("", |m| m.as_str()),
                )
            })
        })
        .unique()
        .collect()
}
