use std::fmt;

/// Plan prefixes registered for Queensland cadastral plans. The parcels
/// layer stores the prefix as part of the `lotplan` attribute, so both the
/// token scanner and the attribute decoder key off this list.
pub const PLAN_PREFIXES: [&str; 10] = [
    "BUP", "GTP", "HBL", "HBP", "RP", "SP", "CP", "DP", "CH", "CC",
];

/// A normalized Queensland lot/plan identifier.
///
/// The canonical string form is deterministic (uppercase, no internal
/// whitespace) so duplicate detection works via plain string equality.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct LotPlanToken {
    lot: String,
    plan: String,
}

fn compact_upper(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

impl LotPlanToken {
    pub fn new(lot: &str, plan: &str) -> Self {
        Self {
            lot: compact_upper(lot),
            plan: compact_upper(plan),
        }
    }

    /// Splits a `lotplan` attribute value as returned by the map service,
    /// e.g. `2RP12345` or `2A SP181800`. The lot part may carry a letter
    /// suffix, so the plan prefix is located against the known prefix list
    /// rather than at the first alphabetic character.
    pub fn from_lotplan_field(value: &str) -> Option<Self> {
        let compact = compact_upper(value);
        let digits_start = compact
            .rfind(|c: char| !c.is_ascii_digit())
            .map(|idx| idx + c_len(&compact, idx))?;
        if digits_start >= compact.len() {
            return None;
        }
        let head = &compact[..digits_start];
        for prefix in PLAN_PREFIXES {
            if let Some(lot) = head.strip_suffix(prefix) {
                if lot.is_empty() {
                    return None;
                }
                let plan = format!("{}{}", prefix, &compact[digits_start..]);
                return Some(Self {
                    lot: lot.to_string(),
                    plan,
                });
            }
        }
        None
    }

    pub fn lot(&self) -> &str {
        &self.lot
    }

    pub fn plan(&self) -> &str {
        &self.plan
    }

    /// Canonical `<lot><plan>` form, e.g. `2RP12345`.
    pub fn canonical(&self) -> String {
        format!("{}{}", self.lot, self.plan)
    }
}

// Byte width of the char starting at `idx`; `rfind` hands back a byte index.
fn c_len(s: &str, idx: usize) -> usize {
    s[idx..].chars().next().map_or(1, char::len_utf8)
}

impl fmt::Display for LotPlanToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.lot, self.plan)
    }
}
