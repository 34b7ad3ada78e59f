use cadastral::AddressFields;
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

const MAX_ADDRESSES: usize = 10;

lazy_static! {
    /// One street-address line: optional quoted property name, optional
    /// house number, street + type, then suburb, state and an optional
    /// postcode. Anchored so mid-sentence fragments don't qualify.
    static ref ADDRESS_LINE: Regex = RegexBuilder::new(
        r#"(?:^"?(?P<prop>[A-Za-z][^",]*?)"?\s*,?\s+)?(?:(?P<number>\d{1,5}[A-Z]?)\s+)?(?P<street>[A-Za-z0-9 .'\-]+?)\s+(?P<suffix>Road|Rd|Street|St|Avenue|Ave|Highway|Hwy|Drive|Dr|Court|Ct|Place|Pl|Boulevard|Blvd|Way|Lane|Ln|Crescent|Cres|Terrace|Tce|Close|Cl)?\s*,\s*(?P<suburb>[A-Za-z ]+)\s*,\s*(?P<state>QLD|NSW|VIC|SA|WA|TAS|NT|ACT)\b(?:\s+(?P<pcode>\d{4}))?\s*$"#
    )
    .case_insensitive(true)
    .build()
    .expect("Expected ADDRESS_LINE regex to compile");
}

/// Pulls structured street addresses out of raw document text, one
/// candidate per line. Lines that don't look like an address are skipped;
/// this is the fallback path for documents that carry no lot/plan tokens.
pub fn extract_addresses(text: &str) -> Vec<AddressFields> {
    text.lines()
        .map(|line| line.trim().replace(" – ", " - ").replace('—', "-"))
        .filter(|line| !line.is_empty())
        .filter_map(|line| parse_line(&line))
        .take(MAX_ADDRESSES)
        .collect()
}

fn parse_line(line: &str) -> Option<AddressFields> {
    let capture = ADDRESS_LINE.captures(line)?;

    let property_name = capture
        .name("prop")
        .map(|m| m.as_str().trim_matches(|c| c == ' ' || c == '"' || c == '\'').to_string())
        .filter(|name| !name.is_empty());
    let house_number = capture.name("number").and_then(|m| {
        let digits: String = m.as_str().chars().filter(char::is_ascii_digit).collect();
        digits.parse::<u32>().ok()
    });
    let street = capture.name("street").map(|m| {
        m.as_str()
            .replace(" - ", "-")
            .replace(" -", "-")
            .replace("- ", "-")
            .to_uppercase()
    });
    let suffix = capture.name("suffix").map(|m| m.as_str().to_uppercase());
    let suburb = capture.name("suburb").map(|m| m.as_str().trim().to_uppercase());
    let state = capture.name("state").map(|m| m.as_str().to_uppercase());
    let postcode = capture.name("pcode").and_then(|m| m.as_str().parse::<u32>().ok());

    Some(AddressFields {
        property_name,
        house_number,
        street,
        suffix,
        suburb,
        state,
        postcode,
        original: Some(line.to_string()),
        relax_no_number: false,
    })
}
