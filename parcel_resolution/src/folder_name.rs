/// Restricts a download name to characters that survive both filesystems
/// and `Content-Disposition` headers. An all-junk name collapses to
/// `parcels`.
pub(crate) fn safe_folder_name(name: &str) -> String {
    let filtered: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | ',' | '&'))
        .collect();
    let cleaned = filtered
        .replace(",,", ",")
        .trim()
        .trim_matches(',')
        .trim()
        .to_string();
    if cleaned.is_empty() {
        "parcels".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::safe_folder_name;

    #[test]
    fn strips_unsafe_characters() {
        assert_eq!(
            safe_folder_name("12 O'Brien Rd, Ferny Grove/QLD"),
            "12 OBrien Rd, Ferny GroveQLD"
        );
    }

    #[test]
    fn junk_collapses_to_the_default() {
        assert_eq!(safe_folder_name("///"), "parcels");
        assert_eq!(safe_folder_name(" , "), "parcels");
    }
}
