use serde::{Deserialize, Serialize};
use shared_kernel::non_empty_string;

non_empty_string!(AddressQuery);

/// A structured Australian street address, either posted by a caller or
/// pulled out of scanned-document text. Every field is optional; the
/// where-clause builder decides what is enough to query on.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AddressFields {
    pub property_name: Option<String>,
    pub house_number: Option<u32>,
    pub street: Option<String>,
    pub suffix: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<u32>,
    /// The raw line the fields were parsed from, when known.
    pub original: Option<String>,
    /// Allow querying without a house number.
    #[serde(default)]
    pub relax_no_number: bool,
}

impl AddressFields {
    /// Human-facing label used to name the download, preferring the
    /// property name over the bare street line.
    pub fn label(&self) -> String {
        let base = self.original.clone().unwrap_or_else(|| {
            let number = self
                .house_number
                .map(|n| n.to_string())
                .unwrap_or_default();
            let street = self.street.clone().unwrap_or_default();
            let suburb = self.suburb.clone().unwrap_or_default();
            let state = self.state.clone().unwrap_or_else(|| "QLD".to_string());
            format!("{number} {street}, {suburb}, {state}")
        });
        match &self.property_name {
            Some(name) if !base.to_lowercase().starts_with(&name.to_lowercase()) => {
                format!("{name} {base}")
            }
            _ => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AddressFields, AddressQuery};

    #[test]
    fn address_query_rejects_blank_text() {
        assert!(AddressQuery::try_from("   ").is_err());
        let query = AddressQuery::try_from(" 12 Example St, Brisbane ").unwrap();
        assert_eq!(query.as_str(), "12 Example St, Brisbane");
    }

    #[test]
    fn label_prefixes_property_name_once() {
        let fields = AddressFields {
            property_name: Some("Karinya".to_string()),
            original: Some("123 Example Road, Toowoomba, QLD 4350".to_string()),
            ..Default::default()
        };
        assert_eq!(
            fields.label(),
            "Karinya 123 Example Road, Toowoomba, QLD 4350"
        );

        let already_prefixed = AddressFields {
            property_name: Some("Karinya".to_string()),
            original: Some("Karinya 123 Example Road, Toowoomba, QLD 4350".to_string()),
            ..Default::default()
        };
        assert_eq!(
            already_prefixed.label(),
            "Karinya 123 Example Road, Toowoomba, QLD 4350"
        );
    }
}
