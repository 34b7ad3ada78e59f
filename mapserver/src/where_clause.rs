use anyhow::bail;
use cadastral::{AddressFields, LotPlanToken};
use itertools::Itertools;

use crate::fields;

/// Single-quote escaping for values interpolated into an ArcGIS `where`
/// expression.
fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

pub(crate) fn free_text_address(text: &str) -> String {
    format!(
        "UPPER({}) LIKE UPPER('%{}%')",
        fields::ADDRESS,
        escape(text)
    )
}

/// OR'd equality clauses for one batch of tokens, so a whole chunk costs a
/// single upstream query.
pub(crate) fn lotplan_batch(tokens: &[LotPlanToken]) -> String {
    tokens
        .iter()
        .map(|token| {
            format!(
                "UPPER({}) = '{}'",
                fields::LOTPLAN,
                escape(&token.canonical())
            )
        })
        .join(" OR ")
}

pub(crate) fn fielded_address(address: &AddressFields) -> anyhow::Result<String> {
    let mut parts = Vec::new();
    if let Some(original) = &address.original {
        parts.push(format!(
            "UPPER({}) = UPPER('{}')",
            fields::ADDRESS,
            escape(original)
        ));
    }
    match address.house_number {
        Some(number) => parts.push(format!("UPPER({}) = UPPER('{}')", fields::STREET_NUMBER, number)),
        None if !address.relax_no_number => {
            bail!("Missing house number and relax_no_number is false")
        }
        None => {}
    }
    if let Some(street) = &address.street {
        parts.push(format!(
            "UPPER({}) LIKE UPPER('%{}%')",
            fields::STREET_NAME,
            escape(street)
        ));
    }
    if let Some(suffix) = &address.suffix {
        let escaped = escape(suffix);
        parts.push(format!(
            "(UPPER({}) LIKE UPPER('%{escaped}%') OR UPPER({}) LIKE UPPER('%{escaped}%'))",
            fields::STREET_TYPE,
            fields::STREET_SUFFIX,
        ));
    }
    if let Some(suburb) = &address.suburb {
        parts.push(format!(
            "UPPER({}) = UPPER('{}')",
            fields::LOCALITY,
            escape(suburb)
        ));
    }
    if let Some(state) = &address.state {
        parts.push(format!(
            "UPPER({}) = UPPER('{}')",
            fields::STATE,
            escape(state)
        ));
    }
    if parts.is_empty() {
        return Ok("1=1".to_string());
    }
    Ok(parts.join(" AND "))
}

#[cfg(test)]
mod tests {
    use cadastral::{AddressFields, LotPlanToken};

    use super::{fielded_address, free_text_address, lotplan_batch};

    #[test]
    fn batches_tokens_into_ord_equality_clauses() {
        let tokens = vec![
            LotPlanToken::new("4", "RP30439"),
            LotPlanToken::new("3", "RP048958"),
        ];
        assert_eq!(
            lotplan_batch(&tokens),
            "UPPER(lotplan) = '4RP30439' OR UPPER(lotplan) = '3RP048958'"
        );
    }

    #[test]
    fn escapes_single_quotes_in_free_text() {
        assert_eq!(
            free_text_address("12 O'Brien Road, Ferny Grove"),
            "UPPER(address) LIKE UPPER('%12 O''Brien Road, Ferny Grove%')"
        );
    }

    #[test]
    fn fielded_clause_requires_a_house_number_unless_relaxed() {
        let mut address = AddressFields {
            street: Some("EXAMPLE".to_string()),
            suburb: Some("TOOWOOMBA".to_string()),
            ..Default::default()
        };
        assert!(fielded_address(&address).is_err());

        address.relax_no_number = true;
        let clause = fielded_address(&address).unwrap();
        assert_eq!(
            clause,
            "UPPER(street_name) LIKE UPPER('%EXAMPLE%') AND UPPER(locality) = UPPER('TOOWOOMBA')"
        );
    }

    #[test]
    fn fielded_clause_combines_all_present_fields() {
        let address = AddressFields {
            house_number: Some(123),
            street: Some("EXAMPLE".to_string()),
            suffix: Some("ROAD".to_string()),
            suburb: Some("TOOWOOMBA".to_string()),
            state: Some("QLD".to_string()),
            original: Some("123 Example Road, Toowoomba, QLD 4350".to_string()),
            ..Default::default()
        };
        let clause = fielded_address(&address).unwrap();
        assert!(clause.starts_with(
            "UPPER(address) = UPPER('123 Example Road, Toowoomba, QLD 4350') AND UPPER(street_number) = UPPER('123')"
        ));
        assert!(clause.contains(
            "(UPPER(street_type) LIKE UPPER('%ROAD%') OR UPPER(street_suffix) LIKE UPPER('%ROAD%'))"
        ));
        assert!(clause.ends_with("UPPER(state) = UPPER('QLD')"));
    }
}
