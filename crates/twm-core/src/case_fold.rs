//! Which identifiers can be uppercased without needing quotes in Snowflake.
//!
//! Snowflake resolves unquoted identifiers as uppercase. An identifier made
//! only of ASCII letters, digits and underscores, and not starting with a
//! digit, can therefore be rewritten to its uppercase form and still be
//! addressed unquoted. Anything else is left exactly as it was.

/// Result of applying the case-folding policy to one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedIdentifier {
    pub eligible: bool,
    /// Uppercased when eligible, otherwise the input unchanged.
    pub normalized: String,
}

/// Apply the case-folding policy.
pub fn fold_identifier(raw: &str) -> FoldedIdentifier {
    if is_unquoted_safe(raw) {
        FoldedIdentifier {
            eligible: true,
            normalized: raw.to_ascii_uppercase(),
        }
    } else {
        FoldedIdentifier {
            eligible: false,
            normalized: raw.to_string(),
        }
    }
}

/// True for non-empty `[A-Za-z0-9_]+` identifiers that do not start with a digit.
pub fn is_unquoted_safe(raw: &str) -> bool {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_identifier_is_uppercased() {
        let folded = fold_identifier("order_id");
        assert!(folded.eligible);
        assert_eq!(folded.normalized, "ORDER_ID");
    }

    #[test]
    fn mixed_case_is_eligible() {
        assert_eq!(fold_identifier("OrderId").normalized, "ORDERID");
        assert_eq!(fold_identifier("_tmp1").normalized, "_TMP1");
    }

    #[test]
    fn space_makes_identifier_ineligible() {
        let folded = fold_identifier("order id");
        assert!(!folded.eligible);
        assert_eq!(folded.normalized, "order id");
    }

    #[test]
    fn leading_digit_is_ineligible() {
        let folded = fold_identifier("2024_total");
        assert!(!folded.eligible);
        assert_eq!(folded.normalized, "2024_total");
    }

    #[test]
    fn punctuation_and_non_ascii_are_ineligible() {
        for raw in ["order-id", "amount$", "[sales]", "größe", "a.b"] {
            assert!(!fold_identifier(raw).eligible, "{raw} should need quoting");
        }
    }

    #[test]
    fn empty_is_ineligible() {
        let folded = fold_identifier("");
        assert!(!folded.eligible);
        assert_eq!(folded.normalized, "");
    }
}
