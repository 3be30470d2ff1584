//! Wire-format helper for amount fields.

use std::fmt;

use serde::{Deserializer, de};

/// Deserializes an amount as a string, accepting both `"150.00"` and bare
/// JSON numbers (`150`, `150.5`).
///
/// No numeric interpretation happens here; the ledger's fixed-point parser
/// stays the single place that validates decimals.
pub fn flexible_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct AmountVisitor;

    impl de::Visitor<'_> for AmountVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal amount string or number")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<String, E> {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(deserialize_with = "super::flexible_amount")]
        amount: String,
    }

    #[test]
    fn accepts_strings_and_numbers() {
        let p: Payload = serde_json::from_str(r#"{"amount": "150.00"}"#).unwrap();
        assert_eq!(p.amount, "150.00");

        let p: Payload = serde_json::from_str(r#"{"amount": 150}"#).unwrap();
        assert_eq!(p.amount, "150");

        let p: Payload = serde_json::from_str(r#"{"amount": 150.5}"#).unwrap();
        assert_eq!(p.amount, "150.5");
    }
}
