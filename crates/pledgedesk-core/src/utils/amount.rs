//! Monetary and count values that arrive either as JSON numbers or as
//! numeric strings (decimal columns are often serialized as strings).

use std::fmt;

use serde::Deserializer;

/// Deserialize an optional string-or-number into an `f64`
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct AmountVisitor;

    impl<'de> serde::de::Visitor<'de> for AmountVisitor {
        type Value = Option<f64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number, a numeric string or null")
        }

        fn visit_none<E>(self) -> Result<Option<f64>, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Option<f64>, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_str<E>(self, value: &str) -> Result<Option<f64>, E>
        where
            E: serde::de::Error,
        {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse::<f64>().map(Some).map_err(serde::de::Error::custom)
        }

        fn visit_f64<E>(self, value: f64) -> Result<Option<f64>, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Option<f64>, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value as f64))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Option<f64>, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value as f64))
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "super::deserialize_opt")]
        goal: Option<f64>,
    }

    #[test]
    fn test_amount_shapes() {
        let parse = |json: &str| serde_json::from_str::<Record>(json).unwrap().goal;

        assert_eq!(parse(r#"{"goal":10000}"#), Some(10000.0));
        assert_eq!(parse(r#"{"goal":12.5}"#), Some(12.5));
        assert_eq!(parse(r#"{"goal":"2500.00"}"#), Some(2500.0));
        assert_eq!(parse(r#"{"goal":""}"#), None);
        assert_eq!(parse(r#"{"goal":null}"#), None);
        assert_eq!(parse(r#"{}"#), None);
    }

    #[test]
    fn test_amount_rejects_garbage() {
        assert!(serde_json::from_str::<Record>(r#"{"goal":"lots"}"#).is_err());
    }
}
