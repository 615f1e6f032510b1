//! Identifiers that the backend sends either as strings or as integers.
//!
//! Use with `#[serde(deserialize_with = "string_id::deserialize")]`; the value
//! is always kept as a `String` once it is inside the crate.

use std::fmt;

use serde::Deserializer;

/// Deserialize a string or integer identifier into a `String`
pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumberVisitor;

    impl<'de> serde::de::Visitor<'de> for StringOrNumberVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer identifier")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumberVisitor)
}

/// Same as [`deserialize`] for optional identifiers
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize")] String);

    let value: Option<Wrapper> = serde::Deserialize::deserialize(deserializer)?;
    Ok(value.map(|w| w.0))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Record {
        #[serde(deserialize_with = "super::deserialize")]
        id: String,
        #[serde(default, deserialize_with = "super::deserialize_opt")]
        parent_id: Option<String>,
    }

    #[test]
    fn test_accepts_string_and_number() {
        let a: Record = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(a.id, "abc");
        assert_eq!(a.parent_id, None);

        let b: Record = serde_json::from_str(r#"{"id":42,"parent_id":7}"#).unwrap();
        assert_eq!(b.id, "42");
        assert_eq!(b.parent_id.as_deref(), Some("7"));

        let c: Record = serde_json::from_str(r#"{"id":1,"parent_id":null}"#).unwrap();
        assert_eq!(c.parent_id, None);
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert!(serde_json::from_str::<Record>(r#"{"id":true}"#).is_err());
    }
}
