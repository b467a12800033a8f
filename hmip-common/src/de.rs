//! Decoding helpers for the hub's JSON.

use serde::{Deserialize, Deserializer};

/// Decode `null` like a missing field: as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Named {
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
    }

    #[test]
    fn test_null_becomes_default() {
        let named: Named = serde_json::from_str(r#"{"name": null, "tags": null}"#).unwrap();
        assert_eq!(named.name, "");
        assert!(named.tags.is_empty());
    }

    #[test]
    fn test_values_pass_through() {
        let named: Named = serde_json::from_str(r#"{"name": "Hall", "tags": ["a"]}"#).unwrap();
        assert_eq!(named.name, "Hall");
        assert_eq!(named.tags, ["a"]);
    }
}
