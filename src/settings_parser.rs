use serde_json::Value;

use settings::{DocValuesSettings, MAX_ARRAY_LENGTH};


#[derive(Debug, PartialEq)]
pub enum DocValuesSettingsParseError {
    ExpectedObject,
    ExpectedPositiveInteger(String),
    ValueTooLarge(String, u64),
    UnrecognisedKey(String),
}


fn parse_limit(key: &str, json: &Value) -> Result<u64, DocValuesSettingsParseError> {
    let value = match json.as_u64() {
        Some(value) if value > 0 => value,
        _ => return Err(DocValuesSettingsParseError::ExpectedPositiveInteger(key.to_string())),
    };

    if value > MAX_ARRAY_LENGTH {
        return Err(DocValuesSettingsParseError::ValueTooLarge(key.to_string(), value));
    }

    Ok(value)
}


/// Parses doc values settings from JSON
///
/// ```json
/// {
///     "max_values": 1000000,
///     "max_total_bytes": 67108864
/// }
/// ```
///
/// Missing keys keep their defaults.
pub fn parse(json: &Value) -> Result<DocValuesSettings, DocValuesSettingsParseError> {
    let data = json.as_object().ok_or(DocValuesSettingsParseError::ExpectedObject)?;

    let defaults = DocValuesSettings::default();
    let mut max_values = defaults.max_values();
    let mut max_total_bytes = defaults.max_total_bytes();

    for (key, value) in data.iter() {
        match key.as_str() {
            "max_values" => {
                max_values = parse_limit(key, value)?;
            }
            "max_total_bytes" => {
                max_total_bytes = parse_limit(key, value)?;
            }
            _ => return Err(DocValuesSettingsParseError::UnrecognisedKey(key.clone())),
        }
    }

    Ok(DocValuesSettings::with_limits(max_values, max_total_bytes))
}


#[cfg(test)]
mod tests {
    use serde_json;

    use settings::{DocValuesSettings, MAX_ARRAY_LENGTH};
    use super::{parse, DocValuesSettingsParseError};

    #[test]
    fn test_empty_object_gives_defaults() {
        let settings = parse(&json!({})).unwrap();

        assert_eq!(settings, DocValuesSettings::default());
        assert_eq!(settings.max_values(), MAX_ARRAY_LENGTH);
        assert_eq!(settings.max_total_bytes(), MAX_ARRAY_LENGTH);
    }

    #[test]
    fn test_overrides() {
        let settings = parse(&json!({
            "max_values": 1000,
            "max_total_bytes": 4096,
        })).unwrap();

        assert_eq!(settings, DocValuesSettings::with_limits(1000, 4096));
    }

    #[test]
    fn test_from_string() {
        let json: serde_json::Value = serde_json::from_str(r#"{"max_values": 12}"#).unwrap();
        let settings = parse(&json).unwrap();

        assert_eq!(settings.max_values(), 12);
        assert_eq!(settings.max_total_bytes(), MAX_ARRAY_LENGTH);
    }

    #[test]
    fn test_expected_object() {
        assert_eq!(parse(&json!([1, 2])), Err(DocValuesSettingsParseError::ExpectedObject));
    }

    #[test]
    fn test_bad_values() {
        assert_eq!(
            parse(&json!({"max_values": "lots"})),
            Err(DocValuesSettingsParseError::ExpectedPositiveInteger("max_values".to_string()))
        );
        assert_eq!(
            parse(&json!({"max_values": 0})),
            Err(DocValuesSettingsParseError::ExpectedPositiveInteger("max_values".to_string()))
        );
        assert_eq!(
            parse(&json!({"max_total_bytes": -5})),
            Err(DocValuesSettingsParseError::ExpectedPositiveInteger("max_total_bytes".to_string()))
        );
        assert_eq!(
            parse(&json!({"max_total_bytes": 1u64 << 40})),
            Err(DocValuesSettingsParseError::ValueTooLarge("max_total_bytes".to_string(), 1 << 40))
        );
    }

    #[test]
    fn test_unrecognised_key() {
        assert_eq!(
            parse(&json!({"compression": "lz4"})),
            Err(DocValuesSettingsParseError::UnrecognisedKey("compression".to_string()))
        );
    }
}
