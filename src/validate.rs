use serde_json::Value;

use crate::error::ApiError;

pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Presence for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for Value {
    fn is_present(&self) -> bool {
        match self {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::Bool(_) | Value::Number(_) => true,
        }
    }
}

impl Presence for bool {
    fn is_present(&self) -> bool {
        true
    }
}

impl Presence for u32 {
    fn is_present(&self) -> bool {
        true
    }
}

pub fn required<T: Presence>(value: Option<T>, message: &str) -> Result<T, ApiError> {
    match value {
        Some(value) if value.is_present() => Ok(value),
        _ => Err(ApiError::missing(message)),
    }
}

/// The recipient list must be sent, but may be empty; an empty list is the
/// nothing-sent path rather than a validation failure.
pub fn recipients(phone: Option<Vec<String>>) -> Result<Vec<String>, ApiError> {
    phone.ok_or_else(|| ApiError::missing("phone was not informed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_empty_string_is_missing() {
        assert!(required(Some(String::new()), "id was not informed").is_err());
        assert_eq!(required(Some(" ".to_string()), "message").unwrap(), " ");
        assert!(required(Some(json!(" ")), "options").is_ok());
        assert!(required(None::<String>, "id was not informed").is_err());
        assert_eq!(required(Some("42".to_string()), "x").unwrap(), "42");
    }

    #[test]
    fn false_counts_as_informed() {
        assert!(!required(Some(false), "enabled").unwrap());
        assert!(required(Some(json!(false)), "value").is_ok());
        assert!(required(Some(json!(0)), "index").is_ok());
    }

    #[test]
    fn empty_json_containers_are_missing() {
        assert!(required(Some(json!({})), "options").is_err());
        assert!(required(Some(json!([])), "sections").is_err());
        assert!(required(Some(Value::Null), "options").is_err());
    }

    #[test]
    fn empty_recipient_list_is_not_a_validation_error() {
        assert_eq!(recipients(Some(vec![])).unwrap(), Vec::<String>::new());

        let err = recipients(None).unwrap_err();
        assert_eq!(err.to_string(), "phone was not informed");
    }
}
