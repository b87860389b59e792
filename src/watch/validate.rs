//! Response shape checks.

use serde_json::Value;

use super::StatusResponse;
use crate::error::WatchError;

/// Return the work-item records under `homeworks`, newest first.
///
/// An empty list is valid. Anything other than an object with a `homeworks`
/// array is a schema error.
pub fn extract(response: &StatusResponse) -> Result<Vec<Value>, WatchError> {
    let object = response
        .value()
        .as_object()
        .ok_or_else(|| WatchError::Schema("API response is not a JSON object".into()))?;

    let homeworks = object
        .get("homeworks")
        .ok_or_else(|| WatchError::Schema("API response has no \"homeworks\" key".into()))?;

    match homeworks {
        Value::Array(items) => Ok(items.clone()),
        _ => Err(WatchError::Schema(
            "\"homeworks\" in API response is not a list".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_returns_items_in_order() {
        let response = StatusResponse(json!({
            "homeworks": [
                {"homework_name": "hw2", "status": "reviewing"},
                {"homework_name": "hw1", "status": "approved"},
            ],
            "current_date": 1000,
        }));
        let items = extract(&response).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["homework_name"], "hw2");
    }

    #[test]
    fn test_extract_empty_list_is_valid() {
        let items = extract(&StatusResponse(json!({"homeworks": []}))).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_extract_rejects_non_object() {
        let err = extract(&StatusResponse(json!([{"homeworks": []}]))).unwrap_err();
        assert!(matches!(err, WatchError::Schema(_)));
    }

    #[test]
    fn test_extract_rejects_missing_key() {
        let err = extract(&StatusResponse(json!({"current_date": 5}))).unwrap_err();
        assert!(matches!(err, WatchError::Schema(ref m) if m.contains("homeworks")));
    }

    #[test]
    fn test_extract_rejects_non_list() {
        for bad in [
            json!({"homeworks": {}}),
            json!({"homeworks": "hw1"}),
            json!({"homeworks": null}),
        ] {
            let err = extract(&StatusResponse(bad)).unwrap_err();
            assert!(matches!(err, WatchError::Schema(ref m) if m.contains("not a list")));
        }
    }
}
