//! Small shared helpers.

use crate::error::StatsError;
use serde_json::Value;

/// Normalize a label for use as a counter key: trimmed, lowercased,
/// spaces replaced with dashes.
pub fn normalize_label(s: &str) -> String {
    s.trim().to_lowercase().replace(' ', "-")
}

/// Coerce a loosely-typed option value into a non-negative integer.
///
/// Missing, null, and negative values all collapse to `None` (negative
/// thresholds mean "unset"). Integer-like strings are accepted. Anything
/// else fails with [`StatsError::TypeMismatch`] before any state changes.
pub fn check_int_like(value: Option<&Value>) -> Result<Option<i64>, StatsError> {
    let value = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v,
    };

    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n < 0 => Ok(None),
        Some(n) => Ok(Some(n)),
        None => Err(StatsError::TypeMismatch(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Hello World "), "hello-world");
        assert_eq!(normalize_label("hw02"), "hw02");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn test_check_int_like_accepts_integers() {
        assert_eq!(check_int_like(Some(&json!(5))).unwrap(), Some(5));
        assert_eq!(check_int_like(Some(&json!(0))).unwrap(), Some(0));
        assert_eq!(check_int_like(Some(&json!("7"))).unwrap(), Some(7));
    }

    #[test]
    fn test_check_int_like_collapses_to_none() {
        assert_eq!(check_int_like(None).unwrap(), None);
        assert_eq!(check_int_like(Some(&Value::Null)).unwrap(), None);
        assert_eq!(check_int_like(Some(&json!(-3))).unwrap(), None);
    }

    #[test]
    fn test_check_int_like_rejects_non_integers() {
        assert!(matches!(
            check_int_like(Some(&json!("abc"))),
            Err(StatsError::TypeMismatch(_))
        ));
        assert!(matches!(
            check_int_like(Some(&json!(true))),
            Err(StatsError::TypeMismatch(_))
        ));
        assert!(matches!(
            check_int_like(Some(&json!([1, 2]))),
            Err(StatsError::TypeMismatch(_))
        ));
    }
}
