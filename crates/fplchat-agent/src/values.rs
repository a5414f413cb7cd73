//! Lenient accessors for tool-result JSON.

use serde_json::Value;

/// Integer from a JSON number or numeric string.
pub fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn get_i64(value: &Value, key: &str) -> Option<i64> {
    value.get(key).and_then(int_value)
}

pub fn get_f64(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn get_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub fn get_bool(value: &Value, key: &str) -> bool {
    match value.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0) != 0,
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    }
}

pub fn get_array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Number for display: integers without a decimal point, otherwise one place.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

pub fn display(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .map(format_number)
            .unwrap_or_else(|| n.to_string()),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Null) | None => "-".to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ints_from_numbers_and_strings() {
        let v = json!({ "a": 5, "b": "12", "c": "x", "d": 7.0 });
        assert_eq!(get_i64(&v, "a"), Some(5));
        assert_eq!(get_i64(&v, "b"), Some(12));
        assert_eq!(get_i64(&v, "c"), None);
        assert_eq!(get_i64(&v, "d"), Some(7));
        assert_eq!(get_i64(&v, "missing"), None);
    }

    #[test]
    fn bools_are_lenient() {
        let v = json!({ "t": "true", "n": 1, "f": "no" });
        assert!(get_bool(&v, "t"));
        assert!(get_bool(&v, "n"));
        assert!(!get_bool(&v, "f"));
        assert!(!get_bool(&v, "missing"));
    }

    #[test]
    fn display_formats_numbers() {
        assert_eq!(display(Some(&json!(42))), "42");
        assert_eq!(display(Some(&json!(4.26))), "4.3");
        assert_eq!(display(Some(&json!(null))), "-");
        assert_eq!(display(None), "-");
    }
}
