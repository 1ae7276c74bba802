use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::io::{self, Write};

pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

/// Safe-numeric coercion: numbers and numeric strings pass through,
/// everything else (and anything non-finite) maps to 0.
pub fn safe_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(safe_number(&value))
}

/// Like [`lenient_f64`], but non-numeric input becomes `None` instead of 0.
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|n| n.is_finite()))
}

pub fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub fn prompt_input(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();

    let mut input = String::new();
    let _ = io::stdin().read_line(&mut input);
    input.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(f64::MAX), f64::MAX);
    }

    #[test]
    fn test_safe_number_coerces_non_numeric_to_zero() {
        assert_eq!(safe_number(&json!(4)), 4.0);
        assert_eq!(safe_number(&json!("2.5")), 2.5);
        assert_eq!(safe_number(&json!(" 3 ")), 3.0);
        assert_eq!(safe_number(&json!("lots")), 0.0);
        assert_eq!(safe_number(&json!(null)), 0.0);
        assert_eq!(safe_number(&json!([1])), 0.0);
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text(Some("  math ".into())), Some("math".into()));
        assert_eq!(normalize_text(Some("   ".into())), None);
        assert_eq!(normalize_text(None), None);
    }
}
