//! Per-record field normalization.
//!
//! Normalization never fails: malformed or missing fields degrade to
//! defaults so one bad upstream record can never abort a batch. The
//! trade-off is that records without a usable `code` collapse onto
//! barcode 0; a warning is logged each time that happens.

use serde_json::Value;
use tracing::warn;

use crate::models::Product;

/// Column limit for `name` and `origin_country` in the store.
const MAX_TEXT_LEN: usize = 255;

/// Transform one raw upstream record into a [`Product`].
///
/// - `code`: barcode, sent as a string (occasionally a number) upstream;
///   absent or non-numeric values coerce to 0.
/// - `product_name` / `countries`: missing becomes `""`, longer than 255
///   characters is cut to exactly the first 255.
/// - `nutriments."energy-kcal_100g"`: missing or non-numeric becomes 0,
///   fractional values truncate toward zero.
/// - `ingredients_text`: missing becomes `""`, never truncated.
pub fn normalize(raw: &Value) -> Product {
    let barcode = int_field(raw.get("code"));
    if barcode == 0 {
        warn!("record has missing or non-numeric barcode, coerced to 0");
    }

    let kcal = raw
        .get("nutriments")
        .map(|n| kcal_field(n.get("energy-kcal_100g")))
        .unwrap_or(0);

    Product {
        barcode,
        name: truncate(&text_field(raw.get("product_name"))),
        kcal_per_100g: kcal,
        origin_country: truncate(&text_field(raw.get("countries"))),
        ingredients: text_field(raw.get("ingredients_text")),
    }
}

fn text_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

fn int_field(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn kcal_field(value: Option<&Value>) -> i32 {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(|f| f as i32).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<f64>().map(|f| f as i32).unwrap_or(0),
        _ => 0,
    }
}

/// Cut to the first [`MAX_TEXT_LEN`] characters, on char boundaries.
fn truncate(s: &str) -> String {
    match s.char_indices().nth(MAX_TEXT_LEN) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
