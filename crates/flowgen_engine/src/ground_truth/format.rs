//! Fixed-precision text fragments shared by both record writers
//!
//! Every scalar is written with exactly two decimals. Downstream consumers
//! read the records as fixed-point text.

use crate::foundation::math::{EulerOrder, Vec3};

/// Scalar with two decimals; negative zero prints as `0.00`
pub fn fixed(value: f32) -> String {
    let text = format!("{value:.2}");
    if text == "-0.00" {
        "0.00".to_string()
    } else {
        text
    }
}

/// `[x, y, z]`
pub fn vector(value: &Vec3) -> String {
    format!("[{}, {}, {}]", fixed(value.x), fixed(value.y), fixed(value.z))
}

/// `{"value": [x, y, z], "order": "XYZ"}`
pub fn euler(angles: &Vec3, order: EulerOrder) -> String {
    format!("{{\"value\": {}, \"order\": \"{}\"}}", vector(angles), order)
}

/// JSON string literal
pub fn quoted(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

/// `{"name": value}`
pub fn entry(name: &str, value: &str) -> String {
    format!("{{{}: {}}}", quoted(name), value)
}
