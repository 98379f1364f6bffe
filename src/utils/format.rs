/// Formats a float in shortest round-trip form, always with a decimal point.
///
/// Missing values format as an empty string.
pub fn format_float(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.is_nan() => String::new(),
        Some(v) if v.is_infinite() => {
            if v > 0.0 {
                "inf".to_string()
            } else {
                "-inf".to_string()
            }
        }
        Some(v) => {
            let text = v.to_string();
            if text.contains('.') {
                text
            } else {
                format!("{}.0", text)
            }
        }
    }
}
