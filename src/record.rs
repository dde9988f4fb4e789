pub const MISSING: &str = "-";
pub const UNAVAILABLE: &str = "NA";

/// One row of a report section. Every record of a kind has the same number
/// of fields, in the order of `columns()`.
pub trait ResourceRecord {
    fn columns() -> &'static [&'static str];
    fn fields(&self) -> Vec<String>;
}

pub fn or_missing(value: Option<String>) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => MISSING.to_string(),
    }
}

pub fn join_or_missing(values: Vec<String>) -> String {
    if values.is_empty() {
        MISSING.to_string()
    } else {
        values.join(",")
    }
}
