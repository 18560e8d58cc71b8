use crate::domain::model::PersonName;

/// Splits on single spaces after trimming; everything past the first token
/// is the last name.
pub fn split_full_name(full_name: &str) -> PersonName {
    let mut parts = full_name.trim().split(' ');
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.collect::<Vec<_>>().join(" ");

    PersonName { first, last }
}
