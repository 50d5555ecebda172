use std::collections::HashSet;

use tracing::info;

/// Keep only records whose natural name is on the allow-list, in their
/// original order. An empty list disables filtering.
pub fn filter_curated<T, F>(records: Vec<T>, allow_list: &[String], name_of: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    if allow_list.is_empty() {
        info!("No curated list configured, keeping all {} records", records.len());
        return records;
    }

    let allowed: HashSet<&str> = allow_list.iter().map(String::as_str).collect();
    let original = records.len();
    let kept: Vec<T> = records
        .into_iter()
        .filter(|r| allowed.contains(name_of(r)))
        .collect();

    info!("Filtered to {} curated records (from {} total)", kept.len(), original);
    kept
}
