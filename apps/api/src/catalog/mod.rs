// Listing helpers shared by jobs and resources: facet filtering,
// pagination, list normalization and the demo data set.

pub mod filter;
pub mod sample;

/// Trims entries, drops blanks and removes case-insensitive duplicates,
/// keeping the first spelling seen.
pub fn normalize_list(raw: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Like `normalize_list`, but tags are always stored lowercase.
pub fn normalize_tags(raw: &[String]) -> Vec<String> {
    normalize_list(raw)
        .into_iter()
        .map(|t| t.to_lowercase())
        .collect()
}
