use std::collections::HashSet;

/// Drops repeated version strings, keeping the first occurrence of each.
/// Comparison is exact: "1.28" and "v1.28" are different versions.
pub fn dedup_versions(versions: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(versions.len());
    versions
        .into_iter()
        .filter(|version| seen.insert(version.clone()))
        .collect()
}
