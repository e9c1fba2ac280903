//! Typo suggestions for catalog and group names

/// Edit distance between two names, comparing ASCII case-insensitively.
///
/// Group and variable names are matched exactly elsewhere; the relaxed
/// comparison here only ranks suggestions, so `vector` still finds `Vector`.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().map(|c| c.to_ascii_lowercase()).collect();
    let b: Vec<char> = b.chars().map(|c| c.to_ascii_lowercase()).collect();

    if a.is_empty() || b.is_empty() {
        return a.len().max(b.len());
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(ca != cb);
            row[j + 1] = substitution.min(above + 1).min(row[j] + 1);
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Closest candidate within `threshold` edits; ties keep the first candidate.
pub fn find_similar_name<'a>(name: &str, candidates: &[&'a str], threshold: usize) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&candidate| (edit_distance(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

/// Suffix appended to lookup errors.
pub fn format_suggestion_hint(suggestion: Option<&str>) -> String {
    suggestion
        .map(|name| format!(" (did you mean `{name}`?)"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance_identical() {
        assert_eq!(edit_distance("Vector", "Vector"), 0);
    }

    #[test]
    fn test_edit_distance_ignores_ascii_case() {
        assert_eq!(edit_distance("vector", "Vector"), 0);
        assert_eq!(edit_distance("MATRIX", "Matrix"), 0);
    }

    #[test]
    fn test_edit_distance_edits() {
        assert_eq!(edit_distance("Tensr3", "Tensor3"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_edit_distance_empty() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("", "ab"), 2);
    }

    #[test]
    fn test_find_similar_name_prefers_closest() {
        let candidates = ["Tensor3", "Tensor4", "Vector"];
        assert_eq!(find_similar_name("Tensor4x", &candidates, 3), Some("Tensor4"));
    }

    #[test]
    fn test_find_similar_name_respects_threshold() {
        assert_eq!(find_similar_name("f_grid", &["Sparse", "Matrix"], 2), None);
    }

    #[test]
    fn test_format_suggestion_hint() {
        assert_eq!(format_suggestion_hint(Some("f_grid")), " (did you mean `f_grid`?)");
        assert_eq!(format_suggestion_hint(None), "");
    }
}
