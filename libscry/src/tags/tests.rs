use super::*;

#[test]
fn test_latest_sorts_first() {
    let tags = vec![
        "1.0".to_string(),
        "latest".to_string(),
        "0.9".to_string(),
    ];
    let ordered = canonical_order(tags);
    assert_eq!(ordered[0], "latest");
}

#[test]
fn test_numeric_aware_descending_order() {
    let tags = vec!["2".to_string(), "10".to_string(), "latest".to_string()];
    assert_eq!(canonical_order(tags), vec!["latest", "10", "2"]);
}

#[test]
fn test_semver_like_tags_descend() {
    let tags = vec![
        "1.2.0".to_string(),
        "1.10.0".to_string(),
        "1.9.3".to_string(),
    ];
    assert_eq!(canonical_order(tags), vec!["1.10.0", "1.9.3", "1.2.0"]);
}

#[test]
fn test_duplicates_removed() {
    let tags = vec![
        "latest".to_string(),
        "1.0".to_string(),
        "1.0".to_string(),
    ];
    assert_eq!(canonical_order(tags), vec!["latest", "1.0"]);
}

#[test]
fn test_mixed_alpha_and_numeric_tags() {
    let tags = vec![
        "edge".to_string(),
        "3".to_string(),
        "alpine3.19".to_string(),
        "alpine3.2".to_string(),
    ];
    let ordered = canonical_order(tags);
    // Descending: plain text compares after digits flip, and the alpine
    // family keeps numeric order within the shared prefix.
    let pos = |t: &str| ordered.iter().position(|x| x == t).unwrap();
    assert!(pos("alpine3.19") < pos("alpine3.2"));
    assert!(pos("edge") < pos("3"));
}

#[test]
fn test_compare_without_latest_is_descending() {
    assert_eq!(compare("10", "2"), std::cmp::Ordering::Less);
    assert_eq!(compare("2", "10"), std::cmp::Ordering::Greater);
}

#[test]
fn test_empty_input() {
    assert!(canonical_order(Vec::new()).is_empty());
}

#[test]
fn test_leading_zeros_compare_numerically() {
    // 010 == 10 numerically, tie broken by the plain string comparison.
    let tags = vec!["010".to_string(), "10".to_string(), "9".to_string()];
    let ordered = canonical_order(tags);
    assert_eq!(ordered.last().map(String::as_str), Some("9"));
    assert_eq!(ordered.len(), 3);
}
