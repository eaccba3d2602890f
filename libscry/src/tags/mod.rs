//! Canonical ordering for repository tag lists.
//!
//! The UI shows `latest` first, then the remaining tags newest-looking
//! first: descending, with digit runs compared numerically so that `10`
//! sorts above `2`.

use std::cmp::Ordering;

#[cfg(test)]
mod tests;

/// The conventional tag a repository's default image is published under.
pub const LATEST: &str = "latest";

/// Deduplicates and sorts tags into canonical display order.
///
/// `latest` is always first; everything else descends by numeric-aware
/// comparison.
///
/// # Examples
///
/// ```
/// use libscry::tags::canonical_order;
///
/// let tags = vec!["2".to_string(), "10".to_string(), "latest".to_string()];
/// assert_eq!(canonical_order(tags), vec!["latest", "10", "2"]);
/// ```
pub fn canonical_order(mut tags: Vec<String>) -> Vec<String> {
    tags.sort_by(|a, b| compare(a, b));
    tags.dedup();
    tags
}

/// Total order over tag names: `latest` first, then descending
/// numeric-aware order.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (a == LATEST, b == LATEST) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        // Arguments flipped: larger versions sort earlier.
        (false, false) => natural_cmp(b, a).then_with(|| b.cmp(a)),
    }
}

/// Ascending lexicographic comparison where maximal digit runs compare as
/// numbers, so `"2" < "10"` even though plain ASCII order says otherwise.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut xs = a.chars().peekable();
    let mut ys = b.chars().peekable();

    loop {
        match (xs.peek().copied(), ys.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let run_a = take_digit_run(&mut xs);
                let run_b = take_digit_run(&mut ys);
                let ord = compare_digit_runs(&run_a, &run_b);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.cmp(&y);
                if ord != Ordering::Equal {
                    return ord;
                }
                xs.next();
                ys.next();
            }
        }
    }
}

fn take_digit_run(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

/// Compares two digit runs numerically without parsing into an integer
/// type, so arbitrarily long runs cannot overflow.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
