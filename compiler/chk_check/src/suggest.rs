//! "Did you mean?" suggestions for unresolved names.
//!
//! Name resolution failures offer a suggestion only when exactly one
//! candidate is a single edit away (one insertion, deletion, or
//! substitution) from the name that failed to resolve — wider fuzzy
//! matching tends to suggest the wrong symbol in a large workspace.

/// Edit distance between two strings, capped at 2: anything past that isn't
/// useful here and this function never needs to report more than "is it
/// exactly 1".
fn edit_distance_at_most_two(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    if a_len.abs_diff(b_len) > 2 {
        return 3;
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row = vec![0usize; b_len + 1];

    for (i, a_char) in a.chars().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b.chars().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }
    prev_row[b_len]
}

/// Finds the unique candidate exactly one edit away from `unknown`. If more
/// than one candidate qualifies, no suggestion is offered — an ambiguous
/// suggestion is worse than none.
pub fn suggest_similar<'a>(unknown: &str, candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    if unknown.is_empty() {
        return None;
    }
    let mut found: Option<&'a str> = None;
    for candidate in candidates {
        if candidate == unknown {
            continue;
        }
        if edit_distance_at_most_two(unknown, candidate) == 1 {
            if found.is_some() {
                return None;
            }
            found = Some(candidate);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_a_one_edit_typo() {
        let candidates = vec!["length", "height", "width"];
        assert_eq!(suggest_similar("lenght", candidates.into_iter()), Some("length"));
    }

    #[test]
    fn does_not_suggest_across_two_edits() {
        let candidates = vec!["length"];
        assert_eq!(suggest_similar("lngth", candidates.into_iter()), None);
    }

    #[test]
    fn ambiguous_matches_suggest_nothing() {
        let candidates = vec!["cat", "bat"];
        assert_eq!(suggest_similar("hat", candidates.into_iter()), None);
    }

    #[test]
    fn exact_matches_are_skipped() {
        let candidates = vec!["foo"];
        assert_eq!(suggest_similar("foo", candidates.into_iter()), None);
    }
}
