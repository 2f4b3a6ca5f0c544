use std::collections::BTreeSet;

/// Decide whether a line selection identifies exactly the vulnerable code.
///
/// A selection passes when it contains every vulnerable line and nothing
/// outside the vulnerable and neutral sets. An absent selection never passes.
pub fn evaluate(
    vuln_lines: &BTreeSet<u32>,
    neutral_lines: &BTreeSet<u32>,
    selected_lines: Option<&[u32]>,
) -> bool {
    let Some(selected) = selected_lines else {
        return false;
    };

    // Necessary, not sufficient: containment is still checked below
    if selected.len() < vuln_lines.len() {
        return false;
    }

    let chosen: BTreeSet<u32> = selected.iter().copied().collect();
    if !vuln_lines.is_subset(&chosen) {
        return false;
    }

    chosen
        .iter()
        .all(|line| vuln_lines.contains(line) || neutral_lines.contains(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(lines: &[u32]) -> BTreeSet<u32> {
        lines.iter().copied().collect()
    }

    #[test]
    fn test_absent_selection_fails() {
        assert!(!evaluate(&set(&[1]), &set(&[2]), None));
        assert!(!evaluate(&set(&[]), &set(&[]), None));
    }

    #[test]
    fn test_exact_vuln_lines_pass() {
        assert!(evaluate(&set(&[42]), &set(&[10, 11]), Some(&[42])));
    }

    #[test]
    fn test_neutral_lines_allowed() {
        assert!(evaluate(&set(&[42]), &set(&[10, 11]), Some(&[42, 10])));
        assert!(evaluate(&set(&[42]), &set(&[10, 11]), Some(&[11, 42, 10])));
    }

    #[test]
    fn test_missing_vuln_line_fails() {
        assert!(!evaluate(&set(&[42]), &set(&[10, 11]), Some(&[10, 11])));
        assert!(!evaluate(&set(&[3, 4]), &set(&[]), Some(&[3, 5])));
    }

    #[test]
    fn test_extraneous_line_fails() {
        assert!(!evaluate(&set(&[42]), &set(&[10]), Some(&[42, 43])));
    }

    #[test]
    fn test_duplicates_do_not_satisfy_containment() {
        assert!(!evaluate(&set(&[1, 2]), &set(&[]), Some(&[1, 1])));
        assert!(evaluate(&set(&[1]), &set(&[]), Some(&[1, 1])));
    }

    #[test]
    fn test_empty_selection_with_no_vuln_lines() {
        assert!(evaluate(&set(&[]), &set(&[1]), Some(&[])));
        assert!(!evaluate(&set(&[1]), &set(&[]), Some(&[])));
    }

    /// Exhaustive check of the iff-law over every disjoint
    /// (vuln, neutral) partition of a five-line universe and every selection.
    #[test]
    fn test_matches_subset_law_exhaustively() {
        const LINES: u32 = 5;
        let subset = |mask: u32| -> BTreeSet<u32> {
            (0..LINES).filter(|i| mask & (1 << i) != 0).map(|i| i + 1).collect()
        };

        for vuln_mask in 0..(1u32 << LINES) {
            for neutral_mask in 0..(1u32 << LINES) {
                if vuln_mask & neutral_mask != 0 {
                    continue;
                }
                let vuln = subset(vuln_mask);
                let neutral = subset(neutral_mask);
                let ok: BTreeSet<u32> = vuln.union(&neutral).copied().collect();

                for selected_mask in 0..(1u32 << LINES) {
                    let selected: Vec<u32> = subset(selected_mask).into_iter().rev().collect();
                    let chosen: BTreeSet<u32> = selected.iter().copied().collect();
                    let expected = vuln.is_subset(&chosen) && chosen.is_subset(&ok);
                    assert_eq!(
                        evaluate(&vuln, &neutral, Some(&selected)),
                        expected,
                        "vuln={:?} neutral={:?} selected={:?}",
                        vuln,
                        neutral,
                        selected
                    );
                }
            }
        }
    }
}
