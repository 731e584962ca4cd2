//! Numbers embedded in archive entry names.
//!
//! Archive order is the byte-wise order of names, which only matches the
//! intended reading order when numbers are zero-padded:
//! - `page01.jpg, page02.jpg, page10.jpg` → reads as expected
//! - `page1.jpg, page10.jpg, page2.jpg` → page 10 is posted before page 2
//!
//! Navigation deliberately keeps the byte-wise order so an index always means
//! the same file. This module only finds names where the two orders disagree,
//! so `pagecast check` can point at them.

/// Value of the first run of ASCII digits in an entry name.
///
/// - `"page010.jpg"` → `Some(10)`
/// - `"vol-2"` → `Some(2)`
/// - `"cover.png"` → `None`
pub fn embedded_number(name: &str) -> Option<u64> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let digits = name[start..]
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or_default();
    // Overlong digit runs have no meaningful order; treat as unnumbered.
    digits.parse().ok()
}

/// Two adjacent entries whose byte-wise order contradicts their numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingWarning {
    /// Sorted first, numbered higher.
    pub earlier: String,
    /// Sorted second, numbered lower.
    pub later: String,
}

/// Scan names in archive (byte-wise sorted) order and report every adjacent
/// pair where the first name carries a larger number than the second.
///
/// Names without numbers never produce warnings.
pub fn ordering_warnings(sorted_names: &[String]) -> Vec<OrderingWarning> {
    sorted_names
        .windows(2)
        .filter_map(|pair| {
            let a = embedded_number(&pair[0])?;
            let b = embedded_number(&pair[1])?;
            (a > b).then(|| OrderingWarning {
                earlier: pair[0].clone(),
                later: pair[1].clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn padded_number() {
        assert_eq!(embedded_number("page010.jpg"), Some(10));
    }

    #[test]
    fn first_run_wins() {
        assert_eq!(embedded_number("vol2-page7"), Some(2));
    }

    #[test]
    fn leading_number() {
        assert_eq!(embedded_number("12.png"), Some(12));
    }

    #[test]
    fn unnumbered() {
        assert_eq!(embedded_number("cover.png"), None);
    }

    #[test]
    fn overlong_run_is_unnumbered() {
        assert_eq!(
            embedded_number("scan-123456789012345678901234567890.jpg"),
            None
        );
    }

    #[test]
    fn unpadded_names_warn() {
        let warnings = ordering_warnings(&names(&["page1.jpg", "page10.jpg", "page2.jpg"]));
        assert_eq!(
            warnings,
            vec![OrderingWarning {
                earlier: "page10.jpg".into(),
                later: "page2.jpg".into(),
            }]
        );
    }

    #[test]
    fn padded_names_are_clean() {
        assert!(ordering_warnings(&names(&["page01.jpg", "page02.jpg", "page10.jpg"])).is_empty());
    }

    #[test]
    fn unnumbered_neighbours_are_ignored() {
        assert!(ordering_warnings(&names(&["cover.jpg", "page9.jpg", "zz-back.jpg"])).is_empty());
    }

    #[test]
    fn short_lists() {
        assert!(ordering_warnings(&[]).is_empty());
        assert!(ordering_warnings(&names(&["only.jpg"])).is_empty());
    }
}
