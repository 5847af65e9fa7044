#![no_std]

#[macro_use]
extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

use alloc::string::String;
use alloc::vec::Vec;

use core::fmt;

/// Characters accepted between the components of a locus (`1.2`, `1,2`, `1_2`).
pub const SEPARATORS: [char; 3] = ['.', ',', '_'];

/// Separator used when a locus is shown to the reader.
pub const DEFAULT_SEPARATOR: char = ',';

/// Separator expected by the text-unit query endpoint.
pub const QUERY_SEPARATOR: char = '.';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocusError {
    /// The loci have a different number of components.
    Incomparable { left: usize, right: usize },
}

impl fmt::Display for LocusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocusError::Incomparable { left, right } => write!(
                f,
                "Loci are not comparable: {} components vs {}",
                left, right
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LocusError {}

pub fn is_separator(c: char) -> bool {
    SEPARATORS.contains(&c)
}

/// Rewrites every recognized separator in `locus` as `sep`.
///
/// Components are not validated; this is a pure character substitution.
pub fn standardize(locus: &str, sep: char) -> String {
    locus
        .chars()
        .map(|c| if is_separator(c) { sep } else { c })
        .collect()
}

/// Splits a locus into its components. An empty locus has one empty component.
pub fn split(locus: &str) -> impl Iterator<Item = &str> {
    locus.split(is_separator)
}

fn paired<'a>(left: &'a str, right: &'a str) -> Result<Vec<(&'a str, &'a str)>, LocusError> {
    let left: Vec<&str> = split(left).collect();
    let right: Vec<&str> = split(right).collect();

    if left.len() != right.len() {
        return Err(LocusError::Incomparable {
            left: left.len(),
            right: right.len(),
        });
    }

    Ok(left.into_iter().zip(right).collect())
}

/// True when no component of `left` sorts before the matching component of `right`.
///
/// This is a componentwise dominance test, not a tuple ordering: `2.1` is
/// neither same-or-after nor same-or-before `1.5`. Components compare as
/// strings, so `10` sorts before `9`.
pub fn same_or_after(left: &str, right: &str) -> Result<bool, LocusError> {
    Ok(paired(left, right)?.iter().all(|(l, r)| l >= r))
}

/// True when no component of `left` sorts after the matching component of `right`.
pub fn same_or_before(left: &str, right: &str) -> Result<bool, LocusError> {
    Ok(paired(left, right)?.iter().all(|(l, r)| l <= r))
}

/// A parsed locus. Comparisons go through the same rules as the free functions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locus {
    components: Vec<String>,
}

impl Locus {
    pub fn parse(raw: &str) -> Self {
        Self {
            components: split(raw).map(String::from).collect(),
        }
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True only for the empty locus, which still has one (empty) component.
    pub fn is_empty(&self) -> bool {
        matches!(self.components.as_slice(), [only] if only.is_empty())
    }

    pub fn display(&self, sep: char) -> String {
        let mut out = String::new();
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                out.push(sep);
            }
            out.push_str(component);
        }
        out
    }

    pub fn same_or_after(&self, other: &Locus) -> Result<bool, LocusError> {
        self.zip(other).map(|pairs| pairs.iter().all(|(l, r)| l >= r))
    }

    pub fn same_or_before(&self, other: &Locus) -> Result<bool, LocusError> {
        self.zip(other).map(|pairs| pairs.iter().all(|(l, r)| l <= r))
    }

    fn zip<'a>(&'a self, other: &'a Locus) -> Result<Vec<(&'a String, &'a String)>, LocusError> {
        if self.len() != other.len() {
            return Err(LocusError::Incomparable {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(self.components.iter().zip(other.components.iter()).collect())
    }
}

impl From<&str> for Locus {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display(DEFAULT_SEPARATOR))
    }
}

/// An inclusive span of loci, as written in an annotation (`start`..`stop`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocusRange<'a> {
    pub start: &'a str,
    pub stop: &'a str,
}

impl<'a> LocusRange<'a> {
    pub fn new(start: &'a str, stop: &'a str) -> Self {
        Self { start, stop }
    }

    /// Membership test. Incomparable loci are never members.
    pub fn contains(&self, locus: &str) -> bool {
        matches!(same_or_after(locus, self.start), Ok(true))
            && matches!(same_or_before(locus, self.stop), Ok(true))
    }

    pub fn is_single(&self) -> bool {
        self.start == self.stop
    }

    /// `1,2` for a single line, `1,2 - 1,5` for a span.
    pub fn display(&self, sep: char) -> String {
        let mut out = standardize(self.start, sep);
        if !self.is_single() {
            out.push_str(" - ");
            out.push_str(&standardize(self.stop, sep));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use proptest::prelude::*;

    #[test]
    fn test_standardize_mixed_separators() {
        assert_eq!(standardize("1.2_3,4", ','), "1,2,3,4");
        assert_eq!(standardize("1,2", '.'), "1.2");
        assert_eq!(standardize("", ','), "");
        assert_eq!(standardize("praef", ','), "praef");
    }

    #[test]
    fn test_mismatched_lengths_are_incomparable() {
        let err = LocusError::Incomparable { left: 2, right: 3 };
        assert_eq!(same_or_after("1.2", "1.2.3"), Err(err));
        assert_eq!(same_or_before("1.2", "1.2.3"), Err(err));
        assert_eq!(err.to_string(), "Loci are not comparable: 2 components vs 3");
    }

    #[test]
    fn test_dominance_not_tuple_order() {
        // Interleaved loci are neither before nor after each other.
        assert_eq!(same_or_after("2.1", "1.5"), Ok(false));
        assert_eq!(same_or_before("2.1", "1.5"), Ok(false));

        assert_eq!(same_or_after("2.5", "1.5"), Ok(true));
        assert_eq!(same_or_before("1.3", "1.5"), Ok(true));
    }

    #[test]
    fn test_components_compare_as_strings() {
        assert_eq!(same_or_after("1.10", "1.9"), Ok(false));
        assert_eq!(same_or_before("1.10", "1.9"), Ok(true));
    }

    #[test]
    fn test_single_and_empty_loci() {
        assert_eq!(same_or_after("5", "4"), Ok(true));
        assert_eq!(same_or_before("5", "4"), Ok(false));
        assert_eq!(same_or_after("", ""), Ok(true));
        assert_eq!(same_or_after("", "1"), Ok(false));
        assert_eq!(same_or_after("1", ""), Ok(true));
        assert!(Locus::parse("").is_empty());
        assert_eq!(Locus::parse("").len(), 1);
    }

    #[test]
    fn test_separator_only_locus_is_not_empty() {
        let dot = Locus::parse(".");
        assert_eq!(dot.len(), 2);
        assert!(!dot.is_empty());
        assert!(!Locus::parse("1").is_empty());
    }

    #[test]
    fn test_range_membership() {
        let range = LocusRange::new("1.2", "1.3");
        assert!(range.contains("1.2"));
        assert!(range.contains("1,3"));
        assert!(!range.contains("1.1"));
        assert!(!range.contains("1.4"));
        assert!(!range.contains("1.2.1"));
    }

    #[test]
    fn test_range_display() {
        assert_eq!(LocusRange::new("1.2", "1.2").display(DEFAULT_SEPARATOR), "1,2");
        assert_eq!(LocusRange::new("1.2", "1_5").display(DEFAULT_SEPARATOR), "1,2 - 1,5");
    }

    #[test]
    fn test_parsed_locus_agrees_with_free_functions() {
        let a = Locus::parse("3_14");
        let b = Locus::from("3.2");
        assert_eq!(a.to_string(), "3,14");
        assert_eq!(a.same_or_after(&b), same_or_after("3_14", "3.2"));
        assert_eq!(a.same_or_before(&b), same_or_before("3_14", "3.2"));
        assert!(a.same_or_after(&Locus::parse("1")).is_err());
    }

    proptest! {
        #[test]
        fn test_standardize_idempotent(locus in "[0-9a-z.,_]{0,12}") {
            let once = standardize(&locus, DEFAULT_SEPARATOR);
            prop_assert_eq!(standardize(&once, DEFAULT_SEPARATOR), once);
        }

        #[test]
        fn test_comparisons_reflexive(locus in "[0-9]{1,3}([.,_][0-9a-z]{1,3}){0,3}") {
            prop_assert_eq!(same_or_after(&locus, &locus), Ok(true));
            prop_assert_eq!(same_or_before(&locus, &locus), Ok(true));
        }

        #[test]
        fn test_extra_component_is_incomparable(locus in "[0-9]{1,3}(\\.[0-9]{1,3}){0,2}", extra in "[0-9]{1,3}") {
            let longer = format!("{}.{}", locus, extra);
            prop_assert!(same_or_after(&locus, &longer).is_err());
            prop_assert!(same_or_before(&longer, &locus).is_err());
        }
    }
}
