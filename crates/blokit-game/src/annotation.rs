//! Move annotations and their record properties.

use std::fmt;
use std::str::FromStr;

use crate::error::ShellError;

/// Judgement attached to a move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Annotation {
    #[default]
    None,
    Good,
    VeryGood,
    Bad,
    VeryBad,
    Doubtful,
    Interesting,
}

impl Annotation {
    /// All annotations, `None` first.
    pub const ALL: [Annotation; 7] = [
        Annotation::None,
        Annotation::Good,
        Annotation::VeryGood,
        Annotation::Bad,
        Annotation::VeryBad,
        Annotation::Doubtful,
        Annotation::Interesting,
    ];

    /// Record property id and value, or `None` for [`Annotation::None`].
    pub const fn to_property(self) -> Option<(&'static str, &'static str)> {
        match self {
            Annotation::None => None,
            Annotation::Good => Some(("TE", "1")),
            Annotation::VeryGood => Some(("TE", "2")),
            Annotation::Bad => Some(("BM", "1")),
            Annotation::VeryBad => Some(("BM", "2")),
            Annotation::Doubtful => Some(("DO", "")),
            Annotation::Interesting => Some(("IT", "")),
        }
    }

    /// Decode an annotation property.
    ///
    /// Returns `None` if `id` is not an annotation property or `value` is
    /// not valid for it. Empty values of `TE` and `BM` count as `1`.
    pub fn from_property(id: &str, value: &str) -> Option<Annotation> {
        match (id, value.trim()) {
            ("TE", "1" | "") => Some(Annotation::Good),
            ("TE", "2") => Some(Annotation::VeryGood),
            ("BM", "1" | "") => Some(Annotation::Bad),
            ("BM", "2") => Some(Annotation::VeryBad),
            ("DO", _) => Some(Annotation::Doubtful),
            ("IT", _) => Some(Annotation::Interesting),
            _ => None,
        }
    }

    /// Whether `id` names an annotation property.
    pub fn is_property(id: &str) -> bool {
        matches!(id, "TE" | "BM" | "DO" | "IT")
    }

    /// Conventional move suffix (`!`, `??`, ...), empty for `None`.
    pub const fn symbol(self) -> &'static str {
        match self {
            Annotation::None => "",
            Annotation::Good => "!",
            Annotation::VeryGood => "!!",
            Annotation::Bad => "?",
            Annotation::VeryBad => "??",
            Annotation::Doubtful => "?!",
            Annotation::Interesting => "!?",
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Annotation::None => "none",
            Annotation::Good => "good",
            Annotation::VeryGood => "very-good",
            Annotation::Bad => "bad",
            Annotation::VeryBad => "very-bad",
            Annotation::Doubtful => "doubtful",
            Annotation::Interesting => "interesting",
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Annotation {
    type Err = ShellError;

    /// Accepts the names shown by `Display` and the move symbols.
    fn from_str(s: &str) -> Result<Annotation, ShellError> {
        let s = s.trim();
        Annotation::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s) || (!s.is_empty() && a.symbol() == s))
            .ok_or_else(|| ShellError::InvalidArgument {
                command: "annotate",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_mapping_is_reversible() {
        for a in Annotation::ALL {
            match a.to_property() {
                Some((id, value)) => assert_eq!(Annotation::from_property(id, value), Some(a)),
                None => assert_eq!(a, Annotation::None),
            }
        }
    }

    #[test]
    fn bad_values_are_rejected() {
        assert_eq!(Annotation::from_property("TE", "3"), None);
        assert_eq!(Annotation::from_property("BM", "x"), None);
        assert_eq!(Annotation::from_property("C", "1"), None);
    }

    #[test]
    fn parse_names_and_symbols() {
        assert_eq!("very-good".parse::<Annotation>().unwrap(), Annotation::VeryGood);
        assert_eq!("?!".parse::<Annotation>().unwrap(), Annotation::Doubtful);
        assert_eq!("None".parse::<Annotation>().unwrap(), Annotation::None);
        assert!("great".parse::<Annotation>().is_err());
    }
}
