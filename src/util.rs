/// Represents a countable item with properly pluralized log messages.
pub enum Counted<'a> {
    Regular { singular: &'a str, count: usize },
    Explicit { singular: &'a str, count: usize, plural: &'a str },
}

impl<'a> Counted<'a> {
    /// Creates a `Counted` with explicit singular and plural forms.
    pub fn new(count: usize, singular: &'a str, plural: &'a str) -> Self {
        Counted::Explicit { singular, plural, count }
    }

    /// Creates a `Counted` with a singular form, automatically pluralizing by
    /// adding "s".
    pub fn regular(count: usize, singular: &'a str) -> Self {
        Counted::Regular { singular, count }
    }
}

impl<'a> std::fmt::Display for Counted<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Counted::Explicit { singular, plural, count } => {
                write!(f, "{} {}", count, if *count == 1 { singular } else { plural })
            }
            Counted::Regular { singular, count } => {
                write!(f, "{} {}{}", count, singular, if *count == 1 { "" } else { "s" })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counted_display_regular() {
        let single = Counted::regular(1, "archive");
        let multiple = Counted::regular(3, "archive");
        assert_eq!(format!("{}", single), "1 archive");
        assert_eq!(format!("{}", multiple), "3 archives");
    }

    #[test]
    fn test_counted_display_explicit() {
        let single = Counted::new(1, "entry", "entries");
        let multiple = Counted::new(5, "entry", "entries");
        assert_eq!(format!("{}", single), "1 entry");
        assert_eq!(format!("{}", multiple), "5 entries");
    }
}
