//! Search option flags.

/// Options parsed from a flag string such as `"ibr"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// `i`: case-insensitive comparison.
    pub insensitive: bool,
    /// `b`: keywords must match whole words.
    pub word_boundaries: bool,
    /// `r`: descend into sub-directories.
    pub recursive: bool,
}

impl SearchOptions {
    /// Unknown flags are ignored.
    pub fn parse(flags: &str) -> Self {
        Self {
            insensitive: flags.contains('i'),
            word_boundaries: flags.contains('b'),
            recursive: flags.contains('r'),
        }
    }
}
