//! Request options parsed from query arguments.

/// Rendering options for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// `q`: omit the decorations around the answer.
    pub quiet: bool,
    /// `Q`: code only, comment lines removed.
    pub code_only: bool,
    /// `T`: no terminal escape sequences.
    pub no_terminal: bool,
    /// `C`: do not add explanatory comments.
    pub add_comments: bool,
    /// `style=NAME`: colour style for rich output.
    pub style: Option<String>,
    /// Preferred answer language.
    pub lang: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            quiet: false,
            code_only: false,
            no_terminal: false,
            add_comments: true,
            style: None,
            lang: None,
        }
    }
}

impl RequestOptions {
    /// Build options from decoded `(key, value)` query pairs.
    ///
    /// Flag keys are enabled unless their value is `false`/`False`.
    /// Several flags may share one key (`?qT`).
    pub fn from_args<'a, I>(args: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut options = Self::default();
        let mut flags = String::new();

        for (key, value) in args {
            match key {
                "style" => options.style = Some(value.to_string()).filter(|s| !s.is_empty()),
                "lang" => options.lang = Some(value.to_string()).filter(|s| !s.is_empty()),
                // Handled by the router.
                "topic" | "q" => {}
                _ if value == "false" || value == "False" => {}
                _ => flags.push_str(key),
            }
        }

        if flags.contains('q') {
            options.quiet = true;
        }
        if flags.contains('Q') {
            options.code_only = true;
        }
        if flags.contains('T') {
            options.no_terminal = true;
        }
        if flags.contains('C') {
            options.add_comments = false;
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let options = RequestOptions::from_args([("qT", ""), ("style", "monokai")]);
        assert!(options.quiet);
        assert!(options.no_terminal);
        assert!(!options.code_only);
        assert!(options.add_comments);
        assert_eq!(options.style.as_deref(), Some("monokai"));
    }

    #[test]
    fn test_false_value_disables_flag() {
        let options = RequestOptions::from_args([("Q", "false"), ("C", "")]);
        assert!(!options.code_only);
        assert!(!options.add_comments);
    }

    #[test]
    fn test_lang_argument() {
        let options = RequestOptions::from_args([("lang", "de")]);
        assert_eq!(options.lang.as_deref(), Some("de"));
        assert_eq!(RequestOptions::from_args([("lang", "")]).lang, None);
    }
}
