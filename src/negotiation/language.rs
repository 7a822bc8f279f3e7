//! Answer language selection.
//!
//! Precedence: `lang` query argument, then the `<lang>.<site suffix>` host
//! convention, then the first `Accept-Language` entry.

/// Parse an `Accept-Language` header into `(locale, weight)` pairs.
///
/// Entries without a `q=` qualifier get weight `"1"`. Entries whose
/// qualifier has no `=` are dropped.
pub fn parse_accept_language(header: &str) -> Vec<(String, String)> {
    header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let locale = parts.next()?.trim();
            match parts.next() {
                None => Some((locale.to_string(), "1".to_string())),
                Some(qualifier) => {
                    let (_, weight) = qualifier.split_once('=')?;
                    Some((locale.to_string(), weight.to_string()))
                }
            }
        })
        .collect()
}

/// Primary subtag of the first accepted locale.
fn first_primary_subtag(accepted: &[(String, String)]) -> Option<String> {
    let (locale, _) = accepted.first()?;
    let primary = locale.split('-').next().unwrap_or(locale);
    Some(primary.to_string()).filter(|l| !l.is_empty())
}

/// Language encoded in the host name, e.g. `de.cheat.sh` → `de`.
pub fn language_from_host(host: &str, site_suffix: &str) -> Option<String> {
    if site_suffix.is_empty() {
        return None;
    }
    host.strip_suffix(site_suffix)
        .filter(|prefix| !prefix.is_empty())
        .map(|prefix| prefix.to_string())
}

/// Select the preferred answer language.
pub fn answer_language(
    host: Option<&str>,
    lang_arg: Option<&str>,
    accept_language: Option<&str>,
    site_suffix: &str,
) -> Option<String> {
    if let Some(lang) = lang_arg.filter(|l| !l.is_empty()) {
        return Some(lang.to_string());
    }

    if let Some(lang) = host.and_then(|h| language_from_host(h, site_suffix)) {
        return Some(lang);
    }

    accept_language
        .filter(|h| !h.is_empty())
        .and_then(|h| first_primary_subtag(&parse_accept_language(h)))
}
