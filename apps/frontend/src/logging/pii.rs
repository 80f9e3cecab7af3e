use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Email addresses: the local part is masked down to its first character.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
});

/// Bearer tokens in compact form: three base64url segments joined by dots.
static COMPACT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]*").unwrap()
});

/// Masks emails and bearer tokens before they reach a log sink.
///
/// Tokens are replaced first so the email pass never sees token fragments.
pub fn redact(input: &str) -> String {
    let without_tokens = COMPACT_TOKEN.replace_all(input, "[REDACTED_TOKEN]");

    EMAIL
        .replace_all(&without_tokens, |caps: &regex::Captures| {
            let found = &caps[0];
            match found.split_once('@') {
                Some((local, domain)) => match local.chars().next() {
                    Some(first) => format!("{first}***@{domain}"),
                    None => format!("@{domain}"),
                },
                None => found.to_string(),
            }
        })
        .into_owned()
}

/// Display wrapper that applies [`redact`] lazily, for use in `tracing` fields.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
