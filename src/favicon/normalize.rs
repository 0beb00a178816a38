use url::Url;

const DEFAULT_SCHEME: &str = "http";

/// Scheme, host and path of a URL. Query and fragment are never kept.
///
/// `host` carries the port when the input has one (`example.com:8080`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedUrl {
    pub scheme: String,
    pub host: String,
    pub path: String,
}

impl ResolvedUrl {
    /// Canonicalize `input` into scheme + host + path.
    ///
    /// - a missing scheme defaults to `http`
    /// - input without a scheme marker (`example.com/page`) is read as a bare
    ///   host; its path is dropped
    /// - protocol-relative input (`//example.com/x`) gets the default scheme
    ///
    /// Never fails: unparseable input ends up with an empty host, which simply
    /// won't fetch.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        if let Some((scheme, rest)) = input.split_once("://").filter(|(s, _)| is_scheme(s)) {
            return match Url::parse(input) {
                Ok(parsed) => Self::from_url(&parsed, has_path(rest)),
                Err(err) => {
                    log::debug!("{input}: unparseable url: {err}");
                    Self {
                        scheme: scheme.to_ascii_lowercase(),
                        ..Default::default()
                    }
                }
            };
        }

        let rest = input.strip_prefix("//").unwrap_or(input);
        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();

        match Url::parse(&format!("{DEFAULT_SCHEME}://{host}")) {
            Ok(parsed) => Self {
                path: String::new(),
                ..Self::from_url(&parsed, false)
            },
            Err(err) => {
                log::debug!("{input}: unparseable url: {err}");
                Self {
                    scheme: DEFAULT_SCHEME.to_string(),
                    ..Default::default()
                }
            }
        }
    }

    /// `url` always reports at least `/` as the path; `had_path` tells whether
    /// the input actually spelled one out.
    fn from_url(parsed: &Url, had_path: bool) -> Self {
        let mut host = parsed.host_str().unwrap_or_default().to_string();
        if let Some(port) = parsed.port() {
            host = format!("{host}:{port}");
        }

        let path = match parsed.path() {
            "/" if !had_path => String::new(),
            p => p.to_string(),
        };

        Self {
            scheme: parsed.scheme().to_string(),
            host,
            path,
        }
    }

    /// `scheme://host`, the base that site-relative icon links hang off.
    pub fn root_origin(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }
}

impl std::fmt::Display for ResolvedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.host, self.path)
    }
}

/// Whether the part after `scheme://` carries a path before any query or fragment.
fn has_path(rest: &str) -> bool {
    rest.find(['/', '?', '#'])
        .is_some_and(|idx| rest[idx..].starts_with('/'))
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Normalize a URL to `scheme://host/path`, dropping query and fragment.
pub fn normalize_url(url: &str) -> String {
    ResolvedUrl::parse(url).to_string()
}

/// Scheme and host of the normalized `url`.
pub fn root_origin(url: &str) -> String {
    ResolvedUrl::parse(url).root_origin()
}
