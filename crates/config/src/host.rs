//! Host input parsing (bare names and `http(s)://` URLs).

use crate::env::ENV_CHROMA_HOST;
use crate::error::ConfigError;
use url::{Host, Url};

/// URL scheme accepted for URL-form hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlScheme {
    /// `http://`
    Http,
    /// `https://`
    Https,
}

impl UrlScheme {
    /// True for `https`.
    #[must_use]
    pub const fn is_tls(self) -> bool {
        matches!(self, Self::Https)
    }
}

/// Tagged result of parsing the host input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostInput {
    /// Hostname without a scheme, used verbatim.
    Bare(Box<str>),
    /// URL-form host.
    Url {
        /// Parsed scheme.
        scheme: UrlScheme,
        /// Hostname without brackets or port.
        host: Box<str>,
        /// Port written in the URL, if any.
        port: Option<u16>,
    },
}

impl HostInput {
    /// Classify and parse a host input.
    ///
    /// Only the exact lowercase prefixes `http://` and `https://` mark a URL.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let scheme = if raw.starts_with("https://") {
            UrlScheme::Https
        } else if raw.starts_with("http://") {
            UrlScheme::Http
        } else {
            return Ok(Self::Bare(raw.into()));
        };

        let invalid = |reason: String| ConfigError::InvalidHostUrl {
            var: ENV_CHROMA_HOST,
            value: raw.to_owned(),
            reason,
        };

        let url = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
        let host = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_owned(),
            Some(Host::Ipv4(address)) => address.to_string(),
            Some(Host::Ipv6(address)) => address.to_string(),
            _ => return Err(invalid("missing host".to_owned())),
        };

        let port = explicit_port(raw, &url);
        if port == Some(0) {
            return Err(ConfigError::PortOutOfRange {
                var: ENV_CHROMA_HOST,
                value: raw.to_owned(),
            });
        }

        Ok(Self::Url {
            scheme,
            host: host.into_boxed_str(),
            port,
        })
    }
}

/// Port written in the authority, including scheme-default ports that `Url`
/// normalizes away.
fn explicit_port(raw: &str, url: &Url) -> Option<u16> {
    if let Some(port) = url.port() {
        return Some(port);
    }

    let authority = raw
        .split_once("://")
        .map_or(raw, |(_, rest)| rest)
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);
    let after_host = host_port
        .rsplit_once(']')
        .map_or(host_port, |(_, tail)| tail);
    let (_, port_text) = after_host.rsplit_once(':')?;

    if port_text.is_empty() {
        None
    } else {
        url.port_or_known_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hosts_pass_through() -> Result<(), ConfigError> {
        assert_eq!(
            HostInput::parse("chroma.internal")?,
            HostInput::Bare("chroma.internal".into())
        );
        // Prefix matching is case-sensitive.
        assert_eq!(
            HostInput::parse("HTTPS://example.com")?,
            HostInput::Bare("HTTPS://example.com".into())
        );
        Ok(())
    }

    #[test]
    fn url_hosts_split_into_parts() -> Result<(), ConfigError> {
        assert_eq!(
            HostInput::parse("https://example.com:9000/base")?,
            HostInput::Url {
                scheme: UrlScheme::Https,
                host: "example.com".into(),
                port: Some(9000),
            }
        );
        assert_eq!(
            HostInput::parse("http://10.0.0.5")?,
            HostInput::Url {
                scheme: UrlScheme::Http,
                host: "10.0.0.5".into(),
                port: None,
            }
        );
        assert_eq!(
            HostInput::parse("http://[::1]:8000")?,
            HostInput::Url {
                scheme: UrlScheme::Http,
                host: "::1".into(),
                port: Some(8000),
            }
        );
        Ok(())
    }

    #[test]
    fn scheme_default_ports_count_as_explicit() -> Result<(), ConfigError> {
        assert!(matches!(
            HostInput::parse("http://example.com:80")?,
            HostInput::Url { port: Some(80), .. }
        ));
        assert!(matches!(
            HostInput::parse("https://example.com:443/")?,
            HostInput::Url { port: Some(443), .. }
        ));
        assert!(matches!(
            HostInput::parse("https://example.com:")?,
            HostInput::Url { port: None, .. }
        ));
        Ok(())
    }

    #[test]
    fn malformed_urls_are_config_errors() {
        for raw in ["http://", "https://example.com:99999", "http://exa mple.com"] {
            assert!(
                matches!(
                    HostInput::parse(raw),
                    Err(ConfigError::InvalidHostUrl { .. })
                ),
                "{raw} should fail"
            );
        }
    }

    #[test]
    fn url_port_zero_is_out_of_range() {
        for raw in ["https://example.com:0", "http://10.0.0.1:00/"] {
            assert!(
                matches!(
                    HostInput::parse(raw),
                    Err(ConfigError::PortOutOfRange { .. })
                ),
                "{raw} should fail"
            );
        }
    }
}
