use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Reasons a URL is refused.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("Private IP address not allowed: {0}")]
    PrivateIp(String),
    #[error("Localhost not allowed")]
    Localhost,
    #[error("HTTPS required (plain HTTP is only allowed for localhost)")]
    InsecureScheme,
}

/// Validate an article source link before handing it to the system browser.
///
/// Source links are produced by the model, so they are treated as untrusted:
/// only http(s) is accepted, and links into localhost or private networks
/// are refused.
pub fn validate_source_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if let Some(host) = url.host_str() {
        if host.eq_ignore_ascii_case("localhost") {
            return Err(UrlValidationError::Localhost);
        }
        if let Some(ip) = host_ip(host) {
            if ip.is_loopback() {
                return Err(UrlValidationError::Localhost);
            }
            if is_private_ip(&ip) {
                return Err(UrlValidationError::PrivateIp(ip.to_string()));
            }
        }
    }

    Ok(url)
}

/// Validate an API base URL: HTTPS, or plain HTTP on a loopback host.
pub fn validate_api_base(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;
    match url.scheme() {
        "https" => Ok(url),
        "http" if is_loopback_host(&url) => Ok(url),
        "http" => Err(UrlValidationError::InsecureScheme),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}

/// True when the URL host is `localhost` or a loopback address.
pub fn is_loopback_host(url: &Url) -> bool {
    match url.host_str() {
        Some(host) if host.eq_ignore_ascii_case("localhost") => true,
        Some(host) => host_ip(host).is_some_and(|ip| ip.is_loopback()),
        None => false,
    }
}

fn host_ip(host: &str) -> Option<IpAddr> {
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
        .parse()
        .ok()
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            v6.is_loopback()
                || v6.is_unspecified()
                // fc00::/7 unique local, fe80::/10 link local
                || (first & 0xfe00) == 0xfc00
                || (first & 0xffc0) == 0xfe80
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_sources_accepted() {
        let url = validate_source_url("https://www.reuters.com/world/some-story").unwrap();
        assert_eq!(url.host_str(), Some("www.reuters.com"));
        assert!(validate_source_url("http://news.example.org").is_ok());
        assert!(validate_source_url("  https://example.com/padded  ").is_ok());
    }

    #[test]
    fn test_non_http_schemes_rejected() {
        assert!(matches!(
            validate_source_url("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(validate_source_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_local_targets_rejected() {
        assert!(matches!(
            validate_source_url("http://localhost/x"),
            Err(UrlValidationError::Localhost)
        ));
        assert!(matches!(
            validate_source_url("http://127.0.0.1/x"),
            Err(UrlValidationError::Localhost)
        ));
        assert!(validate_source_url("http://[::1]/x").is_err());
        assert!(matches!(
            validate_source_url("http://192.168.1.10/router"),
            Err(UrlValidationError::PrivateIp(_))
        ));
        assert!(validate_source_url("http://10.0.0.1/").is_err());
        assert!(validate_source_url("http://169.254.169.254/latest").is_err());
        assert!(validate_source_url("http://[fd00::1]/").is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            validate_source_url("not a url"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
        assert!(validate_source_url("").is_err());
    }

    #[test]
    fn test_api_base_rules() {
        assert!(validate_api_base("https://generativelanguage.googleapis.com").is_ok());
        assert!(validate_api_base("http://127.0.0.1:8080").is_ok());
        assert!(validate_api_base("http://localhost:3000").is_ok());
        assert!(matches!(
            validate_api_base("http://evil.example.com"),
            Err(UrlValidationError::InsecureScheme)
        ));
        assert!(validate_api_base("ftp://example.com").is_err());
    }
}
