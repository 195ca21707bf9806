// lil-net/src/validation.rs
use std::fs::File;
use std::io;
use std::path::Path;

use lil_common::error::{LilError, Result};
use sha2::{Digest, Sha256};
use url::{Host, Url};

/// SHA-256 of a file as lowercase hex.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let bytes_copied = io::copy(&mut file, &mut hasher)?;
    let actual = hex::encode(hasher.finalize());
    tracing::debug!(
        "Calculated SHA256 for {}: {} ({} bytes read)",
        path.display(),
        actual,
        bytes_copied
    );
    Ok(actual)
}

pub fn verify_checksum(path: &Path, expected: &str) -> Result<()> {
    tracing::debug!("Verifying checksum for: {}", path.display());
    let actual = sha256_file(path)?;
    tracing::debug!("Expected SHA256:   {}", expected);
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(LilError::ChecksumError(format!(
            "Checksum mismatch for {}: expected {}, got {}",
            path.display(),
            expected,
            actual
        )))
    }
}

/// Validates an API URL: https is required, plain http only for loopback hosts.
pub fn validate_url(url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str)
        .map_err(|e| LilError::ValidationError(format!("Failed to parse URL '{url_str}': {e}")))?;
    match url.scheme() {
        "https" => Ok(url),
        "http" if is_loopback(&url) => {
            tracing::debug!("Allowing plain http for loopback URL {}", url);
            Ok(url)
        }
        scheme => Err(LilError::ValidationError(format!(
            "Invalid URL scheme for '{url_str}': Must be https, but got '{scheme}'"
        ))),
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(d)) => d.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn https_urls_are_accepted() {
        assert!(validate_url("https://api.linear.app/graphql").is_ok());
    }

    #[test]
    fn http_only_for_loopback() {
        assert!(validate_url("http://127.0.0.1:8080/graphql").is_ok());
        assert!(validate_url("http://localhost/graphql").is_ok());
        assert!(matches!(
            validate_url("http://api.linear.app/graphql"),
            Err(LilError::ValidationError(_))
        ));
        assert!(validate_url("not a url").is_err());
    }

    #[test]
    fn checksum_matches_known_digest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();
        let expected = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
        assert_eq!(sha256_file(file.path()).unwrap(), expected);
        assert!(verify_checksum(file.path(), &expected.to_uppercase()).is_ok());
        assert!(matches!(
            verify_checksum(file.path(), "00"),
            Err(LilError::ChecksumError(_))
        ));
    }
}
