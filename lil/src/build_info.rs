//! Version metadata injected at build time through `LIL_VERSION` and `LIL_BUILD_TIME`.
//! Builds without `LIL_VERSION` report the crate version.

const VERSION: Option<&str> = option_env!("LIL_VERSION");
const BUILD_TIME: Option<&str> = option_env!("LIL_BUILD_TIME");

pub fn version() -> &'static str {
    resolve_version(VERSION)
}

fn resolve_version(version: Option<&str>) -> &str {
    version
        .filter(|v| !v.is_empty())
        .unwrap_or(env!("CARGO_PKG_VERSION"))
}

pub fn version_line() -> String {
    format_version(VERSION, BUILD_TIME)
}

fn format_version(version: Option<&str>, build_time: Option<&str>) -> String {
    format!(
        "Lil version {} (built at {})",
        resolve_version(version),
        build_time.filter(|t| !t.is_empty()).unwrap_or("unknown")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_builds_report_version_and_time() {
        assert_eq!(
            format_version(Some("0.1.0"), Some("2024-05-01T10:00:00Z")),
            "Lil version 0.1.0 (built at 2024-05-01T10:00:00Z)"
        );
        assert_eq!(
            format_version(Some("0.1.0"), None),
            "Lil version 0.1.0 (built at unknown)"
        );
    }

    #[test]
    fn unset_version_falls_back_to_crate_version() {
        let expected = format!(
            "Lil version {} (built at unknown)",
            env!("CARGO_PKG_VERSION")
        );
        assert_eq!(format_version(None, None), expected);
        assert_eq!(format_version(Some(""), Some("")), expected);
    }
}
