//! Shared User-Agent strings for probe and metadata HTTP clients.
//!
//! Single source for project URL and UA format so probe and API traffic
//! stay consistent and easy to update (good citizenship; RFC 9308).

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/nicksrandall/seqref";

/// Default User-Agent for liveness probes (identifies the tool).
#[must_use]
pub(crate) fn default_probe_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("seqref/{version} (research-tool; +{PROJECT_UA_URL})")
}

/// Default User-Agent for archive metadata API requests (same shared
/// format; no per-validator name in the header).
#[must_use]
pub(crate) fn default_api_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("seqref/{version} (metadata-fetch; +{PROJECT_UA_URL})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_format_consistency() {
        let probe_ua = default_probe_user_agent();
        let api_ua = default_api_user_agent();
        assert!(probe_ua.contains(PROJECT_UA_URL));
        assert!(api_ua.contains(PROJECT_UA_URL));
        assert!(probe_ua.starts_with(&format!("seqref/{}", env!("CARGO_PKG_VERSION"))));
        assert!(api_ua.starts_with(&format!("seqref/{}", env!("CARGO_PKG_VERSION"))));
    }
}
