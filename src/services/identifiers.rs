// src/services/identifiers.rs

/// Returned for tickers that have no entry in the registry table.
pub const UNKNOWN_ID: &str = "Unknown ID";

/// Ticker -> LEI of the issuer as used by the short-selling register.
/// Maintained by hand; matching is exact and case-sensitive.
static REGISTRY_IDS: &[(&str, &str)] = &[
    ("SBB-A.ST", "549300HX9MRFY47AH564"),
    ("SBB-B.ST", "549300HX9MRFY47AH564"),
    ("SBB-D.ST", "549300HX9MRFY47AH564"),
];

pub fn registry_id(ticker: &str) -> &'static str {
    REGISTRY_IDS
        .iter()
        .find(|(t, _)| *t == ticker)
        .map(|(_, id)| *id)
        .unwrap_or(UNKNOWN_ID)
}

pub fn is_known(id: &str) -> bool {
    id != UNKNOWN_ID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_tickers() {
        assert_eq!(registry_id("SBB-B.ST"), "549300HX9MRFY47AH564");
        assert_eq!(registry_id("ZZZZ.UNKNOWN"), UNKNOWN_ID);
        assert_eq!(registry_id("sbb-b.st"), UNKNOWN_ID);
        assert!(!is_known(registry_id("ZZZZ.UNKNOWN")));
    }
}
