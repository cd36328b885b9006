use crate::catalog::{Catalog, Fingerprint};

/// Return the first fingerprint, in catalog order, with a signature present
/// in `response`. Pure: no I/O, no shared state.
///
/// `response` is expected to be the case-folded dump of status line, headers
/// and body; signatures match case-insensitively either way. The status code
/// plays no part.
pub fn match_response<'a>(response: &str, catalog: &'a Catalog) -> Option<&'a Fingerprint> {
    catalog.iter().find(|fp| fp.matches(response))
}
