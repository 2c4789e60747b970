/// Returns `true` if the HTTP status code indicates a redirect.
///
/// # Recognized Redirect Codes
///
/// - 301: Moved Permanently
/// - 302: Found
/// - 303: See Other
/// - 307: Temporary Redirect
/// - 308: Permanent Redirect
///
/// # Examples
///
/// ```
/// use vetch_fetch::is_redirect;
///
/// assert!(is_redirect(301));
/// assert!(is_redirect(302));
/// assert!(!is_redirect(200));
/// assert!(!is_redirect(404));
/// ```
pub fn is_redirect(status: u16) -> bool { matches!(status, 301 | 302 | 303 | 307 | 308) }

/// Parse a `Content-Length` header value as an unsigned byte count.
///
/// Returns `None` for anything that is not a plain non-negative 64-bit
/// integer, including signs and embedded whitespace.
///
/// ```
/// use vetch_fetch::parse_content_length;
///
/// assert_eq!(parse_content_length("1048576"), Some(1_048_576));
/// assert_eq!(parse_content_length(" 0 "), Some(0));
/// assert_eq!(parse_content_length("-1"), None);
/// ```
pub fn parse_content_length(value: &str) -> Option<u64> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
