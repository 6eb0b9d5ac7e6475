/// Build the absolute request URL for `url` against the configured API host.
///
/// Absolute URLs (anything containing `http://` or `https://`) are returned
/// untouched, so callers can reach arbitrary endpoints through an
/// authenticated session. Relative paths get the API version inserted unless
/// they already begin with `/<version>`.
pub fn normalize(url: &str, host: &str, version: &str) -> String {
    if url.contains("http://") || url.contains("https://") {
        return url.to_string();
    }

    let mut cleaned = host.trim_end_matches('/').to_string();
    if url.starts_with(&format!("/{}", version)) {
        cleaned.push_str(url);
    } else {
        cleaned.push('/');
        cleaned.push_str(version);
        cleaned.push_str(url);
    }

    cleaned
}
