/// Rewrite a GitHub blob page URL to its raw-content equivalent:
/// `https://github.com/{owner}/{repo}/blob/{ref}/{path}` becomes
/// `https://raw.githubusercontent.com/{owner}/{repo}/{ref}/{path}`.
/// Anything else is returned unchanged.
pub fn to_raw_url(url: &str) -> String {
    let Some(rest) = url.strip_prefix("https://github.com/") else {
        return url.to_string();
    };

    let mut parts = rest.splitn(4, '/');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(repo), Some("blob"), Some(tail))
            if !owner.is_empty() && !repo.is_empty() && !tail.is_empty() =>
        {
            format!("https://raw.githubusercontent.com/{owner}/{repo}/{tail}")
        }
        _ => url.to_string(),
    }
}
