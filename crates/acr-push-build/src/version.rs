//! タグのバージョン推定

/// `X.Y.Z`（厳密な数値3要素）のみを semver とみなす
pub fn parse_semver(tag: &str) -> Option<(u64, u64, u64)> {
    let mut parts = tag.split('.');
    let mut next = || -> Option<u64> {
        let part = parts.next()?;
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        part.parse().ok()
    };

    let version = (next()?, next()?, next()?);
    if parts.next().is_some() {
        return None;
    }
    Some(version)
}

/// 既存タグの中で最大の semver
pub fn max_semver<S: AsRef<str>>(tags: &[S]) -> Option<(u64, u64, u64)> {
    tags.iter().filter_map(|t| parse_semver(t.as_ref())).max()
}

/// 次のタグ候補（patch, minor, major の順）
///
/// 桁あふれする候補は出さない。
pub fn suggest_tags<S: AsRef<str>>(existing: &[S]) -> Vec<String> {
    match max_semver(existing) {
        Some((major, minor, patch)) => [
            patch
                .checked_add(1)
                .map(|patch| format!("{}.{}.{}", major, minor, patch)),
            minor
                .checked_add(1)
                .map(|minor| format!("{}.{}.0", major, minor)),
            major.checked_add(1).map(|major| format!("{}.0.0", major)),
        ]
        .into_iter()
        .flatten()
        .collect(),
        None => vec!["0.0.1".to_string(), "0.1.0".to_string(), "1.0.0".to_string()],
    }
}
