use crate::domain::ResponsiveVariants;

/// Extract the canonical asset identifier from a media-host URL: the path
/// after `/upload/`, minus a `v<digits>` version segment and the file
/// extension. Returns None when the URL has no `/upload/` segment.
pub fn extract_public_id(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("/upload/")?;
    let rest = rest
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or(rest);

    let mut segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();

    if matches!(segments.first(), Some(s) if is_version_segment(s)) {
        segments.remove(0);
    }

    let last = segments.pop()?;
    let stem = match last.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => last,
    };
    segments.push(stem);

    Some(segments.join("/"))
}

fn is_version_segment(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].chars().all(|c| c.is_ascii_digit())
}

/// Compose the fixed set of display URLs for a stored asset. Pure string
/// work; when the identifier cannot be extracted the original URL is
/// returned for every key instead of failing.
pub fn derive_responsive_variants(url: &str) -> ResponsiveVariants {
    let parts = url
        .split_once("/upload/")
        .and_then(|(base, _)| extract_public_id(url).map(|id| (base.to_string(), id)));

    match parts {
        Some((base, public_id)) => {
            let variant = |transform: &str| format!("{}/upload/{}/{}", base, transform, public_id);
            ResponsiveVariants {
                thumbnail: variant("w_150,h_150,c_fill,q_auto"),
                small: variant("w_400,c_limit,q_auto"),
                medium: variant("w_800,c_limit,q_auto"),
                large: variant("w_1600,c_limit,q_auto"),
                webp_small: variant("w_400,c_limit,q_auto,f_webp"),
                webp_medium: variant("w_800,c_limit,q_auto,f_webp"),
            }
        }
        None => ResponsiveVariants::passthrough(url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_skips_version_and_extension() {
        let url = "https://res.cloudinary.com/repset/image/upload/v1234567890/abc/def.jpg";
        assert_eq!(extract_public_id(url), Some("abc/def".to_string()));
    }

    #[test]
    fn test_extract_without_version_segment() {
        let url = "https://res.cloudinary.com/repset/image/upload/gym/floor.png";
        assert_eq!(extract_public_id(url), Some("gym/floor".to_string()));
    }

    #[test]
    fn test_extract_single_segment() {
        let url = "https://res.cloudinary.com/repset/image/upload/sample.jpg";
        assert_eq!(extract_public_id(url), Some("sample".to_string()));
    }

    #[test]
    fn test_extract_preserves_dotted_directories() {
        let url = "https://res.cloudinary.com/repset/image/upload/v99/a.b/c.webp";
        assert_eq!(extract_public_id(url), Some("a.b/c".to_string()));
    }

    #[test]
    fn test_extract_ignores_query_string() {
        let url = "https://res.cloudinary.com/repset/image/upload/v1/abc/def.jpg?_a=1";
        assert_eq!(extract_public_id(url), Some("abc/def".to_string()));
    }

    #[test]
    fn test_extract_rejects_url_without_upload_segment() {
        assert_eq!(extract_public_id("https://example.com/images/def.jpg"), None);
    }

    #[test]
    fn test_variants_compose_transform_urls() {
        let url = "https://res.cloudinary.com/repset/image/upload/v1234567890/abc/def.jpg";
        let variants = derive_responsive_variants(url);

        assert_eq!(
            variants.thumbnail,
            "https://res.cloudinary.com/repset/image/upload/w_150,h_150,c_fill,q_auto/abc/def"
        );
        assert_eq!(
            variants.webp_medium,
            "https://res.cloudinary.com/repset/image/upload/w_800,c_limit,q_auto,f_webp/abc/def"
        );
    }

    #[test]
    fn test_variants_passthrough_on_malformed_url() {
        let url = "https://example.com/images/def.jpg";
        let variants = derive_responsive_variants(url);

        assert_eq!(variants.thumbnail, url);
        assert_eq!(variants.small, url);
        assert_eq!(variants.medium, url);
        assert_eq!(variants.large, url);
        assert_eq!(variants.webp_small, url);
        assert_eq!(variants.webp_medium, url);
    }
}
