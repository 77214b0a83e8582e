use std::path::{Component, Path};

pub fn sanitize_filename(name: &str) -> String {
    let mut s = name.trim().to_string();
    let invalid = ['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\0'];
    for ch in invalid {
        s = s.replace(ch, "-");
    }
    s = s.replace(' ', "_");
    if s.len() > 100 {
        let mut cut = 100;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
    }
    if s.is_empty() {
        s = "file".into();
    }
    s
}

/// Extension for a stored avatar: the upload's own extension when it has one,
/// otherwise the first extension registered for its content type.
pub fn avatar_extension(original_filename: Option<&str>, content_type: Option<&str>) -> String {
    let from_name = original_filename
        .map(sanitize_filename)
        .and_then(|safe| {
            Path::new(&safe)
                .extension()
                .and_then(|s| s.to_str())
                .map(|s| s.to_ascii_lowercase())
        })
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    if let Some(ext) = from_name {
        return ext;
    }
    content_type
        .and_then(mime_guess::get_mime_extensions_str)
        .and_then(|exts| exts.first())
        .map(|ext| ext.to_string())
        .unwrap_or_else(|| "bin".into())
}

/// `avatars/{contact_id}/avatar_{timestamp}.{ext}`
pub fn avatar_relative_path(
    contact_id: i32,
    original_filename: Option<&str>,
    content_type: Option<&str>,
) -> String {
    let ts = chrono::Utc::now().format("%Y%m%d-%H%M%S%3f");
    let ext = avatar_extension(original_filename, content_type);
    format!("avatars/{contact_id}/avatar_{ts}.{ext}")
}

/// URL of a locally stored file served at `/api/uploads`.
pub fn local_avatar_url(public_base_url: Option<&str>, relative_path: &str) -> String {
    let relative = relative_path.trim_start_matches('/');
    match public_base_url {
        Some(base) => format!("{}/api/uploads/{}", base.trim_end_matches('/'), relative),
        None => format!("/api/uploads/{relative}"),
    }
}

/// Public origin of a bucket, without a trailing slash. Objects live at
/// `{origin}/{key}`.
pub fn s3_bucket_origin(
    endpoint: Option<&str>,
    region: Option<&str>,
    bucket: &str,
    path_style: bool,
) -> String {
    let region = region.unwrap_or("us-east-1");
    match endpoint.map(|e| e.trim_end_matches('/')) {
        Some(ep) if path_style => format!("{ep}/{bucket}"),
        Some(ep) => match ep.split_once("://") {
            Some((scheme, host)) => format!("{scheme}://{bucket}.{host}"),
            None => format!("https://{bucket}.{ep}"),
        },
        None if path_style => format!("https://s3.{region}.amazonaws.com/{bucket}"),
        None => format!("https://{bucket}.s3.{region}.amazonaws.com"),
    }
}

pub fn normalize_prefix(root: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    for comp in root.components() {
        if let Component::Normal(os) = comp {
            let s = os.to_string_lossy();
            if !s.is_empty() && s != "." {
                parts.push(s.replace('\\', "/"));
            }
        }
    }
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_separators_and_spaces() {
        assert_eq!(sanitize_filename("../my avatar.png"), "..-my_avatar.png");
        assert_eq!(sanitize_filename("   "), "file");
    }

    #[test]
    fn extension_prefers_filename_then_mime() {
        assert_eq!(avatar_extension(Some("me.JPG"), Some("image/png")), "jpg");
        assert_eq!(avatar_extension(Some("me"), Some("image/png")), "png");
        assert_eq!(avatar_extension(None, None), "bin");
    }

    #[test]
    fn relative_path_layout() {
        let rel = avatar_relative_path(7, Some("face.png"), Some("image/png"));
        assert!(rel.starts_with("avatars/7/avatar_"));
        assert!(rel.ends_with(".png"));
    }

    #[test]
    fn local_urls_are_relative_unless_base_is_set() {
        assert_eq!(
            local_avatar_url(Some("https://cdn.example.com/"), "/avatars/1/a.png"),
            "https://cdn.example.com/api/uploads/avatars/1/a.png"
        );
        assert_eq!(local_avatar_url(None, "avatars/1/a.png"), "/api/uploads/avatars/1/a.png");
    }

    #[test]
    fn bucket_origin_follows_addressing_style() {
        assert_eq!(
            s3_bucket_origin(Some("http://minio:9000/"), None, "avatars", true),
            "http://minio:9000/avatars"
        );
        assert_eq!(
            s3_bucket_origin(Some("https://storage.example.com"), None, "avatars", false),
            "https://avatars.storage.example.com"
        );
        assert_eq!(
            s3_bucket_origin(None, Some("eu-west-1"), "avatars", false),
            "https://avatars.s3.eu-west-1.amazonaws.com"
        );
        assert_eq!(
            s3_bucket_origin(None, None, "avatars", true),
            "https://s3.us-east-1.amazonaws.com/avatars"
        );
    }

    #[test]
    fn prefix_drops_dot_components() {
        assert_eq!(normalize_prefix(Path::new("./uploads/")), "uploads");
        assert_eq!(normalize_prefix(Path::new(".")), "");
    }
}
