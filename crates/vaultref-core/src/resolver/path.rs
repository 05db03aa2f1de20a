//! Secret path splitting

/// Split a secret path into `(mount, in-mount path)`
///
/// KV v2 paths conventionally embed a `data` segment between the mount
/// and the secret: `secret/data/myapp` is mount `secret`, path `myapp`.
/// The split recognizes that convention when the second segment is
/// literally `data` and at least three segments exist; otherwise the
/// first segment is the mount and the rest is the path. A single-segment
/// path has no mount (the resolver substitutes the configured default).
pub fn split_secret_path(path: &str) -> (String, String) {
    let trimmed = path.trim_matches('/');
    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

    match segments.len() {
        0 => (String::new(), String::new()),
        1 => (String::new(), segments[0].to_string()),
        _ => {
            if segments.len() >= 3 && segments[1] == "data" {
                (segments[0].to_string(), segments[2..].join("/"))
            } else {
                (segments[0].to_string(), segments[1..].join("/"))
            }
        }
    }
}
