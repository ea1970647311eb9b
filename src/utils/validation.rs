use crate::error::StowageError;
use std::path::Path;

/// MIME types the compression service accepts
pub const COMPRESSIBLE_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/gif",
    "image/png",
    "image/bmp",
    "image/svg+xml",
];

/// Validates file size against maximum limit
pub fn validate_file_size(size: usize, max_size: usize) -> Result<(), StowageError> {
    if size > max_size {
        return Err(StowageError::PayloadTooLarge(format!(
            "File size {} bytes exceeds maximum allowed {} bytes ({} MB)",
            size,
            max_size,
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Strips parameters and lowercases a content type ("Image/PNG; q=1" -> "image/png")
pub fn normalize_mime(content_type: &str) -> String {
    content_type
        .parse::<mime::Mime>()
        .map(|m| m.essence_str().to_ascii_lowercase())
        .unwrap_or_else(|_| {
            content_type
                .split(';')
                .next()
                .unwrap_or("")
                .trim()
                .to_ascii_lowercase()
        })
}

/// Whether the compression service can handle this content type
pub fn is_compressible_mime(content_type: &str) -> bool {
    let normalized = normalize_mime(content_type);
    COMPRESSIBLE_MIME_TYPES
        .iter()
        .any(|&allowed| allowed == normalized)
}

/// Sniffs a content type from the leading bytes of a file
pub fn sniff_mime(header: &[u8]) -> Option<&'static str> {
    infer::get(header).map(|kind| kind.mime_type())
}

/// Sanitizes a filename to prevent path traversal and injection attacks.
/// Returns the sanitized filename or an error if the name is invalid.
pub fn sanitize_file_name(file_name: &str) -> Result<String, StowageError> {
    // Get only the filename component (remove any path)
    let name = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if name.is_empty() {
        return Err(StowageError::InvalidFileName(
            "Filename cannot be empty".to_string(),
        ));
    }

    // Check for path traversal attempts
    if file_name.contains("..") || file_name.contains('/') || file_name.contains('\\') {
        tracing::warn!("Path traversal attempt detected: {}", file_name);
    }

    // Remove dangerous characters, keep only safe ones
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_control()
                || c == '/'
                || c == '\\'
                || c == ':'
                || c == '*'
                || c == '?'
                || c == '"'
                || c == '<'
                || c == '>'
                || c == '|'
                || c == ';'
            {
                '_'
            } else {
                c
            }
        })
        .collect();

    // Limit length safely for UTF-8
    let sanitized = if sanitized.len() > 255 {
        let mut end = 255;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        sanitized[..end].to_string()
    } else {
        sanitized
    };

    // Prevent hidden files
    if sanitized.starts_with('.') {
        return Err(StowageError::InvalidFileName(
            "Hidden files (starting with '.') are not allowed".to_string(),
        ));
    }

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_size() {
        let max = 256 * 1024 * 1024;
        assert!(validate_file_size(1024, max).is_ok());
        assert!(validate_file_size(max, max).is_ok());
        assert!(validate_file_size(max + 1, max).is_err());
    }

    #[test]
    fn test_normalize_mime() {
        assert_eq!(normalize_mime("image/png"), "image/png");
        assert_eq!(normalize_mime("Image/JPEG; charset=binary"), "image/jpeg");
        assert_eq!(normalize_mime(" image/gif "), "image/gif");
    }

    #[test]
    fn test_is_compressible_mime() {
        assert!(is_compressible_mime("image/jpeg"));
        assert!(is_compressible_mime("image/png"));
        assert!(is_compressible_mime("image/svg+xml"));
        assert!(is_compressible_mime("IMAGE/PNG"));

        assert!(!is_compressible_mime("image/webp"));
        assert!(!is_compressible_mime("application/pdf"));
        assert!(!is_compressible_mime("video/mp4"));
    }

    #[test]
    fn test_sniff_mime() {
        assert_eq!(sniff_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]), Some("image/png"));
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff_mime(b"plain text"), None);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("test.pdf").unwrap(), "test.pdf");
        assert_eq!(sanitize_file_name("my photo.jpg").unwrap(), "my photo.jpg");
        assert_eq!(
            sanitize_file_name("test<script>.png").unwrap(),
            "test_script_.png"
        );
        assert_eq!(sanitize_file_name("测试.png").unwrap(), "测试.png");

        // Path traversal
        assert_eq!(sanitize_file_name("../../../etc/passwd").unwrap(), "passwd");

        // Hidden files
        assert!(sanitize_file_name(".htaccess").is_err());
        assert!(sanitize_file_name("").is_err());
    }
}
