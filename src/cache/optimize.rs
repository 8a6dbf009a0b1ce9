//! CDN URL rewriting
//!
//! Some image hosts serve a downscaled variant when asked. Meal thumbnails
//! never need the full upload, so known hosts get a smaller variant.

/// Query appended to Firebase Storage URLs
const FIREBASE_PARAMS: &str = "quality=80&size=600";

/// Transformation segment inserted into Cloudinary upload URLs
const CLOUDINARY_TRANSFORM: &str = "/upload/q_auto,w_600/";

/// Rewrite `url` to request a smaller variant where the host supports it
///
/// Local files and non-HTTP strings are returned unchanged.
pub fn optimize_uri(url: &str) -> String {
    if url.starts_with("file:") || !url.contains("http") {
        return url.to_string();
    }

    if url.contains("firebasestorage.googleapis.com") {
        let separator = if url.contains('?') { '&' } else { '?' };
        return format!("{}{}{}", url, separator, FIREBASE_PARAMS);
    }

    if url.contains("cloudinary.com") && !url.contains(CLOUDINARY_TRANSFORM) {
        return url.replacen("/upload/", CLOUDINARY_TRANSFORM, 1);
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_files_untouched() {
        assert_eq!(optimize_uri("file:///data/a.jpg"), "file:///data/a.jpg");
        assert_eq!(optimize_uri("asset://placeholder.png"), "asset://placeholder.png");
    }

    #[test]
    fn firebase_gets_query() {
        assert_eq!(
            optimize_uri("https://firebasestorage.googleapis.com/v0/b/x/o/a.jpg"),
            "https://firebasestorage.googleapis.com/v0/b/x/o/a.jpg?quality=80&size=600"
        );
        assert_eq!(
            optimize_uri("https://firebasestorage.googleapis.com/v0/b/x/o/a.jpg?alt=media"),
            "https://firebasestorage.googleapis.com/v0/b/x/o/a.jpg?alt=media&quality=80&size=600"
        );
    }

    #[test]
    fn cloudinary_gets_transform() {
        assert_eq!(
            optimize_uri("https://res.cloudinary.com/demo/image/upload/meal.jpg"),
            "https://res.cloudinary.com/demo/image/upload/q_auto,w_600/meal.jpg"
        );
    }

    #[test]
    fn cloudinary_rewrite_is_idempotent() {
        let once = optimize_uri("https://res.cloudinary.com/demo/image/upload/meal.jpg");
        assert_eq!(optimize_uri(&once), once);
    }

    #[test]
    fn other_hosts_untouched() {
        assert_eq!(
            optimize_uri("https://cdn.example/a.jpg"),
            "https://cdn.example/a.jpg"
        );
    }
}
