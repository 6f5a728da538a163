//! Content-type lookup for the static pages served next to the API.

/// Map a lowercased file extension to its MIME content type.
/// TypeScript sources are served as JavaScript for the dev-mode pages.
pub fn content_type_for_ext(ext: Option<&str>) -> &'static str {
    match ext {
        Some("css") => "text/css; charset=utf-8",
        Some("html") => "text/html; charset=utf-8",
        Some("js") | Some("ts") => "text/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("txt") => "text/plain; charset=utf-8",
        Some("webp") => "image/webp",
        Some("mp4") => "video/mp4",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
