/// Static page serving: route aliases, dist-first lookup, traversal guard.

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use cardbox_core::media::content_type_for_ext;
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

use crate::api::{api_error, insert_header_safe};
use crate::state::AppState;

/// Short page routes and the files they map to.
const ROUTE_ALIASES: &[(&str, &str)] = &[
    ("/", "/index.html"),
    ("/admin", "/admin.html"),
    ("/roadmap", "/roadmap.html"),
    ("/lecture0", "/lecture0.html"),
    ("/lecture1", "/lecture1.html"),
    ("/lecture2", "/lecture2.html"),
    ("/lecture3", "/lecture3.html"),
    ("/lecture4", "/lecture4.html"),
    ("/lecture5", "/lecture5.html"),
    ("/lecture6", "/lecture6.html"),
];

#[derive(Debug, PartialEq, Eq)]
pub enum StaticError {
    /// The decoded path tries to leave the served directories.
    Forbidden,
}

/// Where static files come from: the production build first, then the project root.
#[derive(Debug, Clone)]
pub struct StaticSite {
    root_dir: PathBuf,
    dist_dir: PathBuf,
}

impl StaticSite {
    pub fn new(root_dir: PathBuf, dist_dir: PathBuf) -> Self {
        Self { root_dir, dist_dir }
    }

    /// Map a raw request path to the file that should answer it.
    pub fn resolve(&self, request_path: &str) -> Result<PathBuf, StaticError> {
        let decoded = percent_decode_str(request_path).decode_utf8_lossy();
        let path = resolve_alias(&decoded);

        if has_path_traversal(path) {
            return Err(StaticError::Forbidden);
        }

        let relative = path.trim_start_matches('/');
        let dist_path = self.dist_dir.join(relative);
        if dist_path.is_file() {
            return Ok(dist_path);
        }
        Ok(self.root_dir.join(relative))
    }
}

/// Look up a route alias, returning the path unchanged if there is none.
pub fn resolve_alias(path: &str) -> &str {
    ROUTE_ALIASES
        .iter()
        .find(|(route, _)| *route == path)
        .map(|(_, file)| *file)
        .unwrap_or(path)
}

/// Reject parent-directory segments, backslashes and NUL bytes in a decoded path.
fn has_path_traversal(path: &str) -> bool {
    path.contains('\\')
        || path.contains('\0')
        || path.split('/').any(|segment| segment == "..")
}

/// Router fallback: serve any non-API GET/HEAD path from disk.
pub async fn serve_static(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return api_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "cardbox.static",
            "Method Not Allowed",
            None,
        )
        .into_response();
    }

    let file_path = match state.site.resolve(uri.path()) {
        Ok(path) => path,
        Err(StaticError::Forbidden) => {
            return api_error(
                StatusCode::FORBIDDEN,
                "cardbox.static",
                "Forbidden",
                Some(uri.path().to_string()),
            )
            .into_response();
        }
    };

    let data = match std::fs::read(&file_path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!(target: "cardbox.static", "No file for {}", uri.path());
            return (StatusCode::NOT_FOUND, "Not Found").into_response();
        }
        Err(e) => {
            log::error!(
                target: "cardbox.static",
                "Failed to read {}: {}",
                file_path.display(),
                e
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Error").into_response();
        }
    };

    let mut headers = HeaderMap::new();
    insert_header_safe(&mut headers, "content-type", content_type_for(&file_path));
    insert_header_safe(&mut headers, "cache-control", "no-cache");
    (StatusCode::OK, headers, data).into_response()
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase());
    content_type_for_ext(ext.as_deref())
}
