use super::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::path::{Component, Path, PathBuf};

pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Serves files from the configured static directory.
pub async fn serve_static(State(state): State<AppState>, uri: Uri) -> Response {
    let Some(relative) = static_path(uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let full = Path::new(&state.config.static_dir).join(&relative);
    match tokio::fs::read(&full).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&relative))], bytes).into_response(),
        Err(err) => {
            log::debug!("static {} not served: {}", full.display(), err);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Maps a request path onto a relative file path, refusing anything that escapes the root.
fn static_path(request_path: &str) -> Option<PathBuf> {
    let trimmed = request_path.trim_start_matches('/');
    let trimmed = if trimmed.is_empty() || trimmed.ends_with('/') {
        format!("{}index.html", trimmed)
    } else {
        trimmed.to_string()
    };

    let path = PathBuf::from(trimmed);
    if path
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        Some(path)
    } else {
        None
    }
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn state_with_root(root: &Path) -> AppState {
        let root = root.display().to_string();
        let config = Config::from_lookup(|key| match key {
            "STATIC_DIR" => Some(root.clone()),
            _ => None,
        })
        .unwrap();
        AppState::new(config).unwrap()
    }

    #[test]
    fn paths_are_confined_to_the_root() {
        assert_eq!(static_path("/"), Some(PathBuf::from("index.html")));
        assert_eq!(static_path("/script.js"), Some(PathBuf::from("script.js")));
        assert_eq!(static_path("/docs/"), Some(PathBuf::from("docs/index.html")));
        assert_eq!(static_path("/../secret"), None);
        assert_eq!(static_path("/a/../../b"), None);
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type(Path::new("index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type(Path::new("script.js")), "text/javascript; charset=utf-8");
        assert_eq!(content_type(Path::new("blob")), "application/octet-stream");
    }

    #[tokio::test]
    async fn favicon_is_empty() {
        assert_eq!(favicon().await, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn serves_index_and_misses_with_404() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>dashboard</h1>").unwrap();
        let state = state_with_root(dir.path());

        let hit = serve_static(State(state.clone()), Uri::from_static("/")).await;
        assert_eq!(hit.status(), StatusCode::OK);
        assert_eq!(
            hit.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );

        let miss = serve_static(State(state.clone()), Uri::from_static("/nope.js")).await;
        assert_eq!(miss.status(), StatusCode::NOT_FOUND);

        let escape = serve_static(State(state), Uri::from_static("/../Cargo.toml")).await;
        assert_eq!(escape.status(), StatusCode::NOT_FOUND);
    }
}
