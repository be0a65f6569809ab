//! Static asset serving for the solver UI

use crate::domain::response::GateResponse;
use crate::error::{GateError, GateResult};
use http::{HeaderValue, StatusCode, header};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Prefix under which the asset tree is exposed
pub const WEB_PREFIX: &str = "/web/";
pub const FAVICON_PATH: &str = "/favicon.ico";
const FAVICON_TARGET: &str = "img/favicon.ico";
const INDEX_FILE: &str = "index.html";

pub const STATIC_CSP: &str =
    "default-src 'self'; script-src 'self' 'unsafe-eval'; worker-src 'self';";
pub const STATIC_CACHE_CONTROL: &str = "max-age=30";

/// Whether the path belongs to the static asset tree
pub fn is_static_path(path: &str) -> bool {
    path == "/" || path == FAVICON_PATH || path.starts_with(WEB_PREFIX)
}

/// MIME type by file extension
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("html" | "htm") => "text/html;charset=utf-8",
        Some("js" | "mjs") => "text/javascript;charset=utf-8",
        Some("css") => "text/css;charset=utf-8",
        Some("json") => "application/json;charset=utf-8",
        Some("txt") => "text/plain;charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("wasm") => "application/wasm",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}

/// Map a request path onto a file under `root`
///
/// Any `..`, root or prefix component is refused, so the result never
/// leaves `root`.
pub fn resolve_asset_path(root: &Path, request_path: &str) -> GateResult<PathBuf> {
    let relative = if request_path == FAVICON_PATH {
        FAVICON_TARGET.to_string()
    } else {
        let raw = request_path.strip_prefix(WEB_PREFIX).unwrap_or("");
        urlencoding::decode(raw)
            .map_err(|_| GateError::DangerousPath)?
            .into_owned()
    };

    let mut resolved = root.to_path_buf();
    for component in Path::new(&relative).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(GateError::DangerousPath);
            }
        }
    }
    Ok(resolved)
}

/// Serve a static path
pub async fn serve(web_root: Option<&Path>, request_path: &str) -> GateResult<GateResponse> {
    if request_path == "/" {
        return Ok(GateResponse::new(StatusCode::PERMANENT_REDIRECT)
            .with_header(header::LOCATION, HeaderValue::from_static(WEB_PREFIX))
            .with_header(header::CACHE_CONTROL, HeaderValue::from_static("no-store")));
    }

    let Some(root) = web_root else {
        return Ok(GateResponse::new(StatusCode::NOT_FOUND));
    };

    let mut file_path = resolve_asset_path(root, request_path)?;

    match tokio::fs::metadata(&file_path).await {
        Ok(meta) if meta.is_dir() => {
            file_path.push(INDEX_FILE);
        }
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(GateResponse::new(StatusCode::NOT_FOUND));
        }
        Err(e) => return Err(GateError::StaticAsset(e)),
    }

    let body = match tokio::fs::read(&file_path).await {
        Ok(body) => body,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(GateResponse::new(StatusCode::NOT_FOUND));
        }
        Err(e) => return Err(GateError::StaticAsset(e)),
    };

    tracing::debug!(path = %file_path.display(), bytes = body.len(), "Serving static file");

    Ok(GateResponse::new(StatusCode::OK)
        .with_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type_for(&file_path)),
        )
        .with_header(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(STATIC_CSP),
        )
        .with_header(
            header::CACHE_CONTROL,
            HeaderValue::from_static(STATIC_CACHE_CONTROL),
        )
        .with_body(body))
}
