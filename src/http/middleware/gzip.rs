//! Pre-compressed tile detection.
//!
//! # Responsibilities
//! - Recognize binary tile and tileset manifest paths
//! - Read the first three bytes of the matching local file
//! - Mark gzip content with `Content-Encoding: gzip` before static serving
//!
//! # Design Decisions
//! - Any failure to open or read the file means "not gzip", never an error
//! - Paths that do not match are never opened
//! - Paths escaping the static root (`..`) are not sniffed

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::observability::metrics;

/// Leading bytes of a gzip stream using DEFLATE.
pub const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

/// Tile formats commonly stored gzip-compressed on disk.
pub const SNIFFED_EXTENSIONS: &[&str] = &[
    "m3d", "mcj", "b3dm", "pnts", "i3dm", "cmpt", "glb", "geom", "vctr",
];

/// Whether the (decoded) request path is a candidate for sniffing.
pub fn is_sniffed_path(path: &str) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let known_extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SNIFFED_EXTENSIONS.contains(&ext));

    known_extension || is_tileset_manifest(path)
}

/// `tileset` followed somewhere later by a trailing `.json`.
fn is_tileset_manifest(path: &str) -> bool {
    path.find("tileset")
        .is_some_and(|i| path[i + "tileset".len()..].ends_with(".json"))
}

/// Map a request path onto a file below `root`.
pub fn local_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    (!escapes).then(|| root.join(relative))
}

/// True when the file starts with [`GZIP_MAGIC`]. Short files are not gzip.
pub async fn starts_with_gzip_magic(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path).await?;
    let mut head = [0u8; GZIP_MAGIC.len()];
    let mut filled = 0;
    while filled < head.len() {
        let n = file.read(&mut head[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled == head.len() && head == GZIP_MAGIC)
}

/// Middleware: sniff, let the static service respond, then annotate.
pub async fn gzip_sniff(
    State(root): State<Arc<PathBuf>>,
    request: Request,
    next: Next,
) -> Response {
    let is_gzip = match sniff_target(&root, &request) {
        Some(path) => match starts_with_gzip_magic(&path).await {
            Ok(is_gzip) => {
                metrics::record_gzip_sniff(if is_gzip { "gzip" } else { "plain" });
                is_gzip
            }
            Err(e) => {
                tracing::trace!(path = %path.display(), error = %e, "Gzip sniff skipped");
                metrics::record_gzip_sniff("unreadable");
                false
            }
        },
        None => false,
    };

    let mut response = next.run(request).await;
    if is_gzip {
        response
            .headers_mut()
            .insert(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"));
    }
    response
}

fn sniff_target(root: &Path, request: &Request) -> Option<PathBuf> {
    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        return None;
    }
    let raw = request.uri().path();
    let decoded = urlencoding::decode(raw).ok()?;
    if !is_sniffed_path(&decoded) {
        return None;
    }
    local_path(root, &decoded)
}
