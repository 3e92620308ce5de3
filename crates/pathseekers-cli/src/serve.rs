//! Static file server for the launcher page and the module build.
//!
//! Pre-compressed build artifacts (`BuildWeb.wasm.br`, `BuildWeb.data.gz`)
//! are served with `Content-Encoding` and the content type of the inner file
//! so the browser can decompress them transparently.

use std::fs;
use std::path::{Component, Path, PathBuf};
use tiny_http::{Header, Response, Server};

/// Serve `dir` on `port` until the process is stopped.
pub fn run(port: u16, dir: &Path) -> Result<(), String> {
    if !dir.is_dir() {
        return Err(format!("Not a directory: {}", dir.display()));
    }

    println!("Starting Pathseekers server...");
    println!("  Serving: {}", dir.display());
    println!("  URL: http://localhost:{}", port);
    println!();
    println!("Press Ctrl+C to stop");

    let addr = format!("0.0.0.0:{}", port);
    let server = Server::http(&addr).map_err(|e| format!("Failed to start server: {}", e))?;

    for request in server.incoming_requests() {
        let url = request.url().to_string();
        let response = match resolve(dir, &url) {
            Some(path) => match fs::read(&path) {
                Ok(content) => {
                    log::debug!("200 {}", url);
                    let mut response = Response::from_data(content);
                    for header in headers_for(&path) {
                        response.add_header(header);
                    }
                    response
                }
                Err(e) => {
                    log::error!("failed to read {}: {}", path.display(), e);
                    Response::from_string("500 Internal Server Error").with_status_code(500)
                }
            },
            None => {
                log::warn!("404 {}", url);
                Response::from_string("404 Not Found").with_status_code(404)
            }
        };

        if let Err(e) = request.respond(response) {
            log::warn!("failed to respond to {}: {}", url, e);
        }
    }

    Ok(())
}

/// Map a request URL to a file under `dir`.
///
/// Query strings are ignored, directories resolve to their `index.html`, and
/// any path escaping `dir` is rejected.
fn resolve(dir: &Path, url: &str) -> Option<PathBuf> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let relative = Path::new(path.trim_start_matches('/'));

    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }

    let mut full = dir.join(relative);
    if full.is_dir() {
        full = full.join("index.html");
    }
    full.is_file().then_some(full)
}

fn headers_for(path: &Path) -> Vec<Header> {
    let mut values = vec![
        ("Content-Type", content_type(path)),
        ("Cache-Control", cache_control(path)),
    ];
    if let Some(encoding) = content_encoding(path) {
        values.push(("Content-Encoding", encoding));
    }

    values
        .into_iter()
        .filter_map(|(name, value)| Header::from_bytes(name.as_bytes(), value.as_bytes()).ok())
        .collect()
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// Extension of the file inside a `.br`/`.gz` wrapper, or the plain one.
fn inner_extension(path: &Path) -> Option<&str> {
    if content_encoding(path).is_some() {
        path.file_stem().map(Path::new).and_then(extension)
    } else {
        extension(path)
    }
}

/// `Content-Encoding` for pre-compressed artifacts.
fn content_encoding(path: &Path) -> Option<&'static str> {
    match extension(path) {
        Some("br") => Some("br"),
        Some("gz") => Some("gzip"),
        _ => None,
    }
}

fn content_type(path: &Path) -> &'static str {
    match inner_extension(path) {
        Some("html") => "text/html",
        Some("js") => "application/javascript",
        Some("wasm") => "application/wasm",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        Some("yaml" | "yml") => "text/yaml",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

fn cache_control(path: &Path) -> &'static str {
    match inner_extension(path) {
        Some("css") => "public, max-age=604800",
        // Build payloads keep their names across redeploys.
        Some("wasm" | "data" | "unityweb" | "png" | "jpg" | "jpeg" | "svg" | "ico") => {
            "public, max-age=86400"
        }
        Some("html" | "yaml" | "yml") => "no-cache, must-revalidate",
        _ => "public, max-age=3600",
    }
}
