//! API base URL resolution.
//!
//! The base URL is fixed by the deployment: same host as the console,
//! backend port, `/api` prefix. It is not configurable at runtime.

/// Get the base URL for API requests
///
/// # Returns
/// - API base URL like "http://localhost:8000/api" or
///   "https://pay.example.com:8000/api"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:8000/api", protocol, hostname)
}
