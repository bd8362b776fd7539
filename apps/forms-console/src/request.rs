//! Header helpers shared by the gate, guards and preference handlers

use axum::http::{
    header::{COOKIE, HOST},
    HeaderMap, Uri,
};

const FORWARDED_HOST: &str = "x-forwarded-host";
const FORWARDED_PROTO: &str = "x-forwarded-proto";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Raw `Cookie` header, if any
pub fn cookie_header(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, COOKIE.as_str())
}

/// Value of cookie `name`
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    cookie_header(headers)?.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| value.trim())
    })
}

/// Host the browser used, without the port
pub fn request_host(headers: &HeaderMap) -> Option<String> {
    let host = header_str(headers, FORWARDED_HOST).or_else(|| header_str(headers, HOST.as_str()))?;
    let host = host.split(',').next().unwrap_or(host).trim();
    let hostname = host.rsplit_once(':').map_or(host, |(name, _port)| name);
    Some(hostname.to_ascii_lowercase())
}

/// Absolute URL of the request as the browser sees it.
///
/// Proxy headers win (scheme defaults to https), then `Host` (http), then
/// the configured public URL.
pub fn external_url(headers: &HeaderMap, uri: &Uri, public_url: &str) -> String {
    let path = uri.path_and_query().map_or("/", |pq| pq.as_str());

    if let Some(host) = header_str(headers, FORWARDED_HOST) {
        let proto = header_str(headers, FORWARDED_PROTO).unwrap_or("https");
        return format!("{}://{}{}", proto, host, path);
    }
    if let Some(host) = header_str(headers, HOST.as_str()) {
        return format!("http://{}{}", host, path);
    }
    format!("{}{}", public_url.trim_end_matches('/'), path)
}
