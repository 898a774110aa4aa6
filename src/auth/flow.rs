//! Loopback capture of the authorisation redirect.

use std::collections::HashMap;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, warn};
use url::Url;

use crate::error::AuthError;

const MAX_REQUEST_HEAD: u64 = 16 * 1024;

const LANDING_PAGE: &str = "<!DOCTYPE html>\
<html><head><meta charset=\"utf-8\"><title>ytanalytics</title></head>\
<body style=\"font-family: sans-serif; text-align: center; margin-top: 4em\">\
<h1>Authorisation complete</h1>\
<p>You can close this window and return to the terminal.</p>\
</body></html>";

/// Bind a listener on the host and port named by a redirect URI.
pub async fn bind(redirect_uri: &str) -> Result<TcpListener, AuthError> {
    let url = Url::parse(redirect_uri)
        .map_err(|e| AuthError::InvalidRedirectUri(format!("{}: {}", redirect_uri, e)))?;
    if url.scheme() != "http" {
        return Err(AuthError::InvalidRedirectUri(format!(
            "{}: loopback redirects must use http",
            redirect_uri
        )));
    }
    let host = url
        .host_str()
        .ok_or_else(|| AuthError::InvalidRedirectUri(format!("{}: no host", redirect_uri)))?;
    let port = url.port_or_known_default().unwrap_or(80);

    let listener = TcpListener::bind((host, port)).await?;
    debug!("Started webserver on {}:{}", host, port);
    Ok(listener)
}

/// Serve requests until one carries the authorisation callback, then
/// return its code.
pub async fn receive_code(listener: TcpListener, expected_state: &str) -> Result<String, AuthError> {
    loop {
        let (mut stream, peer) = listener.accept().await?;
        let request_line = match read_request_line(&mut stream).await {
            Ok(line) => line,
            Err(e) => {
                debug!("Failed to read request from {}: {}", peer, e);
                continue;
            }
        };
        debug!("Received request from {}", peer);

        let Some(params) = parse_callback(&request_line) else {
            if let Err(e) = stream.write_all(&response(404, "Not Found", "")).await {
                debug!("Failed to answer {}: {}", peer, e);
            }
            continue;
        };

        if let Err(e) = stream.write_all(&response(200, "OK", LANDING_PAGE)).await {
            debug!("Failed to answer {}: {}", peer, e);
        }
        if let Err(e) = stream.shutdown().await {
            debug!("Failed to close connection to {}: {}", peer, e);
        }
        debug!("Closed webserver");
        return check_callback(&params, expected_state);
    }
}

/// Read the request line, then drain the headers up to the blank line.
async fn read_request_line(stream: &mut TcpStream) -> std::io::Result<String> {
    let mut reader = BufReader::new(stream.take(MAX_REQUEST_HEAD));
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    let mut header = String::new();
    loop {
        header.clear();
        let n = reader.read_line(&mut header).await?;
        if n == 0 || header.trim_end().is_empty() {
            break;
        }
    }
    Ok(request_line)
}

/// Query parameters of a `GET` request that looks like an OAuth callback.
pub fn parse_callback(request: &str) -> Option<HashMap<String, String>> {
    let line = request.lines().next()?;
    let mut parts = line.split_whitespace();
    if parts.next()? != "GET" {
        return None;
    }
    let target = parts.next()?;
    let (_, query) = target.split_once('?')?;
    let params: HashMap<String, String> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    if params.contains_key("state") || params.contains_key("error") {
        Some(params)
    } else {
        None
    }
}

pub fn check_callback(
    params: &HashMap<String, String>,
    expected_state: &str,
) -> Result<String, AuthError> {
    if let Some(error) = params.get("error") {
        warn!("Authorisation was refused: {}", error);
        return Err(AuthError::MissingCode(error.clone()));
    }
    if params.get("state").map(String::as_str) != Some(expected_state) {
        return Err(AuthError::StateMismatch);
    }
    params
        .get("code")
        .cloned()
        .ok_or_else(|| AuthError::MissingCode("no code parameter".to_string()))
}

fn response(status: u16, status_text: &str, body: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 {} {}\r\n\
         Content-Type: text/html; charset=utf-8\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {}",
        status,
        status_text,
        body.len(),
        body
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_callback() {
        let params =
            parse_callback("GET /?state=abc&code=4%2F0AX&scope=openid HTTP/1.1\r\nHost: x\r\n\r\n")
                .unwrap();
        assert_eq!(params["code"], "4/0AX");
        assert_eq!(check_callback(&params, "abc").unwrap(), "4/0AX");
    }

    #[test]
    fn test_parse_callback_ignores_other_requests() {
        assert!(parse_callback("GET /favicon.ico HTTP/1.1\r\n\r\n").is_none());
        assert!(parse_callback("POST /?state=abc HTTP/1.1\r\n\r\n").is_none());
        assert!(parse_callback("").is_none());
    }

    #[test]
    fn test_check_callback_state_mismatch() {
        let params = parse_callback("GET /?state=xyz&code=c HTTP/1.1\r\n").unwrap();
        assert!(matches!(
            check_callback(&params, "abc"),
            Err(AuthError::StateMismatch)
        ));
    }

    #[test]
    fn test_check_callback_error() {
        let params = parse_callback("GET /?error=access_denied&state=abc HTTP/1.1\r\n").unwrap();
        let err = check_callback(&params, "abc").unwrap_err();
        assert!(err.to_string().contains("access_denied"));
    }

    #[tokio::test]
    async fn test_bind_rejects_https() {
        assert!(matches!(
            bind("https://localhost:8080").await,
            Err(AuthError::InvalidRedirectUri(_))
        ));
    }

    #[tokio::test]
    async fn test_receive_code_split_request_line() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move { receive_code(listener, "abc").await });

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(b"GET /?state=ab").await.unwrap();
        client.flush().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        client
            .write_all(b"c&code=xyz HTTP/1.1\r\nHost: 127.0.0.1\r\n\r\n")
            .await
            .unwrap();
        let mut reply = Vec::new();
        client.read_to_end(&mut reply).await.unwrap();
        assert!(String::from_utf8_lossy(&reply).starts_with("HTTP/1.1 200"));

        assert_eq!(server.await.unwrap().unwrap(), "xyz");
    }

    #[tokio::test]
    async fn test_receive_code_over_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move { receive_code(listener, "abc").await });

        let mut stray = TcpStream::connect(addr).await.unwrap();
        stray
            .write_all(b"GET /favicon.ico HTTP/1.1\r\n\r\n")
            .await
            .unwrap();
        let mut reply = Vec::new();
        stray.read_to_end(&mut reply).await.unwrap();
        assert!(String::from_utf8_lossy(&reply).starts_with("HTTP/1.1 404"));

        let mut client = TcpStream::connect(addr).await.unwrap();
        client
            .write_all(b"GET /?state=abc&code=xyz HTTP/1.1\r\n\r\n")
            .await
            .unwrap();
        let mut reply = Vec::new();
        client.read_to_end(&mut reply).await.unwrap();
        assert!(String::from_utf8_lossy(&reply).contains("Authorisation complete"));

        assert_eq!(server.await.unwrap().unwrap(), "xyz");
    }
}
