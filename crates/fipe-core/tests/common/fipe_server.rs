//! Minimal HTTP/1.1 server standing in for the FIPE API in integration tests.
//!
//! Answers POSTs by (path, form body) from a fixed route table, records every
//! request, and closes the connection after each response. The first response
//! sets a session cookie so tests can check that the client sends it back.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub const SESSION_COOKIE: &str = "ASP.NET_SessionId=fipe-test";

#[derive(Debug, Clone)]
pub struct Route {
    pub endpoint: String,
    pub body: String,
    pub status: u16,
    pub json: String,
}

impl Route {
    pub fn ok(endpoint: &str, body: &str, json: &str) -> Self {
        Route {
            endpoint: endpoint.to_string(),
            body: body.to_string(),
            status: 200,
            json: json.to_string(),
        }
    }

    pub fn status(endpoint: &str, body: &str, status: u16) -> Self {
        Route {
            endpoint: endpoint.to_string(),
            body: body.to_string(),
            status,
            json: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub struct FipeServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FipeServer {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts the server in a background thread. It runs until the process exits.
pub fn start(routes: Vec<Route>) -> FipeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            handle(stream, &routes, &recorded);
        }
    });
    FipeServer {
        base_url: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn handle(mut stream: TcpStream, routes: &[Route], recorded: &Mutex<Vec<Recorded>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(request) = read_request(&mut stream) else {
        return;
    };

    let first = {
        let mut all = recorded.lock().unwrap();
        all.push(request.clone());
        all.len() == 1
    };

    let endpoint = request.path.rsplit('/').next().unwrap_or("");
    let route = routes
        .iter()
        .find(|r| r.endpoint == endpoint && r.body == request.body);
    let (status, json) = match route {
        Some(r) => (r.status, r.json.as_str()),
        None => (404, ""),
    };
    let reason = if status == 200 { "OK" } else { "Error" };
    let cookie = if first {
        format!("Set-Cookie: {}; path=/\r\n", SESSION_COOKIE)
    } else {
        String::new()
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json; charset=utf-8\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
        status,
        reason,
        json.len(),
        cookie,
        json
    );
    let _ = stream.write_all(response.as_bytes());
}

fn read_request(stream: &mut TcpStream) -> Option<Recorded> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut start = lines.next()?.split_whitespace();
    let method = start.next()?.to_string();
    let path = start.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = (header_end + content_length).min(buf.len());
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).into_owned();

    Some(Recorded {
        method,
        path,
        headers,
        body,
    })
}
