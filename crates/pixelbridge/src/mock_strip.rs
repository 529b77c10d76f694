//! Mock strip device — the four-endpoint HTTP surface over an in-memory
//! pixel array, for local testing only.
//!
//! Serves `GET /states`, `GET /size`, `GET /clear`, and `POST /raw` from a
//! single-threaded accept loop. Deliberately not a production server.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "mock-strip",
    version,
    about = "In-memory WiFi NeoPixel mock device"
)]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 8888)]
    port: u16,

    /// Number of pixels
    #[arg(long, default_value_t = 8)]
    pixels: usize,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let args = Args::parse();
    let mut states = vec![0u32; args.pixels];

    let listener = match TcpListener::bind(("127.0.0.1", args.port)) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: failed to bind port {}: {e}", args.port);
            std::process::exit(1);
        }
    };
    log::info!("listening on 127.0.0.1:{} with {} pixels", args.port, args.pixels);

    for stream in listener.incoming() {
        let Ok(mut stream) = stream else { continue };
        if let Err(e) = handle(&mut stream, &mut states) {
            log::warn!("request failed: {e}");
        }
    }
}

/// Serve one request against the pixel array.
fn handle(stream: &mut TcpStream, states: &mut Vec<u32>) -> std::io::Result<()> {
    let request = read_request(stream)?;
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");
    log::info!("{method} {path}");

    match (method, path) {
        ("GET", "/states") => {
            let body = serde_json::to_string(states).map_err(std::io::Error::other)?;
            respond(stream, "200 OK", "application/json", &body)
        }
        ("GET", "/size") => respond(stream, "200 OK", "text/plain", &states.len().to_string()),
        ("GET", "/clear") => {
            states.iter_mut().for_each(|w| *w = 0);
            respond(stream, "200 OK", "text/plain", "OK")
        }
        ("POST", "/raw") => {
            let body = request.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or("");
            match serde_json::from_str::<Vec<u32>>(body) {
                Ok(words) => {
                    log::debug!("/raw -> {words:?}");
                    *states = words;
                    respond(stream, "200 OK", "text/plain", "OK")
                }
                Err(e) => respond(
                    stream,
                    "400 Bad Request",
                    "text/plain",
                    &format!("bad payload: {e}"),
                ),
            }
        }
        _ => respond(stream, "404 Not Found", "text/plain", "not found"),
    }
}

/// Read one HTTP request: headers plus a Content-Length body if present.
fn read_request(stream: &mut TcpStream) -> std::io::Result<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|l| {
                l.to_ascii_lowercase()
                    .strip_prefix("content-length:")
                    .map(str::to_string)
            })
            .find_map(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < head_end + 4 + content_length {
            let n = stream.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        break;
    }
    Ok(String::from_utf8_lossy(&buf).to_string())
}

fn respond(
    stream: &mut TcpStream,
    status_line: &str,
    content_type: &str,
    body: &str,
) -> std::io::Result<()> {
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes())
}
