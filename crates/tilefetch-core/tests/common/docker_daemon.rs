//! Fake Docker Engine on a unix socket for integration tests.
//!
//! Answers `GET /images/{name}/get` with the archive registered for `name`,
//! 404 for anything else.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

/// Binds `socket` and serves `images` (name → archive bytes) until the process exits.
/// Returns the `unix://` address to use as `DOCKER_HOST`.
pub fn start(socket: &Path, images: HashMap<String, Vec<u8>>) -> String {
    let listener = UnixListener::bind(socket).expect("bind unix socket");
    let images = Arc::new(images);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let images = Arc::clone(&images);
            thread::spawn(move || handle(stream, &images));
        }
    });
    format!("unix://{}", socket.display())
}

pub fn socket_path(dir: &Path) -> PathBuf {
    dir.join("docker.sock")
}

fn handle(mut stream: UnixStream, images: &HashMap<String, Vec<u8>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("");

    let found = path
        .strip_prefix("/images/")
        .and_then(|rest| rest.strip_suffix("/get"))
        .and_then(|name| images.get(name));

    match found {
        Some(body) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/x-tar\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
        None => {
            let msg = br#"{"message":"reference does not exist"}"#;
            let head = format!(
                "HTTP/1.1 404 Not Found\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                msg.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(msg);
        }
    }
}
