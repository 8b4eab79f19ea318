use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc::{Receiver, channel};

use flate2::Compression;
use flate2::write::GzEncoder;

/// Build a `.tar.gz` shaped like a host snapshot: everything lives below a
/// single `repo-main/` directory.
pub fn template_archive(files: &[(&str, &str)]) -> Vec<u8> {
  let encoder = GzEncoder::new(Vec::new(), Compression::default());
  let mut builder = tar::Builder::new(encoder);
  for (path, body) in files {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(body.len() as u64);
    header.set_mode(0o644);
    builder
      .append_data(&mut header, format!("repo-main/{path}"), body.as_bytes())
      .expect("append entry");
  }
  builder
    .into_inner()
    .expect("finish tar")
    .finish()
    .expect("finish gzip")
}

/// Minimal HTTP server answering archive downloads.
///
/// Requests whose path contains `serve_marker` get the archive, everything
/// else a 404. Every request path is sent to the returned receiver.
pub fn serve_archive(archive: Vec<u8>, serve_marker: &str) -> (String, Receiver<String>) {
  let listener = TcpListener::bind("127.0.0.1:0").expect("bind archive server");
  let addr = listener.local_addr().expect("local addr");
  let marker = serve_marker.to_string();
  let (tx, rx) = channel();
  std::thread::spawn(move || {
    for stream in listener.incoming() {
      let Ok(mut stream) = stream else { continue };
      let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
      let mut request_line = String::new();
      if reader.read_line(&mut request_line).is_err() {
        continue;
      }
      loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
          Ok(0) => break,
          Ok(_) if header == "\r\n" || header == "\n" => break,
          Ok(_) => {}
          Err(_) => break,
        }
      }
      let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string();
      let _ = tx.send(path.clone());
      let (status, body): (&str, &[u8]) = if path.contains(&marker) {
        ("200 OK", &archive)
      } else {
        ("404 Not Found", b"not found")
      };
      let head = format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nContent-Type: application/gzip\r\nConnection: close\r\n\r\n",
        body.len()
      );
      let _ = stream.write_all(head.as_bytes());
      let _ = stream.write_all(body);
      let _ = stream.flush();
    }
  });
  (format!("http://{addr}"), rx)
}
