#![forbid(unsafe_code)]

use crate::{JsonRpcRequest, McpServer, json_rpc_error};
use serde_json::Value;
use std::io::{BufRead, Write};

const MAX_CONTENT_LENGTH_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Framing {
    NewlineJson,
    ContentLength,
}

fn detect_framing(line: &str) -> Option<Framing> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Some(Framing::NewlineJson);
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("content-length:") || lower.starts_with("content-type:") {
        return Some(Framing::ContentLength);
    }
    None
}

fn parse_content_length_header(line: &str) -> Option<usize> {
    let (key, value) = line.trim().split_once(':')?;
    if !key.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    value.trim().parse::<usize>().ok()
}

/// Reads the remaining headers of a frame whose first header line is `header`, then its body.
/// `None` on EOF.
fn read_content_length_frame<R: BufRead>(
    reader: &mut R,
    mut header: String,
) -> std::io::Result<Option<Vec<u8>>> {
    let mut content_length = parse_content_length_header(&header);
    loop {
        if header.trim_end().is_empty() {
            break;
        }
        header.clear();
        if reader.read_line(&mut header)? == 0 {
            return Ok(None);
        }
        if content_length.is_none() {
            content_length = parse_content_length_header(&header);
        }
    }

    let Some(len) = content_length else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Missing Content-Length header",
        ));
    };
    if len > MAX_CONTENT_LENGTH_BYTES {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Content-Length exceeds max allowed size",
        ));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    Ok(Some(body))
}

fn write_frame<W: Write>(
    out: &mut W,
    framing: Framing,
    resp: &Value,
) -> Result<(), Box<dyn std::error::Error>> {
    match framing {
        Framing::NewlineJson => {
            writeln!(out, "{}", serde_json::to_string(resp)?)?;
        }
        Framing::ContentLength => {
            let body = serde_json::to_vec(resp)?;
            write!(out, "Content-Length: {}\r\n\r\n", body.len())?;
            out.write_all(&body)?;
        }
    }
    out.flush()?;
    Ok(())
}

pub(crate) fn run_stdio(server: &mut McpServer) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    serve(server, stdin.lock(), stdout.lock())
}

/// Serves requests until EOF. Framing is detected from the first non-empty line and kept for
/// the whole session so responses never mix styles.
pub(crate) fn serve<R: BufRead, W: Write>(
    server: &mut McpServer,
    mut reader: R,
    mut out: W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut framing: Option<Framing> = None;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let mode = match framing {
            Some(mode) => mode,
            None => match detect_framing(&line) {
                Some(detected) => {
                    tracing::debug!(framing = ?detected, "stdio framing detected");
                    framing = Some(detected);
                    detected
                }
                None => continue,
            },
        };

        let body = match mode {
            Framing::NewlineJson => {
                let raw = line.trim();
                if raw.is_empty() {
                    continue;
                }
                raw.as_bytes().to_vec()
            }
            Framing::ContentLength => {
                if line.trim().is_empty() {
                    continue;
                }
                let Some(body) = read_content_length_frame(&mut reader, line)? else {
                    break;
                };
                body
            }
        };

        if let Some(resp) = handle_body(server, &body) {
            write_frame(&mut out, mode, &resp)?;
        }
    }

    Ok(())
}

fn handle_body(server: &mut McpServer, body: &[u8]) -> Option<Value> {
    let data: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => return Some(json_rpc_error(None, -32700, &format!("Parse error: {e}"))),
    };

    let (id, has_method) = match data.as_object() {
        Some(obj) => (obj.get("id").cloned(), obj.contains_key("method")),
        None => return Some(json_rpc_error(None, -32600, "Invalid Request")),
    };
    if !has_method {
        return Some(json_rpc_error(id, -32600, "Invalid Request"));
    }

    let request: JsonRpcRequest = match serde_json::from_value(data) {
        Ok(v) => v,
        Err(e) => {
            return Some(json_rpc_error(
                id,
                -32600,
                &format!("Invalid Request: {e}"),
            ));
        }
    };

    server.handle(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framing_is_detected_from_the_first_line() {
        assert_eq!(detect_framing("  {\"id\":1}"), Some(Framing::NewlineJson));
        assert_eq!(
            detect_framing("Content-Length: 12\r\n"),
            Some(Framing::ContentLength)
        );
        assert_eq!(
            detect_framing("content-type: application/json"),
            Some(Framing::ContentLength)
        );
        assert_eq!(detect_framing("\r\n"), None);
        assert_eq!(detect_framing("hello"), None);
    }

    #[test]
    fn content_length_header_is_case_insensitive() {
        assert_eq!(parse_content_length_header("CONTENT-LENGTH: 42\r\n"), Some(42));
        assert_eq!(parse_content_length_header("Content-Type: x"), None);
        assert_eq!(parse_content_length_header("Content-Length: nope"), None);
    }

    #[test]
    fn frame_reader_skips_extra_headers() {
        let raw = b"Content-Type: application/json\r\n\r\n{\"a\":1}";
        let mut reader = std::io::Cursor::new(&raw[..]);
        let body = read_content_length_frame(&mut reader, "Content-Length: 7\r\n".to_string())
            .expect("read frame")
            .expect("frame");
        assert_eq!(body, b"{\"a\":1}");
    }

    #[test]
    fn frame_without_length_is_rejected() {
        let mut reader = std::io::Cursor::new(&b"\r\n{}"[..]);
        let err = read_content_length_frame(&mut reader, "Content-Type: x\r\n".to_string())
            .expect_err("missing length");
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
