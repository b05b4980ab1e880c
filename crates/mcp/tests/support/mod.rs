#![forbid(unsafe_code)]
#![allow(dead_code)]

use serde_json::Value;
use serde_json::json;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use termorder_core::{TermId, Taxonomy};
use termorder_storage::{CreateTermRequest, SqliteStore};

pub(crate) struct Server {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    _storage: tempfile::TempDir,
}

impl Server {
    pub(crate) fn start(extra_args: &[&str]) -> Self {
        Self::start_seeded(extra_args, |_| ()).0
    }

    /// Seeds the store before the server opens it.
    pub(crate) fn start_seeded<T>(
        extra_args: &[&str],
        seed: impl FnOnce(&mut Seeder) -> T,
    ) -> (Self, T) {
        let storage = tempfile::tempdir().expect("temp dir");
        let seeded = {
            let store = SqliteStore::open(storage.path()).expect("open store");
            let mut seeder = Seeder { store };
            seed(&mut seeder)
        };
        (Self::spawn(storage, extra_args), seeded)
    }

    fn spawn(storage: tempfile::TempDir, extra_args: &[&str]) -> Self {
        let has_log = extra_args.iter().any(|arg| arg.trim() == "--log");
        let default_log: &[&str] = if has_log { &[] } else { &["--log", "warn"] };
        let mut child = Command::new(env!("CARGO_BIN_EXE_termorder_mcp"))
            .arg("--storage-dir")
            .arg(storage.path())
            .args(default_log)
            .args(extra_args)
            .env_remove("TERMORDER_TAXONOMIES")
            .env_remove("TERMORDER_READ_ONLY")
            .env_remove("TERMORDER_BATCH_LIMIT")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn termorder_mcp");

        let stdin = child.stdin.take().expect("stdin");
        let stdout = BufReader::new(child.stdout.take().expect("stdout"));

        Self {
            child,
            stdin,
            stdout,
            _storage: storage,
        }
    }

    pub(crate) fn storage_dir(&self) -> &Path {
        self._storage.path()
    }

    /// A second connection to the server's database, for checking what was written.
    pub(crate) fn open_store(&self) -> SqliteStore {
        SqliteStore::open(self.storage_dir()).expect("open store")
    }

    pub(crate) fn send(&mut self, req: Value) {
        writeln!(self.stdin, "{req}").expect("write request");
        self.stdin.flush().expect("flush request");
    }

    pub(crate) fn send_raw(&mut self, raw: &[u8]) {
        self.stdin.write_all(raw).expect("write raw");
        self.stdin.flush().expect("flush raw");
    }

    pub(crate) fn recv(&mut self) -> Value {
        let mut line = String::new();
        self.stdout.read_line(&mut line).expect("read response");
        assert!(!line.trim().is_empty(), "empty response line");
        serde_json::from_str(&line).expect("parse response json")
    }

    /// Reads one `Content-Length` framed response.
    pub(crate) fn recv_framed(&mut self) -> Value {
        let mut len = None;
        loop {
            let mut header = String::new();
            self.stdout.read_line(&mut header).expect("read header");
            let header = header.trim();
            if header.is_empty() {
                break;
            }
            if let Some((key, value)) = header.split_once(':')
                && key.trim().eq_ignore_ascii_case("content-length")
            {
                len = Some(value.trim().parse::<usize>().expect("length"));
            }
        }
        let mut body = vec![0u8; len.expect("content-length header")];
        self.stdout.read_exact(&mut body).expect("read body");
        serde_json::from_slice(&body).expect("parse framed json")
    }

    pub(crate) fn request(&mut self, req: Value) -> Value {
        self.send(req);
        self.recv()
    }

    pub(crate) fn initialize_default(&mut self) {
        let _ = self.request(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": { "protocolVersion": "2024-11-05", "capabilities": {}, "clientInfo": { "name": "test", "version": "0" } }
        }));
        self.send(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized",
            "params": {}
        }));
    }

    /// Calls a tool and returns the parsed envelope from the text content.
    pub(crate) fn call(&mut self, id: i64, tool: &str, arguments: Value) -> Value {
        let resp = self.request(json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": { "name": tool, "arguments": arguments }
        }));
        let text = resp["result"]["content"][0]["text"]
            .as_str()
            .expect("tool text content");
        let body: Value = serde_json::from_str(text).expect("tool envelope json");
        assert_eq!(
            resp["result"]["isError"],
            !body["success"].as_bool().unwrap_or(false),
            "isError must mirror success"
        );
        body
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub(crate) struct Seeder {
    store: SqliteStore,
}

impl Seeder {
    pub(crate) fn taxonomy(&mut self, name: &str) -> Taxonomy {
        let taxonomy = Taxonomy::try_new(name).expect("taxonomy");
        self.store
            .create_taxonomy(&taxonomy)
            .expect("create taxonomy");
        taxonomy
    }

    pub(crate) fn term(
        &mut self,
        taxonomy: &Taxonomy,
        name: &str,
        parent: Option<TermId>,
        order: i64,
    ) -> TermId {
        self.store
            .create_term(CreateTermRequest {
                taxonomy: taxonomy.clone(),
                name: name.to_string(),
                parent,
                order: Some(order),
            })
            .expect("create term")
            .id
    }
}
