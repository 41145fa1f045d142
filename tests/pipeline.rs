use foldview::api::{RawResponse, Transport};
use foldview::cli::Cli;
use foldview::config::{Settings, CREDENTIAL_VAR, DEFAULT_SEQUENCE};
use foldview::pipeline::Pipeline;
use foldview::viewer::{Artifact, HtmlViewer, OutputMode, Renderer, ViewerSpec};
use foldview::{FoldError, Result};
use reqwest::header::HeaderMap;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread::{self, JoinHandle};

const PDB: &str = "HEADER...\nATOM...\nEND";

/// Replays one canned response and remembers every request body.
struct FakeTransport {
    status: u16,
    body: String,
    bodies: RefCell<Vec<String>>,
}

impl FakeTransport {
    fn new(status: u16, body: impl Into<String>) -> Self {
        FakeTransport {
            status,
            body: body.into(),
            bodies: RefCell::new(Vec::new()),
        }
    }
}

impl Transport for &FakeTransport {
    fn post(&self, _url: &str, _headers: HeaderMap, body: String) -> Result<RawResponse> {
        self.bodies.borrow_mut().push(body);
        Ok(RawResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

/// Records what it was handed instead of producing a page.
#[derive(Default)]
struct RecordingRenderer {
    received: RefCell<Vec<String>>,
}

impl Renderer for RecordingRenderer {
    fn emit(&self, structure: &str, _mode: &OutputMode) -> Result<Artifact> {
        self.received.borrow_mut().push(structure.to_string());
        Ok(Artifact {
            path: PathBuf::from("recorded.html"),
            opened: false,
        })
    }
}

fn settings(output: &Path) -> Settings {
    let cli = Cli {
        output: Some(output.to_path_buf()),
        url: Some("http://localhost:1/esmfold".into()),
        width: 600,
        height: 400,
        ..Cli::default()
    };
    Settings::resolve(&cli, |key| {
        (key == CREDENTIAL_VAR).then(|| "nvapi-test".to_string())
    })
    .unwrap()
}

#[test]
fn success_hands_first_structure_to_renderer_unchanged() {
    let transport = FakeTransport::new(200, json!({ "pdbs": [PDB] }).to_string());
    let pipeline = Pipeline::new(
        settings(Path::new("unused.html")),
        &transport,
        RecordingRenderer::default(),
    );

    pipeline.run().unwrap();
    assert_eq!(*pipeline.renderer().received.borrow(), vec![PDB.to_string()]);
}

#[test]
fn request_body_is_exactly_the_sequence() {
    let transport = FakeTransport::new(200, json!({ "pdbs": [PDB] }).to_string());
    let pipeline = Pipeline::new(
        settings(Path::new("unused.html")),
        &transport,
        RecordingRenderer::default(),
    );
    pipeline.run().unwrap();

    let bodies = transport.bodies.borrow();
    assert_eq!(bodies.len(), 1);
    let sent: Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(sent, json!({ "sequence": DEFAULT_SEQUENCE }));
}

#[test]
fn server_error_stops_before_rendering() {
    let transport = FakeTransport::new(500, "{\"detail\":\"internal\"}");
    let pipeline = Pipeline::new(
        settings(Path::new("unused.html")),
        &transport,
        RecordingRenderer::default(),
    );

    match pipeline.run().unwrap_err() {
        FoldError::Http { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "{\"detail\":\"internal\"}");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
    assert!(pipeline.renderer().received.borrow().is_empty());
}

#[test]
fn empty_structure_list_produces_no_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("protein.html");
    let transport = FakeTransport::new(200, r#"{"pdbs": []}"#);
    let pipeline = Pipeline::new(
        settings(&out),
        &transport,
        HtmlViewer::new(ViewerSpec::default()),
    );

    let err = pipeline.run().unwrap_err();
    assert!(matches!(err, FoldError::ResponseShape { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(!out.exists());
}

#[test]
fn repeated_runs_write_identical_pages() {
    let dir = tempfile::tempdir().unwrap();
    let body = json!({ "pdbs": [PDB] }).to_string();

    let mut pages = Vec::new();
    for name in ["first.html", "second.html"] {
        let out = dir.path().join(name);
        let transport = FakeTransport::new(200, body.clone());
        let pipeline = Pipeline::new(
            settings(&out),
            &transport,
            HtmlViewer::new(ViewerSpec::default()),
        );
        let artifact = pipeline.run().unwrap();
        assert_eq!(artifact.path, out);
        pages.push(std::fs::read(&out).unwrap());
    }
    assert_eq!(pages[0], pages[1]);
}

#[test]
fn binary_exits_with_one_when_credential_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_foldview"))
        .current_dir(dir.path())
        .env_remove(CREDENTIAL_VAR)
        .env_remove("RUST_LOG")
        .args(["--url", "http://127.0.0.1:9/esmfold"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error: The 'NGC_API_KEY' environment variable is not set."));
    assert!(!stderr.contains("ERROR"));
    assert!(!dir.path().join("protein.html").exists());
}

/// Answers a single HTTP request with `body` and returns the endpoint URL.
fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/esmfold", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }
        let mut request_body = vec![0; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        reader.get_mut().write_all(response.as_bytes()).unwrap();
    });
    (url, handle)
}

#[test]
#[cfg(unix)]
fn display_without_an_opener_fails_with_render_error() {
    let work = tempfile::tempdir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let empty_path = tempfile::tempdir().unwrap();
    let (url, server) = serve_once("200 OK", json!({ "pdbs": [PDB] }).to_string());

    let output = Command::new(env!("CARGO_BIN_EXE_foldview"))
        .current_dir(work.path())
        .env(CREDENTIAL_VAR, "nvapi-test")
        .env("PATH", empty_path.path())
        .env("TMPDIR", tmp.path())
        .env("NO_PROXY", "127.0.0.1")
        .env("no_proxy", "127.0.0.1")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .args(["--display", "--url", &url])
        .output()
        .unwrap();
    server.join().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("render error"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
    assert!(!tmp.path().join("foldview-protein.html").exists());
}
