//! Tests that need a real process: environment handling and `/crash`.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};

use serde_json::{Value, json};

const BIN: &str = env!("CARGO_BIN_EXE_k8s-demo");
const TIMEOUT: Duration = Duration::from_secs(10);

/// Kills the child if a test bails out early.
struct Service {
    child: Child,
    addr: SocketAddr,
}

impl Drop for Service {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn free_addr() -> SocketAddr {
    TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap()
}

fn command(addr: SocketAddr) -> Command {
    let mut cmd = Command::new(BIN);
    cmd.env("HOST", addr.ip().to_string())
        .env("PORT", addr.port().to_string())
        .env_remove("APP_NAME")
        .env_remove("APP_ENV")
        .env_remove("APP_VERSION")
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd
}

fn spawn(mut cmd: Command, addr: SocketAddr) -> Service {
    let child = cmd.spawn().unwrap();
    let deadline = Instant::now() + TIMEOUT;
    while TcpStream::connect(addr).is_err() {
        assert!(Instant::now() < deadline, "service did not start on {addr}");
        sleep(Duration::from_millis(20));
    }
    Service { child, addr }
}

/// Raw HTTP/1.1 GET. Returns whatever the server sent before closing.
fn get(addr: SocketAddr, path: &str) -> std::io::Result<String> {
    let mut stream = TcpStream::connect(addr)?;
    stream.set_read_timeout(Some(TIMEOUT))?;
    write!(stream, "GET {path} HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n")?;
    let mut raw = String::new();
    stream.read_to_string(&mut raw)?;
    Ok(raw)
}

fn body(raw: &str) -> Value {
    let (_, body) = raw.split_once("\r\n\r\n").unwrap();
    serde_json::from_str(body).unwrap()
}

fn wait_for_exit(child: &mut Child) -> ExitStatus {
    let deadline = Instant::now() + TIMEOUT;
    loop {
        if let Some(status) = child.try_wait().unwrap() {
            return status;
        }
        assert!(Instant::now() < deadline, "process did not exit");
        sleep(Duration::from_millis(20));
    }
}

fn os_hostname() -> String {
    hostname::get().unwrap().to_string_lossy().into_owned()
}

#[test]
fn info_defaults_without_env() {
    let addr = free_addr();
    let svc = spawn(command(addr), addr);

    let raw = get(svc.addr, "/info").unwrap();
    assert!(raw.starts_with("HTTP/1.1 200"), "{raw}");
    assert_eq!(body(&raw), json!({
        "app": "devops-node-k8s-demo",
        "env": "dev",
        "version": "0.0.0",
        "hostname": os_hostname(),
    }));
}

#[test]
fn info_uses_env_overrides() {
    let addr = free_addr();
    let mut cmd = command(addr);
    cmd.env("APP_NAME", "foo").env("APP_ENV", "prod").env("APP_VERSION", "1.2.3");
    let svc = spawn(cmd, addr);

    let raw = get(svc.addr, "/info").unwrap();
    assert_eq!(body(&raw), json!({
        "app": "foo",
        "env": "prod",
        "version": "1.2.3",
        "hostname": os_hostname(),
    }));
}

#[test]
fn crash_terminates_the_process() {
    let addr = free_addr();
    let mut svc = spawn(command(addr), addr);

    assert!(get(svc.addr, "/health").unwrap().starts_with("HTTP/1.1 200"));

    // Either a clean EOF or a reset; never an HTTP response.
    if let Ok(raw) = get(svc.addr, "/crash") {
        assert!(raw.is_empty(), "unexpected response: {raw}");
    }

    let status = wait_for_exit(&mut svc.child);
    assert_eq!(status.code(), Some(1));

    let err = TcpStream::connect(svc.addr).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::ConnectionRefused);
}

#[test]
fn bad_port_fails_startup() {
    let output = Command::new(BIN)
        .env("PORT", "eighty")
        .env_remove("HOST")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PORT"), "{stderr}");
}
