//! Test fixtures shared by the integration tests.

use std::{
    net::TcpStream,
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

/// A server binary running on a dedicated port, killed on drop
pub struct TestServer {
    child: Child,
    port: u16,
}

impl TestServer {
    /// Start the server on `port` and wait until it accepts connections
    pub fn start(port: u16) -> Self {
        let child = Command::new(env!("CARGO_BIN_EXE_sketchroom-server"))
            .args(["--host", "127.0.0.1", "--port", &port.to_string()])
            .env("LOG_LEVEL", "warn")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to start server binary");

        let server = Self { child, port };
        server.wait_until_ready(Duration::from_secs(10));
        server
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }

    fn wait_until_ready(&self, timeout: Duration) {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if TcpStream::connect(("127.0.0.1", self.port)).is_ok() {
                return;
            }
            thread::sleep(Duration::from_millis(50));
        }
        panic!("Server did not start listening on port {}", self.port);
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
