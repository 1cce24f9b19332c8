use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// A platform endpoint stub that serves one fixed response for every
/// request. Dropping it shuts the server thread down.
pub struct PlatformStub {
    pub base_url: String,
    shutdown_tx: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl PlatformStub {
    pub fn spawn(status: i32, body: String) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }
                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };
                let resp = tiny_http::Response::from_string(body.clone()).with_status_code(status);
                let _ = request.respond(resp);
            }
        });

        Self {
            base_url,
            shutdown_tx,
            handle: Some(handle),
        }
    }

    /// A chzzk metadata endpoint answering every channel with `name`.
    pub fn chzzk_api(name: &str) -> Self {
        Self::spawn(
            200,
            format!(r#"{{"code":200,"content":{{"channelName":"{name}"}}}}"#),
        )
    }

    /// A chzzk metadata endpoint answering each channel with `name of <id>`,
    /// delaying only the response for `slow_id`.
    pub fn chzzk_api_staggered(slow_id: &str, delay: Duration) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");
        let slow_id = slow_id.to_string();

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }
                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };
                let id = request
                    .url()
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_string();
                if id == slow_id {
                    thread::sleep(delay);
                }
                let body = format!(r#"{{"code":200,"content":{{"channelName":"name of {id}"}}}}"#);
                let _ = request
                    .respond(tiny_http::Response::from_string(body).with_status_code(200));
            }
        });

        Self {
            base_url,
            shutdown_tx,
            handle: Some(handle),
        }
    }

    /// A youtube live page whose canonical link points at `video_id`.
    pub fn youtube_live_page(video_id: &str, author: &str) -> Self {
        Self::spawn(
            200,
            format!(
                r#"<!doctype html>
<html>
<head>
<link rel="canonical" href="https://www.youtube.com/watch?v={video_id}">
</head>
<body>
<script>var data = {{"videoDetails":{{"author":"{author}"}}}};</script>
</body>
</html>
"#
            ),
        )
    }
}

impl Drop for PlatformStub {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
