use std::fs;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use plan_explorer::replay::{ReplayPlan, Replayer};
use plan_explorer::ExplorerError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

#[derive(Clone, Debug, PartialEq)]
struct Recorded {
    method: String,
    path: String,
    content_type: Option<String>,
    body: String,
    at: Instant,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

async fn read_request(stream: &mut TcpStream) -> Recorded {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap().split_whitespace();
    let method = request_line.next().unwrap().to_string();
    let path = request_line.next().unwrap().to_string();

    let mut content_length = 0;
    let mut content_type = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().unwrap(),
                "content-type" => content_type = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending the body");
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..header_end + content_length]).into_owned();

    Recorded {
        method,
        path,
        content_type,
        body,
        at: Instant::now(),
    }
}

/// Answers every request with `<METHOD> <path>`; `/fail` gets a 500.
async fn serve(listener: TcpListener, log: Log) {
    loop {
        let Ok((mut stream, _)) = listener.accept().await else {
            return;
        };
        let request = read_request(&mut stream).await;
        let status = if request.path == "/fail" {
            "500 Internal Server Error"
        } else {
            "200 OK"
        };
        let reply = format!("{} {}", request.method, request.path);
        log.lock().unwrap().push(request);
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
            reply.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
    }
}

async fn start_server() -> (Url, Log) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log = Log::default();
    tokio::spawn(serve(listener, log.clone()));
    (Url::parse(&format!("http://{addr}")).unwrap(), log)
}

fn fixtures(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in files {
        fs::write(dir.path().join(name), body).unwrap();
    }
    dir
}

#[tokio::test]
async fn clears_then_puts_fixtures_in_index_order() {
    let (host, log) = start_server().await;
    let dir = fixtures(&[
        ("req_10_solve.json", r#"{"step": 10}"#),
        ("req_2_obstacles.json", r#"{"step": 2}"#),
        ("req_1_init.json", r#"{"step": 1}"#),
    ]);
    let plan = ReplayPlan::from_dir(dir.path()).unwrap();

    let mut printed = Vec::new();
    let report = Replayer::new(host)
        .unwrap()
        .run(&plan, |response| printed.push(response.body.clone()))
        .await
        .unwrap();

    assert_eq!(report.sent, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(printed, vec!["PUT /init", "PUT /obstacles", "PUT /solve"]);

    let log = log.lock().unwrap().clone();
    let sequence: Vec<_> = log
        .iter()
        .map(|r| format!("{} {}", r.method, r.path))
        .collect();
    assert_eq!(
        sequence,
        vec!["GET /clear", "PUT /init", "PUT /obstacles", "PUT /solve"]
    );

    let first_put: serde_json::Value = serde_json::from_str(&log[1].body).unwrap();
    assert_eq!(first_put["step"], 1);
    assert_eq!(log[1].content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn error_status_does_not_stop_the_replay() {
    let (host, log) = start_server().await;
    let dir = fixtures(&[("r_1_fail.json", "{}"), ("r_2_solve.json", "{}")]);
    let plan = ReplayPlan::from_dir(dir.path()).unwrap();

    let report = Replayer::new(host).unwrap().run(&plan, |_| {}).await.unwrap();

    assert_eq!(report.sent, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(log.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn unreachable_host_aborts_with_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = fixtures(&[("r_1_init.json", "{}")]);
    let plan = ReplayPlan::from_dir(dir.path()).unwrap();
    let host = Url::parse(&format!("http://{addr}")).unwrap();

    let mut responses = 0;
    let err = Replayer::new(host)
        .unwrap()
        .run(&plan, |_| responses += 1)
        .await
        .unwrap_err();

    assert!(matches!(err, ExplorerError::Http { ref url, .. } if url.ends_with("/clear")));
    assert_eq!(responses, 0);
}

#[tokio::test]
async fn bodies_are_sent_byte_for_byte() {
    let (host, log) = start_server().await;
    let body = "{\"b\": 1,\n  \"a\": [2, 1]}";
    let dir = fixtures(&[("r_1_init.json", body)]);
    let plan = ReplayPlan::from_dir(dir.path()).unwrap();

    Replayer::new(host).unwrap().run(&plan, |_| {}).await.unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log[1].body, body);
    assert_eq!(log[1].content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn delay_pauses_only_between_puts() {
    let delay = Duration::from_millis(300);
    let (host, log) = start_server().await;
    let dir = fixtures(&[("r_1_init.json", "{}"), ("r_2_solve.json", "{}")]);
    let plan = ReplayPlan::from_dir(dir.path()).unwrap();

    let report = Replayer::new(host)
        .unwrap()
        .with_delay(delay)
        .run(&plan, |_| {})
        .await
        .unwrap();
    assert_eq!(report.sent, 2);

    let log = log.lock().unwrap();
    let paths: Vec<_> = log.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["/clear", "/init", "/solve"]);
    assert!(log[1].at - log[0].at < delay);
    assert!(log[2].at - log[1].at >= delay);
}
