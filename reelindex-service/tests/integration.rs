use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;

/// Helper to create a media root with known content
fn create_media_root() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    for (rel, body) in [
        ("A/x.mp4", "x"),
        ("A/C/z.mkv", "z"),
        ("B/MyMovie.MP4", "movie"),
        ("B/readme.txt", "not a video"),
        ("intro.mkv", "intro"),
    ] {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }

    dir
}

/// Helper to find a free port
fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Helper to wait for the service to be ready
fn wait_for_service(base_url: &str, timeout: Duration) -> bool {
    let client = reqwest::blocking::Client::new();
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if client.get(format!("{}/api/folder/", base_url)).send().is_ok() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    false
}

fn start_service(root: &Path, port: u16) -> Child {
    Command::new(env!("CARGO_BIN_EXE_reelindex-service"))
        .arg("--root")
        .arg(root)
        .args(["--bind", "127.0.0.1"])
        .arg("--port")
        .arg(port.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to start reelindex-service")
}

fn get_json(client: &reqwest::blocking::Client, url: &str) -> (u16, serde_json::Value) {
    let resp = client.get(url).send().unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().unwrap())
}

#[test]
fn test_service_browse_and_search() {
    let media = create_media_root();
    let port = free_port();
    let base_url = format!("http://127.0.0.1:{}", port);

    let mut service = start_service(media.path(), port);
    assert!(
        wait_for_service(&base_url, Duration::from_secs(10)),
        "Service failed to start"
    );

    let client = reqwest::blocking::Client::new();

    // 1. Root listing
    let (status, root) = get_json(&client, &format!("{}/api/folder/", base_url));
    assert_eq!(status, 200);
    assert_eq!(root["folders"], serde_json::json!(["A", "B"]));
    assert_eq!(root["parent"], ".");
    assert_eq!(root["cwd"], ".");
    let root_files = root["files"].as_array().unwrap();
    assert_eq!(root_files.len(), 1);
    assert_eq!(root_files[0]["FileName"], "intro.mkv");

    // 2. Nested folder
    let (status, a) = get_json(&client, &format!("{}/api/folder/A", base_url));
    assert_eq!(status, 200);
    assert_eq!(a["folders"], serde_json::json!(["C"]));
    assert_eq!(a["files"][0]["Path"], "A/x.mp4");
    assert_eq!(a["parent"], ".");

    // 3. Leaf folder with trailing slash
    let (status, leaf) = get_json(&client, &format!("{}/api/folder/A/C/", base_url));
    assert_eq!(status, 200);
    assert_eq!(leaf["folders"], serde_json::json!([]));
    assert_eq!(leaf["files"][0]["FileName"], "z.mkv");
    assert_eq!(leaf["files"][0]["Folder"], "A/C");
    assert_eq!(leaf["parent"], "A");

    // 4. Unknown folder is an empty listing, not an error
    let (status, empty) = get_json(&client, &format!("{}/api/folder/Nope", base_url));
    assert_eq!(status, 200);
    assert_eq!(empty["folders"], serde_json::json!([]));
    assert_eq!(empty["files"], serde_json::json!([]));

    // 5. Case-insensitive search
    let (status, found) = get_json(&client, &format!("{}/api/search/mov", base_url));
    assert_eq!(status, 200);
    let results = found["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["FileName"], "MyMovie.MP4");

    // 6. Empty search is a client error
    let (status, body) = get_json(&client, &format!("{}/api/search/", base_url));
    assert_eq!(status, 400);
    assert!(body["error"].as_str().is_some());

    // 7. Exact file lookup
    let (status, body) = get_json(&client, &format!("{}/api/file/x.mp4", base_url));
    assert_eq!(status, 200);
    assert_eq!(body["file"]["Path"], "A/x.mp4");

    let (status, _) = get_json(&client, &format!("{}/api/file/missing.mp4", base_url));
    assert_eq!(status, 404);

    // 8. Indexed files are served from the media root
    let body = client
        .get(format!("{}/media/A/x.mp4", base_url))
        .send()
        .unwrap()
        .text()
        .unwrap();
    assert_eq!(body, "x");

    // Non-indexed files under the root are not exposed
    for rel in ["movies.db", "B/readme.txt", "A/../movies.db"] {
        let resp = client
            .get(format!("{}/media/{}", base_url, rel))
            .send()
            .unwrap();
        assert_eq!(resp.status().as_u16(), 404, "{rel} should not be served");
    }

    // 9. Landing page
    let resp = client.get(format!("{}/", base_url)).send().unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.text().unwrap().contains("reelindex"));

    service.kill().ok();
    service.wait().ok();
}

#[test]
fn test_restart_does_not_duplicate_rows() {
    let media = create_media_root();
    let client = reqwest::blocking::Client::new();

    for _ in 0..2 {
        let port = free_port();
        let base_url = format!("http://127.0.0.1:{}", port);
        let mut service = start_service(media.path(), port);
        assert!(
            wait_for_service(&base_url, Duration::from_secs(10)),
            "Service failed to start"
        );

        let (status, found) = get_json(&client, &format!("{}/api/search/.m", base_url));
        assert_eq!(status, 200);
        assert_eq!(found["results"].as_array().unwrap().len(), 4);

        service.kill().ok();
        service.wait().ok();
    }
}

#[test]
fn test_missing_config_aborts_startup() {
    let media = create_media_root();
    let status = Command::new(env!("CARGO_BIN_EXE_reelindex-service"))
        .arg("--root")
        .arg(media.path())
        .arg("--config")
        .arg(media.path().join("absent.toml"))
        .arg("--port")
        .arg(free_port().to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .unwrap();

    assert!(!status.success());
}
