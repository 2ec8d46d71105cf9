use srr_stream::ImportClient;

#[tokio::test]
async fn spawn_surfaces_connection_failures() {
    // Port 1 is never listening; the connect is refused immediately.
    let client = ImportClient::new("http://127.0.0.1:1").expect("client");
    let (job, mut events) = client.spawn("refined.csv".to_string(), b"id\n1\n".to_vec());

    assert!(events.recv().await.is_none(), "no events on a failed connect");
    assert!(job.join().await.is_err());
}

#[tokio::test]
async fn aborted_job_reports_an_error() {
    let client = ImportClient::new("http://127.0.0.1:1").expect("client");
    let (job, _events) = client.spawn("refined.csv".to_string(), b"id\n1\n".to_vec());
    job.abort();
    assert!(job.join().await.is_err());
}

#[test]
fn base_url_trailing_slash_is_normalized() {
    // Constructing with a trailing slash must not produce "//analysis".
    let client = ImportClient::new("http://127.0.0.1:8000/api/").expect("client");
    let debug = format!("{client:?}");
    assert!(debug.contains("http://127.0.0.1:8000/api"));
    assert!(!debug.contains("api/"));
}
