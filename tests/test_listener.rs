use rawhttp::config::Config;
use rawhttp::server::routes::DemoHandler;
use rawhttp::server::Server;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

fn test_config() -> Config {
    Config {
        listen_addr: "127.0.0.1:0".to_string(),
        read_buffer_size: 8,
    }
}

async fn fetch(addr: std::net::SocketAddr, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

#[tokio::test]
async fn test_server_serves_concurrent_connections() {
    let server = Server::bind(&test_config(), DemoHandler).await.unwrap();
    let addr = server.local_addr().unwrap();
    let handle = server.close_handle();
    let serving = tokio::spawn(server.serve());

    let (a, b) = tokio::join!(
        fetch(addr, b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n"),
        fetch(addr, b"GET /myproblem HTTP/1.1\r\nHost: localhost\r\n\r\n"),
    );

    assert!(a.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(b.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));

    assert!(handle.close());
    serving.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let server = Server::bind(&test_config(), DemoHandler).await.unwrap();
    let handle = server.close_handle();

    assert!(!handle.is_closed());
    assert!(handle.close());
    assert!(!handle.close());
    assert!(handle.is_closed());

    // Closed before serving: the accept loop exits immediately.
    server.serve().await.unwrap();
}

#[tokio::test]
async fn test_bind_failure_is_reported() {
    let cfg = Config {
        listen_addr: "not an address".to_string(),
        read_buffer_size: 8,
    };

    assert!(Server::bind(&cfg, DemoHandler).await.is_err());
}
