//! End-to-end tests against a scripted XML-RPC fixture server.
//!
//! The fixture speaks just enough HTTP/1.1 to receive one POST per
//! connection and reply with a canned `methodResponse` document, so these
//! tests exercise the full encode → POST → decode path over a real socket.

use std::sync::Arc;
use std::time::Duration;

use papercut_client::{CallError, EndpointConfig, NewUser, RpcArg, RpcClient};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

/// Maps a received request body to an HTTP status and response body.
type Responder = fn(&str) -> (u16, String);

struct Fixture {
    url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Fixture {
    async fn spawn(respond: Responder) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    serve_one(stream, log, respond).await;
                });
            }
        });

        Self {
            url: format!("http://{addr}"),
            requests,
        }
    }

    fn config(&self, token: &str) -> EndpointConfig {
        EndpointConfig::new(&self.url, token)
            .unwrap()
            .with_timeout(Duration::from_secs(5))
    }

    async fn recorded_requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }

    async fn last_request(&self) -> String {
        self.requests.lock().await.last().cloned().unwrap()
    }
}

async fn serve_one(mut stream: TcpStream, log: Arc<Mutex<Vec<String>>>, respond: Responder) {
    let Some(body) = read_request_body(&mut stream).await else {
        return;
    };
    log.lock().await.push(body.clone());

    let (status, reply) = respond(&body);
    let reason = if status == 200 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
        reply.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// Reads one HTTP request and returns its body, honoring Content-Length.
async fn read_request_body(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..pos]).to_ascii_lowercase();
            let content_length: usize = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(0);

            let body_start = pos + 4;
            while buf.len() < body_start + content_length {
                let n = stream.read(&mut chunk).await.ok()?;
                if n == 0 {
                    return None;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let body = &buf[body_start..body_start + content_length];
            return Some(String::from_utf8_lossy(body).to_string());
        }

        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn string_response(value: &str) -> (u16, String) {
    (
        200,
        format!(
            "<?xml version=\"1.0\"?><methodResponse><params><param><value><string>{value}</string></value></param></params></methodResponse>"
        ),
    )
}

fn array_response(items: &[&str]) -> (u16, String) {
    let values: String = items
        .iter()
        .map(|item| format!("<value><string>{item}</string></value>"))
        .collect();
    (
        200,
        format!(
            "<?xml version=\"1.0\"?><methodResponse><params><param><value><array><data>{values}</data></array></value></param></params></methodResponse>"
        ),
    )
}

fn empty_response() -> (u16, String) {
    (
        200,
        "<?xml version=\"1.0\"?><methodResponse><params/></methodResponse>".to_string(),
    )
}

fn fault_response(message: &str) -> (u16, String) {
    (
        200,
        format!(
            "<?xml version=\"1.0\"?><methodResponse><fault><value><struct>\
             <member><name>faultCode</name><value><int>-32601</int></value></member>\
             <member><name>faultString</name><value><string>{message}</string></value></member>\
             </struct></value></fault></methodResponse>"
        ),
    )
}

/// Scripted behavior of a small PaperCut-like server.
fn papercut_fixture(body: &str) -> (u16, String) {
    if body.contains("<methodName>api.getServerVersion</methodName>") {
        string_response("22.0.4")
    } else if body.contains("<methodName>api.listUserAccounts</methodName>") {
        array_response(&["jdoe", "asmith"])
    } else if body.contains("<methodName>api.getUserGroups</methodName>") {
        array_response(&["staff", "printing"])
    } else if body.contains("<methodName>api.listUserGroups</methodName>") {
        array_response(&["staff", "faculty"])
    } else if body.contains("<methodName>api.deleteExistingUser</methodName>")
        && body.contains("<string>ghost</string>")
    {
        fault_response("User does not exist: ghost")
    } else {
        empty_response()
    }
}

#[tokio::test]
async fn server_version_scalar_round_trip() {
    let fixture = Fixture::spawn(papercut_fixture).await;
    let client = RpcClient::new();

    let version = client
        .server_version(&fixture.config("tok"))
        .await
        .unwrap();
    assert_eq!(version, "22.0.4");
}

#[tokio::test]
async fn list_user_accounts_returns_usernames() {
    let fixture = Fixture::spawn(papercut_fixture).await;
    let client = RpcClient::new();

    let users = client
        .list_user_accounts(&fixture.config("tok"), 0, 1000)
        .await
        .unwrap();
    assert_eq!(users, vec!["jdoe".to_string(), "asmith".to_string()]);

    // The envelope carried the right method, the token first, then the
    // paging window as doubles in order.
    let request = fixture.last_request().await;
    assert!(request.contains("<methodName>api.listUserAccounts</methodName>"));
    let token = request.find("<string>tok</string>").unwrap();
    let offset = request.find("<double>0</double>").unwrap();
    let limit = request.find("<double>1000</double>").unwrap();
    assert!(token < offset && offset < limit);
}

#[tokio::test]
async fn deleting_missing_user_surfaces_the_fault() {
    let fixture = Fixture::spawn(papercut_fixture).await;
    let client = RpcClient::new();

    let err = client
        .delete_existing_user(&fixture.config("tok"), "ghost", false)
        .await
        .unwrap_err();

    assert!(err.is_fault());
    assert_eq!(err.fault_message(), Some("User does not exist: ghost"));
}

#[tokio::test]
async fn deleting_existing_user_succeeds() {
    let fixture = Fixture::spawn(papercut_fixture).await;
    let client = RpcClient::new();

    client
        .delete_existing_user(&fixture.config("tok"), "jdoe", false)
        .await
        .unwrap();

    let request = fixture.last_request().await;
    assert!(request.contains("<methodName>api.deleteExistingUser</methodName>"));
    assert!(request.contains("<boolean>0</boolean>"));
}

#[tokio::test]
async fn raw_call_preserves_argument_count_and_order() {
    let fixture = Fixture::spawn(papercut_fixture).await;
    let client = RpcClient::new();

    client
        .call(
            &fixture.config("secret"),
            "setUserProperty",
            &[
                RpcArg::Text("a&b".to_string()),
                RpcArg::Number(2.5),
                RpcArg::Bool(true),
            ],
        )
        .await
        .unwrap();

    let request = fixture.last_request().await;
    assert_eq!(request.matches("<param>").count(), 4); // token + 3 args
    let token = request.find("<string>secret</string>").unwrap();
    let text = request.find("<string>a&amp;b</string>").unwrap();
    let number = request.find("<double>2.5</double>").unwrap();
    let flag = request.find("<boolean>1</boolean>").unwrap();
    assert!(token < text && text < number && number < flag);
}

#[tokio::test]
async fn group_operation_envelopes_carry_method_and_args() {
    let fixture = Fixture::spawn(papercut_fixture).await;
    let client = RpcClient::new();
    let config = fixture.config("tok");

    client
        .rename_user_group(&config, "old-name", "new-name")
        .await
        .unwrap();
    let request = fixture.last_request().await;
    assert!(request.contains("<methodName>api.renameUserGroup</methodName>"));
    let old_at = request.find("<string>old-name</string>").unwrap();
    let new_at = request.find("<string>new-name</string>").unwrap();
    assert!(old_at < new_at);

    client.add_user_to_group(&config, "jdoe", "staff").await.unwrap();
    let request = fixture.last_request().await;
    assert!(request.contains("<methodName>api.addUserToGroup</methodName>"));
    let user_at = request.find("<string>jdoe</string>").unwrap();
    let group_at = request.find("<string>staff</string>").unwrap();
    assert!(user_at < group_at);

    client
        .remove_user_from_group(&config, "jdoe", "staff")
        .await
        .unwrap();
    let request = fixture.last_request().await;
    assert!(request.contains("<methodName>api.removeUserFromGroup</methodName>"));
    let user_at = request.find("<string>jdoe</string>").unwrap();
    let group_at = request.find("<string>staff</string>").unwrap();
    assert!(user_at < group_at);

    let groups = client.list_user_groups(&config, 0, 1000).await.unwrap();
    assert_eq!(groups, vec!["staff".to_string(), "faculty".to_string()]);
    let request = fixture.last_request().await;
    assert!(request.contains("<methodName>api.listUserGroups</methodName>"));
    let offset_at = request.find("<double>0</double>").unwrap();
    let limit_at = request.find("<double>1000</double>").unwrap();
    assert!(offset_at < limit_at);
}

#[tokio::test]
async fn http_error_status_is_a_transport_failure_not_a_fault() {
    fn always_500(_body: &str) -> (u16, String) {
        (500, "boom".to_string())
    }

    let fixture = Fixture::spawn(always_500).await;
    let client = RpcClient::new();

    let err = client
        .server_version(&fixture.config("tok"))
        .await
        .unwrap_err();
    assert!(matches!(err, CallError::Status { status } if status.as_u16() == 500));
}

#[tokio::test]
async fn non_xmlrpc_body_is_a_decode_error() {
    fn html_page(_body: &str) -> (u16, String) {
        (200, "<html><body>login required</body></html>".to_string())
    }

    let fixture = Fixture::spawn(html_page).await;
    let client = RpcClient::new();

    let err = client
        .server_version(&fixture.config("tok"))
        .await
        .unwrap_err();
    assert!(matches!(err, CallError::Decode(_)));
}

#[tokio::test]
async fn create_user_runs_the_full_sequence() {
    let fixture = Fixture::spawn(papercut_fixture).await;
    let client = RpcClient::new();

    let user = NewUser {
        username: "pat".to_string(),
        full_name: "Pat Doe".to_string(),
        email: Some("pat@example.com".to_string()),
        initial_balance: 5.0,
    };
    client
        .create_user(&fixture.config("tok"), &user)
        .await
        .unwrap();

    let requests = fixture.recorded_requests().await;
    let methods: Vec<&str> = requests
        .iter()
        .map(|r| {
            let start = r.find("<methodName>").unwrap() + "<methodName>".len();
            let end = r.find("</methodName>").unwrap();
            &r[start..end]
        })
        .collect();
    assert_eq!(
        methods,
        vec![
            "api.addNewUser",
            "api.setUserProperty",
            "api.setUserProperty",
            "api.adjustUserAccountBalance",
        ]
    );
    assert!(requests[1].contains("<string>full-name</string>"));
    assert!(requests[2].contains("<string>email</string>"));
    assert!(requests[3].contains("<string>Initial balance</string>"));
}
