//! A stand-in for Chrome's DevTools endpoints.
//!
//! HTTP discovery (`/json/version`, `/json/new`) is served by wiremock; the
//! WebSocket side answers each command through a handler and sends an event
//! frame before every reply, like a page with `Page`/`Runtime` activity.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Reply to one command: a result object or a CDP error `(code, message)`.
pub type Reply = Result<Value, (i64, String)>;

type Handler = Arc<dyn Fn(&str, &Value) -> Reply + Send + Sync>;

pub struct FakeChrome {
    pub http: MockServer,
    /// Methods received over the WebSocket, in order.
    pub calls: Arc<Mutex<Vec<String>>>,
    /// Event frames sent alongside replies.
    pub events_sent: Arc<Mutex<usize>>,
}

impl FakeChrome {
    /// Start both endpoints. `handler` answers every command; the attach and
    /// target commands get sensible defaults when it returns `Ok(Null)`.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&str, &Value) -> Reply + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        let calls = Arc::new(Mutex::new(Vec::new()));
        let events_sent = Arc::new(Mutex::new(0));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let ws_url = format!(
            "ws://{}/devtools/browser/fake",
            listener.local_addr().unwrap()
        );
        tokio::spawn(serve_ws(
            listener,
            handler,
            calls.clone(),
            events_sent.clone(),
        ));

        let http = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Browser": "Chrome/126.0.6478.126",
                "Protocol-Version": "1.3",
                "webSocketDebuggerUrl": ws_url,
            })))
            .mount(&http)
            .await;
        Mock::given(method("PUT"))
            .and(path("/json/new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "T1",
                "type": "page",
                "url": "about:blank",
            })))
            .mount(&http)
            .await;

        Self {
            http,
            calls,
            events_sent,
        }
    }

    pub fn port(&self) -> u16 {
        self.http.address().port()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls.lock().iter().filter(|m| *m == method).count()
    }
}

async fn serve_ws(
    listener: TcpListener,
    handler: Handler,
    calls: Arc<Mutex<Vec<String>>>,
    events_sent: Arc<Mutex<usize>>,
) {
    let Ok((stream, _)) = listener.accept().await else {
        return;
    };
    let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
        return;
    };

    while let Some(Ok(msg)) = ws.next().await {
        let Message::Text(text) = msg else {
            continue;
        };
        let Ok(request) = serde_json::from_str::<Value>(&text) else {
            continue;
        };
        let id = request["id"].clone();
        let method = request["method"].as_str().unwrap_or_default().to_string();
        let params = request.get("params").cloned().unwrap_or(Value::Null);
        calls.lock().push(method.clone());

        let event = json!({
            "method": "Runtime.consoleAPICalled",
            "params": {"type": "log", "args": []},
            "sessionId": request["sessionId"],
        });
        if ws.send(Message::Text(event.to_string().into())).await.is_err() {
            return;
        }
        *events_sent.lock() += 1;

        let reply = match handler(&method, &params) {
            Ok(Value::Null) => Ok(default_result(&method)),
            other => other,
        };
        let frame = match reply {
            Ok(result) => json!({"id": id, "result": result}),
            Err((code, message)) => json!({"id": id, "error": {"code": code, "message": message}}),
        };
        if ws.send(Message::Text(frame.to_string().into())).await.is_err() {
            return;
        }
    }
}

fn default_result(method: &str) -> Value {
    match method {
        "Target.attachToTarget" => json!({"sessionId": "S1"}),
        "Page.navigate" => json!({"frameId": "F1"}),
        _ => json!({}),
    }
}

/// `Runtime.evaluate` result carrying `value`.
pub fn js_value(value: Value) -> Reply {
    Ok(json!({"result": {"type": "object", "value": value}}))
}

/// `Runtime.evaluate` result for a thrown exception.
pub fn js_exception(text: &str) -> Reply {
    Ok(json!({
        "result": {"type": "object", "subtype": "error"},
        "exceptionDetails": {"text": text},
    }))
}

/// Whether `params` evaluates `document.readyState`.
pub fn is_ready_state(params: &Value) -> bool {
    params["expression"].as_str() == Some("document.readyState")
}
