//! Ollama LLM Gateway implementation

use super::error::{OllamaError, Result};
use super::protocol::{ChatBody, normalize_reply};
use async_trait::async_trait;
use std::time::Duration;
use termagent_application::ports::llm_gateway::{ChatRequest, GatewayError, LlmGateway};
use termagent_domain::AssistantReply;
use tracing::{debug, info};

/// Default host for the hosted Ollama service
pub const DEFAULT_HOST: &str = "https://ollama.com";

/// Default per-request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 300;

/// Connection settings for [`OllamaLlmGateway`]
#[derive(Debug, Clone)]
pub struct OllamaSettings {
    pub host: String,
    /// Sent as a Bearer token when present
    pub api_key: Option<String>,
    pub request_timeout: Duration,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

/// LLM Gateway implementation for the Ollama chat API
///
/// One non-streaming `POST {host}/api/chat` per [`LlmGateway::chat`] call.
#[derive(Debug, Clone)]
pub struct OllamaLlmGateway {
    client: reqwest::Client,
    settings: OllamaSettings,
}

impl OllamaLlmGateway {
    pub fn new(settings: OllamaSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;

        info!("OllamaLlmGateway initialized (host: {})", settings.host);

        Ok(Self { client, settings })
    }

    pub fn host(&self) -> &str {
        &self.settings.host
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.settings.host.trim_end_matches('/'))
    }

    fn classify(&self, err: reqwest::Error) -> OllamaError {
        if err.is_timeout() {
            OllamaError::Timeout(self.settings.request_timeout.as_secs())
        } else if err.is_connect() {
            OllamaError::Connect {
                host: self.settings.host.clone(),
                source: err,
            }
        } else {
            OllamaError::Http(err)
        }
    }

    async fn send(&self, request: ChatRequest<'_>) -> Result<AssistantReply> {
        let body = ChatBody::new(request.model.as_str(), request.messages, request.tools);

        let mut builder = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = self.settings.api_key.as_deref().filter(|k| !k.is_empty()) {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(OllamaError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| OllamaError::InvalidBody(e.to_string()))?;
        check_reply_body(&json)?;
        Ok(normalize_reply(&json))
    }
}

/// A 2xx body must carry a `message` object and no `error` field.
fn check_reply_body(body: &serde_json::Value) -> Result<()> {
    if let Some(error) = body.get("error") {
        let detail = error
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| error.to_string());
        return Err(OllamaError::InvalidBody(detail));
    }
    if !body.get("message").is_some_and(|m| m.is_object()) {
        return Err(OllamaError::InvalidBody("missing 'message' object".to_string()));
    }
    Ok(())
}

#[async_trait]
impl LlmGateway for OllamaLlmGateway {
    async fn chat(&self, request: ChatRequest<'_>) -> std::result::Result<AssistantReply, GatewayError> {
        debug!(
            "POST {} (model: {}, messages: {}, tools: {})",
            self.endpoint(),
            request.model,
            request.messages.len(),
            request.tools.len()
        );
        let reply = self.send(request).await?;
        debug!(
            "Reply: {} chars, {} tool call(s)",
            reply.content.len(),
            reply.tool_calls.len()
        );
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termagent_domain::{Message, Model};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response; resolves to the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw);
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let (k, v) = l.split_once(':')?;
                            k.eq_ignore_ascii_case("content-length")
                                .then(|| v.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&raw).into_owned()
        });

        (host, handle)
    }

    fn gateway(host: String, api_key: Option<&str>) -> OllamaLlmGateway {
        OllamaLlmGateway::new(OllamaSettings {
            host,
            api_key: api_key.map(String::from),
            request_timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let (host, server) = serve_once(
            "200 OK",
            r#"{"message":{"role":"assistant","content":"","tool_calls":[{"function":{"name":"list_directory","arguments":{"path":"."}}}]},"done":true}"#,
        )
        .await;

        let model = Model::default();
        let messages = vec![Message::system("sys"), Message::user("list files")];
        let reply = gateway(host, Some("secret"))
            .chat(ChatRequest {
                model: &model,
                messages: &messages,
                tools: &[],
            })
            .await
            .unwrap();

        assert_eq!(reply.tool_calls.len(), 1);
        assert_eq!(reply.tool_calls[0].tool_name, "list_directory");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/chat"));
        assert!(request.to_lowercase().contains("authorization: bearer secret"));
        assert!(request.contains("\"stream\":false"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_request_failed() {
        let (host, _server) = serve_once("500 Internal Server Error", r#"{"error":"model overloaded"}"#).await;

        let model = Model::default();
        let err = gateway(host, None)
            .chat(ChatRequest {
                model: &model,
                messages: &[],
                tools: &[],
            })
            .await
            .unwrap_err();

        match err {
            GatewayError::RequestFailed(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("model overloaded"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_status_with_error_body_is_invalid_response() {
        let (host, _server) = serve_once("200 OK", r#"{"error":"model 'nope' not found"}"#).await;

        let model = Model::default();
        let err = gateway(host, None)
            .chat(ChatRequest {
                model: &model,
                messages: &[],
                tools: &[],
            })
            .await
            .unwrap_err();

        match err {
            GatewayError::InvalidResponse(msg) => assert!(msg.contains("model 'nope' not found")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_check_reply_body() {
        use serde_json::json;
        assert!(check_reply_body(&json!({"message": {"content": "hi"}})).is_ok());
        assert!(check_reply_body(&json!({"done": true})).is_err());
        assert!(check_reply_body(&json!({"message": "hi"})).is_err());
        assert!(check_reply_body(&json!({"message": {}, "error": {"code": 1}})).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let model = Model::default();
        let err = gateway(host, None)
            .chat(ChatRequest {
                model: &model,
                messages: &[],
                tools: &[],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ConnectionError(_)));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let gw = gateway("http://localhost:11434/".to_string(), None);
        assert_eq!(gw.endpoint(), "http://localhost:11434/api/chat");
        assert_eq!(gw.host(), "http://localhost:11434/");
    }
}
