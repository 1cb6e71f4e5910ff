use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::settings::GameSettings;
use crate::engine::error::GenerationFailure;

/// Opaque text generator the turn engine asks for situations and outcomes.
/// A call may block for as long as the implementation likes.
pub trait ContentGenerator {
    fn generate(&mut self, prompt: &str) -> Result<String, GenerationFailure>;
}

impl<G: ContentGenerator + ?Sized> ContentGenerator for Box<G> {
    fn generate(&mut self, prompt: &str) -> Result<String, GenerationFailure> {
        (**self).generate(prompt)
    }
}

#[derive(Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
pub struct Choice {
    pub message: ChatMessageResponse,
}

#[derive(Deserialize)]
pub struct ChatMessageResponse {
    pub content: Option<String>,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

/// Blocking client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatCompletionsClient {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
}

impl ChatCompletionsClient {
    pub fn new(settings: &GameSettings) -> Result<Self, GenerationFailure> {
        // The builder applies its own default timeout unless told otherwise,
        // so `None` has to be passed explicitly.
        let client = Client::builder()
            .timeout(settings.request_timeout_secs.map(Duration::from_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            api_key: settings.api_key(),
        })
    }

    pub fn test_connection(&self) -> Result<String, GenerationFailure> {
        let mut req = self.client.get(format!("{}/models", self.endpoint));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send()?;
        if !resp.status().is_success() {
            return Err(GenerationFailure::Status {
                status: resp.status().as_u16(),
                body: resp.text().unwrap_or_default(),
            });
        }
        let models: ModelList = resp.json()?;

        Ok(format!(
            "Connected to {} ({} models available)",
            self.endpoint,
            models.data.len()
        ))
    }
}

impl ContentGenerator for ChatCompletionsClient {
    fn generate(&mut self, prompt: &str) -> Result<String, GenerationFailure> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user".into(),
                content: prompt.to_string(),
            }],
        };

        let mut req = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GenerationFailure::Status {
                status: status.as_u16(),
                body: resp.text().unwrap_or_default(),
            });
        }

        let completion: ChatCompletionResponse = resp.json()?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationFailure::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Instant;

    const REPLY: &str =
        r#"{"choices":[{"message":{"role":"assistant","content":"{\"text\":\"hi\"}"}}]}"#;

    /// Answers one request with a canned response after `delay` and hands back
    /// the raw request text.
    fn serve_once(
        status: &'static str,
        body: &'static str,
        delay: Duration,
    ) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/v1", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request = String::new();
            let mut length = 0;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        length = value.trim().parse().unwrap();
                    }
                }
                request.push_str(&line);
            }
            let mut payload = vec![0; length];
            reader.read_exact(&mut payload).unwrap();
            request.push_str(&String::from_utf8_lossy(&payload));

            thread::sleep(delay);
            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
                 Connection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
            let _ = tx.send(request);
        });

        (endpoint, rx)
    }

    fn client(endpoint: String, request_timeout_secs: Option<u64>) -> ChatCompletionsClient {
        let settings = GameSettings {
            endpoint,
            request_timeout_secs,
            api_key_env: "LIFE_SIM_TEST_KEY_NEVER_SET".into(),
            ..GameSettings::default()
        };
        ChatCompletionsClient::new(&settings).unwrap()
    }

    #[test]
    fn returns_first_choice_content() {
        let (endpoint, requests) = serve_once("200 OK", REPLY, Duration::ZERO);
        let mut client = client(endpoint, None);

        assert_eq!(client.generate("hello").unwrap(), r#"{"text":"hi"}"#);

        let request = requests.recv().unwrap();
        assert!(request.starts_with("POST /v1/chat/completions "));
        assert!(request.contains(r#""model":"local-model""#));
        assert!(request.contains(r#""content":"hello""#));
        assert!(!request.to_lowercase().contains("authorization:"));
    }

    #[test]
    fn attaches_bearer_token_when_configured() {
        let (endpoint, requests) = serve_once("200 OK", REPLY, Duration::ZERO);
        let mut client = client(endpoint, None);
        client.api_key = Some("secret-token".into());

        client.generate("hello").unwrap();

        let request = requests.recv().unwrap().to_lowercase();
        assert!(request.contains("authorization: bearer secret-token"));
    }

    #[test]
    fn non_success_status_keeps_code_and_body() {
        let (endpoint, _requests) =
            serve_once("503 Service Unavailable", "model not loaded", Duration::ZERO);
        let mut client = client(endpoint, None);

        match client.generate("hello") {
            Err(GenerationFailure::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "model not loaded");
            }
            other => panic!("expected a status failure, got {:?}", other),
        }
    }

    #[test]
    fn blank_or_null_content_is_an_empty_completion() {
        for body in [
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
            r#"{"choices":[{"message":{"role":"assistant","content":"  \n "}}]}"#,
            r#"{"choices":[]}"#,
        ] {
            let (endpoint, _requests) = serve_once("200 OK", body, Duration::ZERO);
            let mut client = client(endpoint, None);
            assert!(
                matches!(client.generate("hello"), Err(GenerationFailure::EmptyCompletion)),
                "{}",
                body
            );
        }
    }

    #[test]
    fn configured_timeout_gives_up_on_a_silent_server() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/v1", listener.local_addr().unwrap());
        thread::spawn(move || {
            let _held = listener.accept();
            thread::sleep(Duration::from_secs(10));
        });
        let mut client = client(endpoint, Some(1));

        let started = Instant::now();
        let result = client.generate("hello");

        assert!(matches!(result, Err(GenerationFailure::Request(_))));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn unset_timeout_waits_past_the_http_default() {
        // reqwest's blocking client gives up after 30 s unless told otherwise.
        let (endpoint, _requests) = serve_once("200 OK", REPLY, Duration::from_secs(32));
        let mut client = client(endpoint, None);

        assert_eq!(client.generate("hello").unwrap(), r#"{"text":"hi"}"#);
    }
}
