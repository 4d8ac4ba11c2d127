//! Exercises the HTTP provider against a canned local server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use affinity_core::config::AnalysisConfig;
use affinity_core::errors::{AffinityError, AnalysisError};
use affinity_core::models::Message;
use affinity_core::traits::IAnalysisProvider;
use affinity_embeddings::ApiAnalysisProvider;

struct Captured {
    request_line: String,
    authorization: Option<String>,
    body: serde_json::Value,
}

/// Serve `responses` in order, one connection each, and report what was received.
fn serve(responses: Vec<(u16, String)>) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_length = 0usize;
            let mut authorization = None;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                let lower = line.to_ascii_lowercase();
                if let Some(v) = lower.strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
                if lower.starts_with("authorization:") {
                    authorization = Some(line["authorization:".len()..].trim().to_string());
                }
            }
            let mut raw = vec![0u8; content_length];
            reader.read_exact(&mut raw).unwrap();
            tx.send(Captured {
                request_line: request_line.trim_end().to_string(),
                authorization,
                body: serde_json::from_slice(&raw).unwrap_or(serde_json::Value::Null),
            })
            .unwrap();

            let reason = if status == 200 { "OK" } else { "Error" };
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
        }
    });

    (format!("http://{addr}/v1/"), rx)
}

fn config(endpoint: String, dimensions: usize) -> AnalysisConfig {
    AnalysisConfig {
        endpoint,
        dimensions,
        request_timeout_secs: 5,
        ..AnalysisConfig::default()
    }
}

fn chat_reply(content: &str) -> String {
    serde_json::json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
        .to_string()
}

fn embedding_reply(v: &[f32]) -> String {
    serde_json::json!({ "data": [{ "embedding": v }] }).to_string()
}

#[test]
fn chat_then_embedding_round() {
    let (endpoint, rx) = serve(vec![
        (200, chat_reply("curious, hiking, outdoorsy")),
        (200, embedding_reply(&[0.1, 0.2, 0.3])),
    ]);
    let provider = ApiAnalysisProvider::with_api_key(&config(endpoint, 3), "sk-test".into()).unwrap();

    let out = provider
        .analyze(&[Message::user("I went hiking"), Message::assistant("Where?")])
        .unwrap();
    assert_eq!(out.analysis, "curious, hiking, outdoorsy");
    assert_eq!(out.embedding, vec![0.1, 0.2, 0.3]);

    let chat = rx.recv().unwrap();
    assert_eq!(chat.request_line, "POST /v1/chat/completions HTTP/1.1");
    assert_eq!(chat.authorization.as_deref(), Some("Bearer sk-test"));
    assert_eq!(chat.body["model"], "gpt-4-turbo-preview");
    assert_eq!(chat.body["max_tokens"], 200);
    assert_eq!(chat.body["messages"][0]["role"], "system");
    let prompt = chat.body["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains("USER: I went hiking\nASSISTANT: Where?"));

    let embed = rx.recv().unwrap();
    assert_eq!(embed.request_line, "POST /v1/embeddings HTTP/1.1");
    assert_eq!(embed.body["model"], "text-embedding-3-small");
    assert_eq!(embed.body["input"], "curious, hiking, outdoorsy");
    assert_eq!(embed.body["encoding_format"], "float");
}

#[test]
fn wrong_dimension_is_rejected() {
    let (endpoint, _rx) = serve(vec![
        (200, chat_reply("calm")),
        (200, embedding_reply(&[1.0, 0.0])),
    ]);
    let provider = ApiAnalysisProvider::with_api_key(&config(endpoint, 3), "k".into()).unwrap();

    let err = provider.analyze(&[Message::user("hello")]).unwrap_err();
    assert!(matches!(
        err,
        AffinityError::AnalysisError(AnalysisError::DimensionMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

#[test]
fn http_error_is_request_failure() {
    let (endpoint, _rx) = serve(vec![(500, r#"{"error":"boom"}"#.to_string())]);
    let provider = ApiAnalysisProvider::with_api_key(&config(endpoint, 3), "k".into()).unwrap();

    let err = provider.analyze(&[Message::user("hello")]).unwrap_err();
    assert!(matches!(
        err,
        AffinityError::AnalysisError(AnalysisError::RequestFailed { .. })
    ));
}

#[test]
fn empty_completion_is_invalid() {
    let (endpoint, _rx) = serve(vec![(200, chat_reply("   "))]);
    let provider = ApiAnalysisProvider::with_api_key(&config(endpoint, 3), "k".into()).unwrap();

    let err = provider.analyze(&[Message::user("hello")]).unwrap_err();
    assert!(matches!(
        err,
        AffinityError::AnalysisError(AnalysisError::InvalidResponse { .. })
    ));
}

#[test]
fn missing_key_makes_provider_unavailable() {
    let config = AnalysisConfig {
        api_key_env: "AFFINITY_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
        ..AnalysisConfig::default()
    };
    assert!(ApiAnalysisProvider::from_config(&config).is_err());

    let fallback = affinity_embeddings::create_provider(&config);
    assert_eq!(fallback.name(), "local-hashing");
    assert_eq!(fallback.dimensions(), config.dimensions);
}
