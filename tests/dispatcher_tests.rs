// Dispatcher tests - provider selection, fallback ordering, health sweep.

mod common;

use astrolabe_gateway::dispatcher::{ChatRequest, DispatchError, Dispatcher};
use astrolabe_gateway::model::{ModelClient, ModelError};
use astrolabe_gateway::types::{ChatMessage, MessageRole};
use common::{FakeClient, descriptor, dispatcher};
use std::sync::atomic::Ordering;
use std::time::Duration;

fn chat(provider: Option<&str>) -> ChatRequest {
    ChatRequest {
        messages: vec![ChatMessage::text(MessageRole::User, "hi")],
        provider: provider.map(str::to_string),
        ..ChatRequest::default()
    }
}

#[tokio::test]
async fn explicit_provider_is_called_exactly_once() {
    let groq = FakeClient::healthy("groq");
    let openai = FakeClient::healthy("openai");
    let groq_calls = groq.calls.clone();
    let openai_calls = openai.calls.clone();

    let dispatcher = dispatcher(vec![
        (descriptor("openai", "gpt-4o"), Box::new(openai)),
        (
            descriptor("groq", "llama-3.3-70b-versatile"),
            Box::new(groq),
        ),
    ]);

    let response = dispatcher
        .process_request(chat(Some("groq")))
        .await
        .expect("explicit groq call should succeed");

    assert!(!response.text.is_empty());
    assert_eq!(response.provider, "groq");
    assert_eq!(response.model, "llama-3.3-70b-versatile");
    assert_eq!(groq_calls.load(Ordering::SeqCst), 1);
    assert_eq!(openai_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn explicit_provider_failure_propagates_without_fallback() {
    let groq = FakeClient::failing("groq");
    let openai = FakeClient::healthy("openai");
    let openai_calls = openai.calls.clone();

    let dispatcher = dispatcher(vec![
        (
            descriptor("groq", "llama-3.3-70b-versatile"),
            Box::new(groq),
        ),
        (descriptor("openai", "gpt-4o"), Box::new(openai)),
    ]);

    let error = dispatcher
        .process_request(chat(Some("groq")))
        .await
        .expect_err("scripted failure should propagate");

    assert!(matches!(
        error,
        DispatchError::Provider { ref provider, .. } if provider == "groq"
    ));
    assert_eq!(openai_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fallback_returns_first_reachable_provider() {
    let gateway = FakeClient::failing("vercelGateway");
    let anthropic = FakeClient::failing("anthropic");
    let openai = FakeClient::healthy("openai");
    let google = FakeClient::healthy("google");
    let groq = FakeClient::healthy("groq");
    let gateway_calls = gateway.calls.clone();
    let anthropic_calls = anthropic.calls.clone();
    let google_calls = google.calls.clone();
    let groq_calls = groq.calls.clone();

    let dispatcher = dispatcher(vec![
        (descriptor("vercelGateway", "gpt-4o"), Box::new(gateway)),
        (
            descriptor("anthropic", "claude-3-5-sonnet-20241022"),
            Box::new(anthropic),
        ),
        (descriptor("openai", "gpt-4o"), Box::new(openai)),
        (descriptor("google", "gemini-1.5-pro"), Box::new(google)),
        (
            descriptor("groq", "llama-3.3-70b-versatile"),
            Box::new(groq),
        ),
    ]);

    let response = dispatcher
        .process_request(chat(None))
        .await
        .expect("third provider should serve the request");

    assert_eq!(response.provider, "openai");
    assert_eq!(gateway_calls.load(Ordering::SeqCst), 1);
    assert_eq!(anthropic_calls.load(Ordering::SeqCst), 1);
    assert_eq!(google_calls.load(Ordering::SeqCst), 0);
    assert_eq!(groq_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fallback_exhaustion_reports_total_unavailability() {
    let dispatcher = dispatcher(vec![
        (
            descriptor("vercelGateway", "gpt-4o"),
            Box::new(FakeClient::failing("vercelGateway")) as Box<dyn ModelClient>,
        ),
        (
            descriptor("anthropic", "claude-3-5-sonnet-20241022"),
            Box::new(FakeClient::failing("anthropic")),
        ),
        (
            descriptor("openai", "gpt-4o"),
            Box::new(FakeClient::failing("openai")),
        ),
        (
            descriptor("google", "gemini-1.5-pro"),
            Box::new(FakeClient::failing("google")),
        ),
        (
            descriptor("groq", "llama-3.3-70b-versatile"),
            Box::new(FakeClient::failing("groq")),
        ),
    ]);

    let error = dispatcher
        .process_request(chat(None))
        .await
        .expect_err("every provider fails");

    assert!(matches!(error, DispatchError::AllProvidersExhausted));
}

#[tokio::test]
async fn unknown_provider_is_rejected_immediately() {
    let groq = FakeClient::healthy("groq");
    let groq_calls = groq.calls.clone();
    let dispatcher = dispatcher(vec![(
        descriptor("groq", "llama-3.3-70b-versatile"),
        Box::new(groq),
    )]);

    let error = dispatcher
        .process_request(chat(Some("mystery")))
        .await
        .expect_err("unconfigured provider name");

    assert!(matches!(
        error,
        DispatchError::UnknownProvider { ref provider } if provider == "mystery"
    ));
    assert_eq!(groq_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_messages_are_rejected() {
    let dispatcher = dispatcher(vec![(
        descriptor("groq", "llama-3.3-70b-versatile"),
        Box::new(FakeClient::healthy("groq")) as Box<dyn ModelClient>,
    )]);

    let request = ChatRequest::default();
    let error = dispatcher
        .process_request(request)
        .await
        .expect_err("empty conversation");
    assert!(matches!(error, DispatchError::Validation { .. }));
}

#[tokio::test]
async fn non_finite_temperature_is_rejected() {
    let dispatcher = dispatcher(vec![(
        descriptor("groq", "llama-3.3-70b-versatile"),
        Box::new(FakeClient::healthy("groq")) as Box<dyn ModelClient>,
    )]);

    let mut request = chat(None);
    request.temperature = Some(f32::NAN);
    let error = dispatcher
        .process_request(request)
        .await
        .expect_err("non-finite temperature");
    assert!(matches!(error, DispatchError::Validation { .. }));
}

#[tokio::test]
async fn zero_max_tokens_is_rejected() {
    let dispatcher = dispatcher(vec![(
        descriptor("groq", "llama-3.3-70b-versatile"),
        Box::new(FakeClient::healthy("groq")) as Box<dyn ModelClient>,
    )]);

    let mut request = chat(None);
    request.max_tokens = Some(0);
    let error = dispatcher
        .process_request(request)
        .await
        .expect_err("zero token bound");
    assert!(matches!(error, DispatchError::Validation { .. }));
}

#[tokio::test]
async fn temperature_defaults_when_caller_omits_it() {
    let groq = FakeClient::healthy("groq");
    let last_request = groq.last_request.clone();
    let dispatcher = dispatcher(vec![(
        descriptor("groq", "llama-3.3-70b-versatile"),
        Box::new(groq),
    )]);

    dispatcher
        .process_request(chat(Some("groq")))
        .await
        .expect("healthy backend");

    let seen = last_request.lock().unwrap().take().expect("request captured");
    assert_eq!(seen.temperature, 0.7);
    assert_eq!(seen.max_tokens, None);
}

#[tokio::test]
async fn model_override_takes_precedence_over_default() {
    let groq = FakeClient::healthy("groq");
    let last_request = groq.last_request.clone();
    let dispatcher = dispatcher(vec![(
        descriptor("groq", "llama-3.3-70b-versatile"),
        Box::new(groq),
    )]);

    let mut request = chat(Some("groq"));
    request.model = Some("llama-3.1-8b-instant".to_string());
    let response = dispatcher.process_request(request).await.expect("model override accepted");

    assert_eq!(response.model, "llama-3.1-8b-instant");
    let seen = last_request.lock().unwrap().take().expect("request captured");
    assert_eq!(seen.model, "llama-3.1-8b-instant");
}

#[tokio::test]
async fn stream_flag_selects_streaming_capability() {
    let groq = FakeClient::healthy("groq");
    let calls = groq.calls.clone();
    let streaming_calls = groq.streaming_calls.clone();
    let dispatcher = dispatcher(vec![(
        descriptor("groq", "llama-3.3-70b-versatile"),
        Box::new(groq),
    )]);

    let mut request = chat(Some("groq"));
    request.stream = true;
    let response = dispatcher.process_request(request).await.expect("streaming call succeeds");

    assert_eq!(response.text, "response from groq");
    assert_eq!(streaming_calls.load(Ordering::SeqCst), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn repeated_requests_tag_the_same_provider_and_model() {
    let dispatcher = dispatcher(vec![
        (
            descriptor("anthropic", "claude-3-5-sonnet-20241022"),
            Box::new(FakeClient::healthy("anthropic")) as Box<dyn ModelClient>,
        ),
        (
            descriptor("groq", "llama-3.3-70b-versatile"),
            Box::new(FakeClient::healthy("groq")),
        ),
    ]);

    let first = dispatcher.process_request(chat(None)).await.expect("first request");
    let second = dispatcher.process_request(chat(None)).await.expect("second request");

    assert_eq!(first.provider, second.provider);
    assert_eq!(first.model, second.model);
}

#[tokio::test]
async fn slow_provider_hits_the_attempt_deadline() {
    let slow = FakeClient::slow("groq", Duration::from_millis(200));
    let backends: Vec<(_, Box<dyn ModelClient>)> = vec![(
        descriptor("groq", "llama-3.3-70b-versatile"),
        Box::new(slow) as Box<dyn ModelClient>,
    )];
    let priority = vec!["groq".to_string()];
    let dispatcher = Dispatcher::new(backends, priority, Duration::from_millis(20));

    let error = dispatcher
        .process_request(chat(Some("groq")))
        .await
        .expect_err("deadline should expire first");

    assert!(matches!(
        error,
        DispatchError::Provider {
            source: ModelError::Timeout { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn health_report_covers_every_priority_provider() {
    let dispatcher = dispatcher(vec![
        (
            descriptor("vercelGateway", "gpt-4o"),
            Box::new(FakeClient::healthy("vercelGateway")) as Box<dyn ModelClient>,
        ),
        (
            descriptor("anthropic", "claude-3-5-sonnet-20241022"),
            Box::new(FakeClient::failing("anthropic")),
        ),
        (
            descriptor("openai", "gpt-4o"),
            Box::new(FakeClient::healthy("openai")),
        ),
        (
            descriptor("google", "gemini-1.5-pro"),
            Box::new(FakeClient::healthy("google")),
        ),
        (
            descriptor("groq", "llama-3.3-70b-versatile"),
            Box::new(FakeClient::healthy("groq")),
        ),
    ]);

    let report = dispatcher.health_check().await;

    assert_eq!(report.len(), 5);
    assert_eq!(report["vercelGateway"], true);
    assert_eq!(report["anthropic"], false);
    assert_eq!(report["openai"], true);
    assert_eq!(report["google"], true);
    assert_eq!(report["groq"], true);
}

#[tokio::test]
async fn health_probe_uses_minimal_request() {
    let groq = FakeClient::healthy("groq");
    let last_request = groq.last_request.clone();
    let dispatcher = dispatcher(vec![(
        descriptor("groq", "llama-3.3-70b-versatile"),
        Box::new(groq),
    )]);

    let report = dispatcher.health_check().await;
    assert_eq!(report["groq"], true);

    let seen = last_request.lock().unwrap().take().expect("probe captured");
    assert_eq!(seen.max_tokens, Some(10));
    assert_eq!(seen.messages.len(), 1);
    assert_eq!(seen.messages[0].content.as_text(), Some("Hello"));
}
