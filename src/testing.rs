//! Test doubles shared by handler and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::openai_client::{ChatMessage, CompletionGateway, GatewayError, GenerationParams};
use crate::AppState;

/// Scripted stand-in for the OpenAI client: records every call and pops
/// pre-arranged responses, so tests can assert on call counts and on the
/// exact message sequence the handler built.
pub struct MockGateway {
    responses: Mutex<Vec<Result<String, GatewayError>>>,
    calls: AtomicUsize,
    seen_messages: Mutex<Vec<Vec<ChatMessage>>>,
    seen_params: Mutex<Vec<GenerationParams>>,
}

impl MockGateway {
    pub fn replying(text: &str) -> Self {
        Self::scripted(vec![Ok(text.to_string())])
    }

    pub fn failing(error: GatewayError) -> Self {
        Self::scripted(vec![Err(error)])
    }

    pub fn scripted(responses: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: AtomicUsize::new(0),
            seen_messages: Mutex::new(Vec::new()),
            seen_params: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.seen_messages
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_default()
    }

    pub fn last_params(&self) -> Option<GenerationParams> {
        self.seen_params.lock().unwrap().last().copied()
    }
}

#[async_trait]
impl CompletionGateway for MockGateway {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        params: GenerationParams,
    ) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_messages.lock().unwrap().push(messages);
        self.seen_params.lock().unwrap().push(params);

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("Mock response".to_string())
        } else {
            responses.remove(0)
        }
    }
}

pub fn state_with(gateway: Arc<MockGateway>) -> Arc<AppState> {
    Arc::new(AppState {
        gateway: Some(gateway),
    })
}

pub fn state_without_gateway() -> Arc<AppState> {
    Arc::new(AppState { gateway: None })
}
