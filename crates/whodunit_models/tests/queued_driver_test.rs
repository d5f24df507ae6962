//! Tests for routing completions through the task queue.

use async_trait::async_trait;
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use whodunit_core::{GenerateRequest, GenerateResponse, Message};
use whodunit_error::{ModelsError, ModelsErrorKind, QueueErrorKind, WhodunitErrorKind, WhodunitResult};
use whodunit_interface::CompletionDriver;
use whodunit_models::QueuedDriver;
use whodunit_queue::{QueueConfig, TaskQueue};

/// Echoes the last user message back, failing on "fail" and stalling on "stall".
#[derive(Default)]
struct EchoDriver {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl CompletionDriver for EchoDriver {
    async fn generate(&self, request: &GenerateRequest) -> WhodunitResult<GenerateResponse> {
        let prompt = request.messages().last().unwrap().content().clone();
        self.seen.lock().unwrap().push(prompt.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let delay = if prompt == "stall" { 3600 } else { 1 };
        tokio::time::sleep(Duration::from_millis(delay * 1000)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if prompt == "fail" {
            return Err(ModelsError::new(ModelsErrorKind::Api {
                status: 500,
                message: "upstream".to_string(),
            })
            .into());
        }
        Ok(GenerateResponse::new(format!("echo: {prompt}"), None))
    }

    fn provider_name(&self) -> &'static str {
        "echo"
    }

    fn model_name(&self) -> &str {
        "echo-1"
    }
}

fn request(text: &str) -> GenerateRequest {
    GenerateRequest::builder()
        .messages(vec![Message::user(text)])
        .build()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_callers_are_serialized_in_order() {
    let queue = Arc::new(TaskQueue::new(QueueConfig::event_driven("completions")));
    let driver = QueuedDriver::new(EchoDriver::default(), Arc::clone(&queue));

    let requests: Vec<_> = ["one", "two", "three", "four"]
        .iter()
        .map(|t| request(t))
        .collect();
    // join_all polls in vector order, so submissions happen in that order.
    let responses = join_all(requests.iter().map(|r| driver.generate(r))).await;

    let texts: Vec<_> = responses
        .into_iter()
        .map(|r| r.unwrap().into_text())
        .collect();
    assert_eq!(texts, ["echo: one", "echo: two", "echo: three", "echo: four"]);
    assert_eq!(driver.inner().peak.load(Ordering::SeqCst), 1);
    assert_eq!(*driver.inner().seen.lock().unwrap(), ["one", "two", "three", "four"]);
}

#[tokio::test(start_paused = true)]
async fn test_driver_error_is_returned_verbatim() {
    let queue = Arc::new(TaskQueue::new(QueueConfig::default()));
    let driver = QueuedDriver::new(EchoDriver::default(), queue);

    let err = driver.generate(&request("fail")).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        WhodunitErrorKind::Models(e) if e.kind == ModelsErrorKind::Api { status: 500, message: "upstream".to_string() }
    ));

    let ok = driver.generate(&request("after")).await.unwrap();
    assert_eq!(ok.text(), "echo: after");
}

#[tokio::test(start_paused = true)]
async fn test_queue_timeout_maps_to_queue_error() {
    let config = QueueConfig::default().with_task_timeout(Some(Duration::from_secs(120)));
    let driver = QueuedDriver::new(EchoDriver::default(), Arc::new(TaskQueue::new(config)));

    let err = driver.generate(&request("stall")).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        WhodunitErrorKind::Queue(e) if e.kind == QueueErrorKind::TimedOut(Duration::from_secs(120))
    ));
    assert_eq!(driver.provider_name(), "echo");
    assert_eq!(driver.model_name(), "echo-1");
}
