//! End-to-end send cycles: reducer + dispatcher + a fake gateway, no terminal.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use duka::core::action::{APOLOGY_MESSAGE, Action, CLEAR_FAILED_NOTICE, Effect, update};
use duka::core::config::default_quick_replies;
use duka::core::state::App;
use duka::core::transcript::WELCOME_MESSAGE;
use duka::dispatch::Dispatcher;
use duka::gateway::{
    ChatGateway, ChatReply, ChatRequest, GatewayError, Language, MessageEntry, Sender,
};

// ============================================================================
// Fake gateway
// ============================================================================

/// Answers after a short pause and tracks how many sends overlap.
struct CountingGateway {
    reply: Result<ChatReply, GatewayError>,
    clear: Result<(), GatewayError>,
    requests: Mutex<Vec<ChatRequest>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl CountingGateway {
    fn new(reply: Result<ChatReply, GatewayError>) -> Self {
        Self {
            reply,
            clear: Ok(()),
            requests: Mutex::new(Vec::new()),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    fn sent(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatGateway for CountingGateway {
    fn name(&self) -> &str {
        "counting"
    }

    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, GatewayError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        tokio::time::sleep(Duration::from_millis(200)).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.reply.clone()
    }

    async fn clear_history(&self) -> Result<(), GatewayError> {
        self.clear.clone()
    }

    async fn fetch_history(&self) -> Vec<MessageEntry> {
        Vec::new()
    }
}

fn reply(text: &str, language: Option<Language>) -> ChatReply {
    ChatReply {
        response: text.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        language,
        stats: None,
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    app: App,
    dispatcher: Dispatcher,
    rx: mpsc::Receiver<Action>,
}

impl Harness {
    fn new(gateway: Arc<CountingGateway>) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut app = App::new(Language::En, "FashionHub Kenya");
        app.quick_replies = default_quick_replies();
        Self {
            app,
            dispatcher: Dispatcher::new(gateway, tx),
            rx,
        }
    }

    fn act(&mut self, action: Action) -> Effect {
        self.dispatcher.dispatch(update(&mut self.app, action))
    }

    /// Feeds background actions back into the reducer until `done` holds.
    async fn run_until(&mut self, done: impl Fn(&App) -> bool) {
        while !done(&self.app) {
            match self.rx.try_recv() {
                Ok(action) => {
                    self.act(action);
                }
                Err(_) => tokio::time::sleep(Duration::from_millis(10)).await,
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_full_send_cycle() {
    let gateway = Arc::new(CountingGateway::new(Ok(reply("Karibu sana!", None))));
    let mut h = Harness::new(gateway.clone());

    assert_eq!(h.act(Action::Submit("Habari".to_string())), Effect::None);
    assert!(h.app.composing);

    let started = tokio::time::Instant::now();
    h.run_until(|app| !app.is_sending()).await;

    // Gateway pause plus the display delay for a 12-char reply
    assert!(started.elapsed() >= Duration::from_millis(200 + 1240));
    assert!(!h.app.composing);
    let entries = h.app.transcript.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].sender, Sender::User);
    assert_eq!(entries[1].content, "Karibu sana!");
    assert_eq!(gateway.sent()[0].context.history_length, 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_submits_send_one_request() {
    let gateway = Arc::new(CountingGateway::new(Ok(reply("ok", None))));
    let mut h = Harness::new(gateway.clone());

    h.act(Action::Submit("one".to_string()));
    h.act(Action::Submit("two".to_string()));
    h.act(Action::QuickReply(0));
    h.run_until(|app| !app.is_sending()).await;

    assert_eq!(gateway.sent().len(), 1);
    assert_eq!(gateway.max_active.load(Ordering::SeqCst), 1);
    assert_eq!(h.app.transcript.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_sequential_sends_report_history_length() {
    let gateway = Arc::new(CountingGateway::new(Ok(reply("ok", None))));
    let mut h = Harness::new(gateway.clone());

    for text in ["one", "two", "three"] {
        h.act(Action::Submit(text.to_string()));
        h.run_until(|app| !app.is_sending()).await;
    }

    let lengths: Vec<usize> = gateway
        .sent()
        .iter()
        .map(|r| r.context.history_length)
        .collect();
    assert_eq!(lengths, vec![1, 3, 5]);
    assert_eq!(gateway.max_active.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_send_appends_apology() {
    let gateway = Arc::new(CountingGateway::new(Err(GatewayError::Network(
        "connection refused".to_string(),
    ))));
    let mut h = Harness::new(gateway);

    h.act(Action::Submit("Habari".to_string()));
    h.run_until(|app| !app.is_sending()).await;

    let entries = h.app.transcript.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].sender, Sender::Assistant);
    assert_eq!(entries[1].content, APOLOGY_MESSAGE);
    assert!(!h.app.composing);
}

#[tokio::test(start_paused = true)]
async fn test_reply_language_switches_session() {
    let gateway = Arc::new(CountingGateway::new(Ok(reply(
        "Tuna viatu vingi!",
        Some(Language::Sw),
    ))));
    let mut h = Harness::new(gateway.clone());

    h.act(Action::Submit("Nataka viatu".to_string()));
    h.run_until(|app| !app.is_sending()).await;
    assert_eq!(h.app.preferences.active(), Language::Sw);

    h.act(Action::Submit("Bei gani?".to_string()));
    h.run_until(|app| !app.is_sending()).await;
    assert_eq!(gateway.sent()[1].context.language, Language::Sw);
}

#[tokio::test(start_paused = true)]
async fn test_clear_then_failed_clear() {
    let gateway = Arc::new(CountingGateway::new(Ok(reply("ok", None))));
    let mut h = Harness::new(gateway);

    h.act(Action::Submit("hello".to_string()));
    h.run_until(|app| !app.is_sending()).await;

    h.act(Action::RequestClear);
    h.act(Action::ConfirmClear);
    h.run_until(|app| app.transcript.len() == 1).await;
    assert_eq!(h.app.transcript.entries()[0].sender, Sender::Assistant);

    let mut failing = CountingGateway::new(Ok(reply("ok", None)));
    failing.clear = Err(GatewayError::Api {
        status: 500,
        message: "boom".to_string(),
    });
    let mut h = Harness::new(Arc::new(failing));
    h.act(Action::Submit("keep me".to_string()));
    h.run_until(|app| !app.is_sending()).await;

    h.act(Action::RequestClear);
    h.act(Action::ConfirmClear);
    h.run_until(|app| app.notice.is_some()).await;
    assert_eq!(h.app.notice.as_deref(), Some(CLEAR_FAILED_NOTICE));
    assert_eq!(h.app.transcript.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_clear_during_send_keeps_reply_after_greeting() {
    let gateway = Arc::new(CountingGateway::new(Ok(reply("Karibu!", None))));
    let mut h = Harness::new(gateway);

    h.act(Action::Submit("hello".to_string()));
    // The remote clear finishes while the send is still waiting on the gateway
    h.act(Action::RequestClear);
    h.act(Action::ConfirmClear);
    h.run_until(|app| !app.is_sending()).await;

    let contents: Vec<&str> = h
        .app
        .transcript
        .entries()
        .iter()
        .map(|e| e.content.as_str())
        .collect();
    assert_eq!(contents, vec![WELCOME_MESSAGE, "Karibu!"]);
    assert!(!h.app.composing);
}
