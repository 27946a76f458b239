//! Dispatch-layer integration tests
//!
//! These tests exercise the dispatcher and registry against recording and
//! failing strategy doubles, without any provider network traffic.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use herald::{
    Channel, DeliveryError, DeliveryStrategy, Dispatcher, Notification, NotifyError,
    StrategyRegistry,
};

/// Records every notification it is asked to deliver.
struct RecordingStrategy {
    provider: &'static str,
    calls: Mutex<Vec<Notification>>,
}

impl RecordingStrategy {
    fn new(provider: &'static str) -> Arc<Self> {
        Arc::new(Self {
            provider,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn captured(&self) -> Vec<Notification> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryStrategy for RecordingStrategy {
    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        self.calls.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Fails every delivery with the given cause.
struct FailingStrategy {
    provider: &'static str,
    detail: &'static str,
    calls: AtomicUsize,
}

impl FailingStrategy {
    fn new(provider: &'static str, detail: &'static str) -> Arc<Self> {
        Arc::new(Self {
            provider,
            detail,
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeliveryStrategy for FailingStrategy {
    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn send(&self, _notification: &Notification) -> Result<(), DeliveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DeliveryError::Sdk {
            provider: self.provider,
            detail: self.detail.to_string(),
        })
    }
}

/// Records after a short delay, to expose cancellation of in-flight sends.
struct SlowRecordingStrategy {
    inner: Arc<RecordingStrategy>,
    delay: Duration,
}

#[async_trait]
impl DeliveryStrategy for SlowRecordingStrategy {
    fn provider(&self) -> &'static str {
        self.inner.provider()
    }

    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        tokio::time::sleep(self.delay).await;
        self.inner.send(notification).await
    }
}

struct MockEnvironment {
    dispatcher: Dispatcher,
    email: Arc<RecordingStrategy>,
    sms: Arc<RecordingStrategy>,
    push: Arc<RecordingStrategy>,
    chat: Arc<RecordingStrategy>,
}

fn create_mock_environment() -> MockEnvironment {
    let email = RecordingStrategy::new("email-mock");
    let sms = RecordingStrategy::new("sms-mock");
    let push = RecordingStrategy::new("push-mock");
    let chat = RecordingStrategy::new("chat-mock");

    let registry = StrategyRegistry::with_strategies(
        email.clone(),
        sms.clone(),
        push.clone(),
        chat.clone(),
    );

    MockEnvironment {
        dispatcher: Dispatcher::new(registry),
        email,
        sms,
        push,
        chat,
    }
}

fn test_notification() -> Notification {
    Notification::builder("user@example.com", "Test Message")
        .subject("Test Subject")
        .trace_id("abc123")
        .build()
}

// =============================================================================
// Fan-out and aggregation
// =============================================================================

#[tokio::test]
async fn test_notify_all_channels_invokes_every_strategy_once() {
    let env = create_mock_environment();
    let notification = test_notification();

    let result = env
        .dispatcher
        .notify(
            &[Channel::Email, Channel::Sms, Channel::Push, Channel::Chat],
            &notification,
        )
        .await;

    assert!(result.is_ok());
    for strategy in [&env.email, &env.sms, &env.push, &env.chat] {
        let captured = strategy.captured();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].to, notification.to);
        assert_eq!(captured[0].subject, notification.subject);
        assert_eq!(captured[0].body, notification.body);
        assert_eq!(captured[0].trace_id(), "abc123");
    }
}

#[tokio::test]
async fn test_notify_only_selected_channels() {
    let env = create_mock_environment();

    let result = env
        .dispatcher
        .notify(&[Channel::Email, Channel::Chat], &test_notification())
        .await;

    assert!(result.is_ok());
    assert_eq!(env.email.call_count(), 1);
    assert_eq!(env.chat.call_count(), 1);
    assert_eq!(env.sms.call_count(), 0);
    assert_eq!(env.push.call_count(), 0);
}

#[tokio::test]
async fn test_duplicate_channels_fan_out_once_per_occurrence() {
    let env = create_mock_environment();

    let result = env
        .dispatcher
        .notify(&[Channel::Email, Channel::Email], &test_notification())
        .await;

    assert!(result.is_ok());
    assert_eq!(env.email.call_count(), 2);
}

#[tokio::test]
async fn test_empty_channel_set_is_a_trivial_success() {
    let env = create_mock_environment();

    let result = env.dispatcher.notify(&[], &test_notification()).await;

    assert!(result.is_ok());
    assert_eq!(env.email.call_count(), 0);
    assert_eq!(env.sms.call_count(), 0);
    assert_eq!(env.push.call_count(), 0);
    assert_eq!(env.chat.call_count(), 0);
}

// =============================================================================
// Unsupported channel names
// =============================================================================

#[tokio::test]
async fn test_unknown_channel_name_rejects_without_invoking_anything() {
    let env = create_mock_environment();

    let err = env
        .dispatcher
        .notify_named(["bogus-channel"], &test_notification())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        NotifyError::UnsupportedChannel(ref name) if name == "bogus-channel"
    ));
    assert!(err.to_string().contains("bogus-channel"));
    assert_eq!(env.email.call_count(), 0);
    assert_eq!(env.sms.call_count(), 0);
    assert_eq!(env.push.call_count(), 0);
    assert_eq!(env.chat.call_count(), 0);
}

#[tokio::test]
async fn test_one_unknown_name_fails_the_whole_call() {
    let env = create_mock_environment();

    // Valid names before and after the unknown one must not dispatch.
    let err = env
        .dispatcher
        .notify_named(["email", "bogus-channel", "chat"], &test_notification())
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::UnsupportedChannel(_)));
    assert_eq!(env.email.call_count(), 0);
    assert_eq!(env.chat.call_count(), 0);
}

#[tokio::test]
async fn test_notify_named_with_valid_names_dispatches() {
    let env = create_mock_environment();

    let result = env
        .dispatcher
        .notify_named(["email", "sms"], &test_notification())
        .await;

    assert!(result.is_ok());
    assert_eq!(env.email.call_count(), 1);
    assert_eq!(env.sms.call_count(), 1);
}

// =============================================================================
// Failure aggregation
// =============================================================================

#[tokio::test]
async fn test_failing_channel_surfaces_cause_and_siblings_still_run() {
    let email = RecordingStrategy::new("email-mock");
    let sms = FailingStrategy::new("sms-mock", "network timeout");
    let registry = StrategyRegistry::with_strategies(
        email.clone(),
        sms.clone(),
        RecordingStrategy::new("push-mock"),
        RecordingStrategy::new("chat-mock"),
    );
    let dispatcher = Dispatcher::new(registry);

    let err = dispatcher
        .notify(&[Channel::Email, Channel::Sms], &test_notification())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("network timeout"));
    match err {
        NotifyError::Delivery(report) => {
            assert_eq!(report.attempted, 2);
            assert_eq!(report.failures.len(), 1);
            assert_eq!(report.first().unwrap().channel, Channel::Sms);
        }
        other => panic!("expected a delivery failure, got: {other}"),
    }
    assert_eq!(email.call_count(), 1);
    assert_eq!(sms.call_count(), 1);
}

#[tokio::test]
async fn test_every_concurrent_failure_is_reported() {
    let email = RecordingStrategy::new("email-mock");
    let sms = FailingStrategy::new("sms-mock", "network timeout");
    let push = FailingStrategy::new("push-mock", "unregistered token");
    let registry = StrategyRegistry::with_strategies(
        email.clone(),
        sms.clone(),
        push.clone(),
        RecordingStrategy::new("chat-mock"),
    );
    let dispatcher = Dispatcher::new(registry);

    let err = dispatcher
        .notify(
            &[Channel::Sms, Channel::Push, Channel::Email],
            &test_notification(),
        )
        .await
        .unwrap_err();

    let rendered = err.to_string();
    assert!(rendered.contains("network timeout"));
    assert!(rendered.contains("unregistered token"));
    match err {
        NotifyError::Delivery(report) => {
            assert_eq!(report.attempted, 3);
            assert_eq!(report.failures.len(), 2);
        }
        other => panic!("expected a delivery failure, got: {other}"),
    }
    assert_eq!(email.call_count(), 1);
}

#[tokio::test]
async fn test_failure_does_not_cancel_in_flight_sibling() {
    let email_inner = RecordingStrategy::new("email-mock");
    let email = Arc::new(SlowRecordingStrategy {
        inner: email_inner.clone(),
        delay: Duration::from_millis(50),
    });
    let sms = FailingStrategy::new("sms-mock", "connection refused");
    let registry = StrategyRegistry::with_strategies(
        email,
        sms.clone(),
        RecordingStrategy::new("push-mock"),
        RecordingStrategy::new("chat-mock"),
    );
    let dispatcher = Dispatcher::new(registry);

    // The SMS strategy fails immediately; the slow email send must still
    // complete before the aggregate outcome is observable.
    let err = dispatcher
        .notify(&[Channel::Sms, Channel::Email], &test_notification())
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::Delivery(_)));
    assert_eq!(email_inner.call_count(), 1);
    assert_eq!(sms.call_count(), 1);
}

// =============================================================================
// Assembly
// =============================================================================

#[tokio::test]
async fn test_from_settings_propagates_construction_failure() {
    // Default settings select SendGrid for email with no credentials, so
    // assembly must fail before any dispatcher exists.
    let err = Dispatcher::from_settings(&herald::Settings::default()).unwrap_err();
    assert!(matches!(err, NotifyError::Config(_)));
    assert!(err.to_string().contains("sendgrid"));
}
