use common::{
    DebounceTimer, EventBus, ExecutionContext, LoggingConfig, OperationTimer, PerformanceMetrics,
    RequestContext, StructuredLogEntry, Topic,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

#[test]
fn test_structured_log_entry_flattens_fields() {
    let mut fields = HashMap::new();
    fields.insert("query".to_string(), Value::String("invoice".to_string()));
    fields.insert("seq".to_string(), Value::from(3));

    let entry = StructuredLogEntry {
        timestamp: chrono::Utc::now().to_rfc3339(),
        level: "INFO".to_string(),
        target: "application::coordinator".to_string(),
        message: "Search delivered".to_string(),
        fields,
        context: Some(ExecutionContext::default()),
        performance: Some(PerformanceMetrics {
            duration_ms: Some(42),
            items_processed: Some(7),
        }),
    };

    let json: Value = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["query"], "invoice");
    assert_eq!(json["seq"], 3);
    assert_eq!(json["performance"]["items_processed"], 7);
    assert_eq!(json["context"]["pid"], std::process::id());
}

#[test]
fn test_logging_config_from_settings() {
    let config = LoggingConfig::from_settings("WARN", true, false);
    assert_eq!(config.level, Level::WARN);
    assert!(config.json_output);
    assert!(!config.color_output);

    let fallback = LoggingConfig::from_settings("loud", false, true);
    assert_eq!(fallback.level, Level::INFO);
}

#[test]
fn test_operation_timer_measures() {
    let mut timer = OperationTimer::new("fetch_suggestions");
    timer.add_field("query", "inv");
    std::thread::sleep(Duration::from_millis(10));
    assert!(timer.elapsed_ms() >= 10);
    timer.finish_with_result::<(), String>(&Err("boom".to_string()));
}

#[test]
fn test_request_contexts_are_unique() {
    let a = RequestContext::new();
    let b = RequestContext::default();
    assert_ne!(a.request_id, b.request_id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_event_bus_fanout_no_loss() {
    let subscribers = 50;
    let messages = 20;
    let bus: EventBus<u32> = EventBus::new(64);

    let received = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::with_capacity(subscribers);
    for _ in 0..subscribers {
        let mut rx = bus.subscribe();
        let received = received.clone();
        handles.push(tokio::spawn(async move {
            let mut seen = 0;
            while seen < messages {
                match rx.recv().await {
                    Ok(envelope) => {
                        assert_eq!(envelope.payload as usize, seen);
                        seen += 1;
                        received.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(_) => break,
                }
            }
        }));
    }

    for n in 0..messages as u32 {
        assert_eq!(bus.publish(Topic("search.results"), n), subscribers);
    }

    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(received.load(Ordering::Relaxed), subscribers * messages);
}

#[tokio::test(start_paused = true)]
async fn test_debounce_timer_keeps_only_trailing_call() {
    let timer = DebounceTimer::new(Duration::from_millis(300));
    let fired = Arc::new(parking_lot::Mutex::new(Vec::new()));

    for (i, value) in ["a", "ab", "abc"].into_iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        let fired = fired.clone();
        timer.schedule(move || fired.lock().push(value));
    }

    tokio::time::sleep(Duration::from_millis(299)).await;
    assert!(fired.lock().is_empty());
    assert!(timer.is_pending());

    tokio::time::sleep(Duration::from_millis(2)).await;
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert_eq!(*fired.lock(), vec!["abc"]);
    assert!(!timer.is_pending());
}
