mod common;

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard};

use common::{parse_line, Capture};
use level_logger::{LogLevel, Logger, Threshold};

// The panic hook is process-wide, so these tests take turns.
static HOOK: Mutex<()> = Mutex::new(());

fn hook_lock() -> MutexGuard<'static, ()> {
    HOOK.lock().unwrap_or_else(|e| e.into_inner())
}

fn install(prefix: &str) -> Capture {
    let capture = Capture::default();
    Logger::new(LogLevel::Info, prefix)
        .with_threshold(Threshold::new(LogLevel::Trace))
        .with_sink(capture.clone())
        .log_panics();
    capture
}

fn assert_fatal_line(capture: &Capture, prefix: &str, payload: &str) {
    let text = capture.plain();
    assert_eq!(text.lines().count(), 1, "captured: {:?}", text);

    let (_, tag, message) = parse_line(&text);
    assert_eq!(tag, format!("Fatal@{}", prefix));
    assert!(message.starts_with("PANIC at '"));
    assert!(message.ends_with(&format!(": {}", payload)));
}

#[test]
fn panics_are_logged_at_fatal() {
    let _guard = hook_lock();
    let capture = install("hook");

    let result = panic::catch_unwind(|| panic!("boom"));
    let _ = panic::take_hook();

    assert!(result.is_err());
    assert_fatal_line(&capture, "hook", "boom");
}

#[test]
fn panic_out_of_multi_thread_block_on_is_logged() {
    let _guard = hook_lock();
    let capture = install("main");

    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build().unwrap();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        rt.block_on(async { panic!("boom in main") })
    }));
    drop(rt);
    let _ = panic::take_hook();

    assert!(result.is_err());
    assert_fatal_line(&capture, "main", "boom in main");
}

#[test]
fn panic_out_of_current_thread_block_on_is_logged() {
    let _guard = hook_lock();
    let capture = install("local");

    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        rt.block_on(async { panic!("boom in local") })
    }));
    drop(rt);
    let _ = panic::take_hook();

    assert!(result.is_err());
    assert_fatal_line(&capture, "local", "boom in local");
}

#[test]
fn panic_in_spawned_task_is_logged() {
    let _guard = hook_lock();
    let capture = install("worker");

    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build().unwrap();
    let joined = rt.block_on(async {
        tokio::spawn(async { panic!("boom in task") }).await
    });
    drop(rt);
    let _ = panic::take_hook();

    assert!(joined.unwrap_err().is_panic());
    assert_fatal_line(&capture, "worker", "boom in task");
}
