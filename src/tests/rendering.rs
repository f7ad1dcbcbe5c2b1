use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use leptos::{children::ViewFn, prelude::*};

use super::set_reactive_owner;
use crate::{
    component::{instantiating, recovering, showing, Fallible, Recover, ResetHandle, ResetKey},
    render::{Renderable, Shape},
};

/// Records which content got rendered, in order.
#[derive(Clone, Default)]
struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    fn push(&self, entry: impl ToString) {
        self.0.lock().expect("lock").push(entry.to_string());
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().expect("lock").clone()
    }
}

/// Keeps `render` subscribed to whatever it reads, as a mounted view is.
fn mount(render: impl Fn() -> AnyView + Send + Sync + 'static) {
    Effect::new_isomorphic(move |_| {
        render();
    });
}

async fn settle() {
    for _ in 0..4 {
        any_spawner::Executor::tick().await;
        tokio::task::yield_now().await;
    }
}

fn init() -> Owner {
    let _ = any_spawner::Executor::init_tokio();
    set_reactive_owner()
}

#[tokio::test]
async fn show_rebuilds_fixed_content_only_on_flip() {
    let _owner = init();
    let log = Log::default();
    let count = RwSignal::new(0);
    mount(showing(
        move || count.get(),
        Renderable::fixed({
            let log = log.clone();
            move || log.push("content")
        }),
        ViewFn::from({
            let log = log.clone();
            move || log.push("fallback")
        }),
    ));
    settle().await;
    assert_eq!(log.entries(), ["fallback"]);

    count.set(3);
    settle().await;
    assert_eq!(log.entries(), ["fallback", "content"]);

    // still truthy, nothing to rebuild
    count.set(4);
    settle().await;
    assert_eq!(log.entries(), ["fallback", "content"]);

    count.set(0);
    settle().await;
    assert_eq!(log.entries(), ["fallback", "content", "fallback"]);
}

#[tokio::test]
async fn show_follows_narrowed_value() {
    let _owner = init();
    let log = Log::default();
    let name = RwSignal::new(Some("ada".to_string()));
    mount(showing(
        move || name.get(),
        Renderable::computed({
            let log = log.clone();
            move |name: String| log.push(name)
        }),
        ViewFn::from({
            let log = log.clone();
            move || log.push("nobody")
        }),
    ));
    settle().await;

    name.set(Some("grace".to_string()));
    settle().await;
    name.set(Some(String::new()));
    settle().await;
    assert_eq!(log.entries(), ["ada", "grace", "nobody"]);
}

/// Content failing until `healthy` is set, and a fallback handing out its
/// reset handle.
fn flaky(
    log: &Log,
    healthy: &Arc<AtomicBool>,
    handle: &Arc<Mutex<Option<ResetHandle>>>,
) -> (Fallible<&'static str>, Recover<&'static str>) {
    let children = Fallible::from({
        let log = log.clone();
        let healthy = healthy.clone();
        move || {
            if healthy.load(Ordering::SeqCst) {
                log.push("content");
                Ok(())
            } else {
                Err("broken")
            }
        }
    });
    let fallback = Recover::from({
        let log = log.clone();
        let handle = handle.clone();
        move |error: &'static str, reset: ResetHandle| {
            log.push(format!("failed: {error}"));
            *handle.lock().expect("lock") = Some(reset);
        }
    });
    (children, fallback)
}

#[tokio::test]
async fn error_boundary_reset_retries_content() {
    let _owner = init();
    let log = Log::default();
    let healthy = Arc::new(AtomicBool::new(false));
    let handle = Arc::new(Mutex::new(None));
    let (children, fallback) = flaky(&log, &healthy, &handle);
    mount(recovering(children, fallback, None));
    settle().await;
    assert_eq!(log.entries(), ["failed: broken"]);

    // recovering alone does not re-render
    healthy.store(true, Ordering::SeqCst);
    settle().await;
    assert_eq!(log.entries(), ["failed: broken"]);

    let reset = handle.lock().expect("lock").clone();
    reset.expect("fallback received a reset handle").reset();
    settle().await;
    assert_eq!(log.entries(), ["failed: broken", "content"]);
}

#[tokio::test]
async fn error_boundary_retries_on_reset_key() {
    let _owner = init();
    let log = Log::default();
    let healthy = Arc::new(AtomicBool::new(false));
    let handle = Arc::new(Mutex::new(None));
    let attempt = RwSignal::new(0);
    let (children, fallback) = flaky(&log, &healthy, &handle);
    mount(recovering(
        children,
        fallback,
        Some(ResetKey::from(move || attempt.get())),
    ));
    settle().await;

    attempt.set(1);
    settle().await;
    assert_eq!(log.entries(), ["failed: broken", "failed: broken"]);

    healthy.store(true, Ordering::SeqCst);
    attempt.set(2);
    settle().await;
    assert_eq!(log.entries(), ["failed: broken", "failed: broken", "content"]);
}

#[tokio::test]
async fn dynamic_swaps_shape_in_place() {
    let _owner = init();
    let log = Log::default();
    let selected = RwSignal::new(None::<Shape<&'static str>>);
    let formal = Shape::from({
        let log = log.clone();
        move |name: &'static str| log.push(format!("good day, {name}"))
    });
    let casual = Shape::from({
        let log = log.clone();
        move |name: &'static str| log.push(format!("hey {name}"))
    });
    mount(instantiating(
        selected.into(),
        "ada",
        ViewFn::from({
            let log = log.clone();
            move || log.push("nobody")
        }),
    ));
    settle().await;

    selected.set(Some(formal));
    settle().await;
    selected.set(Some(casual));
    settle().await;
    selected.set(None);
    settle().await;
    assert_eq!(
        log.entries(),
        ["nobody", "good day, ada", "hey ada", "nobody"],
    );
}
