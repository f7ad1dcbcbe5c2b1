use futures::channel::oneshot;

use crate::resolve::{AsyncState, Awaitable, Resolution};

type State = AsyncState<String, String>;

/// A pending input settled by hand through the returned sender.
fn deferred() -> (
    oneshot::Sender<Result<String, String>>,
    Awaitable<String, String>,
) {
    let (tx, rx) = oneshot::channel();
    let input = Awaitable::pending(async move {
        rx.await.unwrap_or_else(|_| Err("dropped".to_string()))
    });
    (tx, input)
}

#[test]
fn ready_value_fulfils_synchronously() {
    let resolution = Resolution::<String, String>::new();
    assert_eq!(resolution.state_untracked(), State::Pending);
    assert!(resolution.supply(Awaitable::ready("now".to_string())).is_none());
    assert_eq!(resolution.state_untracked(), State::Fulfilled("now".to_string()));
}

#[tokio::test]
async fn pending_value_settles() {
    let resolution = Resolution::<String, String>::new();
    let (tx, input) = deferred();
    let task = resolution.supply(input).expect("pending input yields a task");
    assert_eq!(resolution.state_untracked(), State::Pending);

    tx.send(Ok("later".to_string())).expect("receiver alive");
    task.await;
    assert_eq!(resolution.state_untracked(), State::Fulfilled("later".to_string()));
}

#[tokio::test]
async fn rejection_is_captured() {
    let resolution = Resolution::<String, String>::new();
    let (tx, input) = deferred();
    let task = resolution.supply(input).expect("pending input yields a task");
    tx.send(Err("boom".to_string())).expect("receiver alive");
    task.await;
    assert_eq!(resolution.state_untracked(), State::Rejected("boom".to_string()));
}

#[tokio::test]
async fn superseded_input_never_shows() {
    let resolution = Resolution::<String, String>::new();
    let (tx_a, input_a) = deferred();
    let (tx_b, input_b) = deferred();

    let task_a = tokio::spawn(resolution.supply(input_a).expect("task for a"));
    let task_b = tokio::spawn(resolution.supply(input_b).expect("task for b"));

    // b settles first, then the stale a
    tx_b.send(Ok("b".to_string())).expect("receiver alive");
    task_b.await.expect("task b");
    assert_eq!(resolution.state_untracked(), State::Fulfilled("b".to_string()));

    tx_a.send(Ok("a".to_string())).expect("receiver alive");
    task_a.await.expect("task a");
    assert_eq!(resolution.state_untracked(), State::Fulfilled("b".to_string()));
}

#[tokio::test]
async fn stale_settlement_while_latest_pending() {
    let resolution = Resolution::<String, String>::new();
    let (tx_a, input_a) = deferred();
    let (tx_b, input_b) = deferred();

    let task_a = resolution.supply(input_a).expect("task for a");
    let task_b = resolution.supply(input_b).expect("task for b");

    // a settles while b is still pending, which must not leak through
    tx_a.send(Ok("a".to_string())).expect("receiver alive");
    task_a.await;
    assert_eq!(resolution.state_untracked(), State::Pending);

    tx_b.send(Err("b failed".to_string())).expect("receiver alive");
    task_b.await;
    assert_eq!(resolution.state_untracked(), State::Rejected("b failed".to_string()));
}

#[test]
fn ready_value_supersedes_pending() {
    let resolution = Resolution::<String, String>::new();
    let (_tx, input) = deferred();
    let _task = resolution.supply(input);
    let stale = resolution.generation();
    resolution.supply(Awaitable::ready("ready".to_string()));

    assert!(!resolution.settle(stale, Ok("stale".to_string())));
    assert_eq!(resolution.state_untracked(), State::Fulfilled("ready".to_string()));
}

#[tokio::test]
async fn cancel_drops_in_flight_settlement() {
    let resolution = Resolution::<String, String>::new();
    let (tx, input) = deferred();
    let task = resolution.supply(input).expect("pending input yields a task");
    resolution.cancel();

    tx.send(Ok("late".to_string())).expect("receiver alive");
    task.await;
    assert_eq!(resolution.state_untracked(), State::Pending);
}

#[test]
fn settle_applies_only_to_latest_generation() {
    let resolution = Resolution::<u32, ()>::new();
    let (_tx, rx) = oneshot::channel::<()>();
    let _task = resolution.supply(Awaitable::pending(async move {
        let _ = rx.await;
        Ok(1)
    }));
    let generation = resolution.generation();
    assert!(!resolution.settle(generation - 1, Ok(0)));
    assert!(resolution.settle(generation, Ok(2)));
    assert_eq!(resolution.state_untracked(), AsyncState::Fulfilled(2));
}

#[tokio::test]
async fn settled_future_applies_without_a_task() {
    let resolution = Resolution::<String, String>::new();
    let input = Awaitable::<String, String>::pending(async { Err("early".to_string()) });
    if let Awaitable::Pending(future) = &input {
        assert_eq!(future.clone().await, Err("early".to_string()));
    }
    assert!(resolution.supply(input).is_none());
    assert_eq!(resolution.state_untracked(), State::Rejected("early".to_string()));
}

#[test]
fn task_stays_pending_until_settled() {
    let resolution = Resolution::<String, String>::new();
    let (tx, input) = deferred();
    let mut task =
        tokio_test::task::spawn(resolution.supply(input).expect("pending input yields a task"));

    tokio_test::assert_pending!(task.poll());
    assert_eq!(resolution.state_untracked(), State::Pending);

    tx.send(Ok("done".to_string())).expect("receiver alive");
    assert!(task.is_woken());
    tokio_test::assert_ready!(task.poll());
    assert_eq!(resolution.state_untracked(), State::Fulfilled("done".to_string()));
}
