// ABOUTME: Integration tests for per-foundation actors and the fan-out/fan-in primitive.
// ABOUTME: Covers in-order execution, final state reporting and dead workers.

mod support;

use cfdeploy::deploy::{ActionError, ActionState, Actor, BlueGreen, Command, OutputBuffer};
use support::{CallLog, MockAction, Script, foundations, init_tracing};

fn spawn(index: usize, script: Script, log: &CallLog) -> Actor {
    let (buffer, _captured) = OutputBuffer::channel();
    let foundation = foundations(index + 1).last().clone();
    Actor::new(foundation, MockAction::new(index, script, log.clone(), buffer))
}

#[tokio::test]
async fn commands_run_in_send_order() {
    init_tracing();
    let log = CallLog::default();
    let mut actor = spawn(0, Script::default(), &log);

    for command in [Command::Initially, Command::Execute, Command::Undo] {
        actor.send(command).await.unwrap();
        actor.receive().await.unwrap();
    }

    assert_eq!(
        log.commands(0),
        vec![Command::Initially, Command::Execute, Command::Undo]
    );
    assert_eq!(actor.close().await, Some(ActionState::RolledBack));
}

#[tokio::test]
async fn pipelined_commands_answer_in_send_order() {
    init_tracing();
    let log = CallLog::default();
    let mut actor = spawn(0, Script::default().fail(Command::Execute, "second"), &log);

    actor.send(Command::Initially).await.unwrap();
    actor.send(Command::Execute).await.unwrap();

    assert_eq!(actor.receive().await, Ok(()));
    assert_eq!(actor.receive().await, Err(ActionError::failed("second")));
    assert_eq!(log.commands(0), vec![Command::Initially, Command::Execute]);
    actor.close().await;
}

#[tokio::test]
async fn failed_command_is_returned_and_leaves_state() {
    init_tracing();
    let log = CallLog::default();
    let mut actor = spawn(0, Script::default().fail(Command::Execute, "nope"), &log);

    actor.send(Command::Initially).await.unwrap();
    actor.receive().await.unwrap();
    actor.send(Command::Execute).await.unwrap();
    assert_eq!(actor.receive().await, Err(ActionError::failed("nope")));

    assert_eq!(actor.close().await, Some(ActionState::LoggedIn));
}

#[tokio::test]
async fn finally_finalizes_even_when_it_fails() {
    init_tracing();
    let log = CallLog::default();
    let mut actor = spawn(0, Script::default().fail(Command::Finally, "logout"), &log);

    actor.send(Command::Finally).await.unwrap();
    assert!(actor.receive().await.is_err());

    let state = actor.close().await.unwrap();
    assert!(state.is_terminal());
}

#[tokio::test]
async fn out_of_order_command_leaves_state_unchanged() {
    init_tracing();
    let log = CallLog::default();
    let mut actor = spawn(0, Script::default(), &log);

    // Executing before logging in still runs, but doesn't advance the state.
    actor.send(Command::Execute).await.unwrap();
    actor.receive().await.unwrap();
    actor.send(Command::Success).await.unwrap();
    actor.receive().await.unwrap();

    assert_eq!(log.commands(0), vec![Command::Execute, Command::Success]);
    assert_eq!(actor.close().await, Some(ActionState::NotStarted));
}

#[tokio::test]
async fn dead_worker_reports_actor_stopped() {
    init_tracing();
    let log = CallLog::default();
    let mut actor = spawn(0, Script::default().panic_on(Command::Execute), &log);
    let foundation = actor.foundation().clone();

    actor.send(Command::Execute).await.unwrap();
    let stopped = ActionError::ActorStopped { foundation };
    assert_eq!(actor.receive().await, Err(stopped.clone()));
    assert_eq!(actor.send(Command::Undo).await, Err(stopped));

    assert_eq!(actor.close().await, None);
}

#[tokio::test]
async fn noop_fan_out_is_repeatable_and_side_effect_free() {
    init_tracing();
    let log = CallLog::default();
    let mut actors: Vec<Actor> = (0..4).map(|i| spawn(i, Script::default(), &log)).collect();

    for _ in 0..3 {
        assert!(BlueGreen::command_all(&mut actors, Command::Verify).await.is_empty());
    }

    for actor in actors {
        assert_eq!(actor.close().await, Some(ActionState::NotStarted));
    }
    for i in 0..4 {
        assert_eq!(log.count(i, Command::Verify), 3);
        assert_eq!(log.commands(i).len(), 3);
    }
}

#[tokio::test]
async fn fan_in_collects_errors_in_foundation_order() {
    init_tracing();
    let log = CallLog::default();
    let scripts = [
        Script::default(),
        Script::default().fail(Command::Execute, "one"),
        Script::default(),
        Script::default().fail(Command::Execute, "three"),
    ];
    let mut actors: Vec<Actor> = scripts
        .into_iter()
        .enumerate()
        .map(|(i, script)| spawn(i, script, &log))
        .collect();

    let errors = BlueGreen::command_all(&mut actors, Command::Execute).await;

    assert_eq!(
        errors,
        vec![ActionError::failed("one"), ActionError::failed("three")]
    );
    for actor in actors {
        actor.close().await;
    }
}
