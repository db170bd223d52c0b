//! Session-level tests for the sequencer.

use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use super::support::{
    ScriptedDelivery, SharedTranscript, instant_sequencer, ready_sequencer, recipient,
};
use crate::output::{INDICATOR_COUNT, IndicatorState, LineKind, Transcript};
use crate::pacing::RevealPacing;
use crate::sequencer::{
    DELIVERY_FAILED_LINE, INVALID_INPUT_LINE, PROCESSING_LINE, Phase, SENT_LINE, Sequencer,
    SubmitOutcome, THANK_YOU_LINE,
};
use crate::step::Step;

const NAME: &str = "Al";
const EMAIL: &str = "a@b.co";
const MESSAGE: &str = "this is a message";

#[tokio::test]
async fn test_initialize_reveals_boot_lines_then_first_prompt() {
    let sequencer = ready_sequencer(ScriptedDelivery::succeeding()).await;

    assert_eq!(
        sequencer.output().texts(),
        vec![
            "Initializing contact terminal...",
            "Running system checks...",
            "Establishing connection...",
            "Welcome! Please provide your contact information.",
            "Enter your name: ",
        ]
    );
    assert_eq!(sequencer.output().last().unwrap().kind, LineKind::Prompt);
    assert_eq!(sequencer.phase(), Phase::Awaiting(Step::Name));
    assert_eq!(sequencer.step_index(), 0);
    assert!(sequencer.is_input_enabled());
    assert!(!sequencer.is_busy());
    assert!(sequencer.output().input_enabled());
    assert_eq!(
        sequencer.output().indicators(),
        [IndicatorState::Pending; INDICATOR_COUNT]
    );
}

#[tokio::test]
async fn test_initialize_is_one_shot() {
    let mut sequencer = ready_sequencer(ScriptedDelivery::succeeding()).await;
    let before = sequencer.output().lines().len();

    assert!(!sequencer.initialize().await);
    assert_eq!(sequencer.output().lines().len(), before);
}

#[tokio::test]
async fn test_submit_before_initialize_is_ignored() {
    let mut sequencer = instant_sequencer(ScriptedDelivery::succeeding());

    assert_eq!(sequencer.submit(NAME).await, SubmitOutcome::Ignored);
    assert_eq!(sequencer.phase(), Phase::Initializing);
    assert!(sequencer.record().is_empty());
    assert!(sequencer.output().lines().is_empty());
}

#[tokio::test]
async fn test_invalid_answer_repeats_prompt() {
    let mut sequencer = ready_sequencer(ScriptedDelivery::succeeding()).await;
    let before = sequencer.output().lines().len();

    let outcome = sequencer.submit("A").await;
    assert!(matches!(outcome, SubmitOutcome::Rejected(ref e) if e.step == Step::Name));

    let lines = &sequencer.output().lines()[before..];
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].kind, LineKind::Notice);
    assert_eq!(lines[0].text, INVALID_INPUT_LINE);
    assert_eq!(lines[1].kind, LineKind::Prompt);
    assert_eq!(lines[1].text, "Enter your name: ");

    assert_eq!(sequencer.step_index(), 0);
    assert!(sequencer.record().is_empty());
    assert!(!sequencer.is_busy());
}

#[tokio::test]
async fn test_invalid_email_keeps_earlier_answers() {
    let mut sequencer = ready_sequencer(ScriptedDelivery::succeeding()).await;
    sequencer.submit(NAME).await;

    let outcome = sequencer.submit("a@b").await;
    assert!(matches!(outcome, SubmitOutcome::Rejected(ref e) if e.step == Step::Email));
    assert_eq!(sequencer.step_index(), 1);
    assert_eq!(sequencer.record().name(), Some(NAME));
    assert_eq!(sequencer.record().email(), None);
    assert_eq!(sequencer.output().last().unwrap().text, "Enter your email: ");
}

#[tokio::test]
async fn test_valid_answer_is_echoed_and_advances() {
    let mut sequencer = ready_sequencer(ScriptedDelivery::succeeding()).await;
    let before = sequencer.output().lines().len();

    assert_eq!(
        sequencer.submit("  Al  ").await,
        SubmitOutcome::Accepted { next: Step::Email }
    );

    let lines = &sequencer.output().lines()[before..];
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].kind, LineKind::Response);
    assert_eq!(lines[0].text, "> Al");
    assert_eq!(lines[1].text, "Enter your email: ");
    assert_eq!(sequencer.record().name(), Some("Al"));
    assert_eq!(sequencer.step_index(), 1);
}

#[tokio::test]
async fn test_submit_while_busy_is_ignored() {
    let mut sequencer = ready_sequencer(ScriptedDelivery::succeeding()).await;

    // Something else holds the gate, as a reveal in progress would.
    assert!(sequencer.gate().try_acquire());
    let before = sequencer.output().lines().len();

    assert_eq!(sequencer.submit(NAME).await, SubmitOutcome::Ignored);
    assert_eq!(sequencer.step_index(), 0);
    assert!(sequencer.record().is_empty());
    assert_eq!(sequencer.output().lines().len(), before);

    sequencer.gate().release();
    assert_eq!(
        sequencer.submit(NAME).await,
        SubmitOutcome::Accepted { next: Step::Email }
    );
}

#[tokio::test]
async fn test_three_valid_answers_deliver_once() {
    let delivery = ScriptedDelivery::succeeding();
    let mut sequencer = ready_sequencer(delivery.clone()).await;

    sequencer.submit(NAME).await;
    sequencer.submit(EMAIL).await;
    let outcome = sequencer.submit(MESSAGE).await;

    assert_eq!(outcome, SubmitOutcome::Delivered);
    assert_eq!(delivery.calls(), 1);
    assert_eq!(sequencer.delivery_attempts(), 1);

    let sent = &delivery.sent()[0];
    assert_eq!(sent.from_name, NAME);
    assert_eq!(sent.from_email, EMAIL);
    assert_eq!(sent.message, MESSAGE);
    assert_eq!(sent.to_email, recipient().email);
    assert_eq!(sent.to_name, recipient().name);

    let tail: Vec<&str> = sequencer.output().texts().into_iter().rev().take(4).collect();
    assert_eq!(
        tail,
        vec![
            THANK_YOU_LINE,
            SENT_LINE,
            PROCESSING_LINE,
            "> this is a message"
        ]
    );
}

#[tokio::test]
async fn test_success_disables_input_permanently() {
    let delivery = ScriptedDelivery::succeeding();
    let mut sequencer = ready_sequencer(delivery.clone()).await;
    for value in [NAME, EMAIL, MESSAGE] {
        sequencer.submit(value).await;
    }

    assert_eq!(sequencer.phase(), Phase::Completed);
    assert!(!sequencer.is_input_enabled());
    assert!(!sequencer.output().input_enabled());
    assert_eq!(
        sequencer.output().indicators(),
        [IndicatorState::Success; INDICATOR_COUNT]
    );

    let record = sequencer.record().clone();
    let lines = sequencer.output().lines().len();
    for value in [NAME, "garbage", MESSAGE] {
        assert_eq!(sequencer.submit(value).await, SubmitOutcome::Ignored);
    }
    assert_eq!(sequencer.record(), &record);
    assert_eq!(sequencer.output().lines().len(), lines);
    assert_eq!(delivery.calls(), 1);
    assert!(!sequencer.initialize().await);
}

#[tokio::test]
async fn test_delivery_failure_restarts_from_first_step() {
    let delivery = ScriptedDelivery::failing_once();
    let mut sequencer = ready_sequencer(delivery.clone()).await;

    sequencer.submit(NAME).await;
    sequencer.submit(EMAIL).await;
    let outcome = sequencer.submit(MESSAGE).await;

    assert!(matches!(outcome, SubmitOutcome::DeliveryFailed(_)));
    assert!(sequencer.record().is_empty());
    assert_eq!(sequencer.step_index(), 0);
    assert_eq!(sequencer.phase(), Phase::Awaiting(Step::Name));
    assert!(sequencer.is_input_enabled());

    let lines = sequencer.output().lines();
    let failure = &lines[lines.len() - 2];
    assert_eq!(failure.kind, LineKind::Failure);
    assert_eq!(failure.text, DELIVERY_FAILED_LINE);
    assert_eq!(lines[lines.len() - 1].text, "Enter your name: ");

    // The visitor-facing line never carries the underlying error.
    assert!(
        sequencer
            .output()
            .texts()
            .iter()
            .all(|t| !t.contains("connection reset"))
    );

    // Lights stay pending until a delivery succeeds.
    assert_eq!(
        sequencer.output().indicators(),
        [IndicatorState::Pending; INDICATOR_COUNT]
    );
}

#[tokio::test]
async fn test_retry_after_failure_succeeds_independently() {
    let delivery = ScriptedDelivery::failing_once();
    let mut sequencer = ready_sequencer(delivery.clone()).await;

    for value in [NAME, EMAIL, MESSAGE] {
        sequencer.submit(value).await;
    }
    for value in [NAME, EMAIL] {
        assert!(matches!(
            sequencer.submit(value).await,
            SubmitOutcome::Accepted { .. }
        ));
    }
    assert_eq!(sequencer.submit(MESSAGE).await, SubmitOutcome::Delivered);

    let sent = delivery.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
    assert_eq!(sequencer.phase(), Phase::Completed);
}

#[tokio::test]
async fn test_animated_reveal_pushes_one_fragment_per_char() {
    let pacing = RevealPacing {
        char_delay: Duration::from_millis(1),
        pauses: false,
    };
    let mut sequencer = Sequencer::new(
        Transcript::new(),
        ScriptedDelivery::succeeding(),
        recipient(),
    )
    .with_pacing(pacing);
    sequencer.initialize().await;

    let revealed: usize = sequencer
        .output()
        .texts()
        .iter()
        .map(|t| t.chars().count())
        .sum();
    assert_eq!(sequencer.output().fragments(), revealed);
}

#[tokio::test]
async fn test_run_drops_lines_committed_mid_flight() {
    let release = Arc::new(Notify::new());
    let delivery = ScriptedDelivery::held(release.clone());
    let sequencer = instant_sequencer(delivery.clone());
    let (input, lines) = sequencer.input_channel();

    // Nothing is accepted before initialization has finished.
    assert!(!input.commit(NAME));

    let session = tokio::spawn(sequencer.run(lines));
    wait_until(|| input.is_enabled()).await;

    for value in [NAME, EMAIL] {
        wait_until(|| input.commit(value)).await;
    }
    wait_until(|| input.commit(MESSAGE)).await;
    wait_until(|| delivery.calls() == 1).await;

    // Delivery is in flight; the gate is held for its whole duration.
    assert!(!input.commit(MESSAGE));
    assert!(!input.commit(NAME));

    release.notify_one();
    let sequencer = session.await.unwrap();

    assert_eq!(sequencer.phase(), Phase::Completed);
    assert_eq!(delivery.calls(), 1);
    assert!(!input.commit(NAME));
    assert!(input.is_closed());
}

#[tokio::test]
async fn test_run_stops_when_input_closes() {
    let sequencer = instant_sequencer(ScriptedDelivery::succeeding());
    let (input, lines) = sequencer.input_channel();
    drop(input);

    let sequencer = sequencer.run(lines).await;
    assert_eq!(sequencer.phase(), Phase::Awaiting(Step::Name));
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition not met in time");
}

#[tokio::test]
async fn test_commit_during_animated_reveal_is_dropped() {
    let screen = SharedTranscript::default();
    let pacing = RevealPacing {
        char_delay: Duration::from_millis(10),
        pauses: false,
    };
    let sequencer = Sequencer::new(screen.clone(), ScriptedDelivery::succeeding(), recipient())
        .with_pacing(pacing);
    let gate = sequencer.gate().clone();
    let (input, lines) = sequencer.input_channel();
    let session = tokio::spawn(sequencer.run(lines));

    // Boot lines hold the gate before input is ever enabled.
    wait_until(|| screen.open_text().is_some()).await;
    assert!(gate.is_busy());
    assert!(!input.commit(NAME));

    wait_until(|| input.commit(NAME)).await;
    wait_until(|| {
        screen
            .open_text()
            .is_some_and(|text| text.starts_with("Enter your e"))
    })
    .await;

    assert!(gate.is_busy());
    assert!(!input.commit(EMAIL));

    wait_until(|| !gate.is_busy()).await;
    drop(input);
    let sequencer = session.await.unwrap();

    assert_eq!(sequencer.phase(), Phase::Awaiting(Step::Email));
    assert_eq!(sequencer.record().name(), Some(NAME));
    assert_eq!(sequencer.record().email(), None);

    let transcript = screen.snapshot();
    assert_eq!(transcript.lines_of(LineKind::Response).count(), 1);
    assert_eq!(transcript.last().unwrap().text, "Enter your email: ");
}
