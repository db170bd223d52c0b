//! A full session rendered through the ANSI terminal with a dry-run sink.

use contact_cli::dry_run::DryRunDelivery;
use contact_cli::terminal::{AnsiTerminal, RenderOptions};
use contact_core::{
    INDICATOR_COUNT, IndicatorState, Recipient, RevealPacing, Sequencer, SubmitOutcome,
};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_plain_session_output() {
    let output = AnsiTerminal::new(Vec::new(), RenderOptions::new());
    let delivery = DryRunDelivery::new(Vec::new());
    let mut sequencer = Sequencer::new(
        output,
        delivery,
        Recipient::new("owner@example.com", "Owner"),
    )
    .with_pacing(RevealPacing::instant());

    assert!(sequencer.initialize().await);
    assert!(matches!(
        sequencer.submit("x").await,
        SubmitOutcome::Rejected(_)
    ));
    assert!(matches!(
        sequencer.submit("  Al  ").await,
        SubmitOutcome::Accepted { .. }
    ));
    sequencer.submit("a@b.co").await;
    assert_eq!(
        sequencer.submit("this is a message").await,
        SubmitOutcome::Delivered
    );
    sequencer.output_mut().finish().unwrap();

    let term = sequencer.output();
    assert_eq!(term.indicators(), [IndicatorState::Success; INDICATOR_COUNT]);
    assert!(!term.input_enabled());

    let text = String::from_utf8(term.get_ref().clone()).unwrap();
    let body: Vec<&str> = text.lines().skip(1).collect();
    let expected = [
        "Initializing contact terminal...",
        "Running system checks...",
        "Establishing connection...",
        "Welcome! Please provide your contact information.",
        "Enter your name: ",
        "Invalid input. Please try again.",
        "Enter your name: ",
        "> Al",
        "Enter your email: ",
        "> a@b.co",
        "Enter your message: ",
        "> this is a message",
        "Processing your message...",
        "Message sent successfully!",
        "Thank you for reaching out. I will be in touch soon!",
    ];
    assert_eq!(&body[..expected.len()], &expected[..]);
    assert!(text.contains("● ● ●\n"));
    assert_eq!(sequencer.delivery_attempts(), 1);
}
