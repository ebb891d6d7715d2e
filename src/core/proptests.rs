//! Property-based tests for the send cycle reducer
//!
//! These drive `update()` with arbitrary action sequences and check the
//! ordering and in-flight invariants after every step.

use super::action::*;
use crate::gateway::{GatewayError, Language, Sender};
use crate::test_support::{test_app, test_reply};
use proptest::prelude::*;
use std::time::Duration;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_gateway_error() -> impl Strategy<Value = GatewayError> {
    prop_oneof![
        "[a-z ]{1,20}".prop_map(GatewayError::Network),
        (400u16..600, "[a-z ]{1,20}").prop_map(|(status, message)| GatewayError::Api {
            status,
            message
        }),
        "[a-z ]{1,20}".prop_map(GatewayError::Parse),
    ]
}

/// Host-side events: the reducer only ever sees these interleaved with its
/// own effects, which the driver below plays back.
#[derive(Debug, Clone)]
enum Step {
    Submit(String),
    QuickReply(usize),
    Succeed(String),
    Fail(GatewayError),
    Toggle,
    Reachability(bool),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        "[a-zA-Z ]{0,12}".prop_map(Step::Submit),
        (0usize..8).prop_map(Step::QuickReply),
        "[a-zA-Z ]{0,40}".prop_map(Step::Succeed),
        arb_gateway_error().prop_map(Step::Fail),
        Just(Step::Toggle),
        any::<bool>().prop_map(Step::Reachability),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // At most one request is outstanding, and every request is answered
    // exactly once before the next one can start.
    #[test]
    fn prop_at_most_one_in_flight(steps in proptest::collection::vec(arb_step(), 0..40)) {
        let mut app = test_app();
        let mut outstanding = 0usize;

        for step in steps {
            let action = match step {
                Step::Submit(text) => Action::Submit(text),
                Step::QuickReply(i) => Action::QuickReply(i),
                Step::Succeed(text) if outstanding > 0 => {
                    match update(&mut app, Action::ReplyReceived(Ok(test_reply(&text)))) {
                        Effect::RevealAfter { reply, .. } => Action::RevealReply(reply),
                        other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
                    }
                }
                Step::Fail(err) if outstanding > 0 => Action::ReplyReceived(Err(err)),
                Step::Succeed(_) | Step::Fail(_) => continue,
                Step::Toggle => Action::ToggleLanguage,
                Step::Reachability(up) => Action::ReachabilityChanged(up),
            };

            let was_sending = app.is_sending();
            let effect = update(&mut app, action);
            if let Effect::SendMessage(_) = effect {
                prop_assert!(!was_sending, "second request while one is in flight");
                outstanding += 1;
            } else if was_sending && !app.is_sending() {
                outstanding -= 1;
            }
            prop_assert!(outstanding <= 1);
            prop_assert_eq!(app.is_sending(), outstanding == 1);
            prop_assert_eq!(app.composing, app.is_sending());
        }
    }

    // Every user entry produced by a send is followed by exactly one
    // assistant entry before the next user entry.
    #[test]
    fn prop_replies_follow_their_message(
        messages in proptest::collection::vec("[a-z]{1,10}", 1..10),
        failures in proptest::collection::vec(any::<bool>(), 10)
    ) {
        let mut app = test_app();
        for (i, message) in messages.iter().enumerate() {
            let effect = update(&mut app, Action::Submit(message.clone()));
            prop_assert!(matches!(effect, Effect::SendMessage(_)));
            // A second submit while pending changes nothing
            prop_assert_eq!(update(&mut app, Action::Submit("again".to_string())), Effect::None);

            if failures[i] {
                update(&mut app, Action::ReplyReceived(Err(GatewayError::Network("down".to_string()))));
            } else {
                update(&mut app, Action::RevealReply(test_reply(&format!("re:{message}"))));
            }
        }

        let entries = app.transcript.entries();
        prop_assert_eq!(entries.len(), messages.len() * 2);
        for (i, pair) in entries.chunks(2).enumerate() {
            prop_assert_eq!(pair[0].sender, Sender::User);
            prop_assert_eq!(&pair[0].content, &messages[i]);
            prop_assert_eq!(pair[1].sender, Sender::Assistant);
            if failures[i] {
                prop_assert_eq!(pair[1].content.as_str(), APOLOGY_MESSAGE);
            } else {
                prop_assert_eq!(pair[1].content.clone(), format!("re:{}", messages[i]));
            }
        }
    }

    // history_length counts the just-appended user entry
    #[test]
    fn prop_history_length_matches_transcript(prior in 0usize..10, text in "[a-z]{1,10}") {
        let mut app = test_app();
        for _ in 0..prior {
            update(&mut app, Action::ToggleLanguage);
        }
        match update(&mut app, Action::Submit(text)) {
            Effect::SendMessage(req) => {
                prop_assert_eq!(req.context.history_length, prior + 1);
                let expected = if prior % 2 == 0 { Language::En } else { Language::Sw };
                prop_assert_eq!(req.context.language, expected);
            }
            other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
        }
    }

    // Whitespace-only input never appends and never sends
    #[test]
    fn prop_blank_input_is_ignored(text in "[ \t\n\r]{0,10}") {
        let mut app = test_app();
        prop_assert_eq!(update(&mut app, Action::Submit(text)), Effect::None);
        prop_assert!(app.transcript.is_empty());
        prop_assert!(!app.is_sending());
    }

    #[test]
    fn prop_display_delay_is_clamped(text in "\\PC{0,200}") {
        let delay = display_delay(&text);
        prop_assert!(delay >= Duration::from_millis(1000));
        prop_assert!(delay <= Duration::from_millis(3000));
        let expected = (text.chars().count() as u64 * 20 + 1000).min(3000);
        prop_assert_eq!(delay, Duration::from_millis(expected));
    }

    // Clear is two-phase: nothing local changes until the remote succeeds
    #[test]
    fn prop_failed_clear_preserves_transcript(
        messages in proptest::collection::vec("[a-z]{1,10}", 0..6),
        err in arb_gateway_error()
    ) {
        let mut app = test_app();
        for message in &messages {
            update(&mut app, Action::Submit(message.clone()));
            update(&mut app, Action::RevealReply(test_reply("ok")));
        }
        let before = app.transcript.clone();
        update(&mut app, Action::RequestClear);
        prop_assert_eq!(update(&mut app, Action::ConfirmClear), Effect::ClearRemote);
        prop_assert_eq!(&app.transcript, &before);
        update(&mut app, Action::ClearFinished(Err(err)));
        prop_assert_eq!(&app.transcript, &before);
        prop_assert!(app.notice.is_some());
    }
}
