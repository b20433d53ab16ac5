//! Property tests over the mailbox, metrics and state machine
//! invariants.

#![allow(clippy::unwrap_used)]

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use proptest::collection::vec;
use proptest::prelude::*;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

// Layer 3: Internal module imports
use agentsys_rt::config::{MAX_MESSAGE_SIZE, MAX_QUEUE_SIZE, MAX_STATES};
use agentsys_rt::message::{Frame, MessageView, Payload};
use agentsys_rt::monitoring::{ErrorHub, RuntimeMetrics};
use agentsys_rt::platform::manual_clock;
use agentsys_rt::{AgentId, Mailbox, StateId, StateMachine};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, Immutable, KnownLayout)]
struct PropMessage {
    value: u32,
    id: u32,
}

impl Payload for PropMessage {
    const NAME: &'static str = "property_tests::PropMessage";
}

fn mailbox() -> Mailbox {
    Mailbox::new(
        AgentId::new(1),
        manual_clock(),
        Arc::new(RuntimeMetrics::new()),
        ErrorHub::new(8),
        1_000,
    )
}

fn frame(value: u32, id: u32) -> Frame {
    Frame::encode(AgentId::new(2), 0, &PropMessage { value, id }).unwrap()
}

proptest! {
    /// Popped payloads equal pushed payloads, in push order.
    #[test]
    fn prop_fifo_round_trip(values in vec((any::<u32>(), any::<u32>()), 0..=MAX_QUEUE_SIZE)) {
        let mailbox = mailbox();
        for &(value, id) in &values {
            prop_assert!(mailbox.push(&frame(value, id)).is_ok());
        }
        prop_assert_eq!(mailbox.len(), values.len());

        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        for &(value, id) in &values {
            let len = mailbox.pop(&mut buf).unwrap();
            let view = MessageView::parse(&buf[..len]).unwrap();
            prop_assert_eq!(view.payload::<PropMessage>(), Some(PropMessage { value, id }));
        }
        prop_assert!(mailbox.is_empty());
    }

    /// The observable count stays within bounds for any push/pop
    /// interleaving, and matches a model queue exactly.
    #[test]
    fn prop_len_bounded_and_modelled(ops in vec(any::<bool>(), 0..300)) {
        let mailbox = mailbox();
        let mut model: Vec<u32> = Vec::new();
        let mut next = 0u32;
        let mut buf = [0u8; MAX_MESSAGE_SIZE];

        for push in ops {
            if push {
                let accepted = mailbox.push(&frame(next, 0)).is_ok();
                prop_assert_eq!(accepted, model.len() < MAX_QUEUE_SIZE);
                if accepted {
                    model.push(next);
                }
                next += 1;
            } else {
                match mailbox.pop(&mut buf) {
                    Some(len) => {
                        let view = MessageView::parse(&buf[..len]).unwrap();
                        let expected = model.remove(0);
                        prop_assert_eq!(
                            view.payload::<PropMessage>().unwrap().value,
                            expected
                        );
                    }
                    None => prop_assert!(model.is_empty()),
                }
            }
            prop_assert!(mailbox.len() <= MAX_QUEUE_SIZE);
            prop_assert_eq!(mailbox.len(), model.len());
        }
    }

    /// After clear, the mailbox is empty and accepts a full refill.
    #[test]
    fn prop_clear_then_refill(prefill in 0usize..=MAX_QUEUE_SIZE) {
        let mailbox = mailbox();
        for i in 0..prefill {
            mailbox.push(&frame(i as u32, 0)).unwrap();
        }

        mailbox.clear();
        prop_assert!(mailbox.is_empty());

        for i in 0..MAX_QUEUE_SIZE {
            prop_assert!(mailbox.push(&frame(i as u32, 1)).is_ok());
        }
        prop_assert!(mailbox.is_full());
    }

    /// Sent never falls behind processed, whatever the interleaving.
    #[test]
    fn prop_sent_dominates_processed(ops in vec(any::<bool>(), 0..200)) {
        let metrics = Arc::new(RuntimeMetrics::new());
        let mailbox = Mailbox::new(
            AgentId::new(1),
            manual_clock(),
            Arc::clone(&metrics),
            ErrorHub::new(8),
            1_000,
        );
        let mut buf = [0u8; MAX_MESSAGE_SIZE];

        for push in ops {
            if push {
                if mailbox.push(&frame(0, 0)).is_ok() {
                    metrics.record_sent();
                }
            } else if mailbox.pop(&mut buf).is_some() {
                metrics.record_processed();
            }
            prop_assert!(metrics.messages_sent() >= metrics.messages_processed());
        }
    }

    /// A successful transition lands in the target with the old state as
    /// previous; failed targets change nothing.
    #[test]
    fn prop_transitions_track_model(targets in vec(0u8..(MAX_STATES as u8 + 4), 1..40)) {
        let mut fsm = StateMachine::new();
        let defined = 4;
        for _ in 0..defined {
            fsm.define_state("S").unwrap();
        }

        let mut current = StateId::new(0);
        let mut previous = StateId::INVALID;
        for raw in targets {
            let target = StateId::new(raw);
            let result = fsm.transition_to(target);
            if (raw as usize) < defined {
                prop_assert!(result.is_ok());
                if target != current {
                    previous = current;
                    current = target;
                }
            } else {
                prop_assert!(result.is_err());
            }
            prop_assert_eq!(fsm.current_state(), current);
            prop_assert_eq!(fsm.previous_state(), previous);
        }
    }
}
