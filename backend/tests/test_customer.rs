//! Tests for Customer actions
//!
//! Exercised through the simulation arena so that operator handles resolve
//! the way they do during a run.
//!
//! Tests cover:
//! - Caller-pays billing with symmetric talk bookkeeping
//! - All-or-nothing application when the bill limit is hit
//! - Self-directed calls and messages
//! - Operator switches

use telecom_billing_core::{
    AgeDiscountRule, Bill, CustomerId, OperatorId, SimulationState, Tariff, UsageError,
    UsageOutcome,
};

/// Two operators, alice + bob on op 0, carol on op 1
fn create_state(limit: f64) -> (SimulationState, [CustomerId; 3]) {
    let mut state = SimulationState::new();
    let tariff = Tariff {
        talking_charge: 2.0,
        message_cost: 1.0,
        network_charge: 0.5,
        discount_rate: 20,
    };
    let (op0, _) = state.add_operator(&tariff);
    let (op1, _) = state.add_operator(&tariff);

    let (alice, _) = state.add_customer("alice".to_string(), 30, op0, Bill::new(limit).unwrap());
    let (bob, _) = state.add_customer("bob".to_string(), 45, op0, Bill::new(limit).unwrap());
    let (carol, _) = state.add_customer("carol".to_string(), 50, op1, Bill::new(limit).unwrap());
    (state, [alice, bob, carol])
}

#[test]
fn test_talk_bills_caller_only() {
    let (mut state, [alice, _, carol]) = create_state(100.0);

    let outcome = state
        .talk(alice, carol, 10, AgeDiscountRule::MinorOrSenior)
        .unwrap();
    assert_eq!(outcome, UsageOutcome::Charged { cost: 20.0 });

    let alice = state.customer(alice).unwrap();
    let carol = state.customer(carol).unwrap();
    assert_eq!(alice.bill().debt(), 20.0);
    assert_eq!(carol.bill().debt(), 0.0);

    // Duration counted on both ends
    assert_eq!(alice.total_talking_time(), 10);
    assert_eq!(carol.total_talking_time(), 10);
    assert_eq!(state.operator(OperatorId(0)).unwrap().total_talking_time(), 10);
    assert_eq!(state.operator(OperatorId(1)).unwrap().total_talking_time(), 10);
}

#[test]
fn test_over_limit_talk_changes_nothing() {
    let (mut state, [alice, bob, _]) = create_state(15.0);
    let before = state.clone();

    let outcome = state
        .talk(alice, bob, 10, AgeDiscountRule::MinorOrSenior)
        .unwrap();

    assert_eq!(outcome, UsageOutcome::OverLimit { cost: 20.0 });
    assert_eq!(state.customers(), before.customers());
    assert_eq!(state.operators(), before.operators());
}

#[test]
fn test_over_limit_message_and_connection_change_nothing() {
    let (mut state, [alice, _, carol]) = create_state(4.0);
    let before = state.clone();

    assert_eq!(
        state.message(alice, carol, 5),
        Ok(UsageOutcome::OverLimit { cost: 5.0 })
    );
    assert_eq!(
        state.connection(alice, 9.0),
        Ok(UsageOutcome::OverLimit { cost: 4.5 })
    );
    assert_eq!(state.customers(), before.customers());
    assert_eq!(state.operators(), before.operators());
}

#[test]
fn test_self_directed_actions_ignored() {
    let (mut state, [alice, _, _]) = create_state(0.0);
    let before = state.clone();

    assert_eq!(
        state.talk(alice, alice, 10, AgeDiscountRule::MinorOrSenior),
        Ok(UsageOutcome::SelfTarget)
    );
    assert_eq!(state.message(alice, alice, 3), Ok(UsageOutcome::SelfTarget));
    assert_eq!(state.customers(), before.customers());
    assert_eq!(state.operators(), before.operators());
}

#[test]
fn test_negative_requests_rejected() {
    let (mut state, [alice, bob, _]) = create_state(100.0);
    let before = state.clone();

    assert_eq!(
        state.talk(alice, bob, -1, AgeDiscountRule::MinorOrSenior),
        Err(UsageError::NegativeDuration(-1))
    );
    assert_eq!(
        state.message(alice, bob, -2),
        Err(UsageError::NegativeQuantity(-2))
    );
    assert_eq!(
        state.connection(alice, -0.5),
        Err(UsageError::NegativeAmount(-0.5))
    );
    assert_eq!(state.customers(), before.customers());
}

#[test]
fn test_message_counts_sender_side_only() {
    let (mut state, [alice, bob, carol]) = create_state(100.0);

    // Same operator: 5 * 1.0 * 0.8
    assert_eq!(
        state.message(alice, bob, 5),
        Ok(UsageOutcome::Charged { cost: 4.0 })
    );
    // Cross operator: no discount
    assert_eq!(
        state.message(alice, carol, 5),
        Ok(UsageOutcome::Charged { cost: 5.0 })
    );

    assert_eq!(state.customer(alice).unwrap().total_sent_messages(), 10);
    assert_eq!(state.customer(bob).unwrap().total_sent_messages(), 0);
    assert_eq!(state.operator(OperatorId(0)).unwrap().total_sent_messages(), 10);
    assert_eq!(state.operator(OperatorId(1)).unwrap().total_sent_messages(), 0);
}

#[test]
fn test_operator_switch_keeps_past_usage() {
    let (mut state, [alice, _, _]) = create_state(100.0);
    state.connection(alice, 4.0).unwrap();

    let previous = state.reassign_operator(alice, OperatorId(1));
    assert_eq!(previous, OperatorId(0));
    state.connection(alice, 2.0).unwrap();

    assert_eq!(state.operator(OperatorId(0)).unwrap().total_internet_usage(), 4.0);
    assert_eq!(state.operator(OperatorId(1)).unwrap().total_internet_usage(), 2.0);
    assert_eq!(state.customer(alice).unwrap().total_internet_usage(), 6.0);
}

#[test]
fn test_switch_changes_message_discount() {
    let (mut state, [alice, _, carol]) = create_state(100.0);
    state.reassign_operator(alice, OperatorId(1));

    assert_eq!(
        state.message(alice, carol, 5),
        Ok(UsageOutcome::Charged { cost: 4.0 })
    );
}
