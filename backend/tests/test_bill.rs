//! Tests for Bill model
//!
//! Covers the check-then-add charging protocol, capped payments, guarded
//! limit changes and the `0 <= debt <= limit` invariant under random
//! operation sequences.

use proptest::prelude::*;
use telecom_billing_core::{Bill, BillError, LimitChange};

#[test]
fn test_bill_lifecycle_scenario() {
    let mut bill = Bill::new(100.0).unwrap();

    assert!(bill.check(50.0));
    bill.add(50.0);
    assert!(!bill.check(60.0));

    assert_eq!(bill.pay(30.0), Ok(30.0));
    assert_eq!(bill.debt(), 20.0);
    assert_eq!(bill.total_paid(), 30.0);

    // 10 < 20 outstanding: rejected
    assert_eq!(bill.change_limit(10.0), LimitChange::Rejected);
    assert_eq!(bill.limit(), 100.0);

    assert_eq!(bill.change_limit(25.0), LimitChange::Applied);
    assert_eq!(bill.limit(), 25.0);
    assert_eq!(bill.headroom(), 5.0);
}

#[test]
fn test_new_bill_is_clean() {
    let bill = Bill::new(42.5).unwrap();
    assert_eq!(bill.limit(), 42.5);
    assert_eq!(bill.debt(), 0.0);
    assert_eq!(bill.total_paid(), 0.0);
}

#[test]
fn test_negative_initial_limit() {
    assert_eq!(Bill::new(-0.01), Err(BillError::InvalidLimit(-0.01)));
}

#[test]
fn test_overpayment_capped_silently() {
    let mut bill = Bill::new(100.0).unwrap();
    bill.add(12.0);

    assert_eq!(bill.pay(500.0), Ok(12.0));
    assert_eq!(bill.debt(), 0.0);
    assert_eq!(bill.total_paid(), 12.0);

    // Nothing left to pay
    assert_eq!(bill.pay(5.0), Ok(0.0));
    assert_eq!(bill.total_paid(), 12.0);
}

#[test]
fn test_lowering_limit_to_zero_after_full_payment() {
    let mut bill = Bill::new(100.0).unwrap();
    bill.add(80.0);
    assert_eq!(bill.change_limit(0.0), LimitChange::Rejected);

    bill.pay(80.0).unwrap();
    assert_eq!(bill.change_limit(0.0), LimitChange::Applied);
    assert!(!bill.check(0.01));
}

#[derive(Debug, Clone)]
enum BillOp {
    Charge(f64),
    Pay(f64),
    ChangeLimit(f64),
}

fn bill_op() -> impl Strategy<Value = BillOp> {
    prop_oneof![
        (0.0..80.0f64).prop_map(BillOp::Charge),
        (0.0..80.0f64).prop_map(BillOp::Pay),
        (-50.0..250.0f64).prop_map(BillOp::ChangeLimit),
    ]
}

proptest! {
    #[test]
    fn prop_debt_stays_within_limit(
        limit in 0.0..200.0f64,
        ops in prop::collection::vec(bill_op(), 0..64),
    ) {
        let mut bill = Bill::new(limit).unwrap();
        let mut paid_so_far = 0.0;

        for op in ops {
            match op {
                BillOp::Charge(amount) => {
                    if bill.check(amount) {
                        bill.add(amount);
                    }
                }
                BillOp::Pay(amount) => {
                    bill.pay(amount).unwrap();
                }
                BillOp::ChangeLimit(new_limit) => {
                    let before = bill.limit();
                    if bill.change_limit(new_limit) == LimitChange::Rejected {
                        prop_assert!(new_limit < bill.debt());
                        prop_assert_eq!(bill.limit(), before);
                    }
                }
            }

            prop_assert!(bill.debt() >= 0.0);
            prop_assert!(bill.debt() <= bill.limit());
            prop_assert!(bill.total_paid() >= paid_so_far);
            paid_so_far = bill.total_paid();
        }
    }

    #[test]
    fn prop_full_payment_clears_debt(
        charge in 0.0..100.0f64,
        extra in 0.0..100.0f64,
    ) {
        let mut bill = Bill::new(100.0).unwrap();
        bill.add(charge);
        let debt_before = bill.debt();
        let paid_before = bill.total_paid();

        let applied = bill.pay(debt_before + extra).unwrap();

        prop_assert_eq!(applied, debt_before);
        prop_assert_eq!(bill.debt(), 0.0);
        prop_assert_eq!(bill.total_paid(), paid_before + debt_before);
    }
}
