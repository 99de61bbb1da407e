//! Bill model
//!
//! A per-customer running account that enforces a spending limit.
//! Each bill has:
//! - A limit (the maximum debt the customer may carry)
//! - The current debt (unpaid accumulated cost)
//! - The total amount paid over the course of the simulation
//!
//! # Charging Protocol
//!
//! Charging is a two-step protocol: callers ask [`Bill::check`] whether a cost
//! fits under the limit and only then call [`Bill::add`]. `add` itself performs
//! no validation.
//!
//! # Critical Invariants
//!
//! 1. `0 <= debt <= limit` after every successful mutation
//! 2. `total_paid` never decreases

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during bill operations
#[derive(Debug, Error, PartialEq)]
pub enum BillError {
    #[error("Limiting amount must be non-negative, got {0}")]
    InvalidLimit(f64),

    #[error("Payment amount must be non-negative, got {0}")]
    NegativePayment(f64),
}

/// Result of a limit change request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitChange {
    /// The new limit was accepted
    Applied,
    /// The new limit was below the current debt; the old limit stays
    Rejected,
}

/// A customer's bill
///
/// # Example
/// ```
/// use telecom_billing_core::Bill;
///
/// let mut bill = Bill::new(100.0).unwrap();
/// assert!(bill.check(50.0));
/// bill.add(50.0);
/// assert!(!bill.check(60.0));
///
/// bill.pay(30.0).unwrap();
/// assert_eq!(bill.debt(), 20.0);
/// assert_eq!(bill.total_paid(), 30.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// Maximum debt allowed on this bill
    limit: f64,

    /// Unpaid accumulated cost
    debt: f64,

    /// Sum of all applied payments
    total_paid: f64,
}

impl Bill {
    /// Create a new bill with zero debt
    ///
    /// # Errors
    /// Returns [`BillError::InvalidLimit`] if `limit` is negative.
    pub fn new(limit: f64) -> Result<Self, BillError> {
        if limit < 0.0 {
            return Err(BillError::InvalidLimit(limit));
        }
        Ok(Self {
            limit,
            debt: 0.0,
            total_paid: 0.0,
        })
    }

    /// Returns true iff `amount` can be added without exceeding the limit.
    pub fn check(&self, amount: f64) -> bool {
        self.debt + amount <= self.limit
    }

    /// Add `amount` to the current debt.
    ///
    /// Must only be called after [`Bill::check`] returned true for the same
    /// amount.
    pub fn add(&mut self, amount: f64) {
        debug_assert!(amount >= 0.0, "bill charges must be non-negative");
        self.debt += amount;
    }

    /// Pay towards the current debt.
    ///
    /// Overpayment is capped at the current debt; the excess is dropped.
    /// Returns the amount actually applied.
    ///
    /// # Example
    /// ```
    /// use telecom_billing_core::Bill;
    ///
    /// let mut bill = Bill::new(100.0).unwrap();
    /// bill.add(40.0);
    /// assert_eq!(bill.pay(75.0).unwrap(), 40.0);
    /// assert_eq!(bill.debt(), 0.0);
    /// assert_eq!(bill.total_paid(), 40.0);
    /// ```
    pub fn pay(&mut self, amount: f64) -> Result<f64, BillError> {
        if amount < 0.0 {
            return Err(BillError::NegativePayment(amount));
        }
        let applied = amount.min(self.debt);
        self.debt -= applied;
        self.total_paid += applied;
        Ok(applied)
    }

    /// Change the limit, unless the new limit is below the current debt.
    pub fn change_limit(&mut self, new_limit: f64) -> LimitChange {
        if new_limit >= self.debt {
            self.limit = new_limit;
            LimitChange::Applied
        } else {
            LimitChange::Rejected
        }
    }

    /// Remaining headroom before the limit is reached
    pub fn headroom(&self) -> f64 {
        self.limit - self.debt
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn debt(&self) -> f64 {
        self.debt
    }

    pub fn total_paid(&self) -> f64 {
        self.total_paid
    }
}
