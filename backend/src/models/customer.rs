//! Customer model
//!
//! A customer has an identity, an age, a handle to exactly one operator and an
//! exclusively owned [`Bill`]. Customers drive every usage action:
//!
//! ```text
//! 1. Validate the requested quantity (negative = UsageError, nothing changes)
//! 2. Ignore self-directed calls and messages
//! 3. Ask the own operator for the cost
//! 4. bill.check(cost) fails  → OverLimit, nothing changes
//! 5. Every usage counter is checked (overflow = UsageError, nothing changes)
//! 6. bill.add(cost) + every usage counter
//! ```
//!
//! Operators live in the simulation arena; actions receive the arena slice
//! and resolve [`OperatorId`] handles through it.

use crate::models::bill::Bill;
use crate::models::operator::{
    checked_amount, checked_count, AgeDiscountRule, Operator, OperatorId, RateError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable handle of a customer (zero-based, creation order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub usize);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors reported by customer setters
#[derive(Debug, Error, PartialEq)]
pub enum CustomerError {
    #[error("Age must be non-negative, got {0}")]
    NegativeAge(i64),

    #[error("Age {0} is out of range")]
    AgeOutOfRange(i64),
}

/// Invalid usage requests. The request is dropped without side effects.
#[derive(Debug, Error, PartialEq)]
pub enum UsageError {
    #[error("Duration of the call must be non-negative, got {0}")]
    NegativeDuration(i64),

    #[error("Number of messages to be sent must be non-negative, got {0}")]
    NegativeQuantity(i64),

    #[error("Amount of data must be non-negative, got {0}")]
    NegativeAmount(f64),

    #[error(transparent)]
    Counter(#[from] RateError),
}

/// Outcome of a valid usage request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UsageOutcome {
    /// Cost was billed and all counters were updated
    Charged { cost: f64 },

    /// Cost would exceed the bill limit; nothing changed
    OverLimit { cost: f64 },

    /// Caller and callee are the same customer; nothing changed
    SelfTarget,
}

impl UsageOutcome {
    pub fn is_charged(&self) -> bool {
        matches!(self, UsageOutcome::Charged { .. })
    }
}

/// The other end of a call or message, as seen by the acting customer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Counterparty {
    pub id: CustomerId,
    pub age: u32,
    pub operator: OperatorId,

    /// Personal talking total before the call
    pub total_talking_time: i64,
}

impl From<&Customer> for Counterparty {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            age: customer.age,
            operator: customer.operator,
            total_talking_time: customer.total_talking_time,
        }
    }
}

/// A subscriber placing calls, sending messages and using data
///
/// # Example
/// ```
/// use telecom_billing_core::{Bill, Customer, CustomerId, OperatorId};
///
/// let mut customer = Customer::new(CustomerId(0), "Ada".to_string(), OperatorId(0), Bill::new(50.0).unwrap());
/// customer.set_age(36).unwrap();
/// assert!(customer.set_age(-1).is_err());
/// assert_eq!(customer.age(), 36);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    age: u32,
    operator: OperatorId,
    bill: Bill,

    /// Minutes on either end of charged calls
    total_talking_time: i64,

    /// Messages this customer sent
    total_sent_messages: i64,

    /// Data this customer used
    total_internet_usage: f64,
}

impl Customer {
    /// Create a customer aged 0; use [`Customer::set_age`] to set a validated age.
    pub fn new(id: CustomerId, name: String, operator: OperatorId, bill: Bill) -> Self {
        Self {
            id,
            name,
            age: 0,
            operator,
            bill,
            total_talking_time: 0,
            total_sent_messages: 0,
            total_internet_usage: 0.0,
        }
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Call `other` for `minutes`.
    ///
    /// Only the caller pays. On success the caller's personal total and both
    /// operators' totals grow; the callee's personal total is credited by the
    /// arena through [`Customer::record_received_call`].
    pub fn talk(
        &mut self,
        minutes: i64,
        other: Counterparty,
        operators: &mut [Operator],
        rule: AgeDiscountRule,
    ) -> Result<UsageOutcome, UsageError> {
        if minutes < 0 {
            return Err(UsageError::NegativeDuration(minutes));
        }
        if self.id == other.id {
            return Ok(UsageOutcome::SelfTarget);
        }

        let cost = operators[self.operator.0].calculate_talking_cost(
            minutes,
            self.age,
            other.age,
            rule,
        );
        if !self.bill.check(cost) {
            return Ok(UsageOutcome::OverLimit { cost });
        }

        let own = self.operator.0;
        let peer = other.operator.0;
        let own_total = operators[own].check_talking_time(minutes)?;
        if peer == own {
            checked_count("talking time", own_total, minutes)?;
        } else {
            operators[peer].check_talking_time(minutes)?;
        }
        let total_talking_time =
            checked_count("customer talking time", self.total_talking_time, minutes)?;
        checked_count("customer talking time", other.total_talking_time, minutes)?;

        // All totals checked; nothing below can fail
        operators[own].add_talking_time(minutes)?;
        operators[peer].add_talking_time(minutes)?;
        self.bill.add(cost);
        self.total_talking_time = total_talking_time;
        Ok(UsageOutcome::Charged { cost })
    }

    /// Send `quantity` messages to `other`.
    ///
    /// Only the sender's operator and personal totals move.
    pub fn message(
        &mut self,
        quantity: i64,
        other: Counterparty,
        operators: &mut [Operator],
    ) -> Result<UsageOutcome, UsageError> {
        if quantity < 0 {
            return Err(UsageError::NegativeQuantity(quantity));
        }
        if self.id == other.id {
            return Ok(UsageOutcome::SelfTarget);
        }

        let cost = operators[self.operator.0].calculate_message_cost(
            quantity,
            self.operator,
            other.operator,
        );
        if !self.bill.check(cost) {
            return Ok(UsageOutcome::OverLimit { cost });
        }

        let total_sent_messages =
            checked_count("customer sent messages", self.total_sent_messages, quantity)?;
        operators[self.operator.0].add_sent_messages(quantity)?;
        self.bill.add(cost);
        self.total_sent_messages = total_sent_messages;
        Ok(UsageOutcome::Charged { cost })
    }

    /// Use `amount` units of data.
    pub fn connection(
        &mut self,
        amount: f64,
        operators: &mut [Operator],
    ) -> Result<UsageOutcome, UsageError> {
        if amount < 0.0 {
            return Err(UsageError::NegativeAmount(amount));
        }

        let cost = operators[self.operator.0].calculate_network_cost(amount);
        if !self.bill.check(cost) {
            return Ok(UsageOutcome::OverLimit { cost });
        }

        let total_internet_usage =
            checked_amount("customer internet usage", self.total_internet_usage, amount)?;
        operators[self.operator.0].add_internet_usage(amount)?;
        self.bill.add(cost);
        self.total_internet_usage = total_internet_usage;
        Ok(UsageOutcome::Charged { cost })
    }

    /// Credit the callee side of a charged call.
    ///
    /// [`Customer::talk`] has already checked this total through the
    /// [`Counterparty`] it was given.
    pub fn record_received_call(&mut self, minutes: i64) -> Result<(), UsageError> {
        self.total_talking_time =
            checked_count("customer talking time", self.total_talking_time, minutes)?;
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn set_age(&mut self, age: i64) -> Result<(), CustomerError> {
        if age < 0 {
            return Err(CustomerError::NegativeAge(age));
        }
        let age = u32::try_from(age).map_err(|_| CustomerError::AgeOutOfRange(age))?;
        self.age = age;
        Ok(())
    }

    pub fn operator(&self) -> OperatorId {
        self.operator
    }

    /// Switch operators. Past usage stays with the previous operator.
    pub fn set_operator(&mut self, operator: OperatorId) {
        self.operator = operator;
    }

    pub fn bill(&self) -> &Bill {
        &self.bill
    }

    pub fn bill_mut(&mut self) -> &mut Bill {
        &mut self.bill
    }

    pub fn total_talking_time(&self) -> i64 {
        self.total_talking_time
    }

    pub fn total_sent_messages(&self) -> i64 {
        self.total_sent_messages
    }

    pub fn total_internet_usage(&self) -> f64 {
        self.total_internet_usage
    }
}
