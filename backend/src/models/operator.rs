//! Operator model
//!
//! An operator is a tariff plan plus aggregate usage counters, shared by any
//! number of customers. Each operator has:
//! - Per-unit charges for talking (per minute), messaging (per message) and
//!   data (per unit)
//! - A discount rate in percent, applied to qualifying talk and message costs
//! - Running totals of talk minutes, messages and data routed through it
//!
//! # Validation Policy
//!
//! Rate setters are forgiving: an invalid value is reported through the
//! returned error and the field keeps its previous value.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors reported by operator setters and counters
#[derive(Debug, Error, PartialEq)]
pub enum RateError {
    #[error("Talking charge must be non-negative, got {0}")]
    NegativeTalkingCharge(f64),

    #[error("Message cost must be non-negative, got {0}")]
    NegativeMessageCost(f64),

    #[error("Network charge must be non-negative, got {0}")]
    NegativeNetworkCharge(f64),

    #[error("Discount rate must be between 0-100, got {0}")]
    DiscountOutOfRange(i64),

    #[error("Usage total for {counter} would become negative ({total})")]
    NegativeTotal { counter: &'static str, total: f64 },

    #[error("Usage total for {counter} would overflow")]
    CounterOverflow { counter: &'static str },
}

/// `total + delta` for an integer usage counter, rejecting overflow and
/// negative results.
pub(crate) fn checked_count(
    counter: &'static str,
    total: i64,
    delta: i64,
) -> Result<i64, RateError> {
    let total = total
        .checked_add(delta)
        .ok_or(RateError::CounterOverflow { counter })?;
    if total < 0 {
        return Err(RateError::NegativeTotal {
            counter,
            total: total as f64,
        });
    }
    Ok(total)
}

/// `total + delta` for a real-valued usage counter; the result must be finite
/// and non-negative.
pub(crate) fn checked_amount(
    counter: &'static str,
    total: f64,
    delta: f64,
) -> Result<f64, RateError> {
    let total = total + delta;
    if !total.is_finite() {
        return Err(RateError::CounterOverflow { counter });
    }
    if total < 0.0 {
        return Err(RateError::NegativeTotal { counter, total });
    }
    Ok(total)
}

/// Stable handle of an operator (zero-based, creation order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperatorId(pub usize);

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which callers receive the talking discount
///
/// Two divergent rules exist for the age-based discount; the choice is an
/// explicit configuration switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeDiscountRule {
    /// Caller is younger than 18 or older than 65
    #[default]
    MinorOrSenior,

    /// Caller or callee is younger than 18
    EitherPartyMinor,
}

impl AgeDiscountRule {
    /// Whether a call between these two ages is discounted
    ///
    /// # Example
    /// ```
    /// use telecom_billing_core::AgeDiscountRule;
    ///
    /// assert!(AgeDiscountRule::MinorOrSenior.applies(70, 30));
    /// assert!(!AgeDiscountRule::MinorOrSenior.applies(30, 12));
    /// assert!(AgeDiscountRule::EitherPartyMinor.applies(30, 12));
    /// assert!(!AgeDiscountRule::EitherPartyMinor.applies(70, 30));
    /// ```
    pub fn applies(self, caller_age: u32, callee_age: u32) -> bool {
        match self {
            AgeDiscountRule::MinorOrSenior => caller_age < 18 || caller_age > 65,
            AgeDiscountRule::EitherPartyMinor => caller_age < 18 || callee_age < 18,
        }
    }
}

/// Rates an operator is declared with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    /// Cost per minute of talking
    pub talking_charge: f64,

    /// Cost per message sent
    pub message_cost: f64,

    /// Cost per unit of data
    pub network_charge: f64,

    /// Discount in percent, valid range 0..=100
    pub discount_rate: i64,
}

/// A telecom operator
///
/// # Example
/// ```
/// use telecom_billing_core::{AgeDiscountRule, Operator, OperatorId, Tariff};
///
/// let tariff = Tariff {
///     talking_charge: 2.0,
///     message_cost: 1.0,
///     network_charge: 0.5,
///     discount_rate: 10,
/// };
/// let (operator, rejected) = Operator::with_tariff(OperatorId(0), &tariff);
/// assert!(rejected.is_empty());
///
/// // 16-year-old caller gets the discount
/// let cost = operator.calculate_talking_cost(10, 16, 30, AgeDiscountRule::MinorOrSenior);
/// assert!((cost - 18.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    id: OperatorId,
    talking_charge: f64,
    message_cost: f64,
    network_charge: f64,
    discount_rate: u8,

    /// Minutes talked by any customer on either end of a call
    total_talking_time: i64,

    /// Messages sent by customers of this operator
    total_sent_messages: i64,

    /// Data used by customers of this operator
    total_internet_usage: f64,
}

impl Operator {
    /// Create an operator with all rates at zero
    pub fn new(id: OperatorId) -> Self {
        Self {
            id,
            talking_charge: 0.0,
            message_cost: 0.0,
            network_charge: 0.0,
            discount_rate: 0,
            total_talking_time: 0,
            total_sent_messages: 0,
            total_internet_usage: 0.0,
        }
    }

    /// Create an operator and apply every rate of `tariff` through its setter.
    ///
    /// Rates rejected by a setter stay at zero; the rejections are returned so
    /// the caller can report them.
    pub fn with_tariff(id: OperatorId, tariff: &Tariff) -> (Self, Vec<RateError>) {
        let mut operator = Self::new(id);
        let rejected = [
            operator.set_talking_charge(tariff.talking_charge),
            operator.set_message_cost(tariff.message_cost),
            operator.set_network_charge(tariff.network_charge),
            operator.set_discount_rate(tariff.discount_rate),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();
        (operator, rejected)
    }

    pub fn id(&self) -> OperatorId {
        self.id
    }

    // ========================================================================
    // Cost calculation
    // ========================================================================

    /// Cost of a call placed by a customer of this operator
    pub fn calculate_talking_cost(
        &self,
        minutes: i64,
        caller_age: u32,
        callee_age: u32,
        rule: AgeDiscountRule,
    ) -> f64 {
        let cost = minutes as f64 * self.talking_charge;
        if rule.applies(caller_age, callee_age) {
            self.discounted(cost)
        } else {
            cost
        }
    }

    /// Cost of `quantity` messages; discounted when both ends share an operator
    pub fn calculate_message_cost(
        &self,
        quantity: i64,
        sender_operator: OperatorId,
        recipient_operator: OperatorId,
    ) -> f64 {
        let cost = quantity as f64 * self.message_cost;
        if sender_operator == recipient_operator {
            self.discounted(cost)
        } else {
            cost
        }
    }

    /// Cost of `amount` units of data. Never discounted.
    pub fn calculate_network_cost(&self, amount: f64) -> f64 {
        amount * self.network_charge
    }

    fn discounted(&self, cost: f64) -> f64 {
        cost * f64::from(100 - self.discount_rate) / 100.0
    }

    // ========================================================================
    // Usage counters
    // ========================================================================

    /// Talking total after adding `minutes`, without changing it
    pub fn check_talking_time(&self, minutes: i64) -> Result<i64, RateError> {
        checked_count("talking time", self.total_talking_time, minutes)
    }

    pub fn check_sent_messages(&self, quantity: i64) -> Result<i64, RateError> {
        checked_count("sent messages", self.total_sent_messages, quantity)
    }

    pub fn check_internet_usage(&self, amount: f64) -> Result<f64, RateError> {
        checked_amount("internet usage", self.total_internet_usage, amount)
    }

    pub fn add_talking_time(&mut self, minutes: i64) -> Result<(), RateError> {
        self.total_talking_time = self.check_talking_time(minutes)?;
        Ok(())
    }

    pub fn add_sent_messages(&mut self, quantity: i64) -> Result<(), RateError> {
        self.total_sent_messages = self.check_sent_messages(quantity)?;
        Ok(())
    }

    pub fn add_internet_usage(&mut self, amount: f64) -> Result<(), RateError> {
        self.total_internet_usage = self.check_internet_usage(amount)?;
        Ok(())
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

    // ========================================================================
    // Rates
    // ========================================================================

    pub fn talking_charge(&self) -> f64 {
        self.talking_charge
    }

    pub fn set_talking_charge(&mut self, talking_charge: f64) -> Result<(), RateError> {
        if talking_charge < 0.0 {
            return Err(RateError::NegativeTalkingCharge(talking_charge));
        }
        self.talking_charge = talking_charge;
        Ok(())
    }

    pub fn message_cost(&self) -> f64 {
        self.message_cost
    }

    pub fn set_message_cost(&mut self, message_cost: f64) -> Result<(), RateError> {
        if message_cost < 0.0 {
            return Err(RateError::NegativeMessageCost(message_cost));
        }
        self.message_cost = message_cost;
        Ok(())
    }

    pub fn network_charge(&self) -> f64 {
        self.network_charge
    }

    pub fn set_network_charge(&mut self, network_charge: f64) -> Result<(), RateError> {
        if network_charge < 0.0 {
            return Err(RateError::NegativeNetworkCharge(network_charge));
        }
        self.network_charge = network_charge;
        Ok(())
    }

    pub fn discount_rate(&self) -> u8 {
        self.discount_rate
    }

    pub fn set_discount_rate(&mut self, discount_rate: i64) -> Result<(), RateError> {
        match u8::try_from(discount_rate) {
            Ok(rate) if rate <= 100 => {
                self.discount_rate = rate;
                Ok(())
            }
            _ => Err(RateError::DiscountOutOfRange(discount_rate)),
        }
    }
}
