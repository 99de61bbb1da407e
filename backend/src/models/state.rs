//! Simulation State
//!
//! Arena holding every customer and operator of a run. Entities are stored in
//! creation order and addressed by [`CustomerId`] / [`OperatorId`] handles,
//! so a customer refers to its operator by handle rather than by reference.
//!
//! # Critical Invariants
//!
//! 1. **Dense Handles**: handle `n` addresses the `n`-th created entity
//! 2. **Valid References**: every customer's operator handle exists in the arena
//! 3. **Creation Order**: entities are never removed or reordered

use crate::models::bill::{Bill, BillError, LimitChange};
use crate::models::customer::{
    Counterparty, Customer, CustomerError, CustomerId, UsageError, UsageOutcome,
};
use crate::models::operator::{AgeDiscountRule, Operator, OperatorId, RateError, Tariff};

/// Upper bound on preallocation from declared entity counts
const MAX_PREALLOCATED_ENTITIES: usize = 1 << 16;

/// Complete simulation state
///
/// # Example
///
/// ```rust
/// use telecom_billing_core::{AgeDiscountRule, Bill, SimulationState, Tariff};
///
/// let mut state = SimulationState::new();
/// let tariff = Tariff { talking_charge: 1.0, message_cost: 1.0, network_charge: 1.0, discount_rate: 0 };
/// let (op, _) = state.add_operator(&tariff);
/// let (alice, _) = state.add_customer("alice".to_string(), 30, op, Bill::new(100.0).unwrap());
/// let (bob, _) = state.add_customer("bob".to_string(), 40, op, Bill::new(100.0).unwrap());
///
/// state.talk(alice, bob, 5, AgeDiscountRule::default()).unwrap();
/// assert_eq!(state.customer(bob).unwrap().total_talking_time(), 5);
/// assert_eq!(state.operator(op).unwrap().total_talking_time(), 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    /// All customers, indexed by `CustomerId`
    customers: Vec<Customer>,

    /// All operators, indexed by `OperatorId`
    operators: Vec<Operator>,
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state with room for the declared entity counts.
    ///
    /// The counts are only a hint; the arena grows past them as needed.
    pub fn with_capacity(customers: usize, operators: usize) -> Self {
        Self {
            customers: Vec::with_capacity(customers.min(MAX_PREALLOCATED_ENTITIES)),
            operators: Vec::with_capacity(operators.min(MAX_PREALLOCATED_ENTITIES)),
        }
    }

    /// Register an operator; the next free handle is assigned.
    ///
    /// Rates rejected by validation are returned alongside the handle.
    pub fn add_operator(&mut self, tariff: &Tariff) -> (OperatorId, Vec<RateError>) {
        let id = OperatorId(self.operators.len());
        let (operator, rejected) = Operator::with_tariff(id, tariff);
        self.operators.push(operator);
        (id, rejected)
    }

    /// Register a customer; the next free handle is assigned.
    ///
    /// # Panics
    ///
    /// Panics if `operator` does not exist in this arena.
    pub fn add_customer(
        &mut self,
        name: String,
        age: i64,
        operator: OperatorId,
        bill: Bill,
    ) -> (CustomerId, Option<CustomerError>) {
        assert!(
            operator.0 < self.operators.len(),
            "Cannot assign non-existent operator {}",
            operator
        );
        let id = CustomerId(self.customers.len());
        let mut customer = Customer::new(id, name, operator, bill);
        let rejected = customer.set_age(age).err();
        self.customers.push(customer);
        (id, rejected)
    }

    /// Resolve a raw customer index into a handle
    pub fn customer_id(&self, index: usize) -> Option<CustomerId> {
        (index < self.customers.len()).then_some(CustomerId(index))
    }

    /// Resolve a raw operator index into a handle
    pub fn operator_id(&self, index: usize) -> Option<OperatorId> {
        (index < self.operators.len()).then_some(OperatorId(index))
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.get(id.0)
    }

    pub fn operator(&self, id: OperatorId) -> Option<&Operator> {
        self.operators.get(id.0)
    }

    /// All customers in creation order
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// All operators in creation order
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn num_customers(&self) -> usize {
        self.customers.len()
    }

    pub fn num_operators(&self) -> usize {
        self.operators.len()
    }

    // ========================================================================
    // Actions (resolve raw indices with `customer_id` / `operator_id` first)
    // ========================================================================

    /// `caller` calls `callee`; a charged call credits both personal totals.
    ///
    /// # Panics
    ///
    /// Panics if `caller` or `callee` does not exist in this arena.
    pub fn talk(
        &mut self,
        caller: CustomerId,
        callee: CustomerId,
        minutes: i64,
        rule: AgeDiscountRule,
    ) -> Result<UsageOutcome, UsageError> {
        let other = Counterparty::from(&self.customers[callee.0]);
        let outcome = self.customers[caller.0].talk(minutes, other, &mut self.operators, rule)?;
        if outcome.is_charged() {
            self.customers[callee.0].record_received_call(minutes)?;
        }
        Ok(outcome)
    }

    /// # Panics
    ///
    /// Panics if `sender` or `recipient` does not exist in this arena.
    pub fn message(
        &mut self,
        sender: CustomerId,
        recipient: CustomerId,
        quantity: i64,
    ) -> Result<UsageOutcome, UsageError> {
        let other = Counterparty::from(&self.customers[recipient.0]);
        self.customers[sender.0].message(quantity, other, &mut self.operators)
    }

    /// # Panics
    ///
    /// Panics if `customer` does not exist in this arena.
    pub fn connection(&mut self, customer: CustomerId, amount: f64) -> Result<UsageOutcome, UsageError> {
        self.customers[customer.0].connection(amount, &mut self.operators)
    }

    /// Pay towards a customer's bill; returns the applied amount.
    ///
    /// # Panics
    ///
    /// Panics if `customer` does not exist in this arena.
    pub fn pay(&mut self, customer: CustomerId, amount: f64) -> Result<f64, BillError> {
        self.customers[customer.0].bill_mut().pay(amount)
    }

    /// # Panics
    ///
    /// Panics if `customer` does not exist in this arena.
    pub fn change_limit(&mut self, customer: CustomerId, new_limit: f64) -> LimitChange {
        self.customers[customer.0].bill_mut().change_limit(new_limit)
    }

    /// Move a customer to another operator; returns the previous operator.
    ///
    /// # Panics
    ///
    /// Panics if `customer` or `operator` does not exist in this arena.
    pub fn reassign_operator(&mut self, customer: CustomerId, operator: OperatorId) -> OperatorId {
        assert!(
            operator.0 < self.operators.len(),
            "Cannot assign non-existent operator {}",
            operator
        );
        let customer = &mut self.customers[customer.0];
        let previous = customer.operator();
        customer.set_operator(operator);
        previous
    }
}
