//! Domain models for the billing simulator

pub mod bill;
pub mod customer;
pub mod event;
pub mod operator;
pub mod state;

// Re-exports
pub use bill::{Bill, BillError, LimitChange};
pub use customer::{Counterparty, Customer, CustomerError, CustomerId, UsageError, UsageOutcome};
pub use event::{Event, EventLog, UsageKind};
pub use operator::{AgeDiscountRule, Operator, OperatorId, RateError, Tariff};
pub use state::SimulationState;
