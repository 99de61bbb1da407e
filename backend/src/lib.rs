//! Telecom Billing Simulator Core
//!
//! Deterministic replay of telecom usage against per-operator tariffs and
//! per-customer spending limits.
//!
//! # Architecture
//!
//! - **models**: Domain types (Bill, Operator, Customer, SimulationState, Event)
//! - **commands**: Command stream and its parser
//! - **orchestrator**: Command replay loop
//! - **report**: End-of-run summaries
//!
//! # Critical Invariants
//!
//! 1. Every bill keeps `0 <= debt <= limit`
//! 2. A usage action is all-or-nothing: bill, operator totals and personal
//!    totals change together or not at all
//! 3. Domain validation failures never abort a run; structural errors always do

// Module declarations
pub mod commands;
pub mod models;
pub mod orchestrator;
pub mod report;

// Re-exports for convenience
pub use commands::{parse_script, Command, ParseError, Script};
pub use models::{
    bill::{Bill, BillError, LimitChange},
    customer::{Counterparty, Customer, CustomerError, CustomerId, UsageError, UsageOutcome},
    event::{Event, EventLog, UsageKind},
    operator::{AgeDiscountRule, Operator, OperatorId, RateError, Tariff},
    state::SimulationState,
};
pub use orchestrator::{Orchestrator, SimulationConfig, SimulationError, StepResult};
pub use report::{CustomerSummary, OperatorSummary, SimulationReport, TopCustomer};
