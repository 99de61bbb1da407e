//! Orchestrator Engine
//!
//! Replays a command stream against the simulation arena:
//!
//! ```text
//! For each command (step s):
//! 1. Resolve customer/operator indices (unknown index → SimulationError, run aborts)
//! 2. Apply the command to the arena
//! 3. Domain validation failure → warn + ValidationFailed event, run continues
//! 4. Log events for the step
//! ```
//!
//! After the last command, [`Orchestrator::report`] scans the final state.
//!
//! # Example
//!
//! ```rust
//! use telecom_billing_core::commands::parse_script;
//! use telecom_billing_core::{Orchestrator, SimulationConfig};
//!
//! let script = parse_script("2 1 4  2 1.0 1.0 1.0 0  1 ada 30 0 100  1 bob 40 0 100  3 0 1 7").unwrap();
//! let orchestrator = Orchestrator::replay(SimulationConfig::default(), &script).unwrap();
//!
//! let report = orchestrator.report();
//! assert_eq!(report.operators[0].total_talking_time, 14);
//! assert_eq!(report.customers[0].current_debt, 7.0);
//! ```

use crate::commands::{Command, Script, ScriptHeader};
use crate::models::bill::{Bill, BillError, LimitChange};
use crate::models::customer::{CustomerId, UsageError, UsageOutcome};
use crate::models::event::{Event, EventLog, UsageKind};
use crate::models::operator::{AgeDiscountRule, OperatorId};
use crate::models::state::SimulationState;
use crate::report::SimulationReport;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

// ============================================================================
// Configuration Types
// ============================================================================

/// Simulation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Which calls receive the operator's talking discount
    pub age_discount: AgeDiscountRule,
}

// ============================================================================
// Errors and Results
// ============================================================================

/// Structural errors; any of these aborts the run
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("Customer {index} referenced at step {step} does not exist")]
    UnknownCustomer { step: usize, index: usize },

    #[error("Operator {index} referenced at step {step} does not exist")]
    UnknownOperator { step: usize, index: usize },

    #[error("Cannot create customer at step {step}: {source}")]
    InvalidCustomer {
        step: usize,
        #[source]
        source: BillError,
    },
}

/// What a single step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Zero-based position of the command
    pub step: usize,

    /// Events logged for this step
    pub num_events: usize,

    /// True if the command failed domain validation and was skipped
    pub validation_failed: bool,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Main simulation driver
#[derive(Debug, Clone)]
pub struct Orchestrator {
    state: SimulationState,
    config: SimulationConfig,
    event_log: EventLog,

    /// Number of commands applied so far
    current_step: usize,
}

impl Orchestrator {
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_header(config, &ScriptHeader::default())
    }

    /// Create an orchestrator sized for the declared entity counts
    pub fn with_header(config: SimulationConfig, header: &ScriptHeader) -> Self {
        Self {
            state: SimulationState::with_capacity(header.customers, header.operators),
            config,
            event_log: EventLog::new(),
            current_step: 0,
        }
    }

    /// Build an orchestrator and apply every command of `script` in order.
    pub fn replay(config: SimulationConfig, script: &Script) -> Result<Self, SimulationError> {
        let mut orchestrator = Self::with_header(config, &script.header);
        orchestrator.run(&script.commands)?;
        Ok(orchestrator)
    }

    /// Apply commands in order, stopping at the first structural error.
    ///
    /// Returns the number of commands whose domain validation failed.
    pub fn run(&mut self, commands: &[Command]) -> Result<usize, SimulationError> {
        info!(commands = commands.len(), "Replaying command stream");
        let mut validation_failures = 0;
        for command in commands {
            if self.apply(command)?.validation_failed {
                validation_failures += 1;
            }
        }
        info!(
            steps = self.current_step,
            validation_failures,
            "Command stream finished"
        );
        Ok(validation_failures)
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Final-state summary in creation order
    pub fn report(&self) -> SimulationReport {
        SimulationReport::from_state(&self.state)
    }

    // ========================================================================
    // Command dispatch
    // ========================================================================

    /// Apply one command.
    ///
    /// # Errors
    ///
    /// Only structural problems are returned. Domain validation failures are
    /// logged and reported through [`StepResult::validation_failed`].
    pub fn apply(&mut self, command: &Command) -> Result<StepResult, SimulationError> {
        let step = self.current_step;
        let events_before = self.event_log.len();
        debug!(step, opcode = command.opcode(), "Applying command");

        let validation_failed = match command {
            Command::CreateOperator(tariff) => {
                let (operator, rejected) = self.state.add_operator(tariff);
                self.log_event(Event::OperatorCreated { step, operator });
                let failed = !rejected.is_empty();
                for error in rejected {
                    self.validation_failed(step, None, &error);
                }
                failed
            }

            Command::CreateCustomer {
                name,
                age,
                operator,
                limit,
            } => {
                let operator = self.resolve_operator(step, *operator)?;
                let bill = Bill::new(*limit)
                    .map_err(|source| SimulationError::InvalidCustomer { step, source })?;
                let (customer, rejected) =
                    self.state.add_customer(name.clone(), *age, operator, bill);
                self.log_event(Event::CustomerCreated {
                    step,
                    customer,
                    name: name.clone(),
                    operator,
                });
                match rejected {
                    Some(error) => {
                        self.validation_failed(step, Some(customer), &error);
                        true
                    }
                    None => false,
                }
            }

            Command::Talk {
                caller,
                callee,
                minutes,
            } => {
                let caller = self.resolve_customer(step, *caller)?;
                let callee = self.resolve_customer(step, *callee)?;
                let result = self
                    .state
                    .talk(caller, callee, *minutes, self.config.age_discount);
                self.record_usage(step, caller, UsageKind::Talk, result, |cost| {
                    Event::CallCharged {
                        step,
                        caller,
                        callee,
                        minutes: *minutes,
                        cost,
                    }
                })
            }

            Command::Message {
                sender,
                recipient,
                quantity,
            } => {
                let sender = self.resolve_customer(step, *sender)?;
                let recipient = self.resolve_customer(step, *recipient)?;
                let result = self.state.message(sender, recipient, *quantity);
                self.record_usage(step, sender, UsageKind::Message, result, |cost| {
                    Event::MessagesCharged {
                        step,
                        sender,
                        recipient,
                        quantity: *quantity,
                        cost,
                    }
                })
            }

            Command::Connect { customer, amount } => {
                let customer = self.resolve_customer(step, *customer)?;
                let result = self.state.connection(customer, *amount);
                self.record_usage(step, customer, UsageKind::Connection, result, |cost| {
                    Event::DataCharged {
                        step,
                        customer,
                        amount: *amount,
                        cost,
                    }
                })
            }

            Command::Pay { customer, amount } => {
                let customer = self.resolve_customer(step, *customer)?;
                match self.state.pay(customer, *amount) {
                    Ok(applied) => {
                        self.log_event(Event::Payment {
                            step,
                            customer,
                            requested: *amount,
                            applied,
                        });
                        false
                    }
                    Err(error) => {
                        self.validation_failed(step, Some(customer), &error);
                        true
                    }
                }
            }

            Command::ReassignOperator { customer, operator } => {
                let customer = self.resolve_customer(step, *customer)?;
                let to = self.resolve_operator(step, *operator)?;
                let from = self.state.reassign_operator(customer, to);
                self.log_event(Event::OperatorReassigned {
                    step,
                    customer,
                    from,
                    to,
                });
                false
            }

            Command::ChangeLimit {
                customer,
                new_limit,
            } => {
                let customer = self.resolve_customer(step, *customer)?;
                let change = self.state.change_limit(customer, *new_limit);
                if change == LimitChange::Rejected {
                    debug!(step, %customer, new_limit, "Limit below current debt, keeping old limit");
                }
                self.log_event(Event::LimitChanged {
                    step,
                    customer,
                    new_limit: *new_limit,
                    applied: change == LimitChange::Applied,
                });
                false
            }
        };

        self.current_step += 1;
        Ok(StepResult {
            step,
            num_events: self.event_log.len() - events_before,
            validation_failed,
        })
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn resolve_customer(&self, step: usize, index: usize) -> Result<CustomerId, SimulationError> {
        self.state
            .customer_id(index)
            .ok_or(SimulationError::UnknownCustomer { step, index })
    }

    fn resolve_operator(&self, step: usize, index: usize) -> Result<OperatorId, SimulationError> {
        self.state
            .operator_id(index)
            .ok_or(SimulationError::UnknownOperator { step, index })
    }

    /// Log the outcome of a usage action; returns true on validation failure.
    fn record_usage(
        &mut self,
        step: usize,
        customer: CustomerId,
        usage: UsageKind,
        result: Result<UsageOutcome, UsageError>,
        charged: impl FnOnce(f64) -> Event,
    ) -> bool {
        match result {
            Ok(UsageOutcome::Charged { cost }) => {
                self.log_event(charged(cost));
                false
            }
            Ok(UsageOutcome::OverLimit { cost }) => {
                debug!(step, %customer, ?usage, cost, "Cost exceeds bill limit, skipping");
                self.log_event(Event::OverLimit {
                    step,
                    customer,
                    usage,
                    cost,
                });
                false
            }
            Ok(UsageOutcome::SelfTarget) => {
                debug!(step, %customer, ?usage, "Ignoring self-directed usage");
                self.log_event(Event::SelfTargetIgnored {
                    step,
                    customer,
                    usage,
                });
                false
            }
            Err(error) => {
                self.validation_failed(step, Some(customer), &error);
                true
            }
        }
    }

    fn validation_failed(
        &mut self,
        step: usize,
        customer: Option<CustomerId>,
        error: &dyn std::error::Error,
    ) {
        warn!(step, "{}", error);
        self.log_event(Event::ValidationFailed {
            step,
            customer,
            reason: error.to_string(),
        });
    }

    fn log_event(&mut self, event: Event) {
        self.event_log.log(event);
    }
}
