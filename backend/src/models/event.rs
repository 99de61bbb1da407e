//! Event logging for simulation replay and auditing.
//!
//! Every interpreted command leaves at least one [`Event`] in the [`EventLog`],
//! tagged with the zero-based step (command position) it came from. Domain
//! validation failures, which never abort a run, are recorded here as
//! [`Event::ValidationFailed`].
//!
//! # Example
//!
//! ```rust
//! use telecom_billing_core::{CustomerId, Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::DataCharged {
//!     step: 4,
//!     customer: CustomerId(1),
//!     amount: 2.5,
//!     cost: 1.25,
//! });
//!
//! assert_eq!(log.events_at_step(4).len(), 1);
//! assert_eq!(log.events_for_customer(CustomerId(1)).len(), 1);
//! ```

use crate::models::customer::CustomerId;
use crate::models::operator::OperatorId;
use serde::Serialize;

/// Kind of usage a customer attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageKind {
    Talk,
    Message,
    Connection,
}

/// Simulation event capturing a state change (or a deliberate non-change).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event_type")]
pub enum Event {
    OperatorCreated {
        step: usize,
        operator: OperatorId,
    },

    CustomerCreated {
        step: usize,
        customer: CustomerId,
        name: String,
        operator: OperatorId,
    },

    /// Call billed to the caller
    CallCharged {
        step: usize,
        caller: CustomerId,
        callee: CustomerId,
        minutes: i64,
        cost: f64,
    },

    MessagesCharged {
        step: usize,
        sender: CustomerId,
        recipient: CustomerId,
        quantity: i64,
        cost: f64,
    },

    DataCharged {
        step: usize,
        customer: CustomerId,
        amount: f64,
        cost: f64,
    },

    /// Usage refused because the cost exceeded the bill headroom
    OverLimit {
        step: usize,
        customer: CustomerId,
        usage: UsageKind,
        cost: f64,
    },

    /// Call or message addressed to the acting customer itself
    SelfTargetIgnored {
        step: usize,
        customer: CustomerId,
        usage: UsageKind,
    },

    Payment {
        step: usize,
        customer: CustomerId,
        requested: f64,
        applied: f64,
    },

    OperatorReassigned {
        step: usize,
        customer: CustomerId,
        from: OperatorId,
        to: OperatorId,
    },

    LimitChanged {
        step: usize,
        customer: CustomerId,
        new_limit: f64,
        applied: bool,
    },

    /// A domain validation error; the offending call was a no-op
    ValidationFailed {
        step: usize,
        customer: Option<CustomerId>,
        reason: String,
    },
}

impl Event {
    /// Step (zero-based command position) this event belongs to
    pub fn step(&self) -> usize {
        match self {
            Event::OperatorCreated { step, .. }
            | Event::CustomerCreated { step, .. }
            | Event::CallCharged { step, .. }
            | Event::MessagesCharged { step, .. }
            | Event::DataCharged { step, .. }
            | Event::OverLimit { step, .. }
            | Event::SelfTargetIgnored { step, .. }
            | Event::Payment { step, .. }
            | Event::OperatorReassigned { step, .. }
            | Event::LimitChanged { step, .. }
            | Event::ValidationFailed { step, .. } => *step,
        }
    }

    /// Event type name, matching the serialized `event_type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::OperatorCreated { .. } => "OperatorCreated",
            Event::CustomerCreated { .. } => "CustomerCreated",
            Event::CallCharged { .. } => "CallCharged",
            Event::MessagesCharged { .. } => "MessagesCharged",
            Event::DataCharged { .. } => "DataCharged",
            Event::OverLimit { .. } => "OverLimit",
            Event::SelfTargetIgnored { .. } => "SelfTargetIgnored",
            Event::Payment { .. } => "Payment",
            Event::OperatorReassigned { .. } => "OperatorReassigned",
            Event::LimitChanged { .. } => "LimitChanged",
            Event::ValidationFailed { .. } => "ValidationFailed",
        }
    }

    /// Whether `id` took part in this event (on either end)
    pub fn involves(&self, id: CustomerId) -> bool {
        match self {
            Event::OperatorCreated { .. } => false,
            Event::CallCharged { caller, callee, .. } => *caller == id || *callee == id,
            Event::MessagesCharged {
                sender, recipient, ..
            } => *sender == id || *recipient == id,
            Event::CustomerCreated { customer, .. }
            | Event::DataCharged { customer, .. }
            | Event::OverLimit { customer, .. }
            | Event::SelfTargetIgnored { customer, .. }
            | Event::Payment { customer, .. }
            | Event::OperatorReassigned { customer, .. }
            | Event::LimitChanged { customer, .. } => *customer == id,
            Event::ValidationFailed { customer, .. } => *customer == Some(id),
        }
    }
}

/// Event log for storing simulation events
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_at_step(&self, step: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.step() == step).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_customer(&self, id: CustomerId) -> Vec<&Event> {
        self.events.iter().filter(|e| e.involves(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(step: usize, caller: usize, callee: usize) -> Event {
        Event::CallCharged {
            step,
            caller: CustomerId(caller),
            callee: CustomerId(callee),
            minutes: 3,
            cost: 3.0,
        }
    }

    #[test]
    fn test_call_involves_both_ends() {
        let event = call(0, 1, 2);
        assert!(event.involves(CustomerId(1)));
        assert!(event.involves(CustomerId(2)));
        assert!(!event.involves(CustomerId(0)));
    }

    #[test]
    fn test_event_log_queries() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        log.log(Event::OperatorCreated {
            step: 0,
            operator: OperatorId(0),
        });
        log.log(call(1, 0, 1));
        log.log(Event::ValidationFailed {
            step: 2,
            customer: Some(CustomerId(1)),
            reason: "Age must be non-negative, got -1".to_string(),
        });

        assert_eq!(log.len(), 3);
        assert_eq!(log.events_at_step(1).len(), 1);
        assert_eq!(log.events_of_type("ValidationFailed").len(), 1);
        assert_eq!(log.events_for_customer(CustomerId(1)).len(), 2);
    }

    #[test]
    fn test_serialized_tag_matches_event_type() {
        let event = call(7, 0, 1);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], event.event_type());
        assert_eq!(json["step"], 7);
    }
}
