//! End-of-run report
//!
//! Summarises the final arena state: one entry per operator and per customer
//! in creation order, plus the most active customer for each usage kind.
//!
//! The [`Display`](std::fmt::Display) rendering is the line-oriented text
//! report:
//!
//! ```text
//! Operator <id> : <talkMinutes> <messageCount> <dataUsed:2dp>
//! Customer <id> : <totalPaid:2dp> <currentDebt:2dp>
//! <name> : <talkMinutes>
//! <name> : <messageCount>
//! <name> : <dataUsed:2dp>
//! ```
//!
//! Lines are joined with `\n`; there is no trailing newline.

use crate::models::customer::{Customer, CustomerId};
use crate::models::operator::{Operator, OperatorId};
use crate::models::state::SimulationState;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorSummary {
    pub id: OperatorId,
    pub total_talking_time: i64,
    pub total_sent_messages: i64,
    pub total_internet_usage: f64,
}

impl From<&Operator> for OperatorSummary {
    fn from(operator: &Operator) -> Self {
        Self {
            id: operator.id(),
            total_talking_time: operator.total_talking_time(),
            total_sent_messages: operator.total_sent_messages(),
            total_internet_usage: operator.total_internet_usage(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub name: String,
    pub operator: OperatorId,
    pub total_paid: f64,
    pub current_debt: f64,
    pub limit: f64,
    pub total_talking_time: i64,
    pub total_sent_messages: i64,
    pub total_internet_usage: f64,
}

impl From<&Customer> for CustomerSummary {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id(),
            name: customer.name().to_string(),
            operator: customer.operator(),
            total_paid: customer.bill().total_paid(),
            current_debt: customer.bill().debt(),
            limit: customer.bill().limit(),
            total_talking_time: customer.total_talking_time(),
            total_sent_messages: customer.total_sent_messages(),
            total_internet_usage: customer.total_internet_usage(),
        }
    }
}

/// Customer holding the maximum of one usage metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCustomer<T> {
    pub id: CustomerId,
    pub name: String,
    pub value: T,
}

/// Final-state summary of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub operators: Vec<OperatorSummary>,
    pub customers: Vec<CustomerSummary>,

    /// `None` when no customer exists
    pub most_talking: Option<TopCustomer<i64>>,
    pub most_messages: Option<TopCustomer<i64>>,
    pub most_internet: Option<TopCustomer<f64>>,
}

impl SimulationReport {
    pub fn from_state(state: &SimulationState) -> Self {
        let customers = state.customers();
        Self {
            operators: state.operators().iter().map(OperatorSummary::from).collect(),
            customers: customers.iter().map(CustomerSummary::from).collect(),
            most_talking: first_max(customers, Customer::total_talking_time),
            most_messages: first_max(customers, Customer::total_sent_messages),
            most_internet: first_max(customers, Customer::total_internet_usage),
        }
    }
}

/// Forward scan keeping the first customer that reaches the maximum
fn first_max<T, F>(customers: &[Customer], metric: F) -> Option<TopCustomer<T>>
where
    T: PartialOrd + Copy,
    F: Fn(&Customer) -> T,
{
    let (first, rest) = customers.split_first()?;
    let best = rest.iter().fold(first, |best, customer| {
        if metric(customer) > metric(best) {
            customer
        } else {
            best
        }
    });
    Some(TopCustomer {
        id: best.id(),
        name: best.name().to_string(),
        value: metric(best),
    })
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines: Vec<String> = Vec::with_capacity(self.operators.len() + self.customers.len() + 3);

        lines.extend(self.operators.iter().map(|op| {
            format!(
                "Operator {} : {} {} {:.2}",
                op.id, op.total_talking_time, op.total_sent_messages, op.total_internet_usage
            )
        }));
        lines.extend(self.customers.iter().map(|c| {
            format!("Customer {} : {:.2} {:.2}", c.id, c.total_paid, c.current_debt)
        }));
        if let Some(top) = &self.most_talking {
            lines.push(format!("{} : {}", top.name, top.value));
        }
        if let Some(top) = &self.most_messages {
            lines.push(format!("{} : {}", top.name, top.value));
        }
        if let Some(top) = &self.most_internet {
            lines.push(format!("{} : {:.2}", top.name, top.value));
        }

        f.write_str(&lines.join("\n"))
    }
}
