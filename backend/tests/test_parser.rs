//! Tests for the script parser

use telecom_billing_core::commands::{parse_script, Command, ParseError, ScriptHeader};
use telecom_billing_core::Tariff;

#[test]
fn test_parse_every_opcode() {
    let input = "\
        2 1 8
        2 1.5 0.25 0.1 15
        1 alice 17 0 250.5
        3 0 1 12
        4 1 0 3
        5 0 2.75
        6 0 10
        7 0 0
        8 1 80
    ";
    let script = parse_script(input).unwrap();

    assert_eq!(
        script.header,
        ScriptHeader {
            customers: 2,
            operators: 1,
            commands: 8
        }
    );
    assert_eq!(
        script.commands,
        vec![
            Command::CreateOperator(Tariff {
                talking_charge: 1.5,
                message_cost: 0.25,
                network_charge: 0.1,
                discount_rate: 15,
            }),
            Command::CreateCustomer {
                name: "alice".to_string(),
                age: 17,
                operator: 0,
                limit: 250.5,
            },
            Command::Talk {
                caller: 0,
                callee: 1,
                minutes: 12
            },
            Command::Message {
                sender: 1,
                recipient: 0,
                quantity: 3
            },
            Command::Connect {
                customer: 0,
                amount: 2.75
            },
            Command::Pay {
                customer: 0,
                amount: 10.0
            },
            Command::ReassignOperator {
                customer: 0,
                operator: 0
            },
            Command::ChangeLimit {
                customer: 1,
                new_limit: 80.0
            },
        ]
    );
    let opcodes: Vec<u8> = script.commands.iter().map(Command::opcode).collect();
    assert_eq!(opcodes, vec![2, 1, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_unknown_opcode_is_fatal() {
    assert_eq!(
        parse_script("0 1 2 2 1 1 1 0 9 1 2"),
        Err(ParseError::UnknownOpcode {
            record: 2,
            opcode: 9
        })
    );
}

#[test]
fn test_truncated_record() {
    assert_eq!(
        parse_script("1 1 1 3 0 1"),
        Err(ParseError::MissingToken {
            record: 1,
            field: "minutes"
        })
    );
}

#[test]
fn test_fewer_records_than_declared() {
    assert_eq!(
        parse_script("0 0 2 5 0 1.0"),
        Err(ParseError::MissingToken {
            record: 2,
            field: "opcode"
        })
    );
}

#[test]
fn test_bad_numbers() {
    assert!(matches!(
        parse_script("0 1 1 2 abc 1 1 0"),
        Err(ParseError::InvalidFloat {
            record: 1,
            field: "talking charge",
            ..
        })
    ));
    assert!(matches!(
        parse_script("0 1 1 2 1 1 1 5.5"),
        Err(ParseError::InvalidInteger {
            record: 1,
            field: "discount rate",
            ..
        })
    ));
    assert!(matches!(
        parse_script("x 0 0"),
        Err(ParseError::InvalidIndex { record: 0, .. })
    ));
}

#[test]
fn test_header_counts_are_hints_only() {
    // Declares 0 customers and operators but creates both
    let script = parse_script("0 0 2 2 1 1 1 0 1 bob 20 0 5").unwrap();
    assert_eq!(script.commands.len(), 2);
}

#[test]
fn test_error_messages() {
    let error = parse_script("0 0 1 42").unwrap_err();
    assert_eq!(error.to_string(), "Invalid operation 42 at record 1");
}
