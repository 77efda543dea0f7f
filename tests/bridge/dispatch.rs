//! Single-call dispatch behavior.

use optibridge::{AccessorError, BridgeError, Operation};
use serde_json::{json, Value};

use crate::support::hr_bridge;

#[test]
fn registered_pairs_dispatch_to_the_right_accessor() {
    let bridge = hr_bridge();

    let employees = bridge
        .invoke("employees", &Operation::List, json!({}))
        .unwrap();
    assert_eq!(employees.as_array().unwrap().len(), 2);

    let contracts = bridge
        .invoke("contracts", &Operation::List, json!({ "active": true }))
        .unwrap();
    assert_eq!(contracts.as_array().unwrap().len(), 2);

    let marie = bridge
        .invoke("employees", &Operation::Get, json!({ "id": 2 }))
        .unwrap();
    assert_eq!(marie["firstName"], "Marie");
}

#[test]
fn unregistered_resource_rejects_without_side_effects() {
    let bridge = hr_bridge();

    let err = bridge
        .invoke("widgets", &Operation::List, json!({}))
        .unwrap_err();
    assert!(matches!(err, BridgeError::UnknownResource(ref name) if name == "widgets"));

    // Nothing changed anywhere.
    let employees = bridge
        .invoke("employees", &Operation::List, json!({}))
        .unwrap();
    assert_eq!(employees.as_array().unwrap().len(), 2);
}

#[test]
fn custom_query_dispatches_by_name() {
    let bridge = hr_bridge();

    let active = bridge
        .invoke(
            "contracts",
            &Operation::Query("activeByEmployee".into()),
            json!({ "employeeId": 1 }),
        )
        .unwrap();
    assert_eq!(active, json!([{ "id": 1, "employeeId": 1, "active": true }]));
}

#[test]
fn missing_query_is_unknown_operation_not_unknown_resource() {
    let bridge = hr_bridge();

    let err = bridge
        .invoke(
            "employees",
            &Operation::Query("activeByEmployee".into()),
            json!({ "employeeId": 1 }),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        BridgeError::UnknownOperation { ref resource, ref operation }
            if resource == "employees" && operation == "activeByEmployee"
    ));
}

#[test]
fn accessor_failures_reach_the_caller_unwrapped() {
    let bridge = hr_bridge();

    bridge
        .invoke("positions", &Operation::Create, json!({ "code": "OP1" }))
        .unwrap();
    let err = bridge
        .invoke("positions", &Operation::Create, json!({ "code": "OP1" }))
        .unwrap_err();

    let BridgeError::Accessor(inner) = &err else {
        panic!("expected accessor error, got {err:?}");
    };
    assert!(matches!(inner, AccessorError::Conflict(_)));
    // The accessor's original message survives verbatim.
    assert_eq!(err.to_string(), inner.to_string());
}

#[test]
fn write_operations_round_trip_through_the_store() {
    let bridge = hr_bridge();

    let created = bridge
        .invoke(
            "employees",
            &Operation::Create,
            json!({ "firstName": "Luc", "department": "IT" }),
        )
        .unwrap();
    assert_eq!(created["id"], 3);

    bridge
        .invoke(
            "employees",
            &Operation::Update,
            json!({ "id": 3, "patch": { "department": "HR" } }),
        )
        .unwrap();

    let hr = bridge
        .invoke("employees", &Operation::List, json!({ "department": "HR" }))
        .unwrap();
    assert_eq!(hr.as_array().unwrap().len(), 2);

    let deleted = bridge
        .invoke("employees", &Operation::Delete, json!({ "id": 3 }))
        .unwrap();
    assert_eq!(deleted, Value::Bool(true));
}
