//! Batched invocation: strict ordering and all-or-nothing responses.

use optibridge::{AccessorError, BridgeError, Call, Operation};
use serde_json::json;

use crate::support::hr_bridge;

#[test]
fn batch_executes_sequentially_in_submitted_order() {
    let bridge = hr_bridge();

    let results = bridge
        .invoke_many(&[
            Call::new("positions", "create", json!({ "code": "OP1" })),
            Call::new("positions", "create", json!({ "code": "OP2" })),
            Call::new("positions", "list", json!({})),
        ])
        .unwrap();

    assert_eq!(results[0]["id"], 1);
    assert_eq!(results[1]["id"], 2);
    let listed = results[2].as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["code"], "OP1");
}

#[test]
fn duplicate_code_aborts_batch_after_first_create() {
    let bridge = hr_bridge();

    // The store rejects duplicate codes on the second call: the first
    // position is created, the overall call rejects with the duplicate-code
    // error, and the third call never runs.
    let err = bridge
        .invoke_many(&[
            Call::new("positions", "create", json!({ "code": "OP1" })),
            Call::new("positions", "create", json!({ "code": "OP1" })),
            Call::new("positions", "create", json!({ "code": "OP2" })),
        ])
        .unwrap_err();

    assert!(matches!(err, BridgeError::Accessor(AccessorError::Conflict(_))));
    assert!(err.to_string().contains("code"));

    let positions = bridge
        .invoke("positions", &Operation::List, json!({}))
        .unwrap();
    let positions = positions.as_array().unwrap();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0]["code"], "OP1");
}

#[test]
fn failing_first_call_runs_nothing_else() {
    let bridge = hr_bridge();

    let err = bridge
        .invoke_many(&[
            Call::new("widgets", "list", json!({})),
            Call::new("positions", "create", json!({ "code": "OP1" })),
        ])
        .unwrap_err();

    assert!(matches!(err, BridgeError::UnknownResource(_)));
    let positions = bridge
        .invoke("positions", &Operation::List, json!({}))
        .unwrap();
    assert!(positions.as_array().unwrap().is_empty());
}

#[test]
fn empty_batch_is_a_no_op() {
    let bridge = hr_bridge();
    let results = bridge.invoke_many(&[]).unwrap();
    assert!(results.is_empty());
}
