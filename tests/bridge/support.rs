//! Test domain: an HR-flavored accessor registry for bridge tests.

use optibridge::{AccessorError, InMemoryAccessor, QueryBridge};
use serde_json::{json, Value};

/// A bridge over three HR resources: employees, positions (unique code),
/// and contracts with a custom `activeByEmployee` query.
pub fn hr_bridge() -> QueryBridge {
    QueryBridge::new()
        .resource(
            "employees",
            InMemoryAccessor::new("employees").seeded(vec![
                json!({ "id": 1, "firstName": "Jean", "lastName": "Dupont", "department": "IT" }),
                json!({ "id": 2, "firstName": "Marie", "lastName": "Curie", "department": "HR" }),
            ]),
        )
        .resource(
            "positions",
            InMemoryAccessor::new("positions").unique_on("code"),
        )
        .resource(
            "contracts",
            InMemoryAccessor::new("contracts")
                .seeded(vec![
                    json!({ "id": 1, "employeeId": 1, "active": true }),
                    json!({ "id": 2, "employeeId": 1, "active": false }),
                    json!({ "id": 3, "employeeId": 2, "active": true }),
                ])
                .with_query("activeByEmployee", |records, input| {
                    let employee_id = input.get("employeeId").and_then(Value::as_i64).ok_or_else(
                        || AccessorError::Rejected("missing integer `employeeId`".into()),
                    )?;
                    let matches: Vec<Value> = records
                        .iter()
                        .filter(|r| {
                            r.get("employeeId").and_then(Value::as_i64) == Some(employee_id)
                                && r.get("active") == Some(&Value::Bool(true))
                        })
                        .cloned()
                        .collect();
                    Ok(Value::Array(matches))
                }),
        )
}
