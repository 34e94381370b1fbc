//! The JSON Schema every audit line body must satisfy.

use serde_json::{json, Value};

/// Schema for the JSON body of an audit line.
///
/// Extra keys are allowed so older readers keep working when optional fields
/// are added.
pub fn record_schema() -> Value {
    let text = json!({ "type": "string" });
    let count = json!({ "type": "integer", "minimum": 0 });

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "table access audit record",
        "type": "object",
        "required": ["timestamp", "operation", "table_name", "username", "email", "ip_address"],
        "properties": {
            "timestamp": text,
            "operation": {
                "enum": ["read", "edit", "update", "read_failed", "edit_failed"]
            },
            "table_name": { "type": "string", "minLength": 1 },
            "username": text,
            "email": text,
            "ip_address": text,
            "app_id": text,
            "status": { "enum": ["success", "failed"] },
            "warehouse": text,
            "rows_count": count,
            "rows_modified": count,
            "total_rows": count,
            "query_time": text,
            "duration_ms": count,
            "error": text,
            "error_kind": {
                "enum": ["permission_denied", "not_found", "connection", "query", "write", "unknown"]
            }
        }
    })
}
