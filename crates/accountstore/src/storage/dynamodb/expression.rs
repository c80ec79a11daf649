//! Update expression construction.
//!
//! Pure functions turning a [`RecordUpdate`] into a DynamoDB update
//! expression. Attribute names and values only ever appear through
//! placeholders (`#f0`, `:v0`, ...), so caller-chosen names that collide with
//! DynamoDB reserved words or contain expression syntax are passed through
//! untouched.

use std::collections::HashMap;

use accountstore_core::storage::{RecordUpdate, PARTITION_KEY};
use aws_sdk_dynamodb::types::AttributeValue;

use super::conversions::json_to_attribute;

/// Placeholder for the partition key in condition expressions.
const PK_PLACEHOLDER: &str = "#pk";

/// A ready-to-send update: expression text plus placeholder bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub update: String,
    pub condition: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

/// Build an update expression conditioned on the record existing.
///
/// `set` entries become `SET #fN = :vN` clauses and `add` entries become
/// `ADD #aN :aN` clauses.
pub fn build_update_expression(update: &RecordUpdate) -> UpdateExpression {
    let mut names = HashMap::from([(PK_PLACEHOLDER.to_string(), PARTITION_KEY.to_string())]);
    let mut values = HashMap::new();

    let mut set_clauses = Vec::with_capacity(update.set.len());
    for (i, (name, value)) in update.set.iter().enumerate() {
        let name_ph = format!("#f{i}");
        let value_ph = format!(":v{i}");
        set_clauses.push(format!("{name_ph} = {value_ph}"));
        names.insert(name_ph, name.clone());
        values.insert(value_ph, json_to_attribute(value));
    }

    let mut add_clauses = Vec::with_capacity(update.add.len());
    for (i, (name, delta)) in update.add.iter().enumerate() {
        let name_ph = format!("#a{i}");
        let value_ph = format!(":a{i}");
        add_clauses.push(format!("{name_ph} {value_ph}"));
        names.insert(name_ph, name.clone());
        values.insert(value_ph, AttributeValue::N(delta.to_string()));
    }

    let mut sections = Vec::with_capacity(2);
    if !set_clauses.is_empty() {
        sections.push(format!("SET {}", set_clauses.join(", ")));
    }
    if !add_clauses.is_empty() {
        sections.push(format!("ADD {}", add_clauses.join(", ")));
    }

    UpdateExpression {
        update: sections.join(" "),
        condition: format!("attribute_exists({PK_PLACEHOLDER})"),
        names,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_add_clauses() {
        let update = RecordUpdate::new()
            .set("last_login", json!("2024-01-01T00:00:00+00:00"))
            .set("updated_at", json!("2024-01-01T00:00:00+00:00"))
            .add("login_count", 1);

        let expr = build_update_expression(&update);

        assert_eq!(expr.update, "SET #f0 = :v0, #f1 = :v1 ADD #a0 :a0");
        assert_eq!(expr.condition, "attribute_exists(#pk)");
        assert_eq!(expr.names.get("#f0").unwrap(), "last_login");
        assert_eq!(expr.names.get("#f1").unwrap(), "updated_at");
        assert_eq!(expr.names.get("#a0").unwrap(), "login_count");
        assert_eq!(expr.names.get("#pk").unwrap(), "pk");
        assert_eq!(expr.values.get(":a0").unwrap().as_n().unwrap(), "1");
    }

    #[test]
    fn test_set_only_has_no_add_section() {
        let expr = build_update_expression(&RecordUpdate::new().set("active", json!(false)));

        assert_eq!(expr.update, "SET #f0 = :v0");
        assert_eq!(expr.values.get(":v0").unwrap().as_bool().unwrap(), &false);
    }

    #[test]
    fn test_caller_names_never_reach_expression_text() {
        let hostile = [
            "status",
            "name",
            "a = :x, #b",
            "REMOVE credential_hash",
            "nested.path",
            "#pk",
        ];
        let update = hostile
            .iter()
            .fold(RecordUpdate::new(), |u, name| u.set(*name, json!(1)));

        let expr = build_update_expression(&update);

        for name in hostile {
            assert!(
                !expr.update.contains(name),
                "{name} leaked into {}",
                expr.update
            );
        }
        let bound: Vec<&String> = expr.names.values().collect();
        for name in hostile {
            assert!(bound.contains(&&name.to_string()));
        }
    }
}
