//! Tool schema validity tests.
//!
//! The registered `image` tool SHALL carry a JSON schema describing an object
//! whose properties match the accepted parameters, with enum values and
//! numeric bounds that agree with host-side validation.

use serde_json::Value;

/// Validates that a JSON schema has the required structure.
fn validate_json_schema(schema: &Value) -> Result<(), String> {
    let obj = schema
        .as_object()
        .ok_or_else(|| "Schema must be an object".to_string())?;

    if let Some(type_val) = obj.get("type") {
        if type_val != "object" {
            return Err(format!("Expected type 'object', got {:?}", type_val));
        }
    }

    if let Some(properties) = obj.get("properties") {
        if !properties.is_object() {
            return Err("Properties must be an object".to_string());
        }
    }

    Ok(())
}

/// Validates that a tool has required fields.
fn validate_tool(tool: &rmcp::model::Tool) -> Result<(), String> {
    if tool.name.is_empty() {
        return Err("Tool name cannot be empty".to_string());
    }

    if tool.description.as_ref().is_none_or(|d| d.is_empty()) {
        return Err(format!("Tool '{}' must have a description", tool.name));
    }

    if tool.input_schema.is_empty() {
        return Err(format!("Tool '{}' must have an input schema", tool.name));
    }

    let schema_value = serde_json::to_value(&*tool.input_schema)
        .map_err(|e| format!("Failed to serialize schema: {}", e))?;
    validate_json_schema(&schema_value)
}

/// Collects the string enum values reachable from a property schema.
///
/// Follows `$ref`s into `definitions` and descends through `allOf`, `anyOf`
/// and `oneOf`, which is where schemars places wrapped and documented enums.
fn enum_values(schema: &Value, property: &str) -> Vec<String> {
    let mut values = Vec::new();
    collect_enum_values(schema, &schema["properties"][property], &mut values);
    values
}

fn collect_enum_values(root: &Value, node: &Value, values: &mut Vec<String>) {
    let reference = node.get("$ref").and_then(Value::as_str);
    if let Some(name) = reference.and_then(|r| r.rsplit('/').next()) {
        collect_enum_values(root, &root["definitions"][name], values);
    }
    if let Some(items) = node.get("enum").and_then(Value::as_array) {
        values.extend(items.iter().filter_map(Value::as_str).map(str::to_string));
    }
    for key in ["allOf", "anyOf", "oneOf"] {
        if let Some(branches) = node.get(key).and_then(Value::as_array) {
            for branch in branches {
                collect_enum_values(root, branch, values);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picsum_mcp_image::ImageParams;
    use picsum_mcp_image::PicsumServer;
    use schemars::schema_for;

    const PARAMETERS: [&str; 12] = [
        "width", "height", "id", "seed", "grayscale", "blur", "format", "output", "list", "page",
        "limit", "info",
    ];

    fn image_schema() -> Value {
        let tools = PicsumServer::tools();
        serde_json::to_value(&*tools[0].input_schema).expect("schema should serialize")
    }

    #[test]
    fn test_json_schema_validation() {
        let valid_schema = serde_json::json!({
            "type": "object",
            "properties": {
                "width": { "type": "integer" }
            }
        });
        assert!(validate_json_schema(&valid_schema).is_ok());

        let invalid_schema = serde_json::json!({ "type": "string" });
        assert!(validate_json_schema(&invalid_schema).is_err());
    }

    #[test]
    fn test_registered_tools_are_valid() {
        let tools = PicsumServer::tools();
        assert_eq!(tools.len(), 1, "exactly one tool is registered");
        assert_eq!(tools[0].name, "image");
        validate_tool(&tools[0]).expect("image tool should be valid");
    }

    #[test]
    fn test_schema_lists_every_parameter() {
        let schema = image_schema();
        let properties = schema["properties"].as_object().expect("properties should be an object");

        for name in PARAMETERS {
            assert!(properties.contains_key(name), "schema missing '{}'", name);
        }
        assert_eq!(properties.len(), PARAMETERS.len(), "unexpected extra properties");
    }

    #[test]
    fn test_no_parameter_is_required() {
        let schema = image_schema();
        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0);
        assert_eq!(required, 0, "every parameter is optional");
    }

    #[test]
    fn test_enum_values() {
        let schema = image_schema();
        assert_eq!(enum_values(&schema, "format"), vec!["jpg", "webp"]);
        assert_eq!(enum_values(&schema, "output"), vec!["url", "file"]);
    }

    #[test]
    fn test_blur_bounds() {
        let schema = image_schema();
        let blur = &schema["properties"]["blur"];
        assert_eq!(blur["minimum"], 1.0);
        assert_eq!(blur["maximum"], 10.0);
    }

    #[test]
    fn test_schema_matches_schemars_output() {
        let direct =
            serde_json::to_value(schema_for!(ImageParams)).expect("schema should serialize");
        assert_eq!(direct, image_schema());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_description_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 .,]{0,120}"
    }

    proptest! {
        #[test]
        fn tool_with_description_is_valid(desc in valid_description_strategy()) {
            let mut tool = picsum_mcp_image::PicsumServer::tools().remove(0);
            tool.description = Some(desc.into());
            prop_assert!(validate_tool(&tool).is_ok());
        }

        #[test]
        fn tool_with_empty_name_is_invalid(desc in valid_description_strategy()) {
            let mut tool = picsum_mcp_image::PicsumServer::tools().remove(0);
            tool.name = "".into();
            tool.description = Some(desc.into());
            prop_assert!(validate_tool(&tool).is_err());
        }
    }
}
