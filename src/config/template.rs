use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::ValidationError;

/// Replaces `{{name}}` placeholders with values from `vars`.
///
/// An unterminated `{{` is kept as literal text.
pub(super) fn render_template(
    input: &str,
    vars: &BTreeMap<String, String>,
) -> Result<String, ValidationError> {
    let mut rest = input;
    let mut output = String::with_capacity(input.len());

    while let Some(start) = rest.find("{{") {
        let (before, after_start) = rest.split_at(start);
        output.push_str(before);
        let after = after_start.strip_prefix("{{").unwrap_or(after_start);
        let Some(end) = after.find("}}") else {
            output.push_str(after_start);
            return Ok(output);
        };
        let (key_part, after_end) = after.split_at(end);
        let key = key_part.trim();
        let value = vars
            .get(key)
            .ok_or_else(|| ValidationError::MissingTemplateVariable {
                name: key.to_owned(),
            })?;
        output.push_str(value);
        rest = after_end.strip_prefix("}}").unwrap_or(after_end);
    }

    output.push_str(rest);
    Ok(output)
}

/// Renders every string inside a JSON value, leaving other values untouched.
pub(super) fn render_value(
    value: &Value,
    vars: &BTreeMap<String, String>,
) -> Result<Value, ValidationError> {
    Ok(match value {
        Value::String(text) => Value::String(render_template(text, vars)?),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| render_value(item, vars))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| Ok((key.clone(), render_value(item, vars)?)))
                .collect::<Result<_, ValidationError>>()?,
        ),
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
    })
}
