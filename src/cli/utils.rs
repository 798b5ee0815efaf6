use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(fields)) = data {
                if let Some(obj) = response.as_object_mut() {
                    obj.extend(fields);
                }
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print a JSON document; text mode still prints it, just pretty
pub fn output_document(output_format: &OutputFormat, document: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string(document)?),
        OutputFormat::Text => println!("{}", serde_json::to_string_pretty(document)?),
    }
    Ok(())
}

/// Roster entries sorted for stable output
pub fn sorted_members<'a>(members: impl IntoIterator<Item = &'a String>) -> Vec<&'a str> {
    let mut list: Vec<&str> = members.into_iter().map(String::as_str).collect();
    list.sort_unstable();
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sorts_members() {
        let set: HashSet<String> = ["c", "a", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(sorted_members(&set), vec!["a", "b", "c"]);
    }
}
