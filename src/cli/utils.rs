use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::{self, Write};

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

            if let Some(Value::Object(map)) = data {
                response.as_object_mut().unwrap().extend(map);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Prompt for a field, showing the current value; empty input keeps it
pub fn prompt(label: &str, current: &str) -> anyhow::Result<String> {
    if current.is_empty() {
        print!("{}: ", label);
    } else {
        print!("{} [{}]: ", label, current);
    }
    io::stdout().flush()?;

    let input = read_line()?;
    Ok(if input.is_empty() {
        current.to_string()
    } else {
        input
    })
}

/// Yes/no prompt with the current value as default
pub fn prompt_yes_no(label: &str, current: bool) -> anyhow::Result<bool> {
    loop {
        print!("{} (y/n) [{}]: ", label, if current { "y" } else { "n" });
        io::stdout().flush()?;

        match read_line()?.to_lowercase().as_str() {
            "" => return Ok(current),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("Please answer y or n."),
        }
    }
}

/// Confirmation prompt defaulting to no
pub fn confirm(label: &str) -> anyhow::Result<bool> {
    print!("{} (y/N): ", label);
    io::stdout().flush()?;
    Ok(matches!(read_line()?.to_lowercase().as_str(), "y" | "yes"))
}

pub fn read_line() -> anyhow::Result<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Render a field-error aggregate, stable-sorted for readability
pub fn print_field_errors(errors: &HashMap<String, String>) {
    let mut keys: Vec<_> = errors.keys().collect();
    keys.sort();
    for key in keys {
        eprintln!("  - {}: {}", key, errors[key]);
    }
}
