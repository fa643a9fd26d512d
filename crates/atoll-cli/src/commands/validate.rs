use super::{fail_line, json_pretty, resolve_layout, EXIT_FAILURE, EXIT_SUCCESS};
use atoll_registry::validate_registry;
use std::path::Path;

pub fn run(root: Option<&Path>, json: bool) -> Result<u8, String> {
    let layout = resolve_layout(root)?;
    let report = validate_registry(&layout).map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({
            "checked": report.checked,
            "passed": report.passed(),
            "findings": report.findings,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        for finding in &report.findings {
            println!("{}", fail_line(&finding.to_string()));
        }
        if !report.findings.is_empty() {
            println!();
        }
        println!("Validated {} manifest(s)", report.checked);
        if report.passed() {
            println!("All validations passed.");
        } else {
            println!("Validation failed with {} error(s)", report.findings.len());
        }
    }

    Ok(if report.passed() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    })
}
