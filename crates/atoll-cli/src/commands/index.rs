use super::{fail_line, json_pretty, ok_line, resolve_layout, EXIT_SUCCESS};
use atoll_registry::build_index;
use std::path::Path;

pub fn run(root: Option<&Path>, json: bool) -> Result<u8, String> {
    let layout = resolve_layout(root)?;
    if !json {
        println!("Scanning for package manifests...");
    }

    let build = build_index(&layout).map_err(|e| e.to_string())?;
    build
        .index
        .write_to_file(layout.index_path())
        .map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({
            "indexed": build.indexed(),
            "skipped": build.skipped(),
            "index": layout.index_path().display().to_string(),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        for record in &build.records {
            match &record.outcome {
                Ok(id) => println!("{}", ok_line(&format!("{id} ({})", record.manifest))),
                Err(reason) => {
                    println!("{}", fail_line(&format!("{}: {reason}", record.manifest)));
                }
            }
        }
        println!();
        println!("Generated index.json with {} package(s)", build.indexed());
        if build.skipped() > 0 {
            println!("Skipped {} unreadable manifest(s)", build.skipped());
        }
    }

    Ok(EXIT_SUCCESS)
}
