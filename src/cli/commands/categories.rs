//! Category listing and management.

use colored::Colorize;
use serde_json::json;

use crate::cli::args::{CategoryCommands, OutputFormat};
use crate::config::Paths;
use crate::error::TimetrackError;
use crate::output::{format_categories, format_subcategories_pretty, to_json};
use crate::tracking::SessionStore;

/// Execute category subcommands. No subcommand lists everything.
///
/// # Errors
///
/// Returns `InvalidCategory` for unknown names, or a storage error.
pub fn categories(
    paths: &Paths,
    cmd: Option<CategoryCommands>,
    format: OutputFormat,
) -> Result<String, TimetrackError> {
    let mut store = SessionStore::open(paths)?;

    match cmd.unwrap_or(CategoryCommands::List { category: None }) {
        CategoryCommands::List { category: None } => format_categories(store.categories(), format),

        CategoryCommands::List {
            category: Some(category),
        } => {
            let (name, _) = store.categories().resolve(&category, None)?;
            let subs = store.categories().subcategories(&name);
            match format {
                OutputFormat::Json => to_json(&json!({
                    "category": name,
                    "subcategories": subs
                })),
                OutputFormat::Pretty => Ok(format_subcategories_pretty(&name, subs)),
            }
        }

        CategoryCommands::Add {
            category,
            subcategories,
        } => {
            let existed = store.categories().canonical(&category).is_some();
            let added = store.add_category(&category, &subcategories)?;
            let (name, _) = store.categories().resolve(&category, None)?;

            match format {
                OutputFormat::Json => to_json(&json!({
                    "category": name,
                    "created": !existed,
                    "added": added
                })),
                OutputFormat::Pretty => {
                    let mut output = Vec::new();
                    if !existed {
                        output.push(format!("Added category {}", name.bold()).green().to_string());
                    }
                    for sub in &added {
                        output.push(format!("Added subcategory {sub} to {name}"));
                    }
                    if output.is_empty() {
                        output.push(format!("Nothing to add; {name} already has those subcategories"));
                    }
                    Ok(output.join("\n"))
                }
            }
        }

        CategoryCommands::Remove {
            category,
            subcategory: None,
        } => {
            let name = store.remove_category(&category)?;
            match format {
                OutputFormat::Json => to_json(&json!({ "removed": name })),
                OutputFormat::Pretty => Ok(format!(
                    "Removed category {name}\n   {}",
                    "Existing sessions keep their category".dimmed()
                )),
            }
        }

        CategoryCommands::Remove {
            category,
            subcategory: Some(subcategory),
        } => {
            let (name, sub) = store.remove_subcategory(&category, &subcategory)?;
            match format {
                OutputFormat::Json => to_json(&json!({
                    "category": name,
                    "removed": sub
                })),
                OutputFormat::Pretty => Ok(format!("Removed subcategory {sub} from {name}")),
            }
        }
    }
}
