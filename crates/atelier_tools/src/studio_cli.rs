#![forbid(unsafe_code)]

use atelier_adapter::{
    owner_display, parse_category_filter, principal_from_header_value, StudioRuntime,
};
use atelier_contracts::Principal;

pub const USAGE: &str = "usage: atelier <owner|inbox <principal>|gallery [category]>";

/// Runs one read-only operator command against `runtime`.
pub fn execute_studio_command(
    runtime: &StudioRuntime,
    subcommand: &str,
    arg: Option<&str>,
) -> Result<String, String> {
    match subcommand {
        "owner" => Ok(owner_display(runtime.get_owner().as_ref())),
        "inbox" => {
            let caller = require_principal(arg)?;
            let rows = runtime
                .list_contact_submissions(&caller)
                .map_err(|e| format!("inbox refused: {e}"))?;
            if rows.is_empty() {
                return Ok("(no submissions)".to_string());
            }
            Ok(rows
                .iter()
                .map(|row| {
                    format!(
                        "#{} {} <{}> @{}\n    {}",
                        row.contact_submission_id.0,
                        row.name,
                        row.email,
                        row.submitted_at.0,
                        row.message.replace('\n', "\n    ")
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"))
        }
        "gallery" => {
            let category = parse_category_filter(arg).map_err(|e| e.to_string())?;
            let rows = runtime.list_gallery_items(category);
            Ok(rows
                .iter()
                .map(|row| {
                    format!(
                        "#{} [{}] {} {}",
                        row.gallery_item_id.0,
                        row.category.label(),
                        row.title,
                        row.image_url
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"))
        }
        _ => Err(format!(
            "unknown subcommand: {subcommand}. expected one of: owner, inbox, gallery"
        )),
    }
}

fn require_principal(raw: Option<&str>) -> Result<Principal, String> {
    let raw = raw.ok_or_else(|| "missing principal. usage: atelier inbox <principal>".to_string())?;
    principal_from_header_value(Some(raw)).map_err(|e| e.to_string())
}
