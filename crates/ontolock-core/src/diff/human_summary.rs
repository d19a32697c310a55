//! Human-readable summary renderer for changesets.

use crate::diff::model::{ChangeKind, ChangeRecord, Changeset};

/// Render a Markdown/text summary of a [`Changeset`].
///
/// Intended for the review prompt and for the stderr report printed when the
/// gate fails closed. Informational only.
pub fn render_human_summary(changeset: &Changeset) -> String {
    let mut out = String::new();

    out.push_str("## API Surface Changes\n\n");
    out.push_str(&format!(
        "**API**: {}  \n**New hash**: `{}`\n\n",
        changeset.new_snapshot.name, changeset.new_hash
    ));

    if !changeset.has_changes {
        out.push_str("_No changes detected._\n");
        return out;
    }

    if let Some((old, new)) = changeset.rename() {
        out.push_str("### API Name\n\n");
        out.push_str(&format!("- `{}` -> `{}`\n\n", old, new));
    }

    if !changeset.added_groups.is_empty() || !changeset.removed_groups.is_empty() {
        out.push_str("### Access Groups\n\n");
        push_list(&mut out, "Added", &changeset.added_groups);
        push_list(&mut out, "Removed", &changeset.removed_groups);
        out.push('\n');
    }

    if !changeset.added_entities.is_empty() || !changeset.removed_entities.is_empty() {
        out.push_str("### Entities\n\n");
        push_list(&mut out, "Added", &changeset.added_entities);
        push_list(&mut out, "Removed", &changeset.removed_entities);
        out.push('\n');
    }

    if !changeset.functions.is_empty() {
        out.push_str("### Functions\n\n");
        for record in &changeset.functions {
            render_record(&mut out, record);
        }
        out.push('\n');
    }

    out
}

fn push_list(out: &mut String, label: &str, items: &[String]) {
    if !items.is_empty() {
        out.push_str(&format!(
            "- **{}** ({}): {}\n",
            label,
            items.len(),
            items.join(", ")
        ));
    }
}

fn render_record(out: &mut String, record: &ChangeRecord) {
    let label = match record.kind {
        ChangeKind::Added => "added",
        ChangeKind::Removed => "removed",
        ChangeKind::Modified => "modified",
    };
    out.push_str(&format!("- `{}` ({})\n", record.name, label));

    match record.kind {
        ChangeKind::Added => {
            if let Some(access) = &record.new_access {
                out.push_str(&format!("  - access: [{}]\n", access.join(", ")));
            }
        }
        ChangeKind::Removed => {
            if let Some(access) = &record.old_access {
                out.push_str(&format!("  - access was: [{}]\n", access.join(", ")));
            }
        }
        ChangeKind::Modified => {
            if let (Some(old), Some(new)) = (&record.old_access, &record.new_access) {
                out.push_str(&format!(
                    "  - access: [{}] -> [{}]\n",
                    old.join(", "),
                    new.join(", ")
                ));
            }
            if let (Some(old), Some(new)) = (&record.old_description, &record.new_description) {
                out.push_str(&format!("  - description: {:?} -> {:?}\n", old, new));
            }
            if let (Some(old), Some(new)) = (&record.old_entities, &record.new_entities) {
                out.push_str(&format!(
                    "  - entities: [{}] -> [{}]\n",
                    old.join(", "),
                    new.join(", ")
                ));
            }
            if record.inputs_changed == Some(true) {
                out.push_str("  - inputs schema changed\n");
            }
            if record.outputs_changed == Some(true) {
                out.push_str("  - outputs schema changed\n");
            }
            if record.field_references_changed == Some(true) {
                out.push_str("  - field references changed\n");
            }
            if record.identity_context_changed == Some(true) {
                out.push_str("  - identity-context usage changed\n");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::model::ApiSurfaceSnapshot;
    use std::collections::BTreeMap;

    fn changeset(functions: Vec<ChangeRecord>, added_groups: Vec<&str>) -> Changeset {
        let has_changes = !functions.is_empty() || !added_groups.is_empty();
        Changeset {
            has_changes,
            old_name: None,
            added_groups: added_groups.into_iter().map(String::from).collect(),
            removed_groups: Vec::new(),
            added_entities: Vec::new(),
            removed_entities: Vec::new(),
            functions,
            new_snapshot: ApiSurfaceSnapshot {
                name: "users".to_string(),
                access_groups: vec!["admin".to_string()],
                entities: Vec::new(),
                functions: BTreeMap::new(),
            },
            new_hash: "0123456789abcdef".to_string(),
        }
    }

    #[test]
    fn test_no_changes_summary() {
        let summary = render_human_summary(&changeset(Vec::new(), Vec::new()));
        assert!(summary.contains("_No changes detected._"));
        assert!(summary.contains("0123456789abcdef"));
        assert!(!summary.contains("### Functions"));
    }

    #[test]
    fn test_modified_access_rendered() {
        let mut record = ChangeRecord::new("getUser", ChangeKind::Modified);
        record.old_access = Some(vec!["admin".to_string()]);
        record.new_access = Some(vec!["admin".to_string(), "support".to_string()]);
        let summary = render_human_summary(&changeset(vec![record], vec!["support"]));
        assert!(summary.contains("### Access Groups"));
        assert!(summary.contains("- **Added** (1): support"));
        assert!(summary.contains("`getUser` (modified)"));
        assert!(summary.contains("access: [admin] -> [admin, support]"));
        assert!(!summary.contains("inputs schema changed"));
        assert!(!summary.contains("### API Name"));
    }

    #[test]
    fn test_rename_rendered() {
        let mut cs = changeset(Vec::new(), Vec::new());
        cs.old_name = Some("accounts".to_string());
        cs.has_changes = true;
        let summary = render_human_summary(&cs);
        assert!(summary.contains("### API Name"));
        assert!(summary.contains("- `accounts` -> `users`"));
        assert!(!summary.contains("_No changes detected._"));
    }
}
