//! `dynform fields` -- list the controls a form built from the catalog has.

use anyhow::{Context, Result};
use serde::Serialize;

use dynform_engine::Form;

use crate::context::RuntimeContext;
use crate::output::{output_json, output_table, render_muted};

/// One row of the field listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldRow {
    name: String,
    label: String,
    #[serde(rename = "type")]
    field_type: String,
    required: bool,
    /// `false` for handler fields the catalog does not declare.
    declared: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    on_change: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    listeners: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    options: Vec<String>,
}

/// Execute the `dynform fields` command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let catalog = ctx.load_catalog()?;
    let form = Form::build(&catalog)
        .with_context(|| format!("cannot build a form from {}", catalog.source))?;

    let rows: Vec<FieldRow> = form
        .model()
        .iter()
        .map(|(name, control)| {
            let descriptor = form.descriptor(name);
            FieldRow {
                name: name.to_string(),
                label: descriptor.map_or_else(|| name.to_string(), |d| d.label.clone()),
                field_type: control.field_type.to_string(),
                required: control.required,
                declared: descriptor.is_some(),
                on_change: descriptor.and_then(|d| d.on_change()).map(ToString::to_string),
                listeners: form
                    .listeners()
                    .for_field(name)
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                options: descriptor
                    .map(|d| d.options.iter().map(|o| o.value.clone()).collect())
                    .unwrap_or_default(),
            }
        })
        .collect();

    if ctx.json {
        output_json(&serde_json::json!({
            "source": catalog.source,
            "fields": rows,
        }));
        return Ok(());
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            let mut rules: Vec<String> = r.on_change.iter().cloned().collect();
            rules.extend(r.listeners.iter().filter(|l| r.on_change.as_ref() != Some(*l)).cloned());
            vec![
                r.name.clone(),
                r.field_type.clone(),
                if r.required { "yes" } else { "no" }.to_string(),
                if rules.is_empty() { "-".to_string() } else { rules.join(", ") },
                r.label.clone(),
            ]
        })
        .collect();
    output_table(&["NAME", "TYPE", "REQUIRED", "ON CHANGE", "LABEL"], &table);
    println!();
    println!(
        "{}",
        render_muted(&format!("{} fields from {}", rows.len(), catalog.source))
    );
    Ok(())
}
