//! `dynform fill` and `dynform check` -- apply edits to a form and report it.

use anyhow::{bail, Context, Result};
use dynform_core::value::FieldValue;
use dynform_engine::Form;

use crate::cli::FillArgs;
use crate::context::RuntimeContext;
use crate::output::{
    format_change, format_value, output_json, output_table, render_fail, render_muted, render_pass,
};

/// Execute the `dynform fill` command.
pub fn run(ctx: &RuntimeContext, args: &FillArgs) -> Result<()> {
    let (source, form) = fill_form(ctx, args)?;
    report(ctx, &source, &form, args.events);
    Ok(())
}

/// Execute the `dynform check` command: `fill`, then fail on missing
/// required fields.
pub fn run_check(ctx: &RuntimeContext, args: &FillArgs) -> Result<()> {
    let (source, form) = fill_form(ctx, args)?;
    report(ctx, &source, &form, args.events);

    let missing = form.model().missing_required();
    if !missing.is_empty() {
        bail!("missing required fields: {}", missing.join(", "));
    }
    Ok(())
}

/// Build the form from the catalog, apply each `--set` as a user edit in
/// order, then all `--patch` values as one patch.
fn fill_form(ctx: &RuntimeContext, args: &FillArgs) -> Result<(String, Form)> {
    let catalog = ctx.load_catalog()?;
    let mut form = Form::build(&catalog)
        .with_context(|| format!("cannot build a form from {}", catalog.source))?;

    for raw in &args.sets {
        let (name, value) = parse_assignment(raw)?;
        form.set_raw(name, value)
            .with_context(|| format!("cannot set {}", name))?;
    }

    if !args.patches.is_empty() {
        let mut values: Vec<(String, FieldValue)> = Vec::with_capacity(args.patches.len());
        for raw in &args.patches {
            let (name, value) = parse_assignment(raw)?;
            let value = form
                .coerce(name, value)
                .with_context(|| format!("cannot patch {}", name))?;
            values.push((name.to_string(), value));
        }
        form.patch(values).context("patch rejected")?;
    }

    Ok((catalog.source, form))
}

/// Split `NAME=VALUE`. The value may be empty (clears the field) and may
/// itself contain `=`.
fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
    let Some((name, value)) = raw.split_once('=') else {
        bail!("expected NAME=VALUE, got '{}'", raw);
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("missing field name in '{}'", raw);
    }
    Ok((name, value.trim()))
}

fn report(ctx: &RuntimeContext, source: &str, form: &Form, events: bool) {
    let missing = form.model().missing_required();

    if ctx.json {
        let mut out = serde_json::json!({
            "source": source,
            "values": form.model(),
            "missing": missing,
            "valid": missing.is_empty(),
        });
        if events {
            out["events"] = serde_json::json!(form.changes());
        }
        output_json(&out);
        return;
    }

    let date_format = ctx.date_format();
    let rows: Vec<Vec<String>> = form
        .model()
        .iter()
        .map(|(name, control)| {
            vec![
                name.to_string(),
                format_value(&control.value, date_format),
                if control.required { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    output_table(&["FIELD", "VALUE", "REQUIRED"], &rows);

    if events && !form.changes().is_empty() {
        println!();
        for change in form.changes() {
            println!("{}", render_muted(&format_change(change, date_format)));
        }
    }

    println!();
    if missing.is_empty() {
        println!("{}", render_pass("form is complete"));
    } else {
        println!("{}", render_fail(&format!("missing: {}", missing.join(", "))));
    }
}
