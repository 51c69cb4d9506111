//! `habindex show` — summarize a previously written index, or print one
//! item record from it.

use tabled::Tabled;

use habindex_core::Index;

use crate::cli::{GlobalOpts, ShowArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(serde::Serialize, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn row(metric: &str, value: impl ToString) -> SummaryRow {
    SummaryRow {
        metric: metric.to_owned(),
        value: value.to_string(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &ShowArgs, global: &GlobalOpts) -> Result<(), CliError> {
    // Reading the index needs no server connection, only the data dir.
    let path = config::resolve_data_dir(global)?.join("index.json");

    let index = Index::load(&path).map_err(|_| CliError::NoIndex {
        path: path.display().to_string(),
    })?;

    if let Some(ref name) = args.item {
        let item = index
            .items_by_name
            .get(name)
            .ok_or_else(|| CliError::ItemNotFound { name: name.clone() })?;

        let rendered = output::render_single(
            &global.output,
            item,
            output::render_json_pretty,
            |i| i.name.clone(),
        );
        output::print_output(&rendered, global.quiet);
        return Ok(());
    }

    let items = index.items_by_name.values();
    let locations = items.clone().filter(|i| i.semantic.is_location).count();
    let equipment = items.clone().filter(|i| i.semantic.is_equipment).count();
    let points = items.clone().filter(|i| i.semantic.is_point).count();

    let roots: Vec<&str> = index
        .semantic_tree
        .locations
        .iter()
        .map(|l| l.item.as_str())
        .collect();

    let rows = vec![
        row("Generated at", index.generated_at.to_rfc3339()),
        row("Items", index.items_by_name.len()),
        row("Locations", locations),
        row("Equipment", equipment),
        row("Points", points),
        row("Tree nodes", index.semantic_tree.node_count()),
        row("Root locations", roots.join(", ")),
    ];

    let rendered = output::render_list(
        &global.output,
        &rows,
        |r| SummaryRow {
            metric: r.metric.clone(),
            value: r.value.clone(),
        },
        |r| format!("{}={}", r.metric, r.value),
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}
