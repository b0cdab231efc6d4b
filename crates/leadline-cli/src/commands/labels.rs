use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use leadline_crm::CrmApi;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct LabelsArgs {
    /// Search term; defaults to the configured label name
    #[arg(long)]
    pub term: Option<String>,
}

#[derive(Debug, Serialize)]
struct LabelRow {
    id: String,
    name: String,
    color: Option<String>,
    selected: bool,
}

/// Read-only: shows which label a submission would attach, without creating one.
pub async fn list_labels(ctx: &Context<'_>, args: LabelsArgs) -> Result<()> {
    let name = match args.term {
        Some(term) => leadline_core::LabelName::new(&term)?,
        None => ctx.config.label.name.clone(),
    };
    let client = ctx.crm_client()?;
    let found = client
        .search_labels(&name)
        .await
        .with_context(|| format!("search labels matching {:?}", name.as_str()))?;
    let selected = ctx.config.label.policy.select(&found).map(|label| label.id);

    let rows: Vec<LabelRow> = found
        .into_iter()
        .map(|label| LabelRow {
            selected: Some(label.id) == selected,
            id: label.id.to_string(),
            name: label.name,
            color: label.color,
        })
        .collect();

    if ctx.json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!(
            "no labels match {:?}; a submission would create one",
            name.as_str()
        );
        return Ok(());
    }
    for row in rows {
        let marker = if row.selected { "*" } else { " " };
        match row.color {
            Some(color) => println!("{marker} {}  {} ({color})", row.id, row.name),
            None => println!("{marker} {}  {}", row.id, row.name),
        }
    }
    Ok(())
}
