//! Journal entry commands.

use std::io::IsTerminal;

use chrono::Utc;
use vista_core::storage::Dataset;

use crate::app::AppContext;
use crate::cli::{AddArgs, DeleteArgs, EditArgs, ListArgs, SearchArgs, ShowArgs};
use crate::constants::DEFAULT_LIST_LIMIT;
use crate::helpers::{parse_entry_date, read_entry_body, resolve_id};
use crate::output::{print_entry, print_entry_list, short_id};

const ENTRY_HINT: &str = "Hint: Run `vista list` to find entry IDs.";

fn resolve_entry_id(dataset: &Dataset, wanted: &str) -> anyhow::Result<String> {
    resolve_id(
        dataset.entries.iter().map(|e| e.id.as_str()),
        wanted,
        "Entry",
        ENTRY_HINT,
    )
}

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let date = parse_entry_date(args.date.as_deref(), Utc::now())?;
    let body = read_entry_body(args.body.clone(), "")?;

    let mut open = ctx.unlock()?;
    let id = open.dataset.add_entry(date, body).id.clone();
    open.vault.save(&open.dataset)?;

    if !ctx.quiet() {
        println!("Added entry {}", short_id(&id));
    }
    Ok(())
}

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let open = ctx.unlock()?;
    let limit = args.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let entries: Vec<_> = open
        .dataset
        .entries_newest_first()
        .into_iter()
        .take(limit)
        .collect();
    print_entry_list(&entries, args.json, ctx.date_format()?, ctx.quiet())
}

pub fn handle_search(ctx: &AppContext, args: &SearchArgs) -> anyhow::Result<()> {
    let open = ctx.unlock()?;
    let hits = open.dataset.search(&args.query);
    print_entry_list(&hits, args.json, ctx.date_format()?, ctx.quiet())
}

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let open = ctx.unlock()?;
    let id = resolve_entry_id(&open.dataset, &args.id)?;
    let Some(entry) = open.dataset.entry(&id) else {
        return Err(anyhow::anyhow!("Entry {} not found", id));
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        print_entry(entry, ctx.date_format()?, ctx.quiet());
    }
    Ok(())
}

pub fn handle_edit(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    let mut open = ctx.unlock()?;
    let id = resolve_entry_id(&open.dataset, &args.id)?;
    let Some(mut entry) = open.dataset.entry(&id).cloned() else {
        return Err(anyhow::anyhow!("Entry {} not found", id));
    };

    let body = read_entry_body(args.body.clone(), &entry.content)?;
    if body == entry.content {
        if !ctx.quiet() {
            println!("No changes to entry {}", short_id(&id));
        }
        return Ok(());
    }
    entry.content = body;
    open.dataset.update_entry(entry);
    open.vault.save(&open.dataset)?;

    if !ctx.quiet() {
        println!("Updated entry {}", short_id(&id));
    }
    Ok(())
}

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let mut open = ctx.unlock()?;
    let id = resolve_entry_id(&open.dataset, &args.id)?;

    if !args.yes && std::io::stdin().is_terminal() && !ctx.quiet() {
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!("Delete entry {}?", short_id(&id)))
            .default(false)
            .interact()?;
        if !proceed {
            return Err(anyhow::anyhow!("Delete cancelled"));
        }
    }

    open.dataset.delete_entry(&id);
    open.vault.save(&open.dataset)?;

    if !ctx.quiet() {
        println!("Deleted entry {}", short_id(&id));
    }
    Ok(())
}
