//! Calendar event commands.

use chrono::{NaiveTime, Utc};
use vista_core::collab::{EventProposal, EventTime, DEFAULT_EVENT_HOUR};

use crate::app::AppContext;
use crate::cli::{EventAddArgs, EventListArgs, IdArgs};
use crate::helpers::{parse_day, parse_time, resolve_id};
use crate::output::{print_event_list, short_id};

pub fn handle_add(ctx: &AppContext, args: &EventAddArgs) -> anyhow::Result<()> {
    let title = args.title.trim();
    if title.is_empty() {
        return Err(crate::errors::CliError::invalid_input("Event title cannot be empty").into());
    }
    let day = parse_day(&args.date)?;
    let time = match args.time.as_deref() {
        Some(value) => parse_time(value)?,
        None => NaiveTime::from_hms_opt(DEFAULT_EVENT_HOUR, 0, 0).unwrap_or(NaiveTime::MIN),
    };

    let event = EventProposal {
        title: title.to_string(),
        time: EventTime::Unconfirmed(day),
    }
    .with_time(time)?
    .into_app_event()?;

    let mut open = ctx.unlock()?;
    let id = open.dataset.add_event(event.title, event.date).id.clone();
    open.vault.save(&open.dataset)?;

    if !ctx.quiet() {
        println!("Added event {}", short_id(&id));
    }
    Ok(())
}

pub fn handle_list(ctx: &AppContext, args: &EventListArgs) -> anyhow::Result<()> {
    let open = ctx.unlock()?;
    let events: Vec<_> = if args.all {
        open.dataset.events.iter().collect()
    } else {
        open.dataset.upcoming_events(Utc::now())
    };
    let format = format!("{} %H:%M", ctx.date_format()?);
    print_event_list(&events, args.json, &format, ctx.quiet())
}

pub fn handle_delete(ctx: &AppContext, args: &IdArgs) -> anyhow::Result<()> {
    let mut open = ctx.unlock()?;
    let id = resolve_id(
        open.dataset.events.iter().map(|e| e.id.as_str()),
        &args.id,
        "Event",
        "Hint: Run `vista event list --all` to find event IDs.",
    )?;

    open.dataset.delete_event(&id);
    open.vault.save(&open.dataset)?;

    if !ctx.quiet() {
        println!("Deleted event {}", short_id(&id));
    }
    Ok(())
}
