//! Output formatting helpers for the CLI.

use std::fmt::Write;
use std::io::IsTerminal;

use comfy_table::presets::NOTHING;
use comfy_table::{ContentArrangement, Table};

use vista_core::storage::{parse_iso, AppEvent, DiaryEntry};

const SUMMARY_WIDTH: usize = 60;

/// Render a stored ISO date with the configured pattern; unparseable values pass through.
pub fn format_date(value: &str, pattern: &str) -> String {
    let Some(at) = parse_iso(value) else {
        return value.to_string();
    };
    let mut rendered = String::new();
    match write!(rendered, "{}", at.format(pattern)) {
        Ok(()) => rendered,
        Err(_) => value.to_string(),
    }
}

/// First line of an entry body, shortened for listings.
pub fn entry_summary(entry: &DiaryEntry) -> String {
    let first_line = entry.content.lines().next().unwrap_or_default();
    if first_line.chars().count() > SUMMARY_WIDTH {
        let cut: String = first_line.chars().take(SUMMARY_WIDTH - 1).collect();
        format!("{}…", cut)
    } else {
        first_line.to_string()
    }
}

/// Leading characters of an ID, enough to pass back as a prefix.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

pub fn entries_json(entries: &[&DiaryEntry]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

pub fn events_json(events: &[&AppEvent]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(events)?)
}

/// Lay out rows as a borderless table on a TTY, tab-separated otherwise.
fn render_rows(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    if std::io::stdout().is_terminal() {
        let mut table = Table::new();
        table.load_preset(NOTHING);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(headers.to_vec());
        for row in rows {
            table.add_row(row);
        }
        table.to_string()
    } else {
        rows.iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn entry_rows(entries: &[&DiaryEntry], date_format: &str) -> Vec<Vec<String>> {
    entries
        .iter()
        .map(|entry| {
            vec![
                short_id(&entry.id).to_string(),
                format_date(&entry.date, date_format),
                entry_summary(entry),
            ]
        })
        .collect()
}

pub fn event_rows(events: &[&AppEvent], date_format: &str) -> Vec<Vec<String>> {
    events
        .iter()
        .map(|event| {
            vec![
                short_id(&event.id).to_string(),
                format_date(&event.date, date_format),
                event.title.clone(),
            ]
        })
        .collect()
}

pub fn print_entry_list(
    entries: &[&DiaryEntry],
    json: bool,
    date_format: &str,
    quiet: bool,
) -> anyhow::Result<()> {
    if json {
        println!("{}", entries_json(entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        if !quiet {
            println!("No entries found.");
        }
        return Ok(());
    }
    println!("{}", render_rows(&["ID", "DATE", "ENTRY"], entry_rows(entries, date_format)));
    Ok(())
}

pub fn print_event_list(
    events: &[&AppEvent],
    json: bool,
    date_format: &str,
    quiet: bool,
) -> anyhow::Result<()> {
    if json {
        println!("{}", events_json(events)?);
        return Ok(());
    }
    if events.is_empty() {
        if !quiet {
            println!("No events found.");
        }
        return Ok(());
    }
    println!("{}", render_rows(&["ID", "WHEN (UTC)", "EVENT"], event_rows(events, date_format)));
    Ok(())
}

/// Print a single entry in human-readable format.
pub fn print_entry(entry: &DiaryEntry, date_format: &str, quiet: bool) {
    if !quiet {
        println!("ID: {}", entry.id);
        println!("Date: {}", format_date(&entry.date, date_format));
        println!();
    }
    println!("{}", entry.content);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(content: &str) -> DiaryEntry {
        DiaryEntry {
            id: "7a2e3c0b-1234-5678-9abc-def012345678".to_string(),
            date: "2024-01-01T10:30:00.000Z".to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-01T10:30:00.000Z", "%d %b %Y"), "01 Jan 2024");
        assert_eq!(format_date("2024-03-02", "%Y/%m/%d"), "2024/03/02");
        assert_eq!(format_date("someday", "%Y"), "someday");
    }

    #[test]
    fn test_format_date_bad_pattern_keeps_raw_value() {
        assert_eq!(format_date("2024-01-01", "%Y-%Q"), "2024-01-01");
    }

    #[test]
    fn test_entry_summary_first_line_truncated() {
        assert_eq!(entry_summary(&entry("line one\nline two")), "line one");

        let long = "x".repeat(100);
        let summary = entry_summary(&entry(&long));
        assert_eq!(summary.chars().count(), SUMMARY_WIDTH);
        assert!(summary.ends_with('…'));
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("7a2e3c0b-1234"), "7a2e3c0b");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_entry_rows() {
        let e = entry("hello");
        let rows = entry_rows(&[&e], "%Y-%m-%d");
        assert_eq!(rows, vec![vec!["7a2e3c0b".to_string(), "2024-01-01".to_string(), "hello".to_string()]]);
    }

    #[test]
    fn test_entries_json_keeps_wire_fields() {
        let e = entry("hello");
        let json: serde_json::Value = serde_json::from_str(&entries_json(&[&e]).unwrap()).unwrap();
        assert_eq!(json[0]["content"], "hello");
        assert_eq!(json[0]["id"], e.id.as_str());
    }
}
