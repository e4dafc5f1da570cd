use std::collections::HashMap;
use std::fmt::Write;

use crate::scoring::ScoredTicket;

use super::{DisplayRow, RenderError, RenderOptions};

const COLUMNS: [&str; 11] = [
    "id",
    "department_id",
    "company_name",
    "subject",
    "priority",
    "status",
    "is_escalated",
    "environment",
    "account_tier",
    "ticket_type",
    "created_at",
];

const SCORE_COLUMN: &str = "Score";

#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
}

/// ASCII table of the ranked tickets.
///
/// `company_name` and `subject` are left aligned, every other column is
/// centered.
pub fn render_table(
    tickets: &[ScoredTicket],
    company_names: &HashMap<u64, String>,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let mut header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
    if options.show_score {
        header.push(SCORE_COLUMN.to_string());
    }
    let aligns: Vec<Align> = header
        .iter()
        .map(|name| match name.as_str() {
            "company_name" | "subject" => Align::Left,
            _ => Align::Center,
        })
        .collect();

    let rows: Vec<Vec<String>> = tickets
        .iter()
        .map(|scored| {
            let row = DisplayRow::new(scored, company_names);
            let mut cells = vec![
                row.id.to_string(),
                row.department_id,
                row.company_name,
                row.subject,
                row.priority.to_string(),
                row.status.to_string(),
                row.is_escalated.to_string(),
                row.environment.to_string(),
                row.account_tier.to_string(),
                row.ticket_type.to_string(),
                row.created_at,
            ];
            if options.show_score {
                cells.push(row.score.to_string());
            }
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = border_line(&widths);
    let mut out = String::new();
    writeln!(out, "{}", border)?;
    write_row(&mut out, &header, &widths, &vec![Align::Center; widths.len()])?;
    writeln!(out, "{}", border)?;
    for row in &rows {
        write_row(&mut out, row, &widths, &aligns)?;
    }
    write!(out, "{}", border)?;
    Ok(out)
}

fn border_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line
}

fn write_row(
    out: &mut String,
    cells: &[String],
    widths: &[usize],
    aligns: &[Align],
) -> std::fmt::Result {
    out.push('|');
    for ((cell, width), align) in cells.iter().zip(widths).zip(aligns) {
        match align {
            Align::Left => write!(out, " {:<width$} |", cell, width = width)?,
            Align::Center => write!(out, " {:^width$} |", cell, width = width)?,
        }
    }
    out.push('\n');
    Ok(())
}
