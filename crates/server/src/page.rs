//! The single HTML page: option form plus the result of the last run.

use std::fmt::Write;

use serde::Deserialize;
use triage_core::render::escape_html;

/// Raw form fields, echoed back into the page after a run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriageForm {
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub get_tickets: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub time_wait: String,
    #[serde(default)]
    pub log_level: String,
}

/// What to show below the form.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// HTML table rows, embedded as is.
    Rows(String),
    /// Plain text output, shown preformatted.
    Text(String),
    Error(String),
}

const MODES: [&str; 3] = ["staging", "production", "test"];
const SCOPES: [&str; 4] = ["mine", "mine-focused", "group", "group-focused"];
const OUTPUTS: [&str; 3] = ["json", "table", "html"];
const LOG_LEVELS: [&str; 2] = ["warning", "debug"];

pub fn render_page(
    form: &TriageForm,
    outcome: Option<&Outcome>,
) -> Result<String, std::fmt::Error> {
    let mut page = String::new();
    write_page(&mut page, form, outcome)?;
    Ok(page)
}

fn write_page(out: &mut String, form: &TriageForm, outcome: Option<&Outcome>) -> std::fmt::Result {
    out.push_str(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Ticket triage</title>\n\
         <style>body{font-family:sans-serif}table{border-collapse:collapse}\
         td,th{border:1px solid #ccc;padding:4px}</style>\n</head>\n<body>\n\
         <h1>Ticket triage</h1>\n<form method=\"post\" action=\"/\">\n",
    );

    write_select(out, "Mode", "mode", &MODES, &form.mode, false)?;
    write_select(out, "Tickets", "get_tickets", &SCOPES, &form.get_tickets, true)?;
    write_select(out, "Output", "output", &OUTPUTS, &form.output, false)?;
    write_select(out, "Log level", "log_level", &LOG_LEVELS, &form.log_level, false)?;
    writeln!(
        out,
        "<label>Fixture file <input type=\"text\" name=\"file\" value=\"{}\"></label>",
        escape_html(&form.file)
    )?;
    writeln!(
        out,
        "<label>Time wait (ms) <input type=\"number\" min=\"0\" name=\"time_wait\" value=\"{}\"></label>",
        escape_html(&form.time_wait)
    )?;
    out.push_str("<button type=\"submit\">Run</button>\n</form>\n");

    match outcome {
        Some(Outcome::Rows(rows)) => {
            writeln!(out, "<table>\n{}</table>", rows)?;
        }
        Some(Outcome::Text(text)) => {
            writeln!(out, "<pre>{}</pre>", escape_html(text))?;
        }
        Some(Outcome::Error(message)) => {
            writeln!(out, "<p class=\"error\">Error: {}</p>", escape_html(message))?;
        }
        None => {}
    }

    out.push_str("</body>\n</html>\n");
    Ok(())
}

fn write_select(
    out: &mut String,
    label: &str,
    name: &str,
    options: &[&str],
    selected: &str,
    allow_empty: bool,
) -> std::fmt::Result {
    writeln!(out, "<label>{} <select name=\"{}\">", label, name)?;
    if allow_empty {
        writeln!(out, "<option value=\"\"></option>")?;
    }
    for option in options {
        let marker = if *option == selected { " selected" } else { "" };
        writeln!(out, "<option value=\"{0}\"{1}>{0}</option>", option, marker)?;
    }
    writeln!(out, "</select></label>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page_has_form() {
        let page = render_page(&TriageForm::default(), None).unwrap();
        assert!(page.contains("<form method=\"post\""));
        assert!(page.contains("name=\"get_tickets\""));
        assert!(!page.contains("<pre>"));
        assert!(!page.contains("selected"));
    }

    #[test]
    fn test_form_values_are_kept() {
        let form = TriageForm {
            mode: "test".to_string(),
            output: "table".to_string(),
            file: "/tmp/a\"b.json".to_string(),
            ..Default::default()
        };
        let page = render_page(&form, None).unwrap();
        assert!(page.contains("<option value=\"test\" selected>test</option>"));
        assert!(page.contains("<option value=\"table\" selected>table</option>"));
        assert!(page.contains("value=\"/tmp/a&quot;b.json\""));
    }

    #[test]
    fn test_text_outcome_is_escaped() {
        let outcome = Outcome::Text("[{\"subject\": \"<b>\"}]".to_string());
        let page = render_page(&TriageForm::default(), Some(&outcome)).unwrap();
        assert!(page.contains("<pre>[{&quot;subject&quot;: &quot;&lt;b&gt;&quot;}]</pre>"));
    }

    #[test]
    fn test_rows_outcome_is_embedded() {
        let outcome = Outcome::Rows("<tr><td>1</td></tr>\n".to_string());
        let page = render_page(&TriageForm::default(), Some(&outcome)).unwrap();
        assert!(page.contains("<table>\n<tr><td>1</td></tr>\n</table>"));
    }

    #[test]
    fn test_error_outcome() {
        let outcome = Outcome::Error("bad <mode>".to_string());
        let page = render_page(&TriageForm::default(), Some(&outcome)).unwrap();
        assert!(page.contains("Error: bad &lt;mode&gt;"));
    }
}
