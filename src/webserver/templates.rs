/// HTML templates for the registry page
///
/// Server-rendered, no client-side scripts. Every user supplied value goes
/// through `esc()` before it is interpolated.
use crate::devices::bulk::{ImportReport, RowOutcome};
use crate::devices::{Device, DeviceInput};

// =============================================================================
// VIEW MODEL
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
    Info,
}

impl FlashKind {
    fn css_class(&self) -> &'static str {
        match self {
            FlashKind::Success => "flash success",
            FlashKind::Error => "flash error",
            FlashKind::Info => "flash info",
        }
    }
}

/// One-shot message shown above the forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Info,
            message: message.into(),
        }
    }
}

/// Everything the index page shows
#[derive(Debug, Clone, Default)]
pub struct IndexView {
    /// Register form values (empty after a successful register)
    pub form: DeviceInput,
    /// Rejected edit: the row id and the values the user submitted
    pub edit: Option<(i64, DeviceInput)>,
    pub filter: String,
    pub show_all: bool,
    /// Search results, present only when a filter was given
    pub results: Option<Vec<Device>>,
    /// Full listing, newest first, present only with `show_all`
    pub all_devices: Option<Vec<Device>>,
    pub total: u64,
    pub flashes: Vec<Flash>,
    pub report: Option<ImportReport>,
    /// Last URL submitted to the URL import form
    pub import_url: String,
}

// =============================================================================
// ESCAPING
// =============================================================================

/// Escapes `& < > " '`, safe for text and double-quoted attributes
fn esc(value: &str) -> String {
    htmlescape::encode_minimal(value)
}

// =============================================================================
// LAYOUT
// =============================================================================

/// Base HTML template
pub fn base_template(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - NetRegistry</title>
    <style>
        {styles}
    </style>
</head>
<body>
    <div class="header">
        <h1>NetRegistry</h1>
        <span class="subtitle">IP / MAC device registry</span>
    </div>

    <main class="content">
        {content}
    </main>

    <footer class="footer">
        <p>NetRegistry v{version} | <a href="/api/health">Health</a> | <a href="/api/devices/export">Export CSV</a></p>
    </footer>
</body>
</html>"#,
        title = esc(title),
        styles = common_styles(),
        content = content,
        version = env!("CARGO_PKG_VERSION"),
    )
}

fn common_styles() -> &'static str {
    r#"
        * { box-sizing: border-box; }
        body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f4f6f8; color: #1f2933; }
        .header { background: #1f2933; color: #fff; padding: 16px 24px; display: flex; align-items: baseline; gap: 16px; }
        .header h1 { margin: 0; font-size: 1.4rem; }
        .subtitle { color: #9aa5b1; }
        .content { max-width: 1100px; margin: 0 auto; padding: 24px; }
        section { background: #fff; border-radius: 8px; padding: 16px 20px; margin-bottom: 20px; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
        h2 { margin-top: 0; font-size: 1.1rem; }
        label { display: block; font-size: 0.85rem; margin: 8px 0 4px; color: #52606d; }
        input[type=text], input[type=url] { width: 100%; padding: 8px; border: 1px solid #cbd2d9; border-radius: 4px; }
        table { width: 100%; border-collapse: collapse; }
        th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid #e4e7eb; vertical-align: middle; }
        td input[type=text] { padding: 4px 6px; }
        button { padding: 8px 14px; border: 0; border-radius: 4px; background: #2680c2; color: #fff; cursor: pointer; }
        button.danger { background: #ba2525; }
        .inline { display: inline; }
        .row { display: flex; gap: 12px; align-items: flex-end; }
        .row > * { flex: 1; }
        .flash { padding: 10px 14px; border-radius: 4px; margin-bottom: 16px; }
        .flash.success { background: #e3f9e5; color: #207227; }
        .flash.error { background: #ffe3e3; color: #a61b1b; }
        .flash.info { background: #e6f6ff; color: #035388; }
        .muted { color: #7b8794; }
        .footer { text-align: center; color: #7b8794; padding: 16px; font-size: 0.85rem; }
    "#
}

// =============================================================================
// INDEX PAGE
// =============================================================================

/// Full registry page
pub fn index_page(view: &IndexView) -> String {
    let mut content = String::new();

    for flash in &view.flashes {
        content.push_str(&format!(
            r#"<div class="{}">{}</div>"#,
            flash.kind.css_class(),
            esc(&flash.message)
        ));
    }

    content.push_str(&register_section(&view.form));
    content.push_str(&search_section(view));
    content.push_str(&import_section(view));
    content.push_str(&all_devices_section(view));

    base_template("Devices", &content)
}

/// Hidden inputs that carry the current search and listing state
fn context_fields(view: &IndexView) -> String {
    let mut fields = format!(
        r#"<input type="hidden" name="q" value="{}">"#,
        esc(&view.filter)
    );
    if view.show_all {
        fields.push_str(r#"<input type="hidden" name="all" value="1">"#);
    }
    fields
}

fn register_section(form: &DeviceInput) -> String {
    format!(
        r#"<section id="register">
    <h2>Register device</h2>
    <form method="post" action="/devices">
        <div class="row">
            <div><label for="ip_address">IP address</label>
                <input type="text" id="ip_address" name="ip_address" value="{ip}" placeholder="192.168.0.10"></div>
            <div><label for="mac_address">MAC address (00:1A:2B:3C:4D:5E)</label>
                <input type="text" id="mac_address" name="mac_address" value="{mac}" placeholder="00:1A:2B:3C:4D:5E"></div>
            <div><label for="name">Device / owner name</label>
                <input type="text" id="name" name="name" value="{name}"></div>
            <div><button type="submit">Register</button></div>
        </div>
    </form>
</section>"#,
        ip = esc(&form.ip_address),
        mac = esc(&form.mac_address),
        name = esc(&form.name),
    )
}

fn search_section(view: &IndexView) -> String {
    let results = match &view.results {
        None => String::new(),
        Some(devices) if devices.is_empty() => {
            r#"<p class="muted">No devices match this search.</p>"#.to_string()
        }
        Some(devices) => {
            let rows: String = devices.iter().map(|d| editable_row(d, view)).collect();
            format!(
                r#"<table>
    <thead><tr><th>IP</th><th>MAC</th><th>Name</th><th></th><th></th></tr></thead>
    <tbody>{}</tbody>
</table>"#,
                rows
            )
        }
    };

    format!(
        r#"<section id="search">
    <h2>Manage devices <span class="muted">({total} registered)</span></h2>
    <form method="get" action="/">
        <div class="row">
            <div><label for="q">Search by IP, MAC or name</label>
                <input type="text" id="q" name="q" value="{filter}"></div>
            {all}
            <div><button type="submit">Search</button></div>
        </div>
    </form>
    {results}
    <form method="post" action="/devices/delete-by-ip">
        {context}
        <div class="row">
            <div><label for="delete_ip">Delete by IP</label>
                <input type="text" id="delete_ip" name="ip_address" placeholder="10.0.0.5"></div>
            <div><button type="submit" class="danger">Delete</button></div>
        </div>
    </form>
</section>"#,
        total = view.total,
        filter = esc(&view.filter),
        all = if view.show_all {
            r#"<input type="hidden" name="all" value="1">"#
        } else {
            ""
        },
        results = results,
        context = context_fields(view),
    )
}

/// Search result row with inline edit and delete forms
fn editable_row(device: &Device, view: &IndexView) -> String {
    let form_id = format!("edit-{}", device.id);
    let values = match &view.edit {
        Some((id, input)) if *id == device.id => input.clone(),
        _ => DeviceInput::from(device),
    };
    format!(
        r#"<tr>
    <td><input type="text" form="{form_id}" name="ip_address" value="{ip}"></td>
    <td><input type="text" form="{form_id}" name="mac_address" value="{mac}"></td>
    <td><input type="text" form="{form_id}" name="name" value="{name}"></td>
    <td><form id="{form_id}" method="post" action="/devices/{id}/update" class="inline">{context}<button type="submit">Update</button></form></td>
    <td><form method="post" action="/devices/{id}/delete" class="inline">{context}<button type="submit" class="danger">Remove</button></form></td>
</tr>"#,
        form_id = form_id,
        id = device.id,
        ip = esc(&values.ip_address),
        mac = esc(&values.mac_address),
        name = esc(&values.name),
        context = context_fields(view),
    )
}

fn import_section(view: &IndexView) -> String {
    let report = view
        .report
        .as_ref()
        .map(import_report_table)
        .unwrap_or_default();

    format!(
        r#"<section id="import">
    <h2>Bulk import (CSV with columns ip, mac, name)</h2>
    <div class="row">
        <form method="post" action="/import/upload" enctype="multipart/form-data">
            {context}
            <label for="file">CSV file (comma or semicolon separated)</label>
            <input type="file" id="file" name="file" accept=".csv,text/csv">
            <button type="submit">Upload</button>
        </form>
        <form method="post" action="/import/url">
            {context}
            <label for="url">Published CSV URL</label>
            <input type="url" id="url" name="url" value="{url}" placeholder="https://...">
            <button type="submit">Import from URL</button>
        </form>
    </div>
    {report}
</section>"#,
        context = context_fields(view),
        url = esc(&view.import_url),
        report = report,
    )
}

fn import_report_table(report: &ImportReport) -> String {
    let skipped: String = report
        .rows
        .iter()
        .filter_map(|row| {
            let (label, reason) = match &row.outcome {
                RowOutcome::Inserted { .. } => return None,
                RowOutcome::Invalid { reason } => ("invalid", reason),
                RowOutcome::Duplicate { reason } => ("duplicate", reason),
            };
            Some(format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                row.row_num,
                label,
                esc(reason)
            ))
        })
        .collect();

    if skipped.is_empty() {
        return String::new();
    }

    format!(
        r#"<h3>Skipped rows</h3>
<table>
    <thead><tr><th>Row</th><th>Reason</th><th>Details</th></tr></thead>
    <tbody>{}</tbody>
</table>"#,
        skipped
    )
}

fn all_devices_section(view: &IndexView) -> String {
    let body = match &view.all_devices {
        None => format!(
            r#"<form method="get" action="/"><input type="hidden" name="q" value="{}"><input type="hidden" name="all" value="1"><button type="submit">Show all registered devices</button></form>"#,
            esc(&view.filter)
        ),
        Some(devices) if devices.is_empty() => {
            r#"<p class="muted">No devices registered yet.</p>"#.to_string()
        }
        Some(devices) => {
            let rows: String = devices
                .iter()
                .map(|d| {
                    format!(
                        r#"<tr><td>{name}</td><td>{ip}</td><td>{mac}</td><td>{created}</td><td><form method="post" action="/devices/{id}/delete" class="inline">{context}<button type="submit" class="danger">Remove</button></form></td></tr>"#,
                        name = esc(&d.name),
                        ip = esc(&d.ip_address),
                        mac = esc(&d.mac_address),
                        created = d.created_at.format("%Y-%m-%d %H:%M:%S"),
                        id = d.id,
                        context = context_fields(view),
                    )
                })
                .collect();
            format!(
                r#"<table>
    <thead><tr><th>Name</th><th>IP</th><th>MAC</th><th>Registered</th><th></th></tr></thead>
    <tbody>{}</tbody>
</table>"#,
                rows
            )
        }
    };

    format!(
        r#"<section id="all-devices">
    <h2>Registered devices</h2>
    {}
</section>"#,
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn device(name: &str) -> Device {
        Device {
            id: 7,
            ip_address: "10.0.0.5".to_string(),
            mac_address: "AA:BB:CC:DD:EE:FF".to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_values_are_escaped() {
        let view = IndexView {
            results: Some(vec![device("<script>alert(1)</script>")]),
            filter: "\"><b>".to_string(),
            ..IndexView::default()
        };
        let html = index_page(&view);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(!html.contains("\"><b>"));
    }

    #[test]
    fn test_sticky_form_values() {
        let view = IndexView {
            form: DeviceInput::new("10.0.0.300", "AA:BB", "Laptop"),
            flashes: vec![Flash::error("invalid IP address: 10.0.0.300")],
            ..IndexView::default()
        };
        let html = index_page(&view);
        assert!(html.contains(r#"value="10.0.0.300""#));
        assert!(html.contains(r#"value="Laptop""#));
        assert!(html.contains("flash error"));
    }

    #[test]
    fn test_rejected_edit_keeps_submitted_values() {
        let mut other = device("Switch");
        other.id = 2;
        other.ip_address = "10.0.0.2".to_string();
        let view = IndexView {
            results: Some(vec![device("Printer"), other]),
            filter: "10.0.0".to_string(),
            edit: Some((7, DeviceInput::new("10.0.0.999", "AA:BB:CC:DD:EE:FF", "Printer 2"))),
            ..IndexView::default()
        };
        let html = index_page(&view);
        assert!(html.contains(r#"value="10.0.0.999""#));
        assert!(html.contains(r#"value="Printer 2""#));
        // Other rows keep their stored values
        assert!(html.contains(r#"value="10.0.0.2""#));
        assert!(html.contains(r#"value="Switch""#));
    }

    #[test]
    fn test_empty_search_message() {
        let view = IndexView {
            filter: "nothing".to_string(),
            results: Some(Vec::new()),
            ..IndexView::default()
        };
        assert!(index_page(&view).contains("No devices match this search."));
    }
}
