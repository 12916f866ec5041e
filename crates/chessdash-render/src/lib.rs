//! Self-contained HTML dashboard: a combined bar/line chart drawn as inline
//! SVG followed by the daily summary table.

use chessdash_types::{
    summary::{DailySummary, DailySummaryRow, DayFlag},
    time_control::TimeClass,
};
use tracing::debug;

mod chart;

pub use chart::render_chart;

const PAGE_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; color: #212529; margin: 0; }
.container { max-width: 1200px; margin: auto; padding: 0 1rem; }
h1, h3, .subtitle, .empty { text-align: center; }
h1 { margin: 1.5rem 0; }
h3 { margin: 1rem 0; }
.subtitle { color: #6c757d; }
figure.chart { margin: 0; }
figure.chart svg { width: 100%; height: auto; }
table { width: 100%; border-collapse: collapse; text-align: center; margin-bottom: 2rem; }
th, td { border: 1px solid #dee2e6; padding: 0.5rem; }
tbody tr:nth-of-type(odd) { background-color: rgba(0, 0, 0, 0.05); }
tbody tr:hover { background-color: rgba(0, 0, 0, 0.075); }
"#;

#[derive(Debug, Clone, Copy)]
pub struct DashboardRenderer {
    time_class: TimeClass,
}

impl DashboardRenderer {
    pub fn new(time_class: TimeClass) -> Self {
        Self { time_class }
    }

    pub fn heading(&self) -> String {
        format!("{} Chess Dashboard – Last 2 Months", self.time_class.label())
    }

    pub fn chart_title(&self, summary: &DailySummary) -> String {
        if summary.is_empty() {
            format!("No {} Games Found", self.time_class.label())
        } else {
            format!("{} Games and Win Rate per Day", self.time_class.label())
        }
    }

    /// Render the full page. An empty summary produces the placeholder view.
    pub fn render(&self, summary: &DailySummary) -> String {
        debug!(
            "Rendering dashboard with {} rows for {}",
            summary.rows.len(),
            summary.username
        );
        let heading = self.heading();
        let chart = render_chart(&summary.rows, &self.chart_title(summary));
        let table = if summary.is_empty() {
            "<p class=\"empty\">No data available.</p>\n".to_string()
        } else {
            render_table(&summary.rows)
        };

        let mut subtitle = format!("Player: {}", escape_html(&summary.username));
        if !summary.skipped.is_empty() {
            subtitle.push_str(&format!(
                " · {} record(s) skipped",
                summary.skipped.len()
            ));
        }

        format!(
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{title}</title>\n\
             <style>{style}</style>\n\
             </head>\n\
             <body>\n\
             <div class=\"container\">\n\
             <h1>{title}</h1>\n\
             <p class=\"subtitle\">{subtitle}</p>\n\
             <figure class=\"chart\">\n{chart}</figure>\n\
             <h3>Daily Summary Table</h3>\n\
             {table}\
             </div>\n\
             </body>\n\
             </html>\n",
            title = escape_html(&heading),
            style = PAGE_STYLE,
        )
    }
}

pub fn flag_badge(flag: DayFlag) -> &'static str {
    match flag {
        DayFlag::Ok => "✅ OK",
        DayFlag::Overuse => "⚠️ Overuse",
    }
}

pub fn render_table(rows: &[DailySummaryRow]) -> String {
    let mut html = String::from(
        "<table>\n<thead>\n<tr><th>Date</th><th>Games</th><th>Wins</th>\
         <th>Win Rate (%)</th><th>Flag</th></tr>\n</thead>\n<tbody>\n",
    );
    for row in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.1}</td><td>{}</td></tr>\n",
            row.date.format("%Y-%m-%d"),
            row.games,
            row.wins,
            row.win_rate_percent,
            flag_badge(row.flag)
        ));
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
