use chessdash_types::summary::DailySummaryRow;

use crate::escape_html;

const WIDTH: f64 = 1100.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 70.0;
const MARGIN_TOP: f64 = 80.0;
const MARGIN_BOTTOM: f64 = 90.0;
const TICKS: u32 = 5;

const OK_COLOR: &str = "green";
const OVERUSE_COLOR: &str = "red";
const RATE_COLOR: &str = "blue";

struct Plot {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Plot {
    fn new() -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
            height: HEIGHT - MARGIN_TOP - MARGIN_BOTTOM,
        }
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Vertical position of `value` on an axis spanning `0..=max`.
    fn y(&self, value: f64, max: f64) -> f64 {
        self.bottom() - value / max * self.height
    }
}

/// Smallest multiple of the tick count that is at least `max_games`.
fn games_axis_max(rows: &[DailySummaryRow]) -> u32 {
    let max_games = rows.iter().map(|row| row.games).max().unwrap_or(0);
    max_games.max(1).div_ceil(TICKS) * TICKS
}

/// Games per day as bars (red on overuse days) with the win rate drawn as
/// a line against a secondary 0–100 % axis.
pub fn render_chart(rows: &[DailySummaryRow], title: &str) -> String {
    let plot = Plot::new();
    let games_max = games_axis_max(rows);
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" \
         role=\"img\" aria-label=\"{title}\">\n\
         <text x=\"{cx}\" y=\"30\" text-anchor=\"middle\" font-size=\"20\">{title}</text>\n",
        cx = WIDTH / 2.0,
        title = escape_html(title),
    );

    svg.push_str(&axes(&plot, games_max));
    svg.push_str(&legend(&plot, rows.is_empty()));

    if !rows.is_empty() {
        let slot = plot.width / rows.len() as f64;
        let bar_width = slot * 0.6;
        let mut points = Vec::with_capacity(rows.len());

        for (i, row) in rows.iter().enumerate() {
            let cx = plot.left + slot * (i as f64 + 0.5);
            let top = plot.y(f64::from(row.games), f64::from(games_max));
            let fill = if row.flag.is_overuse() {
                OVERUSE_COLOR
            } else {
                OK_COLOR
            };
            svg.push_str(&format!(
                "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\">\
                 <title>{}: {} games</title></rect>\n",
                cx - bar_width / 2.0,
                top,
                bar_width,
                plot.bottom() - top,
                fill,
                row.date.format("%Y-%m-%d"),
                row.games
            ));
            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"12\">{}</text>\n",
                cx,
                top - 4.0,
                row.games
            ));
            svg.push_str(&format!(
                "<text x=\"{cx:.1}\" y=\"{y:.1}\" text-anchor=\"end\" font-size=\"11\" \
                 transform=\"rotate(-45 {cx:.1} {y:.1})\">{date}</text>\n",
                y = plot.bottom() + 16.0,
                date = row.date.format("%Y-%m-%d"),
            ));
            points.push((cx, plot.y(row.win_rate_percent, 100.0), row.win_rate_percent));
        }

        let path: Vec<String> = points
            .iter()
            .map(|(x, y, _)| format!("{x:.1},{y:.1}"))
            .collect();
        svg.push_str(&format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{RATE_COLOR}\" stroke-width=\"2\"/>\n",
            path.join(" ")
        ));
        for (x, y, rate) in points {
            svg.push_str(&format!(
                "<circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"5\" fill=\"{RATE_COLOR}\">\
                 <title>{rate:.1}%</title></circle>\n"
            ));
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn axes(plot: &Plot, games_max: u32) -> String {
    let mut svg = format!(
        "<g stroke=\"#444\" stroke-width=\"1\">\
         <line x1=\"{l}\" y1=\"{t}\" x2=\"{l}\" y2=\"{b}\"/>\
         <line x1=\"{r}\" y1=\"{t}\" x2=\"{r}\" y2=\"{b}\"/>\
         <line x1=\"{l}\" y1=\"{b}\" x2=\"{r}\" y2=\"{b}\"/></g>\n",
        l = plot.left,
        r = plot.right(),
        t = plot.top,
        b = plot.bottom(),
    );

    for step in 0..=TICKS {
        let games = games_max / TICKS * step;
        let rate = 100 / TICKS * step;
        let y = plot.y(f64::from(step), f64::from(TICKS));
        svg.push_str(&format!(
            "<line x1=\"{l}\" y1=\"{y:.1}\" x2=\"{r}\" y2=\"{y:.1}\" stroke=\"#e9ecef\"/>\
             <text x=\"{lt}\" y=\"{y:.1}\" text-anchor=\"end\" dominant-baseline=\"middle\" \
             font-size=\"12\">{games}</text>\
             <text x=\"{rt}\" y=\"{y:.1}\" text-anchor=\"start\" dominant-baseline=\"middle\" \
             font-size=\"12\">{rate}</text>\n",
            l = plot.left,
            r = plot.right(),
            lt = plot.left - 8.0,
            rt = plot.right() + 8.0,
        ));
    }

    let mid = plot.top + plot.height / 2.0;
    svg.push_str(&format!(
        "<text x=\"20\" y=\"{mid}\" text-anchor=\"middle\" font-size=\"14\" \
         transform=\"rotate(-90 20 {mid})\">Games</text>\n\
         <text x=\"{x}\" y=\"{mid}\" text-anchor=\"middle\" font-size=\"14\" \
         transform=\"rotate(90 {x} {mid})\">Win Rate (%)</text>\n\
         <text x=\"{cx}\" y=\"{y}\" text-anchor=\"middle\" font-size=\"14\">Date</text>\n",
        x = WIDTH - 20.0,
        cx = plot.left + plot.width / 2.0,
        y = HEIGHT - 8.0,
    ));
    svg
}

fn legend(plot: &Plot, empty: bool) -> String {
    let y = plot.top - 28.0;
    let x = plot.left + plot.width * 0.1;
    let (bars, line) = if empty {
        ("No Data", "No Data")
    } else {
        ("Games per Day", "Win Rate (%)")
    };
    format!(
        "<g font-size=\"13\">\
         <rect x=\"{x}\" y=\"{ry}\" width=\"14\" height=\"14\" fill=\"{OK_COLOR}\"/>\
         <text x=\"{tx}\" y=\"{y}\" dominant-baseline=\"middle\">{bars}</text>\
         <line x1=\"{lx1}\" y1=\"{y}\" x2=\"{lx2}\" y2=\"{y}\" stroke=\"{RATE_COLOR}\" stroke-width=\"2\"/>\
         <text x=\"{lt}\" y=\"{y}\" dominant-baseline=\"middle\">{line}</text></g>\n",
        ry = y - 7.0,
        tx = x + 20.0,
        lx1 = x + 160.0,
        lx2 = x + 184.0,
        lt = x + 190.0,
    )
}
