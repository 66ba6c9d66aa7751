// SVG chart rendering for batch results.
//
// Produces self-contained <svg> documents: a pie of the label distribution
// and a bar histogram of polarity. The dashboard inlines them, and the CLI
// writes them to files with --charts.

use std::f64::consts::PI;

use crate::batch::aggregate::{LabelDistribution, PolarityHistogram};
use crate::models::SentimentLabel;

const WIDTH: f64 = 480.0;
const HEIGHT: f64 = 320.0;
const FONT: &str = "font-family=\"sans-serif\"";

/// Fill colour for a label's slice.
pub fn label_color(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "#2ca02c",
        SentimentLabel::Negative => "#d62728",
        SentimentLabel::Neutral => "#7f7f7f",
    }
}

/// Pie chart of the label distribution. Empty labels get no slice.
pub fn pie_chart_svg(dist: &LabelDistribution) -> String {
    let mut svg = open_svg("Sentiment Distribution");
    let slices = dist.slices();
    let total = dist.total() as f64;

    if slices.is_empty() {
        svg.push_str(&empty_notice());
        svg.push_str("</svg>");
        return svg;
    }

    let (cx, cy, r) = (170.0, 175.0, 120.0);

    if slices.len() == 1 {
        let (label, _) = slices[0];
        svg.push_str(&format!(
            "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\" fill=\"{}\"/>",
            label_color(label)
        ));
    } else {
        // Start at twelve o'clock, clockwise
        let mut angle = -PI / 2.0;
        for &(label, count) in &slices {
            let sweep = count as f64 / total * 2.0 * PI;
            let (x0, y0) = (cx + r * angle.cos(), cy + r * angle.sin());
            let end = angle + sweep;
            let (x1, y1) = (cx + r * end.cos(), cy + r * end.sin());
            let large_arc = if sweep > PI { 1 } else { 0 };
            svg.push_str(&format!(
                "<path d=\"M{cx:.2},{cy:.2} L{x0:.2},{y0:.2} A{r:.2},{r:.2} 0 {large_arc},1 {x1:.2},{y1:.2} Z\" fill=\"{}\" stroke=\"#fff\" stroke-width=\"1\"/>",
                label_color(label)
            ));
            angle = end;
        }
    }

    // Legend
    for (i, &(label, count)) in slices.iter().enumerate() {
        let y = 110.0 + i as f64 * 28.0;
        svg.push_str(&format!(
            "<rect x=\"320\" y=\"{y}\" width=\"16\" height=\"16\" fill=\"{}\"/>",
            label_color(label)
        ));
        svg.push_str(&format!(
            "<text x=\"344\" y=\"{:.0}\" {FONT} font-size=\"13\">{} {} ({:.1}%)</text>",
            y + 13.0,
            label.as_str(),
            count,
            count as f64 / total * 100.0
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Bar histogram of polarity values.
pub fn histogram_svg(hist: &PolarityHistogram) -> String {
    let mut svg = open_svg("Polarity Score Distribution");
    let max = hist.max_count();

    if max == 0 {
        svg.push_str(&empty_notice());
        svg.push_str("</svg>");
        return svg;
    }

    let (left, right, top, bottom) = (50.0, WIDTH - 20.0, 50.0, HEIGHT - 40.0);
    let plot_w = right - left;
    let plot_h = bottom - top;
    let bar_w = plot_w / hist.bins.len() as f64;

    // Axes
    svg.push_str(&format!(
        "<line x1=\"{left}\" y1=\"{bottom}\" x2=\"{right}\" y2=\"{bottom}\" stroke=\"#333\"/>"
    ));
    svg.push_str(&format!(
        "<line x1=\"{left}\" y1=\"{top}\" x2=\"{left}\" y2=\"{bottom}\" stroke=\"#333\"/>"
    ));

    for (i, bin) in hist.bins.iter().enumerate() {
        if bin.count == 0 {
            continue;
        }
        let h = bin.count as f64 / max as f64 * plot_h;
        let x = left + i as f64 * bar_w;
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{h:.2}\" fill=\"#1f77b4\" stroke=\"#fff\" stroke-width=\"1\"><title>[{:.2}, {:.2}): {}</title></rect>",
            x,
            bottom - h,
            bar_w,
            bin.lower,
            bin.upper,
            bin.count
        ));
    }

    // X ticks at -1, -0.5, 0, 0.5, 1
    for step in 0..=4 {
        let value = -1.0 + step as f64 * 0.5;
        let x = left + (value + 1.0) / 2.0 * plot_w;
        svg.push_str(&format!(
            "<text x=\"{x:.2}\" y=\"{:.0}\" {FONT} font-size=\"11\" text-anchor=\"middle\">{value}</text>",
            bottom + 16.0
        ));
    }
    svg.push_str(&format!(
        "<text x=\"{:.0}\" y=\"{:.0}\" {FONT} font-size=\"12\" text-anchor=\"middle\">polarity</text>",
        left + plot_w / 2.0,
        HEIGHT - 6.0
    ));

    // Y scale: zero and the tallest bar
    svg.push_str(&format!(
        "<text x=\"{:.0}\" y=\"{bottom}\" {FONT} font-size=\"11\" text-anchor=\"end\">0</text>",
        left - 6.0
    ));
    svg.push_str(&format!(
        "<text x=\"{:.0}\" y=\"{:.0}\" {FONT} font-size=\"11\" text-anchor=\"end\">{max}</text>",
        left - 6.0,
        top + 4.0
    ));

    svg.push_str("</svg>");
    svg
}

fn open_svg(title: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" role=\"img\" aria-label=\"{title}\">\
         <rect width=\"100%\" height=\"100%\" fill=\"#fff\"/>\
         <text x=\"{:.0}\" y=\"28\" {FONT} font-size=\"16\" font-weight=\"bold\" text-anchor=\"middle\">{title}</text>",
        WIDTH / 2.0
    )
}

fn empty_notice() -> String {
    format!(
        "<text x=\"{:.0}\" y=\"{:.0}\" {FONT} font-size=\"13\" fill=\"#888\" text-anchor=\"middle\">No rows to chart</text>",
        WIDTH / 2.0,
        HEIGHT / 2.0
    )
}
