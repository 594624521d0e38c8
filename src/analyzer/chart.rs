use crate::analyzer::mood::MoodSample;
use crate::analyzer::themes::ThemeFrequency;
use crate::journal::JournalError;
use std::fs;
use std::path::{Path, PathBuf};

pub const MOOD_CHART_FILE: &str = "mood_trend.svg";
pub const WORD_CLOUD_FILE: &str = "wordcloud.svg";

const MOOD_WIDTH: f64 = 1000.0;
const MOOD_HEIGHT: f64 = 600.0;
const MOOD_MARGIN: f64 = 70.0;

const CLOUD_WIDTH: f64 = 800.0;
const CLOUD_HEIGHT: f64 = 400.0;
const CLOUD_PADDING: f64 = 16.0;
const MIN_FONT_SIZE: f64 = 12.0;
const MAX_FONT_SIZE: f64 = 64.0;
const CLOUD_COLORS: [&str; 6] = [
    "#264653", "#2a9d8f", "#8ab17d", "#e9c46a", "#f4a261", "#e76f51",
];

pub fn write_mood_trend(dir: &Path, samples: &[MoodSample]) -> Result<PathBuf, JournalError> {
    write_artifact(dir, MOOD_CHART_FILE, &render_mood_trend(samples))
}

pub fn write_word_cloud(dir: &Path, terms: &[ThemeFrequency]) -> Result<PathBuf, JournalError> {
    write_artifact(dir, WORD_CLOUD_FILE, &render_word_cloud(terms))
}

fn write_artifact(dir: &Path, file_name: &str, svg: &str) -> Result<PathBuf, JournalError> {
    let path = dir.join(file_name);
    fs::write(&path, svg).map_err(|error| JournalError::filesystem(&path, error))?;
    Ok(path)
}

// y spans [-1, 1], x spans the sample timestamps
pub fn render_mood_trend(samples: &[MoodSample]) -> String {
    let plot_width = MOOD_WIDTH - 2.0 * MOOD_MARGIN;
    let plot_height = MOOD_HEIGHT - 2.0 * MOOD_MARGIN;

    let first = samples.first().map(|sample| sample.timestamp);
    let last = samples.last().map(|sample| sample.timestamp);
    let span_seconds = match (first, last) {
        (Some(first), Some(last)) => (last - first).num_seconds().max(0) as f64,
        _ => 0.0,
    };

    let x_of = |sample: &MoodSample| -> f64 {
        let offset = first
            .map(|first| (sample.timestamp - first).num_seconds().max(0) as f64)
            .unwrap_or_default();
        if span_seconds > 0.0 {
            MOOD_MARGIN + offset / span_seconds * plot_width
        } else {
            MOOD_MARGIN + plot_width / 2.0
        }
    };
    let y_of = |polarity: f64| MOOD_MARGIN + (1.0 - polarity.clamp(-1.0, 1.0)) / 2.0 * plot_height;

    let mut lines = vec![
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{MOOD_WIDTH}" height="{MOOD_HEIGHT}" viewBox="0 0 {MOOD_WIDTH} {MOOD_HEIGHT}" font-family="sans-serif">"#
        ),
        r#"<rect width="100%" height="100%" fill="white"/>"#.to_string(),
        format!(
            r#"<text x="{}" y="35" font-size="22" text-anchor="middle">Mood Trend Over Time</text>"#,
            MOOD_WIDTH / 2.0
        ),
    ];

    for tick in [-1.0_f64, -0.5, 0.0, 0.5, 1.0] {
        let y = y_of(tick);
        let stroke = if tick == 0.0 { "#999999" } else { "#e5e5e5" };
        lines.push(format!(
            r#"<line x1="{MOOD_MARGIN}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{stroke}"/>"#,
            MOOD_MARGIN + plot_width
        ));
        lines.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="end">{tick:.1}</text>"#,
            MOOD_MARGIN - 8.0,
            y + 4.0
        ));
    }

    lines.push(format!(
        r#"<text x="{}" y="{:.1}" font-size="14" text-anchor="middle">Date</text>"#,
        MOOD_WIDTH / 2.0,
        MOOD_HEIGHT - 20.0
    ));
    lines.push(format!(
        r#"<text x="20" y="{y:.1}" font-size="14" text-anchor="middle" transform="rotate(-90 20 {y:.1})">Mood (negative to positive)</text>"#,
        y = MOOD_HEIGHT / 2.0
    ));

    if let (Some(first), Some(last)) = (samples.first(), samples.last()) {
        let label_y = MOOD_MARGIN + plot_height + 20.0;
        lines.push(format!(
            r#"<text x="{MOOD_MARGIN:.1}" y="{label_y:.1}" font-size="12" text-anchor="start">{}</text>"#,
            first.timestamp.format("%Y-%m-%d")
        ));
        lines.push(format!(
            r#"<text x="{:.1}" y="{label_y:.1}" font-size="12" text-anchor="end">{}</text>"#,
            MOOD_MARGIN + plot_width,
            last.timestamp.format("%Y-%m-%d")
        ));
    }

    let points = samples
        .iter()
        .map(|sample| format!("{:.1},{:.1}", x_of(sample), y_of(sample.polarity)))
        .collect::<Vec<_>>();
    if points.len() > 1 {
        lines.push(format!(
            r##"<polyline points="{}" fill="none" stroke="#1f77b4" stroke-width="2"/>"##,
            points.join(" ")
        ));
    }
    lines.extend(samples.iter().map(|sample| {
        format!(
            r##"<circle cx="{:.1}" cy="{:.1}" r="4" fill="#1f77b4"/>"##,
            x_of(sample),
            y_of(sample.polarity)
        )
    }));

    lines.push("</svg>\n".to_string());
    lines.join("\n")
}

// terms flow left to right in rank order, font size follows score
pub fn render_word_cloud(terms: &[ThemeFrequency]) -> String {
    let mut lines = vec![
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CLOUD_WIDTH}" height="{CLOUD_HEIGHT}" viewBox="0 0 {CLOUD_WIDTH} {CLOUD_HEIGHT}" font-family="sans-serif">"#
        ),
        r#"<rect width="100%" height="100%" fill="white"/>"#.to_string(),
    ];

    let mut cursor_x = CLOUD_PADDING;
    let mut baseline = CLOUD_PADDING;
    let mut line_height = 0.0_f64;

    for (index, term) in terms.iter().enumerate() {
        let font_size = MIN_FONT_SIZE + term.score.clamp(0.0, 1.0) * (MAX_FONT_SIZE - MIN_FONT_SIZE);
        let width = estimated_text_width(&term.term, font_size);

        if cursor_x + width > CLOUD_WIDTH - CLOUD_PADDING && cursor_x > CLOUD_PADDING {
            cursor_x = CLOUD_PADDING;
            baseline += line_height;
            line_height = 0.0;
        }
        if line_height == 0.0 {
            line_height = font_size * 1.2;
        }
        if baseline + line_height > CLOUD_HEIGHT - CLOUD_PADDING {
            break;
        }

        lines.push(format!(
            r#"<text x="{cursor_x:.1}" y="{:.1}" font-size="{font_size:.1}" fill="{}">{}</text>"#,
            baseline + font_size,
            CLOUD_COLORS[index % CLOUD_COLORS.len()],
            escape_xml(&term.term)
        ));

        cursor_x += width + font_size * 0.4;
    }

    lines.push("</svg>\n".to_string());
    lines.join("\n")
}

fn estimated_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * 0.6
}

fn escape_xml(raw: &str) -> String {
    raw.chars().fold(String::with_capacity(raw.len()), |mut acc, ch| {
        match ch {
            '&' => acc.push_str("&amp;"),
            '<' => acc.push_str("&lt;"),
            '>' => acc.push_str("&gt;"),
            '"' => acc.push_str("&quot;"),
            '\'' => acc.push_str("&apos;"),
            _ => acc.push(ch),
        }
        acc
    })
}
