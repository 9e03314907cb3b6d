//! # PNG Summary Renderer
//!
//! Draws the refresh summary as a fixed-size PNG:
//!
//! ```text
//! +--------------------------------------------------+
//! | TOTAL COUNTRIES: 250                             |  header band
//! | LAST REFRESHED: 2024-05-01                       |
//! +--------------------------------------------------+
//! | 1. NIGERIA  600,000                              |
//! | ████████████████████████████████████             |  one labelled bar
//! | 2. GHANA  310,000                                |  per top country
//! | ███████████████████                              |
//! +--------------------------------------------------+
//! ```
//!
//! Text uses a built-in 3x5 glyph set: uppercase Latin letters, digits and
//! common punctuation. Lowercase input is folded to uppercase; characters
//! without a glyph leave a blank cell. Bars are scaled to the largest GDP
//! estimate in the stats.

use crate::infrastructure::rendering::error::{RenderError, RenderResult};
use crate::infrastructure::rendering::traits::{SummaryRenderer, SummaryStats};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageBuffer, ImageEncoder, Rgb, RgbImage};

/// Image width in pixels.
pub const WIDTH: u32 = 640;
/// Image height in pixels.
pub const HEIGHT: u32 = 400;

const MARGIN: u32 = 24;
const HEADER_HEIGHT: u32 = 96;
const TITLE_Y: u32 = 20;
const TITLE_SCALE: u32 = 5;
const SUBTITLE_Y: u32 = 62;
const SUBTITLE_SCALE: u32 = 3;
const BARS_TOP: u32 = 112;
const ROW_HEIGHT: u32 = 56;
const LABEL_SCALE: u32 = 3;
const BAR_OFFSET: u32 = 20;
const BAR_HEIGHT: u32 = 24;

const BACKGROUND: Rgb<u8> = Rgb([245, 246, 248]);
const HEADER: Rgb<u8> = Rgb([31, 58, 96]);
const HEADER_TEXT: Rgb<u8> = Rgb([255, 255, 255]);
const LABEL_TEXT: Rgb<u8> = Rgb([60, 60, 60]);
const PALETTE: [Rgb<u8>; 5] = [
    Rgb([46, 134, 193]),
    Rgb([39, 174, 96]),
    Rgb([230, 126, 34]),
    Rgb([142, 68, 173]),
    Rgb([192, 57, 43]),
];

/// 3x5 bitmaps, one row per byte, high bit on the left.
fn glyph(c: char) -> Option<[u8; 5]> {
    let rows = match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        _ => return None,
    };
    Some(rows)
}

/// Number of characters that fit in `width` pixels at `scale`.
fn chars_fitting(width: u32, scale: u32) -> usize {
    ((width / scale + 1) / 4) as usize
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = x.saturating_add(w).min(img.width());
    let y_end = y.saturating_add(h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

fn draw_text(img: &mut RgbImage, x: u32, y: u32, text: &str, scale: u32, color: Rgb<u8>) {
    let mut cursor = x;
    for c in text.chars() {
        if let Some(rows) = glyph(c.to_ascii_uppercase()) {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..3u32 {
                    if bits & (0b100 >> col) != 0 {
                        fill_rect(
                            img,
                            cursor + col * scale,
                            y + row as u32 * scale,
                            scale,
                            scale,
                            color,
                        );
                    }
                }
            }
        }
        cursor = cursor.saturating_add(4 * scale);
    }
}

/// Formats a GDP estimate as a whole number with thousands separators.
fn format_gdp(gdp: f64) -> String {
    if !gdp.is_finite() {
        return "N/A".to_string();
    }
    let digits = (gdp.round().max(0.0) as u64).to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Label drawn above a bar: rank, name and formatted GDP.
///
/// The name is truncated so the whole label stays within `max_chars`.
fn row_label(rank: usize, name: &str, gdp: f64, max_chars: usize) -> String {
    let prefix = format!("{rank}. ");
    let value = format_gdp(gdp);
    let budget = max_chars.saturating_sub(prefix.len() + value.len() + 2);
    let name: String = name.chars().take(budget).collect();
    format!("{prefix}{name}  {value}")
}

/// Length of the bar for `gdp` when `max` spans `full` pixels.
fn bar_length(gdp: f64, max: f64, full: u32) -> u32 {
    if !(gdp.is_finite() && max.is_finite()) || gdp <= 0.0 || max <= 0.0 {
        return 0;
    }
    let len = (gdp / max * f64::from(full)).round() as u32;
    len.clamp(1, full)
}

/// Renders [`SummaryStats`] as a PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngSummaryRenderer;

impl PngSummaryRenderer {
    /// Creates a renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn max_rows() -> usize {
        ((HEIGHT - BARS_TOP) / ROW_HEIGHT) as usize
    }

    fn draw(&self, stats: &SummaryStats) -> RgbImage {
        let mut img: RgbImage = ImageBuffer::from_pixel(WIDTH, HEIGHT, BACKGROUND);

        fill_rect(&mut img, 0, 0, WIDTH, HEADER_HEIGHT, HEADER);
        let title = format!("Total Countries: {}", stats.total);
        draw_text(&mut img, MARGIN, TITLE_Y, &title, TITLE_SCALE, HEADER_TEXT);
        let subtitle = format!("Last Refreshed: {}", stats.refreshed_at.date_string());
        draw_text(
            &mut img,
            MARGIN,
            SUBTITLE_Y,
            &subtitle,
            SUBTITLE_SCALE,
            HEADER_TEXT,
        );

        let full = WIDTH - 2 * MARGIN;
        let label_chars = chars_fitting(full, LABEL_SCALE);
        let max = stats
            .top
            .iter()
            .map(|(_, gdp)| *gdp)
            .filter(|gdp| gdp.is_finite())
            .fold(0.0_f64, f64::max);

        let rows = stats
            .top
            .iter()
            .take(Self::max_rows())
            .zip(PALETTE.iter().cycle())
            .enumerate();
        for (i, ((name, gdp), color)) in rows {
            let row_top = BARS_TOP + i as u32 * ROW_HEIGHT;
            let label = row_label(i + 1, name, *gdp, label_chars);
            draw_text(&mut img, MARGIN, row_top, &label, LABEL_SCALE, LABEL_TEXT);
            let len = bar_length(*gdp, max, full);
            fill_rect(&mut img, MARGIN, row_top + BAR_OFFSET, len, BAR_HEIGHT, *color);
        }

        img
    }
}

impl SummaryRenderer for PngSummaryRenderer {
    fn render(&self, stats: &SummaryStats) -> RenderResult<Vec<u8>> {
        let img = self.draw(stats);
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf)
            .write_image(img.as_raw(), WIDTH, HEIGHT, ColorType::Rgb8)
            .map_err(|e| RenderError::encoding(e.to_string()))?;
        Ok(buf)
    }

    fn content_type(&self) -> &'static str {
        "image/png"
    }
}
