//! PNG bar charts of measurement counts.
//!
//! Bars are drawn left to right in mapping order with the count printed
//! above each bar and the label below it. Text uses a built-in 5×7 bitmap
//! font covering digits, capitals and the punctuation that shows up in
//! bitstrings and ket labels; lowercase letters are drawn as capitals and
//! anything else as `?`.

use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use blockq_blocks::HistogramData;
use image::{ImageBuffer, ImageFormat, Rgb};
use thiserror::Error;

type Canvas = ImageBuffer<Rgb<u8>, Vec<u8>>;

/// Chart rendering failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChartError {
    #[error("No data to plot")]
    Empty,

    #[error("Failed to encode chart: {0}")]
    Encode(#[from] image::ImageError),
}

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 500;
pub const TITLE: &str = "Quantum Measurement Results";

const MARGIN_LEFT: u32 = 70;
const MARGIN_RIGHT: u32 = 30;
const MARGIN_TOP: u32 = 70;
const MARGIN_BOTTOM: u32 = 70;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([51, 51, 51]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const BAR: Rgb<u8> = Rgb([110, 130, 160]);
const BAR_EDGE: Rgb<u8> = Rgb([60, 75, 100]);
const TEXT: Rgb<u8> = Rgb([40, 40, 40]);

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
const Y_TICKS: u64 = 4;

/// Render `data` as a PNG bar chart.
pub fn render_histogram(data: &HistogramData) -> Result<Vec<u8>, ChartError> {
    if data.is_empty() {
        return Err(ChartError::Empty);
    }

    let mut img = Canvas::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let plot_left = MARGIN_LEFT;
    let plot_right = WIDTH - MARGIN_RIGHT;
    let plot_top = MARGIN_TOP;
    let plot_bottom = HEIGHT - MARGIN_BOTTOM;
    let plot_h = plot_bottom - plot_top;

    draw_text_centered(&mut img, TITLE, WIDTH / 2, 20, 3);

    // Leave headroom above the tallest bar for its value label.
    let y_max = nice_ceiling(data.max_count());
    for tick in 0..=Y_TICKS {
        let value = y_max / Y_TICKS * tick;
        let y = plot_bottom - scale(value, y_max, plot_h);
        if tick > 0 {
            fill_rect(&mut img, plot_left + 1, y, plot_right - plot_left - 1, 1, GRID);
        }
        fill_rect(&mut img, plot_left - 5, y, 5, 1, AXIS);
        let label = value.to_string();
        let x = (plot_left - 8).saturating_sub(text_width(&label, 1));
        draw_text(&mut img, &label, x, y.saturating_sub(GLYPH_H / 2), 1);
    }

    let slot = (plot_right - plot_left) / u32::try_from(data.len()).unwrap_or(u32::MAX);
    let bar_w = (slot * 3 / 5).max(1);
    for (i, (label, count)) in (0u32..).zip(data.iter()) {
        let center = plot_left + slot * i + slot / 2;
        let bar_h = scale(count, y_max, plot_h);
        let bar_x = center - bar_w / 2;
        if bar_h > 0 {
            fill_rect(&mut img, bar_x, plot_bottom - bar_h, bar_w, bar_h, BAR);
            outline_rect(&mut img, bar_x, plot_bottom - bar_h, bar_w, bar_h, BAR_EDGE);
        }

        let value = count.to_string();
        let value_y = (plot_bottom - bar_h).saturating_sub(GLYPH_H * 2 + 4);
        draw_text_centered(&mut img, &value, center, value_y, fitting_scale(&value, slot));
        draw_text_centered(&mut img, label, center, plot_bottom + 10, fitting_scale(label, slot));
    }

    // Axes last so bars never cover them.
    fill_rect(&mut img, plot_left, plot_top, 1, plot_h + 1, AXIS);
    fill_rect(&mut img, plot_left, plot_bottom, plot_right - plot_left, 1, AXIS);
    draw_text_centered(&mut img, "Outcome", (plot_left + plot_right) / 2, HEIGHT - 24, 2);
    draw_text(&mut img, "Count", 10, plot_top - 24, 2);

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// Wrap PNG bytes in a `data:` URI.
pub fn to_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

/// Round up to a value that divides evenly into the tick count, with ~10% headroom.
fn nice_ceiling(max: u64) -> u64 {
    let target = max.saturating_add(max / 10).max(Y_TICKS);
    let magnitude = 10u64.pow(target.ilog10().saturating_sub(1));
    let step = Y_TICKS * magnitude;
    target.div_ceil(step).saturating_mul(step)
}

#[allow(clippy::cast_possible_truncation)]
fn scale(value: u64, max: u64, pixels: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    (u128::from(value) * u128::from(pixels) / u128::from(max)) as u32
}

fn fitting_scale(text: &str, room: u32) -> u32 {
    if text_width(text, 2) <= room { 2 } else { 1 }
}

fn fill_rect(img: &mut Canvas, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    for py in y..y.saturating_add(h).min(img.height()) {
        for px in x..x.saturating_add(w).min(img.width()) {
            img.put_pixel(px, py, color);
        }
    }
}

fn outline_rect(img: &mut Canvas, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    fill_rect(img, x, y, w, 1, color);
    fill_rect(img, x, y + h - 1, w, 1, color);
    fill_rect(img, x, y, 1, h, color);
    fill_rect(img, x + w - 1, y, 1, h, color);
}

fn text_width(text: &str, scale: u32) -> u32 {
    let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    chars.saturating_mul((GLYPH_W + 1) * scale).saturating_sub(scale)
}

fn draw_text_centered(img: &mut Canvas, text: &str, center_x: u32, y: u32, scale: u32) {
    let x = center_x.saturating_sub(text_width(text, scale) / 2);
    draw_text(img, text, x, y, scale);
}

fn draw_text(img: &mut Canvas, text: &str, x: u32, y: u32, scale: u32) {
    let mut cursor = x;
    for c in text.chars() {
        let rows = glyph(c);
        for (row, bits) in (0u32..).zip(rows) {
            for col in 0..GLYPH_W {
                if bits & (0x10 >> col) != 0 {
                    fill_rect(img, cursor + col * scale, y + row * scale, scale, scale, TEXT);
                }
            }
        }
        cursor = cursor.saturating_add((GLYPH_W + 1) * scale);
        if cursor >= img.width() {
            break;
        }
    }
}

/// 5×7 glyph rows, top to bottom; bit 4 is the leftmost column.
fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        ' ' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '|' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        '>' => [0x08, 0x04, 0x02, 0x01, 0x02, 0x04, 0x08],
        '<' => [0x02, 0x04, 0x08, 0x10, 0x08, 0x04, 0x02],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        '%' => [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '+' => [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        '/' => [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00],
        '\'' => [0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        _ => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn decode(png: &[u8]) -> Canvas {
        image::load_from_memory_with_format(png, ImageFormat::Png)
            .unwrap()
            .to_rgb8()
    }

    #[test]
    fn test_renders_png() {
        let data: HistogramData = [("00", 512), ("11", 512)].into_iter().collect();
        let png = render_histogram(&data).unwrap();

        assert_eq!(png[..8], PNG_MAGIC);
        let img = decode(&png);
        assert_eq!(img.dimensions(), (WIDTH, HEIGHT));
        assert!(img.pixels().any(|p| *p == BAR));
    }

    #[test]
    fn test_empty_data_rejected() {
        let err = render_histogram(&HistogramData::new()).unwrap_err();
        assert_eq!(err.to_string(), "No data to plot");
    }

    #[test]
    fn test_all_zero_counts_draw_no_bars() {
        let data: HistogramData = [("0", 0), ("1", 0)].into_iter().collect();
        let img = decode(&render_histogram(&data).unwrap());
        assert!(!img.pixels().any(|p| *p == BAR));
    }

    #[test]
    fn test_taller_bar_for_larger_count() {
        let data: HistogramData = [("0", 100), ("1", 400)].into_iter().collect();
        let img = decode(&render_histogram(&data).unwrap());

        let slot = (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) / 2;
        let column_height = |i: u32| {
            let x = MARGIN_LEFT + slot * i + slot / 2;
            (0..HEIGHT).filter(|&y| *img.get_pixel(x, y) == BAR).count()
        };
        assert!(column_height(1) > column_height(0) * 3);
    }

    #[test]
    fn test_many_bars_fit() {
        let data: HistogramData = (0..1024u64).map(|i| (format!("{i:010b}"), i)).collect();
        assert!(render_histogram(&data).is_ok());
    }

    #[test]
    fn test_nice_ceiling() {
        assert_eq!(nice_ceiling(0), 4);
        assert_eq!(nice_ceiling(512), 600);
        assert_eq!(nice_ceiling(1000), 1200);
        assert!(nice_ceiling(7) >= 7);
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(to_data_uri(b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("0", 1), 5);
        assert_eq!(text_width("00", 2), 22);
    }
}
