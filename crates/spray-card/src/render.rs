//! Annotated visualization of a coverage analysis.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use spray_card_core::{CoverageAnalysis, RasterView, SectionResult};

use crate::config::{RenderBackground, RenderParams};
use crate::error::SprayCardError;
use crate::font::{draw_text, text_width, GLYPH_H};
use crate::io::rgb_from_raster;

/// Vertical gap between the two label lines, in font dots.
const LINE_GAP: u32 = 3;

/// Two-line label of a section: `Sec N` and the coverage with one decimal.
pub fn section_label(section: &SectionResult) -> [String; 2] {
    [
        format!("Sec {}", section.index + 1),
        format!("{:.1}%", section.coverage_pct),
    ]
}

fn auto_thickness(width: u32, height: u32) -> u32 {
    (width.min(height) / 200).max(1)
}

fn auto_label_scale(sections: &[SectionResult], height: u32) -> u32 {
    let narrowest = sections.iter().map(|s| s.width() as u32).min().unwrap_or(0);
    let widest_text = sections
        .iter()
        .flat_map(|s| section_label(s).map(|l| text_width(&l)))
        .max()
        .unwrap_or(1)
        .max(1);
    let by_width = narrowest * 4 / 5 / widest_text;
    let by_height = height / 4 / (2 * GLYPH_H + LINE_GAP);
    by_width.min(by_height).max(1)
}

/// Draw section borders and coverage labels over the card.
///
/// `src` must be the raster `analysis` was computed from.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip_all, fields(sections = analysis.sections.len()))
)]
pub fn render_annotated(
    src: &RasterView<'_>,
    analysis: &CoverageAnalysis,
    params: &RenderParams,
) -> Result<RgbImage, SprayCardError> {
    let mut img = match params.background {
        RenderBackground::Original => rgb_from_raster(src),
        RenderBackground::Mask => rgb_from_raster(&analysis.mask.to_gray().as_raster()),
    }
    .ok_or_else(|| spray_card_core::AnalysisError::InvalidImage {
        reason: format!(
            "cannot render a {}-channel {}x{} raster",
            src.channels, src.width, src.height
        ),
    })?;

    let (w, h) = img.dimensions();
    let thickness = match params.line_thickness {
        0 => auto_thickness(w, h),
        t => t,
    };
    let line = Rgb(params.line_color);
    let text = Rgb(params.text_color);

    for s in &analysis.sections {
        let x0 = s.x_start() as i32;
        let sw = s.width() as u32;
        let t_x = thickness.min(sw);
        let t_y = thickness.min(h);
        // left, right, top, bottom
        draw_filled_rect_mut(&mut img, Rect::at(x0, 0).of_size(t_x, h), line);
        draw_filled_rect_mut(
            &mut img,
            Rect::at(x0 + (sw - t_x) as i32, 0).of_size(t_x, h),
            line,
        );
        draw_filled_rect_mut(&mut img, Rect::at(x0, 0).of_size(sw, t_y), line);
        draw_filled_rect_mut(
            &mut img,
            Rect::at(x0, (h - t_y) as i32).of_size(sw, t_y),
            line,
        );
    }

    let scale = params
        .label_scale
        .unwrap_or_else(|| auto_label_scale(&analysis.sections, h))
        .max(1);
    let block_h = (2 * GLYPH_H + LINE_GAP) * scale;
    let top = (h as i32 - block_h as i32) / 2;
    for s in &analysis.sections {
        for (line_no, label) in section_label(s).iter().enumerate() {
            let label_w = (text_width(label) * scale) as i32;
            let x = s.x_start() as i32 + (s.width() as i32 - label_w) / 2;
            let y = top + (line_no as u32 * (GLYPH_H + LINE_GAP) * scale) as i32;
            draw_text(&mut img, x, y, scale, text, label);
        }
    }

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spray_card_core::{analyze, AnalysisParams, GrayImage, RasterImage};

    fn halves() -> RasterImage {
        let gray = GrayImage::from_fn(200, 80, |x, _| if x < 100 { 10 } else { 240 });
        RasterImage {
            width: gray.width,
            height: gray.height,
            channels: 3,
            data: gray.data.iter().flat_map(|&v| [v, v, v]).collect(),
        }
    }

    #[test]
    fn labels_use_one_decimal() {
        let s = SectionResult {
            index: 2,
            x_range: [10, 20],
            covered_pixels: 1,
            total_pixels: 3,
            coverage_pct: 100.0 / 3.0,
        };
        assert_eq!(section_label(&s), ["Sec 3".to_string(), "33.3%".to_string()]);
    }

    #[test]
    fn draws_borders_and_keeps_size() {
        let card = halves();
        let analysis = analyze(&card.as_view(), &AnalysisParams::with_sections(2)).expect("analyze");
        let params = RenderParams {
            line_thickness: 2,
            line_color: [0, 0, 255],
            ..RenderParams::default()
        };
        let img = render_annotated(&card.as_view(), &analysis, &params).expect("render");
        assert_eq!(img.dimensions(), (200, 80));

        let blue = Rgb([0, 0, 255]);
        // section boundary at x = 100: right border of 0 and left border of 1
        for x in 98..102 {
            assert_eq!(*img.get_pixel(x, 40), blue, "x={x}");
        }
        assert_eq!(*img.get_pixel(0, 40), blue);
        assert_eq!(*img.get_pixel(199, 40), blue);
        assert_eq!(*img.get_pixel(50, 0), blue);
        // untouched background well away from labels and borders
        assert_eq!(*img.get_pixel(150, 10), Rgb([240, 240, 240]));
    }

    #[test]
    fn labels_are_drawn_in_text_color() {
        let card = halves();
        let analysis = analyze(&card.as_view(), &AnalysisParams::with_sections(2)).expect("analyze");
        let img = render_annotated(&card.as_view(), &analysis, &RenderParams::default())
            .expect("render");
        let red = Rgb([255, 0, 0]);
        let right_half_red = (100..200)
            .flat_map(|x| (0..80).map(move |y| (x, y)))
            .filter(|&(x, y)| *img.get_pixel(x, y) == red)
            .count();
        assert!(right_half_red > 0);
    }

    #[test]
    fn mask_background_is_black_and_white() {
        let card = halves();
        let analysis = analyze(&card.as_view(), &AnalysisParams::with_sections(1)).expect("analyze");
        let params = RenderParams {
            background: RenderBackground::Mask,
            ..RenderParams::default()
        };
        let img = render_annotated(&card.as_view(), &analysis, &params).expect("render");
        assert_eq!(*img.get_pixel(20, 10), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(180, 10), Rgb([255, 255, 255]));
    }

    #[test]
    fn narrow_sections_still_render() {
        let gray = GrayImage::from_fn(15, 4, |x, _| (x * 17) as u8);
        let analysis =
            analyze(&gray.as_raster(), &AnalysisParams::with_sections(15)).expect("analyze");
        let img = render_annotated(&gray.as_raster(), &analysis, &RenderParams::default())
            .expect("render");
        assert_eq!(img.dimensions(), (15, 4));
    }
}
