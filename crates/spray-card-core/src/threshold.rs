//! Global threshold selection with Otsu's method.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::image::GrayImageView;

/// Selected cut-point and the statistics of the split it produces.
///
/// Pixels `<= value` form the deposit class, pixels `> value` the
/// background class.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OtsuThreshold {
    pub value: u8,
    /// Between-class variance at `value` (intensity units squared).
    pub between_class_variance: f64,
    /// Variance of the whole image.
    pub total_variance: f64,
    /// `between_class_variance / total_variance`, in `[0, 1]`; 0 for a
    /// single-intensity image.
    pub separability: f64,
    /// Mean intensity of the `<= value` class, `None` when it is empty.
    pub deposit_mean: Option<f64>,
    /// Mean intensity of the `> value` class, `None` when it is empty.
    pub background_mean: Option<f64>,
}

/// 256-bin intensity histogram.
pub fn histogram(img: &GrayImageView<'_>) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for &v in img.data {
        hist[v as usize] += 1;
    }
    hist
}

/// Compute the Otsu threshold of a grayscale image.
///
/// Every candidate `t` in `0..=255` is scored with the between-class
/// variance of `<= t` against `> t`, using running sums so the search is
/// O(256) after the histogram pass. Splits with an empty class score 0.
/// Ties resolve to the lowest `t`, so a single-intensity image yields 0.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(img), fields(width = img.width, height = img.height))
)]
pub fn otsu_threshold(img: &GrayImageView<'_>) -> Result<OtsuThreshold, AnalysisError> {
    if img.pixel_count() == 0 || img.data.is_empty() {
        return Err(AnalysisError::EmptyImage);
    }
    if img.data.len() != img.pixel_count() {
        return Err(AnalysisError::invalid_image(format!(
            "gray buffer holds {} bytes, expected {}x{}",
            img.data.len(),
            img.width,
            img.height
        )));
    }
    Ok(otsu_from_histogram(&histogram(img)))
}

pub(crate) fn otsu_from_histogram(hist: &[u64; 256]) -> OtsuThreshold {
    let mut n_total = 0f64;
    let mut s_total = 0f64;
    let mut q_total = 0f64;
    for (i, &h) in hist.iter().enumerate() {
        let (i, h) = (i as f64, h as f64);
        n_total += h;
        s_total += i * h;
        q_total += i * i * h;
    }
    let mean_total = s_total / n_total;
    let total_variance = (q_total / n_total - mean_total * mean_total).max(0.0);

    let mut n_b = 0f64;
    let mut s_b = 0f64;
    let mut best_var = f64::NEG_INFINITY;
    let mut best_t = 0usize;

    for (t, &h) in hist.iter().enumerate() {
        n_b += h as f64;
        s_b += (t as f64) * (h as f64);
        let n_f = n_total - n_b;

        let var_between = if n_b < 1.0 || n_f < 1.0 {
            0.0
        } else {
            let m_b = s_b / n_b;
            let m_f = (s_total - s_b) / n_f;
            let w_b = n_b / n_total;
            let w_f = n_f / n_total;
            w_b * w_f * (m_b - m_f) * (m_b - m_f)
        };

        if var_between > best_var {
            best_var = var_between;
            best_t = t;
        }
    }

    let (mut n_dep, mut s_dep) = (0f64, 0f64);
    for (i, &h) in hist.iter().enumerate().take(best_t + 1) {
        n_dep += h as f64;
        s_dep += (i as f64) * (h as f64);
    }
    let n_bg = n_total - n_dep;
    let separability = if total_variance > 0.0 {
        (best_var / total_variance).clamp(0.0, 1.0)
    } else {
        0.0
    };

    OtsuThreshold {
        value: best_t as u8,
        between_class_variance: best_var,
        total_variance,
        separability,
        deposit_mean: (n_dep >= 1.0).then(|| s_dep / n_dep),
        background_mean: (n_bg >= 1.0).then(|| (s_total - s_dep) / n_bg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GrayImage;
    use approx::assert_relative_eq;

    #[test]
    fn short_buffer_is_an_error() {
        let data = [0u8, 255, 0, 255];
        let view = GrayImageView {
            width: 4,
            height: 4,
            data: &data,
        };
        assert!(matches!(
            otsu_threshold(&view),
            Err(AnalysisError::InvalidImage { .. })
        ));
    }

    #[test]
    fn empty_image_is_an_error() {
        let img = GrayImage::filled(0, 7, 0);
        assert_eq!(
            otsu_threshold(&img.as_view()).unwrap_err(),
            AnalysisError::EmptyImage
        );
    }

    #[test]
    fn uniform_image_picks_lowest_threshold() {
        for v in [0u8, 42, 255] {
            let img = GrayImage::filled(8, 4, v);
            let t = otsu_threshold(&img.as_view()).expect("threshold");
            assert_eq!(t.value, 0, "uniform {v}");
            assert_eq!(t.between_class_variance, 0.0);
            assert_eq!(t.total_variance, 0.0);
            assert_eq!(t.separability, 0.0);
        }
    }

    #[test]
    fn two_level_image_splits_at_lowest_tied_cut() {
        let img = GrayImage::from_fn(100, 10, |x, _| if x < 50 { 0 } else { 255 });
        let t = otsu_threshold(&img.as_view()).expect("threshold");
        assert_eq!(t.value, 0);
        assert_relative_eq!(t.between_class_variance, 0.25 * 255.0 * 255.0);
        assert_relative_eq!(t.separability, 1.0);
        assert_eq!(t.deposit_mean, Some(0.0));
        assert_eq!(t.background_mean, Some(255.0));
    }

    #[test]
    fn bimodal_noise_lands_between_modes() {
        // Dark cluster 40..=60 on a bright 190..=215 background.
        let img = GrayImage::from_fn(64, 64, |x, y| {
            let jitter = ((x * 7 + y * 13) % 21) as u8;
            if (x / 8 + y / 8) % 3 == 0 {
                40 + jitter
            } else {
                190 + jitter.min(25)
            }
        });
        let t = otsu_threshold(&img.as_view()).expect("threshold");
        assert!(t.value >= 60 && t.value < 190, "t = {}", t.value);
        assert!(t.separability > 0.9);
        let dep = t.deposit_mean.expect("deposit class");
        let bg = t.background_mean.expect("background class");
        assert!(dep < bg);
    }

    #[test]
    fn variance_matches_direct_computation() {
        let img = GrayImage::from_fn(16, 16, |x, y| ((x * 31 + y * 17) % 256) as u8);
        let t = otsu_threshold(&img.as_view()).expect("threshold");

        let n = img.data.len() as f64;
        let mean = img.data.iter().map(|&v| v as f64).sum::<f64>() / n;
        let var = img
            .data
            .iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        assert_relative_eq!(t.total_variance, var, max_relative = 1e-9);

        let (below, above): (Vec<f64>, Vec<f64>) = {
            let mut below = Vec::new();
            let mut above = Vec::new();
            for &v in &img.data {
                if v <= t.value {
                    below.push(v as f64);
                } else {
                    above.push(v as f64);
                }
            }
            (below, above)
        };
        let m_b = below.iter().sum::<f64>() / below.len() as f64;
        let m_f = above.iter().sum::<f64>() / above.len() as f64;
        let expected = (below.len() as f64 / n) * (above.len() as f64 / n) * (m_b - m_f).powi(2);
        assert_relative_eq!(t.between_class_variance, expected, max_relative = 1e-9);
    }

    #[test]
    fn no_candidate_beats_the_selected_cut() {
        let img = GrayImage::from_fn(32, 8, |x, y| ((x * x + 3 * y) % 200) as u8);
        let hist = histogram(&img.as_view());
        let best = otsu_from_histogram(&hist);
        let n: f64 = hist.iter().map(|&h| h as f64).sum();
        for t in 0..256usize {
            let (mut nb, mut sb) = (0f64, 0f64);
            for (i, &h) in hist.iter().enumerate().take(t + 1) {
                nb += h as f64;
                sb += i as f64 * h as f64;
            }
            let s: f64 = hist.iter().enumerate().map(|(i, &h)| i as f64 * h as f64).sum();
            let nf = n - nb;
            if nb == 0.0 || nf == 0.0 {
                continue;
            }
            let v = (nb / n) * (nf / n) * (sb / nb - (s - sb) / nf).powi(2);
            assert!(v <= best.between_class_variance + 1e-9, "t={t}");
        }
    }
}
