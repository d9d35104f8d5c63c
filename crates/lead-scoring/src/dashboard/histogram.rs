use serde::Serialize;

/// Number of equal-width bins in the score histogram.
pub const SCORE_BINS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreHistogram {
    pub bin_width: f64,
    pub bins: Vec<HistogramBin>,
}

impl ScoreHistogram {
    /// Equal-width bins spanning the observed scores.
    ///
    /// Every bin is half-open except the last, which also holds the maximum.
    /// A single distinct score is widened by half a point on each side.
    pub fn compute(scores: &[f64], bin_count: usize) -> Self {
        let finite: Vec<f64> = scores.iter().copied().filter(|s| s.is_finite()).collect();
        if finite.is_empty() || bin_count == 0 {
            return Self {
                bin_width: 0.0,
                bins: Vec::new(),
            };
        }

        let mut min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            min -= 0.5;
            max += 0.5;
        }

        let bin_width = (max - min) / bin_count as f64;
        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|index| HistogramBin {
                lower: min + bin_width * index as f64,
                upper: if index + 1 == bin_count {
                    max
                } else {
                    min + bin_width * (index + 1) as f64
                },
                count: 0,
            })
            .collect();

        for score in finite {
            let index = (((score - min) / bin_width) as usize).min(bin_count - 1);
            bins[index].count += 1;
        }

        Self { bin_width, bins }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    pub fn peak(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spreads_scores_over_twenty_bins() {
        let scores: Vec<f64> = (0..=100).map(f64::from).collect();
        let histogram = ScoreHistogram::compute(&scores, SCORE_BINS);

        assert_eq!(histogram.bins.len(), 20);
        assert_eq!(histogram.bin_width, 5.0);
        assert_eq!(histogram.total(), 101);
        assert_eq!(histogram.bins[0].count, 5);
        // the closing bin keeps the maximum
        assert_eq!(histogram.bins[19].count, 6);
        assert_eq!(histogram.bins[19].upper, 100.0);
    }

    #[test]
    fn single_value_is_widened() {
        let histogram = ScoreHistogram::compute(&[42.0, 42.0], SCORE_BINS);
        assert_eq!(histogram.total(), 2);
        assert_eq!(histogram.bins[0].lower, 41.5);
        assert_eq!(histogram.bins[19].upper, 42.5);
        assert_eq!(histogram.peak(), 2);
    }

    #[test]
    fn empty_input_has_no_bins() {
        let histogram = ScoreHistogram::compute(&[], SCORE_BINS);
        assert!(histogram.bins.is_empty());
        assert_eq!(histogram.peak(), 0);
    }
}
