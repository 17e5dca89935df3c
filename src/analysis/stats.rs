//! Descriptive statistic kernels over plain `f64` slices.
//!
//! Every kernel reports degenerate input as [`Statistic::Undefined`]
//! instead of inventing a value.

use crate::models::Statistic;

/// Neumaier compensated summation.
fn compensated_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

fn mean_of(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        None
    } else {
        Some(compensated_sum(data) / data.len() as f64)
    }
}

/// Arithmetic mean. Undefined for an empty slice.
pub fn mean(data: &[f64]) -> Statistic {
    mean_of(data).map_or(Statistic::Undefined, Statistic::Defined)
}

/// Middle value of the sorted data; the average of the two middle
/// values when the length is even.
pub fn median(data: &[f64]) -> Statistic {
    if data.is_empty() || data.iter().any(|x| x.is_nan()) {
        return Statistic::Undefined;
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    if n % 2 == 1 {
        Statistic::Defined(sorted[n / 2])
    } else {
        Statistic::Defined((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Every value equals the first.
fn is_constant(data: &[f64]) -> bool {
    data.iter().all(|x| *x == data[0])
}

/// Sum of squared deviations from the mean (two-pass).
fn sum_sq_dev(data: &[f64], mean: f64) -> f64 {
    data.iter().map(|x| (x - mean) * (x - mean)).sum()
}

/// Sample standard deviation with Bessel's correction (`n - 1`).
///
/// A single observation has no sample spread, so fewer than two values
/// give [`Statistic::Undefined`].
pub fn sample_std_dev(data: &[f64]) -> Statistic {
    if data.len() < 2 {
        return Statistic::Undefined;
    }
    if is_constant(data) {
        return Statistic::Defined(0.0);
    }
    match mean_of(data) {
        Some(m) => Statistic::Defined((sum_sq_dev(data, m) / (data.len() - 1) as f64).sqrt()),
        None => Statistic::Undefined,
    }
}

/// Pearson correlation coefficient of two equally long series.
///
/// Undefined when the lengths differ, when fewer than two pairs are given,
/// or when either series has zero variance. The result is clamped to
/// `[-1, 1]` to absorb rounding.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Statistic {
    if xs.len() != ys.len() || xs.len() < 2 {
        return Statistic::Undefined;
    }
    if is_constant(xs) || is_constant(ys) {
        return Statistic::Undefined;
    }

    let (mx, my) = match (mean_of(xs), mean_of(ys)) {
        (Some(mx), Some(my)) => (mx, my),
        _ => return Statistic::Undefined,
    };

    let sxx = sum_sq_dev(xs, mx);
    let syy = sum_sq_dev(ys, my);
    if sxx == 0.0 || syy == 0.0 || !sxx.is_finite() || !syy.is_finite() {
        return Statistic::Undefined;
    }

    let sxy: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - mx) * (y - my))
        .sum();

    let r = sxy / (sxx.sqrt() * syy.sqrt());
    if r.is_nan() {
        Statistic::Undefined
    } else {
        Statistic::Defined(r.clamp(-1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(stat: Statistic, expected: f64) -> bool {
        stat.value().map_or(false, |v| (v - expected).abs() < 1e-9)
    }

    #[test]
    fn test_mean() {
        assert!(approx(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5));
        assert!(mean(&[]).is_undefined());
    }

    #[test]
    fn test_mean_compensates_cancellation() {
        let data = [1e16, 1.0, -1e16, 1.0];
        assert!(approx(mean(&data), 0.5));
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[9.0, 1.0, 5.0]), Statistic::Defined(5.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Statistic::Defined(2.5));
        assert_eq!(median(&[7.0]), Statistic::Defined(7.0));
        assert!(median(&[]).is_undefined());
    }

    #[test]
    fn test_sample_std_dev() {
        assert!(approx(sample_std_dev(&[80.0, 90.0]), 50.0_f64.sqrt()));
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx(sample_std_dev(&v), 2.138089935299395));
    }

    #[test]
    fn test_sample_std_dev_single_value_is_undefined() {
        assert!(sample_std_dev(&[70.0]).is_undefined());
        assert!(sample_std_dev(&[]).is_undefined());
    }

    #[test]
    fn test_pearson_perfect() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        assert!(approx(pearson(&xs, &ys), 1.0));

        let inverse = [8.0, 6.0, 4.0, 2.0];
        assert!(approx(pearson(&xs, &inverse), -1.0));
    }

    #[test]
    fn test_pearson_zero_variance() {
        assert!(pearson(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]).is_undefined());
        assert!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).is_undefined());
    }

    #[test]
    fn test_pearson_constant_fractional_column_is_undefined() {
        for &c in &[0.1, 0.7, 72.3] {
            for n in 2..=40 {
                let xs = vec![c; n];
                let ys: Vec<f64> = (1..=n).map(|i| i as f64 * 1000.0).collect();
                assert!(pearson(&xs, &ys).is_undefined(), "c={} n={}", c, n);
                assert!(pearson(&ys, &xs).is_undefined(), "c={} n={}", c, n);
            }
        }
    }

    #[test]
    fn test_sample_std_dev_constant_fractional_is_zero() {
        assert_eq!(sample_std_dev(&[0.1, 0.1, 0.1]), Statistic::Defined(0.0));
        assert_eq!(sample_std_dev(&[72.3; 7]), Statistic::Defined(0.0));
    }

    #[test]
    fn test_pearson_requires_matching_lengths() {
        assert!(pearson(&[1.0, 2.0], &[1.0]).is_undefined());
        assert!(pearson(&[1.0], &[1.0]).is_undefined());
    }

    #[test]
    fn test_pearson_in_range() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 1.0, 4.0, 3.0, 5.0];
        let r = pearson(&xs, &ys).value().unwrap();
        assert!((-1.0..=1.0).contains(&r));
        assert!((r - 0.8).abs() < 1e-9);
    }
}
