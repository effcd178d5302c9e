// Axis tick generation and number formatting.
//
// Linear ticks land on 1, 2 or 5 times a power of ten. Log ticks list every
// integer multiple within each decade while the domain spans few decades,
// and only powers of ten once it spans many.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub value: f64,
    /// Pixel position along the axis.
    pub position: f64,
    /// Empty for ticks that are drawn without a label.
    pub label: String,
}

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// (first index, last index, increment). A negative increment means the
/// tick value is `index / -inc`, which keeps fractional steps exact.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let scale = 10f64.powf(-power) / factor;
        i1 = (start * scale).round();
        i2 = (stop * scale).round();
        if i1 / scale < start {
            i1 += 1.0;
        }
        if i2 / scale > stop {
            i2 -= 1.0;
        }
        inc = -scale;
    } else {
        let step = 10f64.powf(power) * factor;
        i1 = (start / step).round();
        i2 = (stop / step).round();
        if i1 * step < start {
            i1 += 1.0;
        }
        if i2 * step > stop {
            i2 -= 1.0;
        }
        inc = step;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

pub(crate) fn linear_ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if count == 0 || !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }
    if lo == hi {
        return vec![lo];
    }
    let (start, stop) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let (i1, i2, inc) = tick_spec(start, stop, count as f64);
    if !(i2 >= i1) {
        return Vec::new();
    }
    let n = (i2 - i1 + 1.0) as usize;
    (0..n)
        .map(|k| {
            let i = i1 + k as f64;
            if inc < 0.0 { i / -inc } else { i * inc }
        })
        .collect()
}

/// Spacing between consecutive linear ticks.
fn linear_step(lo: f64, hi: f64, count: usize) -> f64 {
    let (start, stop) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let (_, _, inc) = tick_spec(start, stop, count.max(1) as f64);
    if inc < 0.0 { 1.0 / -inc } else { inc }
}

pub(crate) fn log_ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if count == 0 || !(lo > 0.0 && hi > 0.0) {
        return Vec::new();
    }
    let (u, v) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let (i, j) = (u.log10(), v.log10());
    let n = count as f64;

    if j - i < n {
        let mut ticks = Vec::new();
        let (first, last) = (i.floor() as i32, j.ceil() as i32);
        for p in first..=last {
            for k in 1..10 {
                let t = if p < 0 {
                    k as f64 / 10f64.powi(-p)
                } else {
                    k as f64 * 10f64.powi(p)
                };
                if t < u {
                    continue;
                }
                if t > v {
                    break;
                }
                ticks.push(t);
            }
        }
        if ticks.len() * 2 < count {
            ticks = linear_ticks(u, v, count);
        }
        ticks
    } else {
        let decades = ((j - i).floor() as usize).min(count);
        linear_ticks(i, j, decades)
            .into_iter()
            .map(|e| 10f64.powf(e))
            .collect()
    }
}

pub(crate) fn linear_labels(values: &[f64], lo: f64, hi: f64, count: usize) -> Vec<String> {
    let precision = if lo == hi {
        0
    } else {
        (-linear_step(lo, hi, count).log10().floor()).max(0.0) as usize
    };
    values.iter().map(|&v| format_fixed_grouped(v, precision)).collect()
}

/// Labels only the ticks whose leading digit is small enough that the axis
/// stays readable; the rest keep an empty label.
pub(crate) fn log_labels(values: &[f64], count: usize) -> Vec<String> {
    if values.is_empty() {
        return Vec::new();
    }
    let k = (10.0 * count as f64 / values.len() as f64).max(1.0);
    values
        .iter()
        .map(|&d| {
            let mut lead = d / 10f64.powf(d.log10().round());
            if lead * 10.0 < 9.5 {
                lead *= 10.0;
            }
            if lead <= k + 1e-9 { format_grouped(d) } else { String::new() }
        })
        .collect()
}

/// Shortest representation with thousands separators: `1234.5` → `1,234.5`.
pub fn format_grouped(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    group_digits(&value.to_string())
}

fn format_fixed_grouped(value: f64, precision: usize) -> String {
    let text = format!("{:.*}", precision, value);
    // Avoid "-0" and "-0.0" for values that round to zero.
    let text = if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        text.trim_start_matches('-').to_string()
    } else {
        text
    };
    group_digits(&text)
}

fn group_digits(text: &str) -> String {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_ticks_nice_steps() {
        assert_eq!(linear_ticks(0.0, 10.0, 10), (0..=10).map(f64::from).collect::<Vec<_>>());
        assert_eq!(linear_ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(linear_ticks(3.0, 97.0, 10), vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0]);
        assert_eq!(linear_ticks(5.0, 5.0, 10), vec![5.0]);
        assert!(linear_ticks(0.0, 10.0, 0).is_empty());
    }

    #[test]
    fn test_linear_ticks_fractional_steps_are_exact() {
        let ticks = linear_ticks(0.0, 0.3, 3);
        assert_eq!(ticks, vec![0.0, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_log_ticks_within_few_decades() {
        let ticks = log_ticks(1.0, 100.0, 10);
        assert_eq!(ticks.len(), 19);
        assert_eq!(ticks[0], 1.0);
        assert_eq!(ticks[9], 10.0);
        assert_eq!(*ticks.last().unwrap(), 100.0);
    }

    #[test]
    fn test_log_ticks_many_decades_uses_powers() {
        let ticks = log_ticks(1.0, 1e12, 10);
        assert_eq!(ticks.len(), 13);
        for t in ticks {
            let e = t.log10();
            assert!((e - e.round()).abs() < 1e-9, "{t} is not a power of ten");
        }
    }

    #[test]
    fn test_log_labels_thin_out_crowded_decades() {
        let ticks = log_ticks(1.0, 1000.0, 10);
        let labels = log_labels(&ticks, 10);
        assert_eq!(labels[0], "1");
        assert!(labels.iter().any(|l| l.is_empty()));
        assert_eq!(labels.last().unwrap(), "1,000");
    }

    #[test]
    fn test_linear_labels_precision_follows_step() {
        assert_eq!(linear_labels(&[0.0, 0.5, 1.0], 0.0, 1.0, 2), vec!["0.0", "0.5", "1.0"]);
        assert_eq!(linear_labels(&[0.0, 5000.0], 0.0, 10000.0, 2), vec!["0", "5,000"]);
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(-0.0), "0");
        assert_eq!(format_grouped(10.0), "10");
        assert_eq!(format_grouped(1234.0), "1,234");
        assert_eq!(format_grouped(1234567.25), "1,234,567.25");
        assert_eq!(format_grouped(-98765.0), "-98,765");
        assert_eq!(format_grouped(0.125), "0.125");
    }

    #[test]
    fn test_format_fixed_grouped_has_no_negative_zero() {
        assert_eq!(format_fixed_grouped(-0.01, 1), "0.0");
        assert_eq!(format_fixed_grouped(-1500.0, 0), "-1,500");
    }
}
