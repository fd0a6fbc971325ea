use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::primitives::format_timestamp;
use crate::core::{OhlcPoint, TimeAxisFormat};

const CLOCK_PATTERN: &str = "%H:%M:%S";
const MONTH_DAY_PATTERN: &str = "%m/%d";

/// One label on the time axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeTick {
    /// Index into the visible slice.
    pub index: usize,
    pub timestamp: i64,
    /// Label text; a space separates the two rendered lines.
    pub label: String,
}

impl TimeTick {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.label.split(' ').map(str::trim).filter(|line| !line.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    pub price: f64,
    pub label: String,
}

/// Picks which slice indices get a time label.
///
/// At most `inner_width / min_label_width` labels fit, so consecutive labels
/// are at least `ceil(len / max_labels)` items apart. Outside monthly mode the
/// first item of each coarse date bucket is preferred, and items inside an
/// already labelled bucket only get a label once the spacing allows it.
#[must_use]
pub fn select_time_tick_indices(
    slice: &[OhlcPoint],
    inner_width: f64,
    min_label_width: f64,
    format: TimeAxisFormat,
) -> Vec<usize> {
    if slice.is_empty() {
        return Vec::new();
    }
    let distance = label_distance(slice.len(), inner_width, min_label_width);

    if format == TimeAxisFormat::Monthly {
        return (0..slice.len()).step_by(distance).collect();
    }

    let bucket_pattern = format.bucket_pattern();
    let mut labelled_buckets: IndexSet<String> = IndexSet::new();
    let mut selected: Vec<usize> = Vec::new();
    for (index, point) in slice.iter().enumerate() {
        let bucket = format_timestamp(point.timestamp, bucket_pattern);
        let spaced = selected
            .last()
            .is_none_or(|&previous| index - previous >= distance);
        if labelled_buckets.contains(&bucket) {
            if spaced {
                selected.push(index);
            }
        } else if spaced {
            selected.push(index);
            labelled_buckets.insert(bucket);
        }
    }
    selected
}

/// Selects and labels the time ticks of a visible slice.
#[must_use]
pub fn time_ticks(
    slice: &[OhlcPoint],
    inner_width: f64,
    min_label_width: f64,
    format: TimeAxisFormat,
) -> Vec<TimeTick> {
    let indices = select_time_tick_indices(slice, inner_width, min_label_width, format);
    let bucket_pattern = format.bucket_pattern();
    let mut seen_buckets: IndexSet<String> = IndexSet::new();

    indices
        .into_iter()
        .map(|index| {
            let timestamp = slice[index].timestamp;
            let label = match format {
                TimeAxisFormat::Monthly => format_timestamp(timestamp, bucket_pattern),
                TimeAxisFormat::DayWeek | TimeAxisFormat::Intraday => {
                    let bucket = format_timestamp(timestamp, bucket_pattern);
                    let repeated = !seen_buckets.insert(bucket.clone());
                    match (format, repeated) {
                        (TimeAxisFormat::DayWeek, true) => {
                            format_timestamp(timestamp, MONTH_DAY_PATTERN)
                        }
                        (TimeAxisFormat::DayWeek, false) => bucket,
                        (_, true) => format_timestamp(timestamp, CLOCK_PATTERN),
                        (_, false) => {
                            format!("{bucket} {}", format_timestamp(timestamp, CLOCK_PATTERN))
                        }
                    }
                }
            };
            TimeTick {
                index,
                timestamp,
                label,
            }
        })
        .collect()
}

fn label_distance(len: usize, inner_width: f64, min_label_width: f64) -> usize {
    let max_labels = if inner_width.is_finite() && min_label_width > 0.0 {
        (inner_width / min_label_width).floor().max(0.0) as usize
    } else {
        0
    };
    if max_labels == 0 {
        return len.max(1);
    }
    len.div_ceil(max_labels).max(1)
}

/// Round tick values covering `[start, stop]` with 1/2/5 steps.
#[must_use]
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() || count == 0 {
        return Vec::new();
    }
    let (low, high) = if start <= stop {
        (start, stop)
    } else {
        (stop, start)
    };
    if low == high {
        return vec![low];
    }

    let raw_step = (high - low) / count as f64;
    let power = raw_step.log10().floor();
    let error = raw_step / 10f64.powi(power as i32);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    // Negative powers divide by an integral inverse step so values stay exact
    // in decimal (0.3 rather than 0.30000000000000004).
    if power < 0.0 {
        let inverse = 10f64.powi(-power as i32) / factor;
        let mut first = (low * inverse).round();
        let mut last = (high * inverse).round();
        if first / inverse < low {
            first += 1.0;
        }
        if last / inverse > high {
            last -= 1.0;
        }
        integral_steps(first, last).map(|i| i / inverse).collect()
    } else {
        let step = 10f64.powi(power as i32) * factor;
        let mut first = (low / step).round();
        let mut last = (high / step).round();
        if first * step < low {
            first += 1.0;
        }
        if last * step > high {
            last -= 1.0;
        }
        integral_steps(first, last).map(|i| i * step).collect()
    }
}

fn integral_steps(first: f64, last: f64) -> impl Iterator<Item = f64> {
    let count = if last >= first {
        (last - first) as usize + 1
    } else {
        0
    };
    (0..count).map(move |offset| first + offset as f64)
}

/// Price axis ticks labelled with a `$` prefix.
#[must_use]
pub fn price_ticks(domain: (f64, f64), count: usize) -> Vec<PriceTick> {
    nice_ticks(domain.0, domain.1, count)
        .into_iter()
        .map(|price| PriceTick {
            price,
            label: format!("${price}"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{nice_ticks, price_ticks, select_time_tick_indices, time_ticks};
    use crate::core::{OhlcPoint, TimeAxisFormat};

    const HOUR: i64 = 3_600_000;
    // 2024-03-05 00:00:00 UTC
    const MARCH_5: i64 = 1_709_596_800_000;

    fn hourly(count: i64, start: i64) -> Vec<OhlcPoint> {
        (0..count)
            .map(|i| OhlcPoint::new(start + i * HOUR, 1.0, 1.0, 1.0, 1.0, 0.0))
            .collect()
    }

    #[test]
    fn spacing_follows_available_width() {
        // 400 px fits 5 labels, 50 items => every 10th item at most
        let slice = hourly(50, MARCH_5);
        let indices =
            select_time_tick_indices(&slice, 400.0, 80.0, TimeAxisFormat::Intraday);
        assert_eq!(indices[0], 0);
        assert!(indices.windows(2).all(|pair| pair[1] - pair[0] >= 10));
    }

    #[test]
    fn intraday_labels_mark_new_days() {
        let slice = hourly(30, MARCH_5);
        let ticks = time_ticks(&slice, 240.0, 80.0, TimeAxisFormat::Intraday);
        // distance = ceil(30 / 3) = 10 => 0, 10, 20; index 24 is a new day but too close.
        let indices: Vec<usize> = ticks.iter().map(|tick| tick.index).collect();
        assert_eq!(indices, vec![0, 10, 20]);
        assert_eq!(ticks[0].label, "24/03/05 00:00:00");
        assert_eq!(ticks[1].label, "10:00:00");
        assert_eq!(ticks[0].lines().collect::<Vec<_>>(), vec!["24/03/05", "00:00:00"]);
    }

    #[test]
    fn monthly_takes_every_nth_item() {
        let slice = hourly(12, MARCH_5);
        let ticks = time_ticks(&slice, 320.0, 80.0, TimeAxisFormat::Monthly);
        let indices: Vec<usize> = ticks.iter().map(|tick| tick.index).collect();
        assert_eq!(indices, vec![0, 3, 6, 9]);
        assert!(ticks.iter().all(|tick| tick.label == "24/03"));
    }

    #[test]
    fn day_week_labels_repeat_month_day() {
        let day = 24 * HOUR;
        let slice: Vec<OhlcPoint> = (0..4)
            .map(|i| OhlcPoint::new(MARCH_5 + i * day, 1.0, 1.0, 1.0, 1.0, 0.0))
            .collect();
        let ticks = time_ticks(&slice, 800.0, 80.0, TimeAxisFormat::DayWeek);
        let labels: Vec<&str> = ticks.iter().map(|tick| tick.label.as_str()).collect();
        assert_eq!(labels, vec!["24/03", "03/06", "03/07", "03/08"]);
    }

    #[test]
    fn narrow_plot_keeps_first_label_only() {
        let slice = hourly(10, MARCH_5);
        let indices = select_time_tick_indices(&slice, 40.0, 80.0, TimeAxisFormat::Intraday);
        assert_eq!(indices, vec![0]);
        assert!(time_ticks(&[], 400.0, 80.0, TimeAxisFormat::Intraday).is_empty());
    }

    #[test]
    fn nice_ticks_use_round_steps() {
        assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_ticks(0.1, 0.45, 4), vec![0.1, 0.2, 0.3, 0.4]);
        assert_eq!(nice_ticks(5.0, 5.0, 10), vec![5.0]);
        assert!(nice_ticks(f64::NAN, 1.0, 10).is_empty());
    }

    #[test]
    fn price_labels_carry_dollar_prefix() {
        let ticks = price_ticks((99.0, 111.0), 5);
        let labels: Vec<&str> = ticks.iter().map(|tick| tick.label.as_str()).collect();
        assert_eq!(labels, vec!["$100", "$102", "$104", "$106", "$108", "$110"]);
    }
}
