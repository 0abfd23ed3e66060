use conv::ValueFrom;

/// Arithmetic mean. `None` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let count = f64::value_from(values.len()).ok()?;
    Some(values.iter().sum::<f64>() / count)
}

/// Population variance (mean squared deviation). `None` for an empty slice.
#[must_use]
pub fn variance(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let count = f64::value_from(values.len()).ok()?;
    let sum = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
    Some(sum / count)
}

#[must_use]
pub fn variance_along_axis<const D: usize>(positions: &[[f64; D]], axis: usize) -> Option<f64> {
    let values = positions.iter().map(|p| p[axis]).collect::<Vec<_>>();
    variance(&values)
}

/// The axis along which `positions` spread the most.
/// Ties keep the lowest axis; all-zero variance yields axis 0.
#[must_use]
pub fn max_variance_axis<const D: usize>(positions: &[[f64; D]]) -> usize {
    let mut max_variance = 0.0;
    let mut axis = 0;
    for i in 0..D {
        let variance = variance_along_axis(positions, i).unwrap_or(0.0);
        if variance > max_variance {
            max_variance = variance;
            axis = i;
        }
    }
    axis
}

/// Index splitting the sorted `values` into two runs whose summed variance is
/// smallest. Candidates range over `min_entries..=len - min_entries`, the first
/// minimum wins. Falls back to `min_entries` when there is no candidate.
#[must_use]
pub fn min_variance_split(values: &[f64], min_entries: usize) -> usize {
    let mut min_variance = f64::INFINITY;
    let mut split_index = min_entries;
    let last = values.len().saturating_sub(min_entries);
    for i in min_entries..=last {
        let (left, right) = values.split_at(i);
        let (Some(left), Some(right)) = (variance(left), variance(right)) else {
            continue;
        };
        if left + right < min_variance {
            min_variance = left + right;
            split_index = i;
        }
    }
    split_index
}
