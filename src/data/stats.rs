use anyhow::{Result, ensure};

// ---------------------------------------------------------------------------
// Descriptive statistics over a single column
// ---------------------------------------------------------------------------

/// Smallest value in a column. Undefined (an error) for an empty column.
pub fn min(values: &[f64]) -> Result<f64> {
    ensure!(!values.is_empty(), "min of an empty column is undefined");
    Ok(values.iter().cloned().fold(f64::INFINITY, f64::min))
}

/// Largest value in a column. Undefined (an error) for an empty column.
pub fn max(values: &[f64]) -> Result<f64> {
    ensure!(!values.is_empty(), "max of an empty column is undefined");
    Ok(values.iter().cloned().fold(f64::NEG_INFINITY, f64::max))
}

/// Arithmetic mean of a column. Undefined (an error) for an empty column.
pub fn mean(values: &[f64]) -> Result<f64> {
    ensure!(!values.is_empty(), "mean of an empty column is undefined");
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max_mean() {
        let values = [3.0, -1.5, 4.0, 0.0];
        assert_eq!(min(&values).unwrap(), -1.5);
        assert_eq!(max(&values).unwrap(), 4.0);
        assert!((mean(&values).unwrap() - 1.375).abs() < 1e-12);
    }

    #[test]
    fn empty_column_is_undefined() {
        assert!(min(&[]).is_err());
        assert!(max(&[]).is_err());
        assert!(mean(&[]).is_err());
    }
}
