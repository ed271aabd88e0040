use crate::NsError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, NsError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(NsError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, NsError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(NsError::OutOfRange { what, value: v })
    }
}

/// Sort descending with NaN last, then drop exact duplicates.
///
/// Returns a strictly descending sequence when the input is finite.
pub fn sorted_descending(values: &[Real]) -> Vec<Real> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| match (a.is_nan(), b.is_nan()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => b.total_cmp(a),
    });
    out.dedup_by(|a, b| a == b);
    out
}

/// True when every consecutive pair strictly decreases.
pub fn is_strictly_descending(values: &[Real]) -> bool {
    values.windows(2).all(|w| w[0] > w[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(0.0, "pc").is_err());
        assert!(ensure_positive(-1.0, "pc").is_err());
        assert_eq!(ensure_positive(2.5, "pc").unwrap(), 2.5);
    }

    #[test]
    fn sorted_descending_drops_duplicates() {
        let sorted = sorted_descending(&[0.1, 0.5, 0.1, 0.3]);
        assert_eq!(sorted, vec![0.5, 0.3, 0.1]);
        assert!(is_strictly_descending(&sorted));
    }

    proptest! {
        #[test]
        fn sorted_descending_is_strict(values in prop::collection::vec(-1e3f64..1e3, 0..32)) {
            let sorted = sorted_descending(&values);
            prop_assert!(is_strictly_descending(&sorted));
            for v in &values {
                prop_assert!(sorted.contains(v));
            }
        }
    }
}
