use alloc::format;
use core::fmt::Write;

use crate::{CodecError, Scratch};

/// Formats a finite `f64` in its shortest round-trip form.
///
/// Magnitudes in `[1e-6, 1e21)` and zero are written as plain decimals,
/// everything else in exponent form. NaN and infinities are type errors.
///
/// ```
/// use vc_codec::Scratch;
/// use vc_codec::text::write_f64;
///
/// let mut out = Scratch::new();
/// for (value, text) in [(1e20, "100000000000000000000"), (1e21, "1e21"), (-0.5, "-0.5")] {
///     out.clear();
///     write_f64(&mut out, value).unwrap();
///     assert_eq!(out.as_str(), text);
/// }
/// ```
pub fn write_f64(out: &mut Scratch, value: f64) -> Result<(), CodecError> {
    if !value.is_finite() {
        return Err(CodecError::type_error(format!("unsupported float value {value}")));
    }
    let abs = value.abs();
    if abs == 0.0 || (1e-6..1e21).contains(&abs) {
        write!(out, "{value}")?;
    } else {
        write!(out, "{value:e}")?;
    }
    Ok(())
}

/// Formats a finite `f32` at `f32` precision, see [`write_f64`].
pub fn write_f32(out: &mut Scratch, value: f32) -> Result<(), CodecError> {
    if !value.is_finite() {
        return Err(CodecError::type_error(format!("unsupported float value {value}")));
    }
    let abs = value.abs();
    if abs == 0.0 || (1e-6..1e21).contains(&abs) {
        write!(out, "{value}")?;
    } else {
        write!(out, "{value:e}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use proptest::prelude::*;

    use super::{write_f32, write_f64};
    use crate::{ErrorClass, Scratch};

    fn f64_text(value: f64) -> String {
        let mut out = Scratch::new();
        write_f64(&mut out, value).unwrap();
        out.as_str().into()
    }

    fn f32_text(value: f32) -> String {
        let mut out = Scratch::new();
        write_f32(&mut out, value).unwrap();
        out.as_str().into()
    }

    #[test]
    fn boundaries() {
        assert_eq!(f64_text(0.0), "0");
        assert_eq!(f64_text(-0.0), "-0");
        assert_eq!(f64_text(5.0), "5");
        assert_eq!(f64_text(0.000001), "0.000001");
        assert_eq!(f64_text(1e-7), "1e-7");
        assert_eq!(f64_text(123456789.125), "123456789.125");
        assert_eq!(f64_text(f64::MAX), "1.7976931348623157e308");
        assert_eq!(f64_text(f64::MIN_POSITIVE), "2.2250738585072014e-308");

        assert_eq!(f32_text(0.1), "0.1");
        assert_eq!(f32_text(f32::MAX), "3.4028235e38");
        assert_eq!(f32_text(-1.5e-7), "-1.5e-7");
    }

    #[test]
    fn non_finite_values_fail() {
        let mut out = Scratch::new();
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = write_f64(&mut out, value).unwrap_err();
            assert_eq!(err.class(), ErrorClass::Type);
        }
        assert!(write_f32(&mut out, f32::NAN).is_err());
        assert!(out.is_empty());
    }

    proptest! {
        #[test]
        fn f64_round_trips(value in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
            prop_assert_eq!(f64_text(value).parse::<f64>().unwrap(), value);
        }

        #[test]
        fn f32_round_trips(value in any::<f32>().prop_filter("finite", |v| v.is_finite())) {
            prop_assert_eq!(f32_text(value).parse::<f32>().unwrap(), value);
        }
    }
}
