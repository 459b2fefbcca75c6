/// Round `value` and saturate it into the `u8` range.
///
/// Values below zero map to `0`, values above `255` map to `255`, and `NaN`
/// maps to `0`.
///
/// # Examples
///
/// ```
/// use retouch_imgproc::core::clamp_u8;
///
/// assert_eq!(clamp_u8(76.245), 76);
/// assert_eq!(clamp_u8(-3.0), 0);
/// assert_eq!(clamp_u8(300.0), 255);
/// ```
pub fn clamp_u8(value: f64) -> u8 {
    num_traits::clamp(value.round(), 0.0, 255.0) as u8
}

/// Build a 256 entry lookup table by evaluating `f` on every `u8` value and
/// clamping the result.
pub fn build_lut(f: impl Fn(f64) -> f64) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = clamp_u8(f(i as f64));
    }
    lut
}
