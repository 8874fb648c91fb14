//! Human-readable byte sizes for listings.

/// Sizes strictly above this many bytes are shown in megabytes.
pub const MB_THRESHOLD: u64 = 100 * 1024;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Formats a byte count as `"<n>.<nn>KB"` or `"<n>.<nn>MB"`.
///
/// Values up to and including [`MB_THRESHOLD`] are rendered in kibibytes,
/// larger values in mebibytes. The two decimals are rounded half-up on the
/// exact quotient, so `128` bytes is `"0.13KB"`.
///
/// # Examples
///
/// ```
/// use picstore_core::format_size;
///
/// assert_eq!(format_size(102_400), "100.00KB");
/// assert_eq!(format_size(1_048_576), "1.00MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    let (unit, suffix) = if bytes > MB_THRESHOLD {
        (MIB, "MB")
    } else {
        (KIB, "KB")
    };

    let scaled = u128::from(bytes) * 100;
    let unit = u128::from(unit);
    let hundredths = (scaled + unit / 2) / unit;

    format!("{}.{:02}{}", hundredths / 100, hundredths % 100, suffix)
}
