/// Rounded share of `part` in `whole`, as a whole percentage.
///
/// # Returns
/// - `0` when `whole` is zero.
/// - `round(100 * part / whole)` otherwise.
pub fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    let share = (part as f64 / whole as f64) * 100.0;
    if share.is_finite() { share.round() as u32 } else { 0 }
}
