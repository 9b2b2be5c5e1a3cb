/// Removes leading and trailing near-silence from a clip.
///
/// Scans from the front while `|sample| < threshold` and from the back
/// symmetrically, returning the `[start, end)` sub-slice. A fully quiet
/// buffer yields the empty slice. Interior samples are untouched; the
/// result borrows from the input.
pub fn trim_silence(samples: &[f32], threshold: f32) -> &[f32] {
    let mut start = 0;
    let mut end = samples.len();

    while start < end && samples[start].abs() < threshold {
        start += 1;
    }
    while end > start && samples[end - 1].abs() < threshold {
        end -= 1;
    }

    &samples[start..end]
}
