/// Fills gaps in an evenly spaced series in place.
///
/// Gaps between two known values are filled linearly by position. Gaps after
/// the last known value repeat it. Gaps before the first known value stay
/// missing.
pub fn interpolate_linear(values: &mut [Option<f64>]) {
    let mut previous: Option<(usize, f64)> = None;

    for index in 0..values.len() {
        let Some(current) = values[index] else {
            continue;
        };

        if let Some((start, start_value)) = previous {
            let span = (index - start) as f64;
            for (offset, slot) in values[start + 1..index].iter_mut().enumerate() {
                let fraction = (offset + 1) as f64 / span;
                *slot = Some(start_value + (current - start_value) * fraction);
            }
        }
        previous = Some((index, current));
    }

    if let Some((last, last_value)) = previous {
        for slot in &mut values[last + 1..] {
            *slot = Some(last_value);
        }
    }
}
