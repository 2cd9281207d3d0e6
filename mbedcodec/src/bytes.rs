use alloc::vec::Vec;
use core::ops::Range;

/// Position of the first `needle` in `data` at or after `from`. An empty needle never matches.
fn find(data: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    data.get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| from + pos)
}

/// Returns `true` if `data` starts with a non-empty `prefix`.
pub fn has_prefix(data: &[u8], prefix: Option<&[u8]>) -> bool {
    prefix.is_some_and(|prefix| !prefix.is_empty() && data.starts_with(prefix))
}

/// Returns `true` if `data` ends with a non-empty `suffix`.
pub fn has_suffix(data: &[u8], suffix: Option<&[u8]>) -> bool {
    suffix.is_some_and(|suffix| !suffix.is_empty() && data.ends_with(suffix))
}

/// Returns `true` if a non-empty `needle` occurs anywhere in `data`.
pub fn contains(data: &[u8], needle: Option<&[u8]>) -> bool {
    needle.is_some_and(|needle| find(data, needle, 0).is_some())
}

/// Splits `data[start..]` into frames that each begin with `separator`.
///
/// A frame runs up to the next `separator` or the end of `data`. Bytes before the first separator
/// are dropped; an empty separator yields nothing.
///
/// ```
/// use mbedcodec::bytes::components;
///
/// let response = [0x55, 0xAA, 0x6C, 0x6C, 0x6F, 0x55, 0xAA, 0x40, 0x69, 0xFF];
/// let frames = components(&response, &[0x55, 0xAA], 0);
/// assert_eq!(frames, [&response[..5], &response[5..]]);
/// ```
pub fn components<'a>(data: &'a [u8], separator: &[u8], start: usize) -> Vec<&'a [u8]> {
    let mut frames = Vec::new();
    let mut current = find(data, separator, start);
    while let Some(begin) = current {
        current = find(data, separator, begin + separator.len());
        frames.push(&data[begin..current.unwrap_or(data.len())]);
    }
    frames
}

/// Range from the earliest match of any of `needles` at or after `start` up to the earliest match
/// after it, or to the end of `data` when there is none.
///
/// Returns `None` when no needle occurs in `data[start..]`.
pub fn range_of_any(data: &[u8], needles: &[&[u8]], start: usize) -> Option<Range<usize>> {
    let earliest = |from: usize| {
        needles
            .iter()
            .filter_map(|needle| find(data, needle, from).map(|pos| pos..pos + needle.len()))
            .min_by_key(|range| range.start)
    };

    let first = earliest(start)?;
    let end = earliest(first.end).map_or(data.len(), |next| next.start);
    Some(first.start..end)
}
