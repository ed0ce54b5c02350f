/// Reinterprets the fuzzer input as `i32` values, dropping a trailing partial element.
pub fn u8_as_i32(data: &[u8]) -> Vec<i32> {
    data.chunks_exact(4)
        .map(|chunk| i32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Reinterprets the fuzzer input as `f32` values, NaN payloads and signed zeros included.
pub fn u8_as_f32(data: &[u8]) -> Vec<f32> {
    u8_as_i32(data)
        .into_iter()
        .map(|x| f32::from_bits(x as u32))
        .collect()
}

/// Two pivot indices derived from the first bytes, ordered so `v[a] <= v[b]`.
pub fn pivot_pair<T: PartialOrd>(data: &[u8], v: &[T]) -> Option<(usize, usize)> {
    if v.is_empty() || data.len() < 2 {
        return None;
    }

    let a = data[0] as usize % v.len();
    let b = data[1] as usize % v.len();

    if v[b] < v[a] {
        Some((b, a))
    } else if v[a] <= v[b] {
        Some((a, b))
    } else {
        // Unordered, i.e. NaN is involved.
        None
    }
}
