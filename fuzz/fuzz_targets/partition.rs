#![no_main]

use libfuzzer_sys::fuzz_target;

use lanesort_fuzz::{pivot_pair, u8_as_i32};

fuzz_target!(|data: &[u8]| {
    let input = u8_as_i32(data);
    let Some((a, b)) = pivot_pair(data, &input) else {
        return;
    };

    let mut v = input.clone();
    let (lower, upper) = lanesort::partition(&mut v, a, a);
    let pivot = input[a];
    assert!(v[..lower].iter().all(|&x| x < pivot));
    assert!(v[lower..upper].iter().all(|&x| x == pivot));
    assert!(v[upper..].iter().all(|&x| x > pivot));

    if a != b {
        let (pivot1, pivot2) = (input[a], input[b]);
        let mut v = input.clone();
        let (lower, upper) = lanesort::partition(&mut v, a, b);
        assert!(v[..lower].iter().all(|&x| x < pivot1));
        assert!(v[lower..upper].iter().all(|&x| pivot1 <= x && x < pivot2));
        assert!(v[upper..].iter().all(|&x| x >= pivot2));

        let mut sorted_input = input;
        sorted_input.sort_unstable();
        v.sort_unstable();
        assert_eq!(v, sorted_input);
    }
});
