#![no_main]

use libfuzzer_sys::fuzz_target;

use lanesort_fuzz::{u8_as_f32, u8_as_i32};

fuzz_target!(|data: &[u8]| {
    let mut v = u8_as_i32(data);
    let mut expected = v.clone();
    expected.sort_unstable();
    lanesort::sort(&mut v);
    assert_eq!(v, expected);

    let mut v = u8_as_f32(data);
    let mut expected_bits: Vec<u32> = v.iter().map(|x| x.to_bits()).collect();
    let has_nan = v.iter().any(|x| x.is_nan());
    lanesort::sort(&mut v);

    let mut bits: Vec<u32> = v.iter().map(|x| x.to_bits()).collect();
    expected_bits.sort_unstable();
    bits.sort_unstable();
    assert_eq!(bits, expected_bits);

    if !has_nan {
        assert!(v.windows(2).all(|w| w[0] <= w[1]));
    }
});
