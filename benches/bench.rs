use std::env;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use lanesort::Portable;
use sort_test_tools::patterns;

#[inline(never)]
fn bench_sort<T: Copy>(
    c: &mut Criterion,
    test_size: usize,
    transform_name: &str,
    transform: &fn(Vec<i32>) -> Vec<T>,
    pattern_name: &str,
    pattern_provider: &fn(usize) -> Vec<i32>,
    bench_name: &str,
    sort_func: impl Fn(&mut [T]),
) {
    let batch_size = if test_size > 30 {
        BatchSize::LargeInput
    } else {
        BatchSize::SmallInput
    };

    c.bench_function(
        &format!("{bench_name}-{transform_name}-{pattern_name}-{test_size}"),
        |b| {
            b.iter_batched(
                || transform(pattern_provider(test_size)),
                |mut test_data| sort_func(black_box(test_data.as_mut_slice())),
                batch_size,
            )
        },
    );
}

fn split_len(size: usize, part_a_percent: f64) -> (usize, usize) {
    let len_a = ((size as f64 / 100.0) * part_a_percent).round() as usize;
    let len_b = size - len_a;

    (len_a, len_b)
}

/// The sorts compared for one element type, the kernel on each backend against the stdlib.
trait BenchElem: Copy + PartialOrd + lanesort::SortElement {
    fn sort_unstable(v: &mut [Self]);

    fn sort_portable(v: &mut [Self]);
}

impl BenchElem for i32 {
    fn sort_unstable(v: &mut [Self]) {
        v.sort_unstable();
    }

    fn sort_portable(v: &mut [Self]) {
        lanesort::sort_with::<Portable<i32, { lanesort::lanes::PORTABLE_LANES }>>(v);
    }
}

impl BenchElem for f32 {
    fn sort_unstable(v: &mut [Self]) {
        v.sort_unstable_by(f32::total_cmp);
    }

    fn sort_portable(v: &mut [Self]) {
        lanesort::sort_with::<Portable<f32, { lanesort::lanes::PORTABLE_LANES }>>(v);
    }
}

fn bench_patterns<T: BenchElem>(
    c: &mut Criterion,
    test_size: usize,
    transform_name: &str,
    transform: fn(Vec<i32>) -> Vec<T>,
) {
    let mut pattern_providers: Vec<(&'static str, fn(usize) -> Vec<i32>)> = vec![
        ("random", patterns::random),
        ("random_dense", |size| {
            patterns::random_uniform(size, 0..=((size as f64).log2().round() as i32).max(0))
        }),
        ("random_binary", |size| patterns::random_uniform(size, 0..=1)),
        ("ascending", patterns::ascending),
        ("descending", patterns::descending),
        ("saws_long", |size| {
            patterns::saw_mixed(size, ((size as f64).log2().round()) as usize)
        }),
        ("saws_short", |size| {
            patterns::saw_mixed(size, (size as f64 / 22.0).round() as usize)
        }),
    ];

    // Custom patterns designed to find worst case performance.
    let mut extra_pattern_providers: Vec<(&'static str, fn(usize) -> Vec<i32>)> = vec![
        ("90_zero_10_random", |size| {
            let (len_90, len_10) = split_len(size, 90.0);
            std::iter::repeat(0)
                .take(len_90)
                .chain(patterns::random(len_10))
                .collect()
        }),
        ("all_equal", patterns::all_equal),
        ("pipe_organ", patterns::pipe_organ),
        ("random_s95", |size| patterns::random_sorted(size, 95.0)),
    ];

    if env::var("EXTRA_PATTERNS").is_ok() {
        pattern_providers.append(&mut extra_pattern_providers);
    }

    for (pattern_name, pattern_provider) in pattern_providers.iter() {
        if test_size < 3 && *pattern_name != "random" {
            continue;
        }

        let mut bench = |bench_name: &str, sort_func: fn(&mut [T])| {
            bench_sort(
                c,
                test_size,
                transform_name,
                &transform,
                pattern_name,
                pattern_provider,
                bench_name,
                sort_func,
            );
        };

        bench("lanesort_dispatch", lanesort::sort::<T>);
        bench("lanesort_portable", T::sort_portable);
        bench("rust_std_unstable", T::sort_unstable);
    }
}

fn ensure_true_random() {
    // Ensure that random vecs are actually different.
    let random_vec_a = patterns::random(5);
    let random_vec_b = patterns::random(5);

    assert_ne!(random_vec_a, random_vec_b);
}

fn criterion_benchmark(c: &mut Criterion) {
    let test_sizes = [
        0, 1, 2, 3, 7, 8, 9, 16, 24, 50, 64, 65, 101, 200, 500, 1_000, 2_048, 10_000, 100_000,
        1_000_000,
    ];

    patterns::use_random_seed_each_time();
    ensure_true_random();

    println!("lanesort backend: {}", lanesort::selected_backend());

    for test_size in test_sizes {
        bench_patterns(c, test_size, "i32", |values| values);

        bench_patterns(c, test_size, "f32", patterns::to_f32);
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
