use std::env;
use std::str::FromStr;
use std::sync::Mutex;

use rand::distributions::{Distribution, Standard, Uniform};
use rand::prelude::*;

/// Input patterns for testing and benchmarking the kernel, for `i32` and `f32` values.
///
/// Every random pattern draws from a seed that is fixed per process and printed by the test
/// harness. Set `OVERRIDE_SEED` to replay a failure.

// --- Public ---

pub fn random(len: usize) -> Vec<i32> {
    //     .
    // : . : :
    // :.:::.::

    random_vec(len)
}

pub fn random_uniform<R>(len: usize, range: R) -> Vec<i32>
where
    R: Into<Uniform<i32>>,
{
    // :.:.:.::
    let mut rng = new_seed();
    let dist: Uniform<i32> = range.into();

    (0..len).map(|_| dist.sample(&mut rng)).collect()
}

pub fn random_sorted(len: usize, sorted_percent: f64) -> Vec<i32> {
    //     .:
    //   .:::. :
    // .::::::.::
    // [----][--]
    //  ^      ^
    //  |      |
    // sorted  |
    //     unsorted

    let mut v = random_vec(len);
    let sorted_len = ((len as f64) * (sorted_percent / 100.0)).round() as usize;

    v[0..sorted_len].sort_unstable();

    v
}

pub fn all_equal(len: usize) -> Vec<i32> {
    // ......
    // ::::::

    vec![66; len]
}

pub fn ascending(len: usize) -> Vec<i32> {
    //     .:
    //   .:::
    // .:::::

    (0..len as i32).collect()
}

pub fn descending(len: usize) -> Vec<i32> {
    // :.
    // :::.
    // :::::.

    (0..len as i32).rev().collect()
}

pub fn saw_ascending(len: usize, saw_count: usize) -> Vec<i32> {
    //   .:  .:
    // .:::.:::

    saw(len, saw_count, |_| false)
}

pub fn saw_descending(len: usize, saw_count: usize) -> Vec<i32> {
    // :.  :.
    // :::.:::.

    saw(len, saw_count, |_| true)
}

pub fn saw_mixed(len: usize, saw_count: usize) -> Vec<i32> {
    // :.  :.    .::.    .:
    // :::.:::..::::::..:::

    let saw_directions = random_uniform(saw_count.max(1) + 1, 0..=1);
    saw(len, saw_count, |i| saw_directions[i % saw_directions.len()] == 1)
}

pub fn pipe_organ(len: usize) -> Vec<i32> {
    //   .:.
    // .:::::.

    let mut vals = random_vec::<i32>(len);

    vals[..len / 2].sort_unstable();
    vals[len / 2..].sort_unstable_by(|a, b| b.cmp(a));

    vals
}

/// Uniform `f32` values in `[-1e6, 1e6)`.
pub fn random_f32(len: usize) -> Vec<f32> {
    let mut rng = new_seed();
    let dist = Uniform::new(-1e6f32, 1e6f32);

    (0..len).map(|_| dist.sample(&mut rng)).collect()
}

/// Few distinct `f32` values, including both signed zeros and both infinities.
pub fn random_f32_edge(len: usize) -> Vec<f32> {
    const EDGE: [f32; 9] = [
        f32::NEG_INFINITY,
        f32::MIN,
        -1.5,
        -0.0,
        0.0,
        f32::MIN_POSITIVE,
        2.5,
        f32::MAX,
        f32::INFINITY,
    ];

    let mut rng = new_seed();
    (0..len).map(|_| *EDGE.choose(&mut rng).unwrap()).collect()
}

/// [`random_f32`] with roughly `nan_percent` of the values replaced by NaN.
pub fn random_f32_nan(len: usize, nan_percent: f64) -> Vec<f32> {
    let mut rng = new_seed();
    let mut v = random_f32(len);

    for x in v.iter_mut() {
        if rng.gen_bool(nan_percent / 100.0) {
            *x = f32::NAN;
        }
    }

    v
}

/// Maps an `i32` pattern to `f32`, keeping its shape.
pub fn to_f32(v: Vec<i32>) -> Vec<f32> {
    v.into_iter().map(|x| x as f32).collect()
}

/// Overwrites the default behavior so that each call to a random derived pattern yields new random
/// values.
///
/// By default `patterns::random(4)` will yield the same values per process invocation.
/// For benchmarks it's advised to use call this function.
pub fn use_random_seed_each_time() {
    let (seed_type, _) = get_or_init_seed_type_and_value();
    if seed_type == SeedType::ExternalOverride {
        panic!("Using use_random_seed_each_time conflicts with the external seed override.");
    }

    *SEED_TYPE_AND_VALUE.lock().unwrap() = Some((SeedType::RandomEachTime, 0));
}

pub fn random_init_seed() -> u64 {
    get_or_init_seed_type_and_value().1
}

// --- Private ---

#[derive(Copy, Clone, PartialEq, Eq)]
enum SeedType {
    RandomEachTime,
    RandomOncePerProcess,
    ExternalOverride,
}

static SEED_TYPE_AND_VALUE: Mutex<Option<(SeedType, u64)>> = Mutex::new(None);

fn get_or_init_seed_type_and_value() -> (SeedType, u64) {
    let (seed_type, seed_val) = *SEED_TYPE_AND_VALUE.lock().unwrap().get_or_insert_with(|| {
        match env::var("OVERRIDE_SEED") {
            Ok(seed) => (
                SeedType::ExternalOverride,
                u64::from_str(&seed).expect("OVERRIDE_SEED must be a u64"),
            ),
            Err(_) => (SeedType::RandomOncePerProcess, thread_rng().gen()),
        }
    });

    if seed_type == SeedType::RandomEachTime {
        (SeedType::RandomEachTime, thread_rng().gen())
    } else {
        (seed_type, seed_val)
    }
}

fn new_seed() -> StdRng {
    StdRng::seed_from_u64(random_init_seed())
}

fn random_vec<T>(len: usize) -> Vec<T>
where
    Standard: Distribution<T>,
{
    let mut rng = new_seed();

    (0..len).map(|_| rng.gen::<T>()).collect()
}

fn saw(len: usize, saw_count: usize, is_descending: impl Fn(usize) -> bool) -> Vec<i32> {
    if len == 0 {
        return Vec::new();
    }

    let mut vals = random_vec::<i32>(len);
    let chunk_size = (len / saw_count.max(1)).max(1);

    for (i, chunk) in vals.chunks_mut(chunk_size).enumerate() {
        if is_descending(i) {
            chunk.sort_unstable_by(|a, b| b.cmp(a));
        } else {
            chunk.sort_unstable();
        }
    }

    vals
}
