/// A sort under test. The kernel only handles 32-bit elements, so the methods are per type
/// rather than generic.
pub trait Sort {
    fn name() -> String;

    fn sort_i32(v: &mut [i32]);

    fn sort_f32(v: &mut [f32]);
}

/// A partition under test, `(v, pivot1, pivot2) -> (lower, upper)`.
///
/// `pivot1 == pivot2` asks for a single-pivot partition, anything else for a dual-pivot one.
pub trait Partition {
    fn name() -> String;

    fn partition_i32(v: &mut [i32], pivot1: usize, pivot2: usize) -> (usize, usize);

    fn partition_f32(v: &mut [f32], pivot1: usize, pivot2: usize) -> (usize, usize);
}

pub mod patterns;
