use lanesort::{LaneVector, Portable};
use sort_test_tools::{instantiate_partition_tests, instantiate_sort_tests, Partition, Sort};

/// The public entry points, on whatever backend the process selected.
struct DispatchImpl {}

impl Sort for DispatchImpl {
    fn name() -> String {
        format!("lanesort_{}", lanesort::selected_backend())
    }

    fn sort_i32(v: &mut [i32]) {
        lanesort::sort(v);
    }

    fn sort_f32(v: &mut [f32]) {
        lanesort::sort(v);
    }
}

impl Partition for DispatchImpl {
    fn name() -> String {
        <Self as Sort>::name()
    }

    fn partition_i32(v: &mut [i32], pivot1: usize, pivot2: usize) -> (usize, usize) {
        lanesort::partition(v, pivot1, pivot2)
    }

    fn partition_f32(v: &mut [f32], pivot1: usize, pivot2: usize) -> (usize, usize) {
        lanesort::partition(v, pivot1, pivot2)
    }
}

/// An explicit pair of backends, one per element type.
struct BackendImpl<I, F> {
    _marker: std::marker::PhantomData<(I, F)>,
}

impl<I, F> Sort for BackendImpl<I, F>
where
    I: LaneVector<Elem = i32>,
    F: LaneVector<Elem = f32>,
{
    fn name() -> String {
        format!("lanesort_{}_{}", I::name(), I::LANES)
    }

    fn sort_i32(v: &mut [i32]) {
        lanesort::sort_with::<I>(v);
    }

    fn sort_f32(v: &mut [f32]) {
        lanesort::sort_with::<F>(v);
    }
}

impl<I, F> Partition for BackendImpl<I, F>
where
    I: LaneVector<Elem = i32>,
    F: LaneVector<Elem = f32>,
{
    fn name() -> String {
        <Self as Sort>::name()
    }

    fn partition_i32(v: &mut [i32], pivot1: usize, pivot2: usize) -> (usize, usize) {
        lanesort::partition_with::<I>(v, pivot1, pivot2)
    }

    fn partition_f32(v: &mut [f32], pivot1: usize, pivot2: usize) -> (usize, usize) {
        lanesort::partition_with::<F>(v, pivot1, pivot2)
    }
}

type PortableImpl<const W: usize> = BackendImpl<Portable<i32, W>, Portable<f32, W>>;

mod dispatch {
    use super::*;

    instantiate_sort_tests!(DispatchImpl);
    instantiate_partition_tests!(DispatchImpl);
}

mod portable_1 {
    use super::*;

    instantiate_sort_tests!(PortableImpl<1>);
    instantiate_partition_tests!(PortableImpl<1>);
}

mod portable_3 {
    use super::*;

    instantiate_sort_tests!(PortableImpl<3>);
    instantiate_partition_tests!(PortableImpl<3>);
}

mod portable_8 {
    use super::*;

    instantiate_sort_tests!(PortableImpl<8>);
    instantiate_partition_tests!(PortableImpl<8>);
}

mod portable_16 {
    use super::*;

    instantiate_sort_tests!(PortableImpl<16>);
    instantiate_partition_tests!(PortableImpl<16>);
}

// The dispatch suite already covers AVX2 on machines that have it. This one pins it so a
// `LANESORT_BACKEND=portable` run still exercises it.
#[cfg(all(target_arch = "x86_64", not(feature = "portable_only")))]
mod avx2 {
    use lanesort::{Avx2F32, Avx2I32};

    use super::*;

    struct Avx2Impl {}

    impl Sort for Avx2Impl {
        fn name() -> String {
            "lanesort_avx2".into()
        }

        fn sort_i32(v: &mut [i32]) {
            if Avx2I32::is_supported() {
                lanesort::sort_with::<Avx2I32>(v);
            } else {
                lanesort::sort_with::<Portable<i32, 8>>(v);
            }
        }

        fn sort_f32(v: &mut [f32]) {
            if Avx2F32::is_supported() {
                lanesort::sort_with::<Avx2F32>(v);
            } else {
                lanesort::sort_with::<Portable<f32, 8>>(v);
            }
        }
    }

    impl Partition for Avx2Impl {
        fn name() -> String {
            <Self as Sort>::name()
        }

        fn partition_i32(v: &mut [i32], pivot1: usize, pivot2: usize) -> (usize, usize) {
            if Avx2I32::is_supported() {
                lanesort::partition_with::<Avx2I32>(v, pivot1, pivot2)
            } else {
                lanesort::partition_with::<Portable<i32, 8>>(v, pivot1, pivot2)
            }
        }

        fn partition_f32(v: &mut [f32], pivot1: usize, pivot2: usize) -> (usize, usize) {
            if Avx2F32::is_supported() {
                lanesort::partition_with::<Avx2F32>(v, pivot1, pivot2)
            } else {
                lanesort::partition_with::<Portable<f32, 8>>(v, pivot1, pivot2)
            }
        }
    }

    instantiate_sort_tests!(Avx2Impl);
    instantiate_partition_tests!(Avx2Impl);
}

#[test]
fn raw_entry_points() {
    use lanesort::{ElementKind, KindError};

    let mut v = [5.0f32, 3.0, 3.0, 1.0, 4.0];
    unsafe { lanesort::sort_raw(v.as_mut_ptr().cast(), ElementKind::Float32, 0, 5) }.unwrap();
    assert_eq!(v, [1.0, 3.0, 3.0, 4.0, 5.0]);

    let mut v = [0i32; 4];
    let err = unsafe { lanesort::sort_raw(v.as_mut_ptr().cast(), ElementKind::Int64, 0, 2) };
    assert_eq!(err, Err(KindError::Unsupported(ElementKind::Int64)));
    assert_eq!(
        ElementKind::try_from(3),
        Err(KindError::UnknownTag(3))
    );
}
