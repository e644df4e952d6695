use hdf5::types::{FloatSize, IntSize, TypeDescriptor};
use hdf5::H5Type;

mod sealed {
    pub trait Sealed {}
}

/// A scalar type that can be stored as a MAT-file dataset element.
///
/// Implemented for exactly the fixed-width scalars MATLAB's numeric classes
/// map onto: `i8`, `u8`, `i16`, `u16`, `i32`, `u32`, `i64`, `u64`, `f32`,
/// `f64` and `bool`. The trait is sealed, so storing any other type is a
/// compile-time error rather than a runtime one.
pub trait Element: H5Type + Copy + sealed::Sealed {
    /// The storage engine's native descriptor for this scalar type.
    fn storage_type() -> TypeDescriptor;
}

macro_rules! impl_element {
    ($($ty:ty => $desc:expr,)*) => {
        $(
            impl sealed::Sealed for $ty {}
            impl Element for $ty {
                fn storage_type() -> TypeDescriptor {
                    $desc
                }
            }
        )*
    };
}

impl_element! {
    i8 => TypeDescriptor::Integer(IntSize::U1),
    u8 => TypeDescriptor::Unsigned(IntSize::U1),
    i16 => TypeDescriptor::Integer(IntSize::U2),
    u16 => TypeDescriptor::Unsigned(IntSize::U2),
    i32 => TypeDescriptor::Integer(IntSize::U4),
    u32 => TypeDescriptor::Unsigned(IntSize::U4),
    i64 => TypeDescriptor::Integer(IntSize::U8),
    u64 => TypeDescriptor::Unsigned(IntSize::U8),
    f32 => TypeDescriptor::Float(FloatSize::U4),
    f64 => TypeDescriptor::Float(FloatSize::U8),
    bool => TypeDescriptor::Boolean,
}

#[cfg(feature = "num-complex")]
pub(crate) use self::complex::{as_complex_elements, complex_type, ComplexElement};

#[cfg(feature = "num-complex")]
mod complex {
    use super::Element;
    use hdf5::types::{CompoundField, CompoundType, TypeDescriptor};
    use hdf5::H5Type;
    use num_complex::Complex;

    /// Storage descriptor for a complex element: a compound of two `T`
    /// components, "real" at offset 0 and "imag" at `size_of::<T>()`.
    pub(crate) fn complex_type<T: Element>() -> TypeDescriptor {
        let component = T::storage_type();
        let size = component.size();
        TypeDescriptor::Compound(CompoundType {
            fields: vec![
                CompoundField::new("real", component.clone(), 0, 0),
                CompoundField::new("imag", component, size, 1),
            ],
            size: 2 * size,
        })
    }

    /// `Complex<T>` under the compound storage type.
    ///
    /// `Complex<T>` is `repr(C)` with fields `re`, `im`, which is exactly
    /// the layout [`complex_type`] describes.
    #[derive(Clone, Copy)]
    #[repr(transparent)]
    pub(crate) struct ComplexElement<T>(pub(crate) Complex<T>);

    unsafe impl<T: Element> H5Type for ComplexElement<T> {
        fn type_descriptor() -> TypeDescriptor {
            complex_type::<T>()
        }
    }

    pub(crate) fn as_complex_elements<T: Element>(data: &[Complex<T>]) -> &[ComplexElement<T>] {
        // ComplexElement is a transparent wrapper over Complex<T>.
        unsafe { std::slice::from_raw_parts(data.as_ptr().cast(), data.len()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    macro_rules! for_each_element {
        ($check:ident) => {
            $check!(i8);
            $check!(u8);
            $check!(i16);
            $check!(u16);
            $check!(i32);
            $check!(u32);
            $check!(i64);
            $check!(u64);
            $check!(f32);
            $check!(f64);
            $check!(bool);
        };
    }

    #[test]
    fn storage_types_match_engine_native_types() {
        macro_rules! check {
            ($ty:ty) => {
                assert_eq!(
                    <$ty as Element>::storage_type(),
                    <$ty as H5Type>::type_descriptor(),
                );
            };
        }
        for_each_element!(check);
    }

    #[test]
    fn storage_type_sizes_match_memory_sizes() {
        macro_rules! check {
            ($ty:ty) => {
                assert_eq!(<$ty as Element>::storage_type().size(), mem::size_of::<$ty>());
            };
        }
        for_each_element!(check);
    }

    #[test]
    fn storage_types_are_distinct() {
        let mut all = Vec::new();
        macro_rules! check {
            ($ty:ty) => {
                all.push(<$ty as Element>::storage_type());
            };
        }
        for_each_element!(check);
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[cfg(feature = "num-complex")]
    #[test]
    fn complex_type_has_real_and_imag_fields() {
        let TypeDescriptor::Compound(compound) = complex_type::<f64>() else {
            panic!("expected a compound descriptor");
        };
        assert_eq!(compound.size, 16);
        assert_eq!(compound.fields.len(), 2);
        assert_eq!(compound.fields[0].name, "real");
        assert_eq!(compound.fields[0].offset, 0);
        assert_eq!(compound.fields[1].name, "imag");
        assert_eq!(compound.fields[1].offset, 8);
    }

    #[cfg(feature = "num-complex")]
    #[test]
    fn complex_type_tracks_component_size() {
        let TypeDescriptor::Compound(compound) = complex_type::<i16>() else {
            panic!("expected a compound descriptor");
        };
        assert_eq!(compound.size, 4);
        assert_eq!(compound.fields[1].offset, 2);
    }
}
