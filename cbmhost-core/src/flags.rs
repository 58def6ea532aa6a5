/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
//! Helper macros for [::bitflags] types.

/// A macro for creating complex mask constants that won't get in the way of bitflags.
#[macro_export]
macro_rules! bitflags_masks {
    (@ pub const $mask:ident = $($flag:ident)|*;) => {
        pub const $mask: Self = Self::from_bits_retain($(Self::$flag.bits())|*);
    };
    (@#[doc = $doc:expr] pub const $mask:ident = $($flag:ident)|*;) => {
        #[doc = $doc] pub const $mask: Self = Self::from_bits_retain($(Self::$flag.bits())|*);
    };
    ($bitflags:ty {$($(#[doc = $doc:expr])? pub const $mask:ident = $($flag:ident)|*;)*}) => {
        impl $bitflags {$(
            $crate::bitflags_masks!(@$(#[doc = $doc])? pub const $mask = $($flag)|*;);
        )*}
    };
}
pub use bitflags_masks;

/// A macro for testing created flags, whether all bits up to `$nbits` are defined
/// and if all bitflags are a single bit-flags.
#[macro_export]
macro_rules! test_bitflags_all_bits_defined_no_masks {
    ($ty:ty, $nbits:expr) => {{
        type BITS = <$ty as bitflags::Flags>::Bits;
        let flags = <$ty as bitflags::Flags>::FLAGS;
        let mut last = 0;
        for f in flags.into_iter() {
            let bits = f.value().bits();
            assert!(bits == 0 || bits.is_power_of_two(), "{} is not a single bit", f.name());
            assert!(bits >= last);
            last = bits;
        }
        let all: BITS = 1;
        let all = all.checked_shl($nbits - 1).expect("overflowed");
        let all = all | (all - 1);
        assert_eq!(<$ty>::all().bits(), all);
        for bit in 0..$nbits {
            assert_eq!(<$ty>::from_bits_truncate(1 << bit).bits(), 1 << bit);
        }
    }};
}
pub use test_bitflags_all_bits_defined_no_masks;
