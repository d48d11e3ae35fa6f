/*++

Licensed under the Apache-2.0 license.

File Name:

    error.rs

Abstract:

    File contains API and macros used by the library for error handling

--*/

/// Driver component, reported in the top byte of an error code
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DriverComponent {
    /// Secure Memory Zone
    Smz = 1,
}

/// Defines a driver error enum whose `code()` packs the component into the
/// top byte and the variant into the low bits.
#[macro_export]
macro_rules! driver_err_def {
    ($comp_name:ident, $enum_name: ident { $($(#[$meta:meta])* $field_name: ident = $field_val: literal,)* }) => {

        #[derive(Debug, Copy, Clone, Eq, PartialEq)]
        pub enum $enum_name {
            $($(#[$meta])* $field_name = $field_val,)*
        }

        impl $enum_name {
            pub const fn code(self) -> u32 {
                (($crate::DriverComponent::$comp_name as u32) << 24) | (self as u32)
            }
        }

        impl From<$enum_name> for u32 {
            fn from(err: $enum_name) -> u32 {
                err.code()
            }
        }
    };
}
