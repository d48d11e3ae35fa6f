/*++

Licensed under the Apache-2.0 license.

File Name:

    macros.rs

Abstract:

    Macros used by the project

--*/

/// Declare a fieldless enum with an explicit discriminant type, plus the
/// conversions the emulator needs between the enum and its raw encoding.
///
/// Decoding an unknown raw value fails with the raw value as the error.
#[macro_export]
macro_rules! emu_enum {
    (
        $(#[$($enum_attrs:tt)*])*
        $vis:vis $enum_name:ident;
        $type:ty;
        {
            $(
                $(#[$($attrs:tt)*])*
                $name:ident = $value:literal,
            )*
        }
    ) => {
        $(#[$($enum_attrs)*])*
        $vis enum $enum_name {
            $(
                $(#[$($attrs)*])*
                $name = $value,
            )*
        }

        impl $enum_name {
            /// All variants, in declaration order.
            pub const ALL: &'static [$enum_name] = &[$($enum_name::$name,)*];
        }

        impl From<$enum_name> for $type {
            fn from(val: $enum_name) -> $type {
                match val {
                    $($enum_name::$name => $value,)*
                }
            }
        }

        impl TryFrom<$type> for $enum_name {
            type Error = $type;

            fn try_from(val: $type) -> Result<$enum_name, $type> {
                match val {
                    $($value => Ok($enum_name::$name),)*
                    other => Err(other),
                }
            }
        }

        impl core::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                match self {
                    $($enum_name::$name => f.write_str(stringify!($name)),)*
                }
            }
        }
    };
}
