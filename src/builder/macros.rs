//! Macros for declaring closed state sets.

/// Generate a state enum and its `State` implementation.
///
/// Variants are named after themselves unless a display name is given with
/// `=> "name"`.
///
/// # Example
///
/// ```
/// use switchyard::core::State;
/// use switchyard::state_enum;
///
/// state_enum! {
///     pub enum Light {
///         Green => "green",
///         Yellow => "yellow",
///         Red => "red",
///     }
/// }
///
/// assert_eq!(Light::Red.name(), "red");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(=> $label:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $crate::__state_name!($variant $(, $label)?)),*
                }
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __state_name {
    ($variant:ident) => {
        stringify!($variant)
    };
    ($variant:ident, $label:literal) => {
        $label
    };
}
