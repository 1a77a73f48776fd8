//! Macros for field definitions
//!
//! This module provides a macro to reduce boilerplate when declaring the
//! canonical schema.

/// Build a list of canonical field definitions
///
/// Each entry is `name => Type(default)`, optionally followed by
/// `as Coercion`.
///
/// # Example
///
/// ```rust
/// let fields = cardio_risk::canonical_fields![
///     "Age" => Numeric(0),
///     "Sex" => Numeric("Female") as Sex,
///     "st_slope" => Categorical("Up"),
/// ];
/// assert_eq!(fields.len(), 3);
/// ```
#[macro_export]
macro_rules! canonical_fields {
    (@coercion) => {
        $crate::schema::Coercion::None
    };
    (@coercion $coercion:ident) => {
        $crate::schema::Coercion::$coercion
    };
    (
        $(
            $name:literal => $field_type:ident ( $default:expr ) $( as $coercion:ident )?
        ),* $(,)?
    ) => {
        vec![
            $(
                $crate::schema::FieldDefinition::new(
                    $name,
                    $crate::schema::FieldType::$field_type,
                    $default,
                )
                .with_coercion($crate::canonical_fields!(@coercion $( $coercion )?))
            ),*
        ]
    };
}
