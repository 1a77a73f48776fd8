//! Value adaptation between raw request encodings and canonical types.

pub mod conversions;

pub use conversions::{coerce, coerce_sex, coerce_yes_no, to_categorical, to_numeric};
