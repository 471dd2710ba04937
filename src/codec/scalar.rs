//! XSD scalar conversions for attribute values and text content.

use std::fmt::Debug;

/// A value with a single lexical form in attributes and text
pub trait Scalar: Clone + PartialEq + Debug + Default + Send + Sync + 'static {
    /// XSD type name used in conversion errors
    const KIND: &'static str;

    fn parse_scalar(raw: &str) -> Option<Self>;
    fn render_scalar(&self) -> String;
}

impl Scalar for String {
    const KIND: &'static str = "string";

    fn parse_scalar(raw: &str) -> Option<Self> {
        Some(raw.to_owned())
    }

    fn render_scalar(&self) -> String {
        self.clone()
    }
}

impl Scalar for bool {
    const KIND: &'static str = "boolean";

    fn parse_scalar(raw: &str) -> Option<Self> {
        match raw.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }

    fn render_scalar(&self) -> String {
        if *self { "1" } else { "0" }.to_owned()
    }
}

macro_rules! integer_scalars {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: &'static str = $kind;

                fn parse_scalar(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }

                fn render_scalar(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

integer_scalars!(
    i32 => "int",
    i64 => "long",
    u8 => "unsignedByte",
    u32 => "unsignedInt",
    u64 => "unsignedLong",
);

impl Scalar for f64 {
    const KIND: &'static str = "double";

    fn parse_scalar(raw: &str) -> Option<Self> {
        match raw.trim() {
            "INF" => Some(f64::INFINITY),
            "-INF" => Some(f64::NEG_INFINITY),
            "NaN" => Some(f64::NAN),
            // Rust also accepts "inf" and "nan", XSD does not
            other if other.chars().any(|ch| ch.is_ascii_alphabetic() && !matches!(ch, 'e' | 'E')) => {
                None
            }
            other => other.parse().ok(),
        }
    }

    fn render_scalar(&self) -> String {
        if self.is_nan() {
            "NaN".to_owned()
        } else if self.is_infinite() {
            if *self > 0.0 { "INF" } else { "-INF" }.to_owned()
        } else {
            self.to_string()
        }
    }
}
