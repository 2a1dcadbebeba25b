//! Composable value transformers and lossy collection decoding for serde.
//!
//! The building blocks are:
//! - [`Transformer`] and [`BidirectionalTransformer`], fallible mappings
//!   that operate on `Result`s so failures flow through a pipeline,
//! - combinators ([`Chain`], [`Reversed`], [`Paired`], [`Conditionally`],
//!   [`Wrapped`], [`Optional`]) and built-ins ([`Identity`],
//!   [`DefaultOnFailure`], [`RawString`], [`IntegerToBoolean`], [`KeyPath`]),
//! - [`lossy`] collection decoders that skip invalid elements,
//! - the [`codable`] attribute, which wires all of the above into
//!   `serde::Serialize` and `serde::Deserialize` for a struct.
//!
//! ```
//! use transcodable::{codable, IntegerToBoolean};
//!
//! #[codable]
//! #[derive(Debug, PartialEq)]
//! struct Account {
//!     #[coding_key("user_name", "userName")]
//!     name: String,
//!     #[transform(IntegerToBoolean)]
//!     active: bool,
//!     #[lossy]
//!     roles: Vec<String>,
//! }
//!
//! let account: Account =
//!     serde_json::from_str(r#"{"userName": "ada", "active": 1, "roles": ["admin", 7]}"#)
//!         .unwrap();
//! assert_eq!(account.roles, vec!["admin".to_string()]);
//! assert_eq!(
//!     serde_json::to_string(&account).unwrap(),
//!     r#"{"user_name":"ada","active":1,"roles":["admin"]}"#
//! );
//! ```

// Constructors and trait impls for transformers that only hold a
// `PhantomData`, without the bounds `derive` would add.
macro_rules! marker_impls {
    ($($name:ident),* $(,)?) => {$(
        impl<T> $name<T> {
            pub fn new() -> Self {
                Self(core::marker::PhantomData)
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                Self::new()
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> core::fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(stringify!($name))
            }
        }
    )*};
}

pub mod codec;
pub mod error;
pub mod lossy;
pub mod transform;

pub use {
    error::{Error, Result},
    transcodable_derive::*,
    transform::*,
};

/// Lifecycle hooks run by `#[codable(hooks)]` types.
///
/// Both methods default to doing nothing, so an empty `impl` is enough to
/// opt in. Returning an error aborts the surrounding decode or encode.
pub trait CodingHooks {
    /// Called once all fields have been decoded.
    fn did_decode(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called before any field is encoded.
    fn will_encode(&self) -> Result<()> {
        Ok(())
    }
}

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
