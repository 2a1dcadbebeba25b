#![warn(clippy::pedantic)]

mod datatypes;
mod state_machine;
mod states;
mod util;

use syn::parse_macro_input;

/// Implement `serde::Serialize` and `serde::Deserialize` for a struct, with
/// per-field coding keys, transformers, defaults and lossy collections.
///
/// The struct must have named fields and no generic parameters. Its own
/// definition is left untouched apart from the field attributes below, which
/// are consumed by this macro.
///
///
/// Field attributes:
/// - `#[coding_key("key", "alias", ...)]` encodes the field under `key` and
///   decodes it from any of the listed keys
/// - `#[coding_ignored]` never encodes the field and decodes it as
///   `Default::default()`
/// - `#[lossy]` decodes a `Vec`, `HashMap` or `BTreeMap` (optionally wrapped in
///   `Option`) while dropping elements or entries that fail to decode
/// - `#[raw_string]` reads the field from a string containing its JSON form
///   and writes it back the same way
/// - `#[transform(expr)]` runs the wire value through the transformer `expr`,
///   whose output type is the field's type. Encoding uses the reverse
///   direction, so `expr` must be a `BidirectionalTransformer` unless the
///   struct is `decode_only`
/// - `#[default_on_failure]` or `#[default_on_failure(expr)]` substitutes
///   `Default::default()` or `expr` when the key is missing or its value does
///   not decode
///
/// Only one of `lossy`, `raw_string` and `transform` can be used per field.
/// Fields that go through a transformer or a default need to be `Clone`.
/// `Option` fields are decoded as `None` when their key is missing and are not
/// encoded when they are `None`.
///
///
/// Struct options, given as `#[codable(...)]`:
/// - `hooks` calls `transcodable::CodingHooks::did_decode` after decoding and
///   `transcodable::CodingHooks::will_encode` before encoding
/// - `decode_only` only implements `Deserialize`
/// - `encode_only` only implements `Serialize`
///
/// The generated code refers to the runtime as `::transcodable`, so the crate
/// using this macro has to depend on it under that name.
#[proc_macro_attribute]
pub fn codable(
    args: proc_macro::TokenStream,
    input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    state_machine::run(parse_macro_input!(args), parse_macro_input!(input)).into()
}
