use syn::{Expr, Ident, LitStr, Type};

pub struct Options {
    pub hooks: bool,
    pub decode: bool,
    pub encode: bool,
}

/// How a field's value gets from the wire into the struct and back.
pub enum Strategy {
    Plain,
    Lossy,
    RawString,
    Transform(Expr),
}

/// Where a field's value comes from when it is missing or fails to decode.
pub enum Fallback {
    DefaultTrait,
    Value(Expr),
}

pub struct FieldPlan {
    pub ident: Ident,
    pub ty: Type,
    pub keys: Vec<LitStr>,
    pub ignored: bool,
    pub strategy: Strategy,
    pub fallback: Option<Fallback>,
}

pub struct Names {
    pub decode_repr: Ident,
    pub encode_repr: Ident,
}

pub struct FieldTokenStreams {
    pub decode_fields: Vec<proc_macro2::TokenStream>,
    pub encode_fields: Vec<proc_macro2::TokenStream>,
    pub helpers: proc_macro2::TokenStream,
}
