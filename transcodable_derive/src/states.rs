use crate::datatypes::{FieldPlan, FieldTokenStreams, Names, Options};
use syn::{AttributeArgs, ItemStruct};

pub trait Intermediate {
    type Output;
    fn next(self) -> syn::Result<Self::Output>;
}

pub trait Absorbing {
    fn finish(self) -> syn::Result<proc_macro2::TokenStream>;
}

impl<S: Intermediate> Absorbing for S
where
    S::Output: Absorbing,
{
    fn finish(self) -> syn::Result<proc_macro2::TokenStream> {
        self.next()?.finish()
    }
}

pub struct Init {
    pub args: AttributeArgs,
    pub input: ItemStruct,
}

pub struct ParseOptions {
    pub input: ItemStruct,
    pub options: Options,
    pub names: Names,
}

pub struct PlanFields {
    pub input: ItemStruct,
    pub options: Options,
    pub names: Names,
    pub fields: Vec<FieldPlan>,
}

pub struct QuoteFields {
    pub input: ItemStruct,
    pub options: Options,
    pub names: Names,
    pub idents: Vec<syn::Ident>,
    pub encoded: Vec<syn::Ident>,
    pub fields: FieldTokenStreams,
}
