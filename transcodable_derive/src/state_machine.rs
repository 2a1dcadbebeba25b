use crate::datatypes::{FieldTokenStreams, Names, Options};
use crate::states::{Absorbing, Init, Intermediate, ParseOptions, PlanFields, QuoteFields};
use quote::quote;
use syn::{AttributeArgs, ItemStruct, LitStr};

use crate::util::{derive_names, parse_options, plan_field, quote_fields};

pub fn run(args: AttributeArgs, input: ItemStruct) -> proc_macro2::TokenStream {
    Init { args, input }
        .finish()
        .unwrap_or_else(|err| err.to_compile_error())
}

impl Intermediate for Init {
    type Output = ParseOptions;
    fn next(self) -> syn::Result<Self::Output> {
        if !self.input.generics.params.is_empty() || self.input.generics.where_clause.is_some() {
            return Err(syn::Error::new_spanned(
                &self.input.generics,
                "#[codable] does not support generic structs",
            ));
        }
        if !matches!(self.input.fields, syn::Fields::Named(_)) {
            return Err(syn::Error::new_spanned(
                &self.input.ident,
                "#[codable] requires a struct with named fields",
            ));
        }

        Ok(ParseOptions {
            options: parse_options(&self.args)?,
            names: derive_names(&self.input.ident),
            input: self.input,
        })
    }
}

impl Intermediate for ParseOptions {
    type Output = PlanFields;
    fn next(mut self) -> syn::Result<Self::Output> {
        let fields = self
            .input
            .fields
            .iter_mut()
            .map(plan_field)
            .collect::<syn::Result<Vec<_>>>()?;

        Ok(PlanFields {
            input: self.input,
            options: self.options,
            names: self.names,
            fields,
        })
    }
}

impl Intermediate for PlanFields {
    type Output = QuoteFields;
    fn next(self) -> syn::Result<Self::Output> {
        let fields = quote_fields(&self.fields, &self.options);
        let encoded = self
            .fields
            .iter()
            .filter(|plan| !plan.ignored)
            .map(|plan| plan.ident.clone())
            .collect();
        let idents = self.fields.into_iter().map(|plan| plan.ident).collect();

        Ok(QuoteFields {
            input: self.input,
            options: self.options,
            names: self.names,
            idents,
            encoded,
            fields,
        })
    }
}

impl Absorbing for QuoteFields {
    fn finish(self) -> syn::Result<proc_macro2::TokenStream> {
        let QuoteFields {
            input,
            options:
                Options {
                    hooks,
                    decode,
                    encode,
                },
            names:
                Names {
                    decode_repr,
                    encode_repr,
                },
            idents,
            encoded,
            fields:
                FieldTokenStreams {
                    decode_fields,
                    encode_fields,
                    helpers,
                },
        } = self;

        let ident = &input.ident;
        let name = ident.to_string();
        let serde_name = LitStr::new(name.trim_start_matches("r#"), ident.span());

        let decode_impl = if decode {
            let did_decode = if hooks {
                quote! {
                    ::transcodable::CodingHooks::did_decode(&mut __value).map_err(
                        <__D::Error as ::transcodable::__private::serde::de::Error>::custom,
                    )?;
                }
            } else {
                proc_macro2::TokenStream::new()
            };
            let mutability = if hooks { quote! { mut } } else { quote! {} };

            quote! {
                #[derive(::transcodable::__private::serde::Deserialize)]
                #[serde(crate = "::transcodable::__private::serde", rename = #serde_name)]
                struct #decode_repr {
                    #(#decode_fields,)*
                }

                impl<'de> ::transcodable::__private::serde::Deserialize<'de> for #ident {
                    fn deserialize<__D>(deserializer: __D) -> ::core::result::Result<Self, __D::Error>
                    where
                        __D: ::transcodable::__private::serde::Deserializer<'de>,
                    {
                        let #decode_repr { #(#idents),* } =
                            <#decode_repr as ::transcodable::__private::serde::Deserialize<'de>>::deserialize(
                                deserializer,
                            )?;
                        let #mutability __value = Self { #(#idents),* };
                        #did_decode
                        ::core::result::Result::Ok(__value)
                    }
                }
            }
        } else {
            proc_macro2::TokenStream::new()
        };

        let encode_impl = if encode {
            let will_encode = if hooks {
                quote! {
                    ::transcodable::CodingHooks::will_encode(self).map_err(
                        <__S::Error as ::transcodable::__private::serde::ser::Error>::custom,
                    )?;
                }
            } else {
                proc_macro2::TokenStream::new()
            };
            quote! {
                #[derive(::transcodable::__private::serde::Serialize)]
                #[serde(crate = "::transcodable::__private::serde", rename = #serde_name)]
                struct #encode_repr<'a> {
                    #(#encode_fields,)*
                    #[serde(skip)]
                    #[allow(dead_code)]
                    __marker: ::core::marker::PhantomData<&'a ()>,
                }

                impl ::transcodable::__private::serde::Serialize for #ident {
                    fn serialize<__S>(&self, serializer: __S) -> ::core::result::Result<__S::Ok, __S::Error>
                    where
                        __S: ::transcodable::__private::serde::Serializer,
                    {
                        #will_encode
                        let repr = #encode_repr {
                            #(#encoded: &self.#encoded,)*
                            __marker: ::core::marker::PhantomData,
                        };
                        ::transcodable::__private::serde::Serialize::serialize(&repr, serializer)
                    }
                }
            }
        } else {
            proc_macro2::TokenStream::new()
        };

        Ok(quote! {
            #input

            const _: () = {
                #helpers

                #decode_impl

                #encode_impl
            };
        })
    }
}
