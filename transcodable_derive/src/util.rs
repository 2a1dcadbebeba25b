use crate::datatypes::{Fallback, FieldPlan, FieldTokenStreams, Names, Options, Strategy};
use proc_macro2::Span;
use quote::quote;
use syn::{
    punctuated::Punctuated, Attribute, Expr, Field, Ident, LitStr, Meta, NestedMeta, Token, Type,
};

const KEY_ATTR: &str = "coding_key";
const IGNORED_ATTR: &str = "coding_ignored";
const LOSSY_ATTR: &str = "lossy";
const RAW_STRING_ATTR: &str = "raw_string";
const TRANSFORM_ATTR: &str = "transform";
const DEFAULT_ATTR: &str = "default_on_failure";

const FIELD_ATTRS: &[&str] = &[
    KEY_ATTR,
    IGNORED_ATTR,
    LOSSY_ATTR,
    RAW_STRING_ATTR,
    TRANSFORM_ATTR,
    DEFAULT_ATTR,
];

pub fn parse_options(args: &[NestedMeta]) -> syn::Result<Options> {
    let mut options = Options {
        hooks: false,
        decode: true,
        encode: true,
    };

    for arg in args {
        match arg {
            NestedMeta::Meta(Meta::Path(path)) if path.is_ident("hooks") => options.hooks = true,
            NestedMeta::Meta(Meta::Path(path)) if path.is_ident("decode_only") => {
                options.encode = false
            }
            NestedMeta::Meta(Meta::Path(path)) if path.is_ident("encode_only") => {
                options.decode = false
            }
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "unknown option, expected `hooks`, `decode_only` or `encode_only`",
                ))
            }
        }
    }

    if !options.decode && !options.encode {
        return Err(syn::Error::new(
            Span::call_site(),
            "`decode_only` and `encode_only` can not be combined",
        ));
    }

    Ok(options)
}

pub fn derive_names(input: &Ident) -> Names {
    let span = input.span();
    let name = input.to_string();
    let name = name.trim_start_matches("r#");
    Names {
        decode_repr: Ident::new(&format!("__{}Decode", name), span),
        encode_repr: Ident::new(&format!("__{}Encode", name), span),
    }
}

fn is_field_attr(attr: &Attribute) -> bool {
    FIELD_ATTRS.iter().any(|name| attr.path.is_ident(name))
}

fn expect_no_args(attr: &Attribute, name: &str) -> syn::Result<()> {
    if attr.tokens.is_empty() {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            &attr.tokens,
            format!("#[{}] takes no arguments", name),
        ))
    }
}

fn set_strategy(plan: &mut FieldPlan, strategy: Strategy, attr: &Attribute) -> syn::Result<()> {
    if let Strategy::Plain = plan.strategy {
        plan.strategy = strategy;
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            attr,
            "only one of #[lossy], #[raw_string] and #[transform(...)] may be used on a field",
        ))
    }
}

/// Read the field attributes this macro understands and remove them from
/// `field`, so the struct can be emitted without them.
pub fn plan_field(field: &mut Field) -> syn::Result<FieldPlan> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new_spanned(&field.ty, "field has no name"))?;

    let mut plan = FieldPlan {
        ident,
        ty: field.ty.clone(),
        keys: Vec::new(),
        ignored: false,
        strategy: Strategy::Plain,
        fallback: None,
    };

    let (ours, theirs): (Vec<Attribute>, Vec<Attribute>) =
        field.attrs.drain(..).partition(is_field_attr);
    field.attrs = theirs;

    if let Some(cfg) = field.attrs.iter().find(|attr| attr.path.is_ident("cfg")) {
        return Err(syn::Error::new_spanned(
            cfg,
            "fields of a #[codable] struct may not use #[cfg(...)]",
        ));
    }

    for attr in &ours {
        if attr.path.is_ident(KEY_ATTR) {
            if !plan.keys.is_empty() {
                return Err(syn::Error::new_spanned(attr, "duplicate #[coding_key]"));
            }
            let keys = attr.parse_args_with(Punctuated::<LitStr, Token![,]>::parse_terminated)?;
            if keys.is_empty() {
                return Err(syn::Error::new_spanned(
                    attr,
                    "#[coding_key] needs at least one key",
                ));
            }
            plan.keys = keys.into_iter().collect();
        } else if attr.path.is_ident(IGNORED_ATTR) {
            expect_no_args(attr, IGNORED_ATTR)?;
            plan.ignored = true;
        } else if attr.path.is_ident(LOSSY_ATTR) {
            expect_no_args(attr, LOSSY_ATTR)?;
            set_strategy(&mut plan, Strategy::Lossy, attr)?;
        } else if attr.path.is_ident(RAW_STRING_ATTR) {
            expect_no_args(attr, RAW_STRING_ATTR)?;
            set_strategy(&mut plan, Strategy::RawString, attr)?;
        } else if attr.path.is_ident(TRANSFORM_ATTR) {
            let transformer = attr.parse_args::<Expr>()?;
            set_strategy(&mut plan, Strategy::Transform(transformer), attr)?;
        } else if attr.path.is_ident(DEFAULT_ATTR) {
            if plan.fallback.is_some() {
                return Err(syn::Error::new_spanned(attr, "duplicate #[default_on_failure]"));
            }
            plan.fallback = Some(if attr.tokens.is_empty() {
                Fallback::DefaultTrait
            } else {
                Fallback::Value(attr.parse_args::<Expr>()?)
            });
        }
    }

    if plan.ignored && ours.len() > 1 {
        return Err(syn::Error::new_spanned(
            &plan.ident,
            "#[coding_ignored] can not be combined with other field attributes",
        ));
    }

    Ok(plan)
}

pub fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .map_or(false, |segment| segment.ident == "Option"),
        Type::Group(group) => is_option(&group.elem),
        Type::Paren(paren) => is_option(&paren.elem),
        _ => false,
    }
}

fn helper_ident(prefix: &str, field: &Ident) -> Ident {
    let name = field.to_string();
    let name = name.trim_start_matches("r#");
    Ident::new(&format!("__{}_{}", prefix, name), field.span())
}

fn helper_path(ident: &Ident) -> LitStr {
    LitStr::new(&ident.to_string(), ident.span())
}

/// Build the decode shadow field for `plan`, pushing any helper functions it
/// needs into `helpers`.
pub fn quote_decode_field(
    plan: &FieldPlan,
    helpers: &mut proc_macro2::TokenStream,
) -> proc_macro2::TokenStream {
    let FieldPlan { ident, ty, .. } = plan;

    if plan.ignored {
        return quote! {
            #[serde(skip)]
            #ident: #ty
        };
    }

    let mut serde_args = Vec::new();

    if let Some((primary, aliases)) = plan.keys.split_first() {
        serde_args.push(quote! { rename = #primary });
        for alias in aliases {
            serde_args.push(quote! { alias = #alias });
        }
    }

    let default_arg = match &plan.fallback {
        Some(fallback) => {
            let default_fn = helper_ident("default", ident);
            let value = match fallback {
                Fallback::DefaultTrait => quote! { ::core::default::Default::default() },
                Fallback::Value(expr) => quote! { #expr },
            };
            helpers.extend(quote! {
                fn #default_fn() -> #ty {
                    #value
                }
            });
            let path = helper_path(&default_fn);
            serde_args.push(quote! { default = #path });
            quote! { ::core::option::Option::Some(#default_fn()) }
        }
        None => {
            if is_option(ty) {
                serde_args.push(quote! { default });
            }
            quote! { ::core::option::Option::None }
        }
    };

    let decode = match (&plan.strategy, plan.fallback.is_some()) {
        (Strategy::Plain, false) => None,
        (Strategy::Plain, true) => Some(quote! {
            ::transcodable::codec::decode_field(
                deserializer,
                ::transcodable::Identity::<#ty>::new(),
                #default_arg,
            )
        }),
        (Strategy::Lossy, false) => Some(quote! {
            ::transcodable::lossy::deserialize(deserializer)
        }),
        (Strategy::Lossy, true) => Some(quote! {
            ::transcodable::codec::decode_lossy_field(deserializer, #default_arg)
        }),
        (Strategy::RawString, _) => Some(quote! {
            ::transcodable::codec::decode_field(
                deserializer,
                ::transcodable::RawString::<#ty>::new(),
                #default_arg,
            )
        }),
        (Strategy::Transform(transformer), _) => Some(quote! {
            ::transcodable::codec::decode_field(deserializer, #transformer, #default_arg)
        }),
    };

    if let Some(decode) = decode {
        let decode_fn = helper_ident("decode", ident);
        helpers.extend(quote! {
            fn #decode_fn<'de, D>(deserializer: D) -> ::core::result::Result<#ty, D::Error>
            where
                D: ::transcodable::__private::serde::Deserializer<'de>,
            {
                #decode
            }
        });
        let path = helper_path(&decode_fn);
        serde_args.push(quote! { deserialize_with = #path });
    }

    if serde_args.is_empty() {
        quote! { #ident: #ty }
    } else {
        quote! {
            #[serde(#(#serde_args),*)]
            #ident: #ty
        }
    }
}

/// Build the encode shadow field for `plan`, which borrows from the struct
/// being encoded. Ignored fields have none.
pub fn quote_encode_field(
    plan: &FieldPlan,
    helpers: &mut proc_macro2::TokenStream,
) -> Option<proc_macro2::TokenStream> {
    let FieldPlan { ident, ty, .. } = plan;

    if plan.ignored {
        return None;
    }

    let mut serde_args = Vec::new();

    if let Some(primary) = plan.keys.first() {
        serde_args.push(quote! { rename = #primary });
    }

    let transformer = match &plan.strategy {
        Strategy::RawString => Some(quote! { ::transcodable::RawString::<#ty>::new() }),
        Strategy::Transform(transformer) => Some(quote! { #transformer }),
        Strategy::Plain | Strategy::Lossy => None,
    };

    if let Some(transformer) = transformer {
        let encode_fn = helper_ident("encode", ident);
        helpers.extend(quote! {
            fn #encode_fn<S>(value: &&#ty, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: ::transcodable::__private::serde::Serializer,
            {
                ::transcodable::codec::encode_field(*value, #transformer, serializer)
            }
        });
        let path = helper_path(&encode_fn);
        serde_args.push(quote! { serialize_with = #path });
    }

    // a missing key decodes to `None`, so `None` must encode as a missing key
    if is_option(ty) {
        let is_none_fn = helper_ident("is_none", ident);
        helpers.extend(quote! {
            fn #is_none_fn(value: &&#ty) -> bool {
                value.is_none()
            }
        });
        let path = helper_path(&is_none_fn);
        serde_args.push(quote! { skip_serializing_if = #path });
    }

    Some(if serde_args.is_empty() {
        quote! { #ident: &'a #ty }
    } else {
        quote! {
            #[serde(#(#serde_args),*)]
            #ident: &'a #ty
        }
    })
}

pub fn quote_fields(plans: &[FieldPlan], options: &Options) -> FieldTokenStreams {
    let mut helpers = proc_macro2::TokenStream::new();
    let mut decode_fields = Vec::new();
    let mut encode_fields = Vec::new();

    for plan in plans {
        if options.decode {
            decode_fields.push(quote_decode_field(plan, &mut helpers));
        }
        if options.encode {
            encode_fields.extend(quote_encode_field(plan, &mut helpers));
        }
    }

    FieldTokenStreams {
        decode_fields,
        encode_fields,
        helpers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadow_names_strip_raw_prefix() {
        let raw: Ident = syn::parse_str("r#Match").unwrap();
        let names = derive_names(&raw);
        assert_eq!(names.decode_repr.to_string(), "__MatchDecode");
        assert_eq!(names.encode_repr.to_string(), "__MatchEncode");
    }

    #[test]
    fn optional_transformed_fields_skip_none() {
        let tokens = quote! {
            #[transform(IntegerToBoolean.optional())]
            flag: Option<bool>
        };
        let mut field = syn::parse::Parser::parse2(Field::parse_named, tokens).unwrap();
        let plan = plan_field(&mut field).unwrap();
        let mut helpers = proc_macro2::TokenStream::new();
        let encoded = quote_encode_field(&plan, &mut helpers).unwrap().to_string();
        assert!(encoded.contains("serialize_with"), "{}", encoded);
        assert!(encoded.contains("skip_serializing_if"), "{}", encoded);
        assert!(helpers.to_string().contains("__is_none_flag"));
    }
}
