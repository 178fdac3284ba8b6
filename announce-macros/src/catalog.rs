use crate::utils::{field_topic_name, strip_topic_attrs};
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use std::collections::HashSet;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, LitStr, Result, Token, parse::Parse, parse::ParseStream};

/// #[catalog] 宏实现
/// - 仅支持具名字段结构体；每个字段声明一个主题，字段类型即载荷类型
/// - 为结构体生成同名大写的 `Topic<T>` 关联常量，并实现 `::announce::Catalog`
/// - 字段可用 `#[topic(name = "...")]` 覆写主题名；结构体可用 `#[catalog(prefix = "...")]`
///   为全部主题名追加前缀
/// - 结构体仅作为声明存在，不会被构造，追加 `#[allow(dead_code)]`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> Result<TokenStream> {
    let cfg: CatalogAttrConfig = syn::parse2(attr)?;
    let input: Item = syn::parse2(item)?;

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return Err(syn::Error::new(
                other.span(),
                "#[catalog] can only be used on struct",
            ));
        }
    };

    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return Err(syn::Error::new(
                st.span(),
                "#[catalog] only supports named-field struct",
            ));
        }
    };

    let prefix = cfg.prefix.map(|p| p.value()).unwrap_or_default();
    let mut seen = HashSet::<String>::new();
    let mut consts = Vec::new();
    let mut names = Vec::new();

    for field in fields_named.named.iter_mut() {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };

        let name = format!("{prefix}{}", field_topic_name(field)?);
        if !seen.insert(name.clone()) {
            return Err(syn::Error::new(
                field.span(),
                format!("duplicate topic name '{name}' in catalog"),
            ));
        }

        let const_ident = format_ident!(
            "{}",
            ident.unraw().to_string().to_uppercase(),
            span = ident.span()
        );
        let ty = &field.ty;
        let vis = &st.vis;
        let doc = format!("Topic `{name}`");
        let lit = LitStr::new(&name, Span::call_site());

        consts.push(quote! {
            #[doc = #doc]
            #vis const #const_ident: ::announce::Topic<#ty> = ::announce::Topic::new(#lit);
        });
        names.push(lit);

        strip_topic_attrs(&mut field.attrs);
    }

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    Ok(quote! {
        #[allow(dead_code)]
        #st

        impl #impl_generics #ident #ty_generics #where_clause {
            #(#consts)*
        }

        impl #impl_generics ::announce::Catalog for #ident #ty_generics #where_clause {
            const TOPICS: &'static [&'static str] = &[#(#names),*];
        }
    })
}

// -------- parsing --------

struct CatalogAttrConfig {
    prefix: Option<LitStr>,
}

impl Parse for CatalogAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.is_empty() {
            return Ok(Self { prefix: None });
        }

        let mut prefix: Option<LitStr> = None;
        let pairs: Punctuated<CatalogAttrElem, Token![,]> = Punctuated::parse_terminated(input)?;

        for elem in pairs {
            match elem {
                CatalogAttrElem::Prefix(lit) => {
                    if prefix.is_some() {
                        return Err(syn::Error::new(
                            lit.span(),
                            "duplicate key 'prefix' in attribute",
                        ));
                    }
                    prefix = Some(lit);
                }
            }
        }
        Ok(Self { prefix })
    }
}

enum CatalogAttrElem {
    Prefix(LitStr),
}

impl Parse for CatalogAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        if key == "prefix" {
            let _eq: Token![=] = input.parse()?;
            Ok(Self::Prefix(input.parse()?))
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'prefix'",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_str(attr: TokenStream, item: TokenStream) -> std::result::Result<String, String> {
        expand(attr, item)
            .map(|ts| ts.to_string().replace(' ', ""))
            .map_err(|e| e.to_string())
    }

    #[test]
    fn generates_consts_and_catalog() {
        let out = expand_str(
            quote! {},
            quote! {
                pub struct AppTopics {
                    number: i32,
                    #[topic(name = "user.created")]
                    user_created: String,
                }
            },
        )
        .unwrap();

        assert!(out.contains("pubconstNUMBER:::announce::Topic<i32>"));
        assert!(out.contains("pubconstUSER_CREATED:::announce::Topic<String>"));
        assert!(out.contains("\"user.created\""));
        assert!(out.contains("::announce::CatalogforAppTopics"));
        assert!(!out.contains("#[topic"));
    }

    #[test]
    fn prefix_applies_to_every_topic() {
        let out = expand_str(
            quote! { prefix = "app." },
            quote! {
                struct T {
                    ready: (),
                    #[topic(name = "done")]
                    finished: (),
                }
            },
        )
        .unwrap();

        assert!(out.contains("\"app.ready\""));
        assert!(out.contains("\"app.done\""));
    }

    #[test]
    fn rejects_non_struct_items() {
        let err = expand_str(quote! {}, quote! { enum E { A } }).unwrap_err();
        assert!(err.contains("only be used on struct"));

        let err = expand_str(quote! {}, quote! { struct T(i32); }).unwrap_err();
        assert!(err.contains("named-field struct"));
    }

    #[test]
    fn rejects_duplicate_topic_names() {
        let err = expand_str(
            quote! {},
            quote! {
                struct T {
                    a: i32,
                    #[topic(name = "a")]
                    b: i32,
                }
            },
        )
        .unwrap_err();
        assert!(err.contains("duplicate topic name 'a'"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = expand_str(quote! { suffix = "x" }, quote! { struct T { a: () } }).unwrap_err();
        assert!(err.contains("expected 'prefix'"));

        let err = expand_str(
            quote! {},
            quote! {
                struct T {
                    #[topic(rename = "b")]
                    a: (),
                }
            },
        )
        .unwrap_err();
        assert!(err.contains("expected 'name'"));
    }
}
