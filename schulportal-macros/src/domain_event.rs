use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    Fields, Ident, ItemStruct, LitStr, Token,
    parse::{Parse, ParseStream},
    spanned::Spanned,
};

use crate::derive_utils::apply_derives;

/// `#[domain_event(name = "...")]` 的参数
pub(crate) struct DomainEventArgs {
    name: Option<LitStr>,
}

impl Parse for DomainEventArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.is_empty() {
            return Ok(Self { name: None });
        }

        let key: Ident = input.parse()?;
        if key != "name" {
            return Err(syn::Error::new(key.span(), "unknown key; expected 'name'"));
        }
        input.parse::<Token![=]>()?;
        let name: LitStr = input.parse()?;

        if !input.is_empty() {
            input.parse::<Token![,]>()?;
        }
        if !input.is_empty() {
            return Err(input.error("unexpected tokens after 'name = \"...\"'"));
        }

        Ok(Self { name: Some(name) })
    }
}

/// 展开 `#[domain_event]`：补齐事件所需派生并实现 `DomainEvent`
pub(crate) fn expand(args: DomainEventArgs, mut st: ItemStruct) -> syn::Result<TokenStream> {
    if matches!(st.fields, Fields::Unit) {
        return Err(syn::Error::new(
            st.span(),
            "#[domain_event] expects a struct carrying a payload",
        ));
    }
    if !st.generics.params.is_empty() {
        return Err(syn::Error::new(
            st.generics.span(),
            "#[domain_event] does not support generic events; the concrete type is the routing key",
        ));
    }

    apply_derives(
        &mut st.attrs,
        vec![
            syn::parse_quote!(Debug),
            syn::parse_quote!(Clone),
            syn::parse_quote!(PartialEq),
            syn::parse_quote!(::serde::Serialize),
            syn::parse_quote!(::serde::Deserialize),
        ],
    );

    let ident = &st.ident;
    let name = args
        .name
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));

    Ok(quote! {
        #st

        impl ::schulportal_domain::event::DomainEvent for #ident {
            const NAME: &'static str = #name;
        }
    })
}
