use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{FnArg, ImplItem, ImplItemFn, ItemImpl, LitStr, Type, spanned::Spanned};

const MARKER: &str = "event_handler";

/// 一个被 `#[event_handler]` 标记的方法
struct MarkedHandler {
    method: syn::Ident,
    event_ty: Type,
}

/// 展开 `#[event_subscriber]`：收集 impl 块内全部 `#[event_handler]` 方法，
/// 生成 `EventSubscriber::subscriptions` 的静态注册表
pub(crate) fn expand(mut item: ItemImpl) -> syn::Result<TokenStream> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new(
            path.span(),
            "#[event_subscriber] must be placed on an inherent impl block",
        ));
    }

    let mut handlers = Vec::new();
    for impl_item in &mut item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };

        let before = method.attrs.len();
        method.attrs.retain(|a| !a.path().is_ident(MARKER));
        match before - method.attrs.len() {
            0 => continue,
            1 => handlers.push(inspect(method)?),
            _ => {
                return Err(syn::Error::new(
                    method.sig.ident.span(),
                    "duplicate #[event_handler] on the same method",
                ));
            }
        }
    }

    let self_ty = &item.self_ty;
    let type_label = self_ty.to_token_stream().to_string().replace(' ', "");
    let (impl_generics, _, where_clause) = item.generics.split_for_impl();

    let registrations = handlers.iter().map(|h| {
        let method = &h.method;
        let event_ty = &h.event_ty;
        let id = LitStr::new(&format!("{type_label}::{method}"), method.span());

        quote! {
            ::schulportal_domain::eventing::HandlerRegistration::new::<#event_ty, Self, _, _>(
                ::std::sync::Arc::clone(&_this),
                #id,
                |this: ::std::sync::Arc<Self>, event: ::std::sync::Arc<#event_ty>| async move {
                    this.#method(&event).await
                },
            )
        }
    });

    Ok(quote! {
        #item

        impl #impl_generics ::schulportal_domain::eventing::EventSubscriber
            for #self_ty #where_clause
        {
            fn subscriptions(
                self: ::std::sync::Arc<Self>,
            ) -> ::std::vec::Vec<::schulportal_domain::eventing::HandlerRegistration> {
                let _this = self;
                ::std::vec![ #( #registrations ),* ]
            }
        }
    })
}

// 校验签名：`async fn name(&self, event: &E) -> anyhow::Result<()>`
fn inspect(method: &ImplItemFn) -> syn::Result<MarkedHandler> {
    let sig = &method.sig;

    if sig.asyncness.is_none() {
        return Err(syn::Error::new(
            sig.fn_token.span(),
            "#[event_handler] methods must be async",
        ));
    }

    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(r)) if r.reference.is_some() && r.mutability.is_none() => {}
        _ => {
            return Err(syn::Error::new(
                sig.inputs.span(),
                "#[event_handler] methods must take `&self`",
            ));
        }
    }

    let event_ty = match (inputs.next(), inputs.next()) {
        (Some(FnArg::Typed(arg)), None) => match arg.ty.as_ref() {
            Type::Reference(r) if r.mutability.is_none() => r.elem.as_ref().clone(),
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "the event parameter must be a shared reference like `&PersonDeletedEvent`",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                sig.inputs.span(),
                "#[event_handler] methods take exactly one event parameter besides `&self`",
            ));
        }
    };

    Ok(MarkedHandler {
        method: sig.ident.clone(),
        event_ty,
    })
}
