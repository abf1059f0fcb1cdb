//! Schulportal 过程宏
//!
//! - `#[entity_id]`：标识符 newtype（`struct PersonId(Uuid);`）的派生与转换实现；
//! - `#[domain_event]`：为事件结构体实现 `DomainEvent`，并补齐所需派生；
//! - `#[event_subscriber]` / `#[event_handler]`：在编译期收集处理器方法，
//!   生成 `EventSubscriber` 的静态注册表，取代运行时反射扫描。
//!
use proc_macro::TokenStream;
use syn::{ItemImpl, ItemStruct, parse_macro_input};

mod derive_utils;
mod domain_event;
mod entity_id;
mod event_subscriber;

/// 实体 ID 宏
///
/// 仅支持单字段 tuple struct。自动派生 `Debug, Clone, Copy, PartialEq, Eq, Hash,
/// PartialOrd, Ord, Serialize, Deserialize`（已有派生会合并去重），并实现
/// `Display`、`FromStr`、`From<Inner>` 与 `value()`。
#[proc_macro_attribute]
pub fn entity_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[entity_id] takes no arguments",
        )
        .to_compile_error()
        .into();
    }
    let st = parse_macro_input!(item as ItemStruct);

    entity_id::expand(st)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// 领域事件宏
///
/// ```ignore
/// #[domain_event(name = "personenkontext.deleted")]
/// pub struct PersonenkontextDeletedEvent { /* ... */ }
/// ```
///
/// 省略 `name` 时使用结构体名。事件的路由键始终是具体类型本身，`name` 仅用于日志与审计。
#[proc_macro_attribute]
pub fn domain_event(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as domain_event::DomainEventArgs);
    let st = parse_macro_input!(item as ItemStruct);

    domain_event::expand(args, st)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// 事件订阅者宏
///
/// 放在组件的 inherent impl 块上，收集所有 `#[event_handler]` 方法：
///
/// ```ignore
/// #[event_subscriber]
/// impl DirectorySync {
///     #[event_handler]
///     async fn on_deleted(&self, event: &PersonenkontextDeletedEvent) -> anyhow::Result<()> {
///         /* ... */
///     }
/// }
/// ```
///
/// 订阅者标识为 `"类型::方法"`；同一组件可对同一事件类型标记多个方法，各自独立订阅。
#[proc_macro_attribute]
pub fn event_subscriber(attr: TokenStream, item: TokenStream) -> TokenStream {
    let _ = attr;
    let item = parse_macro_input!(item as ItemImpl);

    event_subscriber::expand(item)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// 处理器标记；只能出现在 `#[event_subscriber]` 修饰的 impl 块中，由外层宏消费
#[proc_macro_attribute]
pub fn event_handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    let _ = attr;
    let mut out: TokenStream = syn::Error::new(
        proc_macro2::Span::call_site(),
        "#[event_handler] must be used inside an impl block marked #[event_subscriber]",
    )
    .to_compile_error()
    .into();
    out.extend(item);
    out
}
