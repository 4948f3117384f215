#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the Customer Hub crates.
//!
//! * [`chub_error`] turns an enum into a `thiserror` error with context support.
//! * [`chub_slice`] turns a struct into an `Arc`-backed feature slice handle.
//! * [`api_model`] and [`api_handler`] keep DTOs and handlers consistent with the
//!   `OpenAPI` document.
//!
//! Examples are `ignore`d because the generated code references crates that are not
//! dependencies of this proc-macro crate.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Defines a crate-level error enum.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<Name>Ext` trait with `.context(...)` for `Result<T, Name>` and for
///   `Result<T, Source>` of every variant that wraps a source error.
/// * `From<Source>` for variants carrying a `source` (or `#[source]`/`#[from]`) field.
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper for use inside `#[error(...)]` strings.
///
/// Variants must have named fields. Variants with a source must also have a
/// `context: Option<Cow<'static, str>>` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[chub_derive::chub_error]
/// pub enum StoreError {
///     #[error("Database error{}: {source}", format_context(.context))]
///     Database { source: chub_database::DatabaseError, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn chub_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}

/// Turns a struct into a feature slice handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` wraps it in an `Arc`,
/// derefs to it and implements `chub_kernel::domain::registry::FeatureSlice`.
///
/// ```rust,ignore
/// #[chub_derive::chub_slice]
/// pub struct Customers {
///     pub service: CustomerService,
/// }
///
/// let slice = Customers::new(CustomersInner { service });
/// ```
#[proc_macro_attribute]
pub fn chub_slice(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand(input).into()
}

/// Declares an API data model.
///
/// Adds `Debug`, `Serialize` and `Deserialize` when missing, derives `utoipa::ToSchema`
/// under the `server` feature, applies `rename_all = "camelCase"` and
/// `deny_unknown_fields`.
///
/// # Arguments
///
/// * `rename_all = "..."` overrides the rename policy.
/// * `deny_unknown_fields = false` accepts unknown fields.
///
/// ```rust,ignore
/// #[api_model(deny_unknown_fields = false)]
/// pub struct CustomerPayload {
///     pub customer_id: Option<i32>,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_model(args.into(), input).into()
}

/// Registers an Axum handler with the `OpenAPI` document.
///
/// Accepts the same arguments as `utoipa::path` and applies them when the consuming
/// crate enables its `server` feature.
///
/// ```rust,ignore
/// #[api_handler(get, path = "/health", responses((status = OK, body = HealthResponse)))]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_handler(args.into(), input).into()
}
