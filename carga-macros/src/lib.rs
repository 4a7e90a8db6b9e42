use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{ItemFn, ReturnType};

/// Proc macro to denote a Transaction
///
/// Every call is timed and counted under the function's name in the running scenario's
/// statistics. `Ok` counts as a success, `Err` as an error.
///
/// NOTE: This macro only works on `async` functions (or methods) with a `Result<T, E>` return
/// value.
///
/// # Example
/// ```ignore
/// use carga::prelude::*;
///
/// #[transaction]
/// async fn listar_clientes(client: &reqwest::Client) -> Result<String, reqwest::Error> {
///     ...
/// }
/// ```
#[proc_macro_attribute]
pub fn transaction(attr: TokenStream, item: TokenStream) -> TokenStream {
    transaction_internal(attr.into(), item.into()).into()
}

fn transaction_internal(_attr: TokenStream2, item: TokenStream2) -> TokenStream2 {
    let input = match syn::parse2::<ItemFn>(item) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = input;

    if sig.asyncness.is_none() {
        return syn::Error::new_spanned(sig.fn_token, "#[transaction] requires an async fn")
            .to_compile_error();
    }

    let stmts = &block.stmts;
    let label = sig.ident.to_string();
    let output = match &sig.output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, ty) => quote! { #ty },
    };

    quote! {
        #(#attrs)* #vis #sig {
            ::carga::transaction::transaction_hook(#label, async move {
                let __carga_output: #output = { #(#stmts)* };
                __carga_output
            }).await
        }
    }
}
