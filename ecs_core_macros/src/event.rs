use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

pub fn derive_event(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let struct_name = &ast.ident;

    // ::ecs_core::Event is the re-export from lib.rs; `signal` itself is a
    // private module, so this must not reach into it directly.
    TokenStream::from(quote! {
        impl ::ecs_core::Event for #struct_name {
        }
    })
}
