use proc_macro::TokenStream;
use quote::quote;

/// Derives the `FromRng` trait.
///
/// Every field of the struct is initialized in declaration order from the same random number
/// generator, which makes the derived implementation deterministic for a given seed.
#[proc_macro_derive(FromRng)]
pub fn derive_from_rng(input: TokenStream) -> TokenStream {
    let s = match syn::parse::<syn::Item>(input) {
        Ok(syn::Item::Struct(s)) => s,
        Ok(other) => {
            return syn::Error::new_spanned(other, "`FromRng` can only be derived for structs")
                .to_compile_error()
                .into();
        }
        Err(err) => return err.to_compile_error().into(),
    };

    let name = &s.ident;
    let (impl_generics, ty_generics, where_clause) = s.generics.split_for_impl();

    let body = match &s.fields {
        syn::Fields::Named(fields) => {
            let field_init = fields.named.iter().map(|field| {
                let ident = &field.ident;
                quote! { #ident: ::strata_rng::FromRng::from_rng(rng), }
            });
            quote! { Self { #(#field_init)* } }
        }
        syn::Fields::Unnamed(fields) => {
            let field_init = fields
                .unnamed
                .iter()
                .map(|_| quote! { ::strata_rng::FromRng::from_rng(rng), });
            quote! { Self( #(#field_init)* ) }
        }
        syn::Fields::Unit => quote! { Self },
    };

    quote! {
        impl #impl_generics ::strata_rng::FromRng for #name #ty_generics #where_clause {
            fn from_rng(rng: &mut impl ::strata_rng::Rng) -> Self {
                #body
            }
        }
    }
    .into()
}
