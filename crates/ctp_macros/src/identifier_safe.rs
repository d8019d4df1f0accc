//! `IdentifierSafe` derive macro implementation.
//!
//! Generates a structural `Reflect` impl plus the `IdentifierSafe` marker.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, parse_quote, Data, DataEnum, DataStruct, DeriveInput, Fields, Ident, Type,
    Visibility,
};

/// Main entry point for the `IdentifierSafe` derive macro.
pub fn derive_identifier_safe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_identifier_safe_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_identifier_safe_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let (body, field_types) = match &input.data {
        Data::Struct(data) => serialize_struct(data)?,
        Data::Enum(data) => serialize_enum(data)?,
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "IdentifierSafe cannot be derived for unions: the active field is unknown",
            ))
        }
    };

    // Every field must be identifier-safe, and the aggregate must be usable
    // as its own canonical target.
    let mut generics = input.generics.clone();
    let where_clause = generics.make_where_clause();
    for ty in &field_types {
        where_clause
            .predicates
            .push(parse_quote!(#ty: ::ctp::IdentifierSafe));
    }
    let (impl_generics, ty_generics, _) = input.generics.split_for_impl();
    where_clause.predicates.push(parse_quote!(
        #name #ty_generics: ::core::clone::Clone
            + ::core::marker::Send
            + ::core::marker::Sync
            + 'static
    ));
    let where_clause = &generics.where_clause;

    Ok(quote! {
        impl #impl_generics ::ctp::Reflect for #name #ty_generics #where_clause {
            type Target = Self;
            type Forms = ::ctp::Verbatim;
            const KIND: ::ctp::ReflectKind = ::ctp::ReflectKind::Structural;

            fn serialize(
                &self,
                s: &mut ::ctp::Serializer<'_>,
            ) -> ::core::result::Result<(), ::ctp::ReflectError> {
                #body
                ::core::result::Result::Ok(())
            }
        }

        impl #impl_generics ::ctp::IdentifierSafe for #name #ty_generics #where_clause {}
    })
}

/// Push every field in declaration order. Fields must be `pub`.
fn serialize_struct(data: &DataStruct) -> syn::Result<(TokenStream2, Vec<Type>)> {
    let mut pushes = Vec::new();
    let mut types = Vec::new();

    for (index, field) in data.fields.iter().enumerate() {
        if !matches!(field.vis, Visibility::Public(_)) {
            let what = field.ident.as_ref().map_or_else(
                || format!("field {index}"),
                |ident| format!("field `{ident}`"),
            );
            return Err(syn::Error::new_spanned(
                field,
                format!("{what} must be `pub` to take part in an identifier"),
            ));
        }

        let member = match &field.ident {
            Some(ident) => quote!(#ident),
            None => {
                let index = syn::Index::from(index);
                quote!(#index)
            }
        };
        pushes.push(quote! {
            s.push_constant_or_object(&self.#member)?;
        });
        types.push(field.ty.clone());
    }

    Ok((quote!(#(#pushes)*), types))
}

/// Push the active variant's index, then its fields.
fn serialize_enum(data: &DataEnum) -> syn::Result<(TokenStream2, Vec<Type>)> {
    let mut arms = Vec::new();
    let mut types = Vec::new();

    for (tag, variant) in data.variants.iter().enumerate() {
        let ident = &variant.ident;
        let bindings: Vec<Ident> = (0..variant.fields.len())
            .map(|i| format_ident!("__field{}", i, span = Span::call_site()))
            .collect();

        let pattern = match &variant.fields {
            Fields::Named(fields) => {
                let names = fields.named.iter().filter_map(|f| f.ident.as_ref());
                quote!(Self::#ident { #(#names: #bindings),* })
            }
            Fields::Unnamed(_) => quote!(Self::#ident(#(#bindings),*)),
            Fields::Unit => quote!(Self::#ident),
        };

        arms.push(quote! {
            #pattern => {
                s.push_tag(#tag);
                #(s.push_constant_or_object(#bindings)?;)*
            }
        });
        types.extend(variant.fields.iter().map(|f| f.ty.clone()));
    }

    if arms.is_empty() {
        return Err(syn::Error::new(
            Span::call_site(),
            "IdentifierSafe cannot be derived for an enum with no variants",
        ));
    }

    Ok((quote!(match self { #(#arms)* }), types))
}
