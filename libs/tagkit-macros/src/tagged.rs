use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashSet;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Data, DeriveInput, Path, Token};

type TagPaths = Punctuated<Path, Token![,]>;

fn parse_parts(args: TokenStream, input: TokenStream) -> Result<(TagPaths, DeriveInput), TokenStream> {
    let paths = TagPaths::parse_terminated
        .parse2(args)
        .map_err(|e| e.to_compile_error())?;
    let item: DeriveInput = syn::parse2(input).map_err(|e| e.to_compile_error())?;
    Ok((paths, item))
}

/// Rejects unions and generic items; tags identify one concrete declaration.
fn validate_item(item: &DeriveInput, attr: &str) -> Result<(), TokenStream> {
    if matches!(item.data, Data::Union(_)) {
        let err = syn::Error::new_spanned(
            &item.ident,
            format!("#[{attr}] supports only structs and enums"),
        );
        return Err(err.to_compile_error());
    }
    if !item.generics.params.is_empty() {
        let err = syn::Error::new_spanned(
            &item.generics,
            format!("#[{attr}] does not support generic types"),
        );
        return Err(err.to_compile_error());
    }
    Ok(())
}

/// Validates tag paths for duplicates.
/// Returns Ok(()) if valid, or Err(TokenStream) with compile error if invalid.
fn validate_paths(paths: &TagPaths) -> Result<(), TokenStream> {
    let mut seen = HashSet::new();
    for path in paths {
        let rendered = quote!(#path).to_string().replace(' ', "");
        if !seen.insert(rendered.clone()) {
            let err = syn::Error::new_spanned(path, format!("duplicate tag '{rendered}'"));
            return Err(err.to_compile_error());
        }
    }
    Ok(())
}

pub fn expand_tagged(args: TokenStream, input: TokenStream) -> TokenStream {
    let (paths, item) = match parse_parts(args, input) {
        Ok(parts) => parts,
        Err(err) => return err,
    };
    if let Err(err) = validate_item(&item, "tagged") {
        return err;
    }
    if let Err(err) = validate_paths(&paths) {
        return err;
    }

    let name = &item.ident;
    let with_calls = paths.iter().map(|path| quote! { .with::<#path>() });

    quote! {
        #item

        impl ::tagkit::Tagged for #name {
            fn tags() -> ::tagkit::TagSet {
                ::tagkit::TagSet::new() #( #with_calls )*
            }
        }

        ::tagkit::inventory::submit! {
            ::tagkit::StaticTagDecl::new(
                ::tagkit::DeclarationSite::of_type::<#name>,
                <#name as ::tagkit::Tagged>::tags,
            )
        }
    }
}

pub fn expand_tag_alias(args: TokenStream, input: TokenStream) -> TokenStream {
    let (paths, item) = match parse_parts(args, input) {
        Ok(parts) => parts,
        Err(err) => return err,
    };
    if let Err(err) = validate_item(&item, "tag_alias") {
        return err;
    }
    if paths.is_empty() {
        let err = syn::Error::new_spanned(
            &item.ident,
            "#[tag_alias] requires at least one tag",
        );
        return err.to_compile_error();
    }
    if let Err(err) = validate_paths(&paths) {
        return err;
    }

    let name = &item.ident;
    let with_calls = paths.iter().map(|path| quote! { .with::<#path>() });

    quote! {
        #item

        impl ::tagkit::TagAlias for #name {
            fn expand() -> ::tagkit::TagSet {
                ::tagkit::TagSet::new() #( #with_calls )*
            }
        }
    }
}
