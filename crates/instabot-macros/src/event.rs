//! `#[derive(FlatEvent)]` implementation.
//!
//! # Struct-level attributes `#[event(...)]`
//!
//! | Key | Example | Required | Description |
//! |-----|---------|----------|-------------|
//! | `kind` | `"ImageMessage"` | **Yes** | `EventKind` variant accepted by the projection; repeatable |
//!
//! # Field-level attributes `#[event(...)]`
//!
//! | Key | Description |
//! |-----|-------------|
//! | `kind_field` | Field of type `EventKind` returned by `FlatEvent::kind` |
//!
//! The generated code refers to `::instabot::…` paths; the instabot crate
//! declares `extern crate self as instabot` so the derive also works there.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, spanned::Spanned};

const REQUIRED_FIELDS: [&str; 3] = ["sender", "recipient", "timestamp"];

// ============================================================================
// Entry point
// ============================================================================

pub fn derive_flat_event(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let kinds = parse_struct_attrs(&input.attrs, name.span())?;

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(_) => {
            return Err(syn::Error::new(
                input.span(),
                "FlatEvent does not support enums",
            ));
        }
        Data::Union(_) => {
            return Err(syn::Error::new(
                input.span(),
                "FlatEvent cannot be derived for unions",
            ));
        }
    };

    let kind_field = scan_fields(name, fields)?;

    if kinds.len() > 1 && kind_field.is_none() {
        return Err(syn::Error::new(
            name.span(),
            "FlatEvent with several `kind`s requires a field marked #[event(kind_field)]",
        ));
    }

    Ok(generate_impl(name, &kinds, kind_field.as_ref()))
}

// ============================================================================
// Attribute parsing
// ============================================================================

fn parse_struct_attrs(attrs: &[Attribute], span: Span) -> syn::Result<Vec<Ident>> {
    let mut kinds = Vec::new();

    for attr in attrs {
        if !attr.path().is_ident("event") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("kind") {
                let lit = meta.value()?.parse::<syn::LitStr>()?;
                kinds.push(Ident::new(&lit.value(), lit.span()));
                Ok(())
            } else {
                Err(meta.error("unsupported FlatEvent attribute, expected `kind`"))
            }
        })?;
    }

    if kinds.is_empty() {
        return Err(syn::Error::new(
            span,
            "FlatEvent requires at least one #[event(kind = \"…\")] attribute",
        ));
    }

    Ok(kinds)
}

fn is_kind_field(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut found = false;
    for attr in attrs {
        if !attr.path().is_ident("event") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("kind_field") {
                found = true;
                Ok(())
            } else {
                Err(meta.error("unsupported field attribute, expected `kind_field`"))
            }
        })?;
    }
    Ok(found)
}

/// Checks the required fields exist and returns the `kind_field`, if any.
fn scan_fields(name: &Ident, fields: &Fields) -> syn::Result<Option<Ident>> {
    let Fields::Named(named) = fields else {
        return Err(syn::Error::new(
            name.span(),
            "FlatEvent requires a struct with named fields",
        ));
    };

    let mut kind_field = None;
    for f in &named.named {
        if is_kind_field(&f.attrs)? {
            kind_field = f.ident.clone();
        }
    }

    for required in REQUIRED_FIELDS {
        let present = named
            .named
            .iter()
            .any(|f| f.ident.as_ref().is_some_and(|i| i == required));
        if !present {
            return Err(syn::Error::new(
                name.span(),
                format!("FlatEvent requires a `{required}` field"),
            ));
        }
    }

    Ok(kind_field)
}

// ============================================================================
// Code generation
// ============================================================================

fn generate_impl(name: &Ident, kinds: &[Ident], kind_field: Option<&Ident>) -> TokenStream {
    let first = &kinds[0];

    let kind_impl = match kind_field {
        Some(field) => quote! {
            fn kind(&self) -> ::instabot::EventKind {
                self.#field
            }
        },
        None => quote! {
            fn kind(&self) -> ::instabot::EventKind {
                ::instabot::EventKind::#first
            }
        },
    };

    quote! {
        impl ::instabot::FlatEvent for #name {
            const KINDS: &'static [::instabot::EventKind] = &[
                #( ::instabot::EventKind::#kinds ),*
            ];

            #kind_impl

            fn sender(&self) -> &::instabot::Sender {
                &self.sender
            }

            fn recipient(&self) -> &::instabot::Recipient {
                &self.recipient
            }

            fn timestamp(&self) -> ::instabot::Timestamp {
                self.timestamp
            }
        }
    }
}
