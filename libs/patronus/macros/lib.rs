extern crate proc_macro;

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Fields};

/// Usage:
/// `
/// #[patronus(name = "ActivityUpdate", derives = "Default, Debug, Clone")]
/// struct Activity { id: String }
/// `
/// Every field of the patch struct must be `Clone` on the base struct, the
/// generated `Patch::apply_to` clones what the patch does not override.
#[proc_macro_attribute]
pub fn patronus(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let attr_args = parse_macro_input!(attr as syn::AttributeArgs);

    let struct_name = input.ident.clone();
    let vis = input.vis.clone();
    let mut derives: Vec<syn::Path> = Vec::new();
    let mut updated_struct_name = None;

    for arg in attr_args {
        match arg {
            syn::NestedMeta::Meta(syn::Meta::NameValue(nv)) if nv.path.is_ident("name") => {
                if let syn::Lit::Str(lit) = nv.lit {
                    updated_struct_name = Some(syn::Ident::new(&lit.value(), struct_name.span()));
                }
            }
            syn::NestedMeta::Meta(syn::Meta::NameValue(nv)) if nv.path.is_ident("derives") => {
                if let syn::Lit::Str(lit) = nv.lit {
                    for derive in lit.value().split(',').map(str::trim).filter(|d| !d.is_empty()) {
                        match syn::parse_str::<syn::Path>(derive) {
                            Ok(path) => derives.push(path),
                            Err(e) => return e.to_compile_error().into(),
                        }
                    }
                }
            }
            other => {
                return syn::Error::new(other.span(), "expected `name = \"..\"` or `derives = \"..\"`")
                    .to_compile_error()
                    .into();
            }
        }
    }

    let updated_struct_name = match updated_struct_name {
        Some(name) => name,
        None => {
            return syn::Error::new(struct_name.span(), "missing 'name' field")
                .to_compile_error()
                .into();
        }
    };

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.clone(),
            _ => {
                return syn::Error::new(
                    input.span(),
                    "the macro can only be applied on struct with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new(
                input.span(),
                "the macro can only be applied on struct with named fields",
            )
            .to_compile_error()
            .into();
        }
    };

    let field_definitions = fields.iter().map(|f| {
        let name = &f.ident;
        let ty = &f.ty;
        quote! {
            pub #name: Option<#ty>,
        }
    });

    let setters = fields.iter().map(|f| {
        let name = f.ident.as_ref().expect("named field");
        let ty = &f.ty;
        let set_opt_fn_name = format_ident!("set_opt_{}", name);
        let set_fn_name = format_ident!("set_{}", name);
        let unset_fn_name = format_ident!("unset_{}", name);
        quote! {
            #[allow(non_snake_case)]
            pub fn #set_opt_fn_name(mut self, value: impl Into<Option<#ty>>) -> Self {
                self.#name = value.into();
                self
            }

            #[allow(non_snake_case)]
            pub fn #set_fn_name(mut self, value: impl Into<#ty>) -> Self {
                self.#name = Some(value.into());
                self
            }

            #[allow(non_snake_case)]
            pub fn #unset_fn_name(mut self) -> Self {
                self.#name = None;
                self
            }
        }
    });

    let merged_fields = fields.iter().map(|f| {
        let name = &f.ident;
        quote! {
            #name: match self.#name {
                Some(value) => value,
                None => base.#name.clone(),
            },
        }
    });

    let emptiness_checks = fields.iter().map(|f| {
        let name = &f.ident;
        quote! { self.#name.is_none() }
    });

    let expanded = quote! {
        #input

        #[derive(#(#derives),*)]
        #vis struct #updated_struct_name {
            #(#field_definitions)*
        }

        impl #updated_struct_name {
            #(#setters)*
        }

        impl ::patronus::Patch<#struct_name> for #updated_struct_name {
            fn apply_to(self, base: &#struct_name) -> #struct_name {
                #struct_name {
                    #(#merged_fields)*
                }
            }

            fn is_empty(&self) -> bool {
                true #(&& #emptiness_checks)*
            }
        }
    };

    TokenStream::from(expanded)
}
