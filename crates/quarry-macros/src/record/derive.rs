use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    spanned::Spanned, Data, DeriveInput, Error, Fields, GenericArgument, Ident, PathArguments,
    Result, Type,
};

use super::attrs::{parse_record_attrs, FieldKind};

/// Expands `#[derive(Record)]`.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Record cannot be derived for generic structs; implement Record and Sortable by hand",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut query_names: Vec<String> = Vec::new();
    let mut const_names: Vec<String> = Vec::new();
    let mut field_arms: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_record_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let Some(kind) = attrs.kind else {
            continue;
        };

        let query_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        if query_names.contains(&query_name) {
            return Err(Error::new(
                attrs.span,
                format!("duplicate record field name '{}'", query_name),
            ));
        }

        let const_text = to_screaming_snake_case(&query_name);
        let const_name = syn::parse_str::<Ident>(&const_text).map_err(|_| {
            Error::new(
                attrs.span,
                format!(
                    "record field name '{}' does not form a valid constant name ('{}'); \
                     use a rename made of letters, digits and underscores",
                    query_name, const_text
                ),
            )
        })?;
        if const_names.contains(&const_text) {
            return Err(Error::new(
                attrs.span,
                format!(
                    "record field name '{}' collides with another field's constant {}",
                    query_name, const_text
                ),
            ));
        }
        const_names.push(const_text);

        field_constants.push(quote! {
            /// Field name constant for queries and sort keys.
            pub const #const_name: &'static str = #query_name;
        });

        let value = value_expr(kind);
        let arm = if option_inner(&field.ty).is_some() {
            quote! {
                #query_name => match &self.#field_name {
                    ::core::option::Option::Some(value) => #value,
                    ::core::option::Option::None => ::quarry::Value::None,
                },
            }
        } else {
            quote! {
                #query_name => {
                    let value = &self.#field_name;
                    #value
                }
            }
        };
        field_arms.push(arm);
        query_names.push(query_name);
    }

    Ok(quote! {
        impl #struct_name {
            #(#field_constants)*
        }

        impl ::quarry::Record for #struct_name {
            const FIELDS: &'static [&'static str] = &[#(#query_names),*];

            fn field_value(&self, field: &str) -> ::quarry::Value<'_> {
                match field {
                    #(#field_arms)*
                    _ => ::quarry::Value::None,
                }
            }
        }

        impl ::quarry::Sortable for #struct_name {
            fn sort_catalog() -> &'static ::quarry::SortCatalog<Self> {
                static CATALOG: ::quarry::__private::Lazy<::quarry::SortCatalog<#struct_name>> =
                    ::quarry::__private::Lazy::new(|| ::quarry::SortCatalog::from_record());
                &CATALOG
            }
        }
    })
}

/// Builds a `Value` from a reference bound as `value`.
fn value_expr(kind: FieldKind) -> TokenStream {
    match kind {
        FieldKind::String => quote! {
            ::quarry::Value::String(::core::convert::AsRef::<str>::as_ref(value))
        },
        FieldKind::Number => quote! {
            ::quarry::Value::Number(::quarry::Number::from(::core::clone::Clone::clone(value)))
        },
        FieldKind::Timestamp => quote! {
            ::quarry::Value::Timestamp(::quarry::RecordTimestamp::record_timestamp(value))
        },
        FieldKind::Bool => quote! {
            ::quarry::Value::Bool(*value)
        },
    }
}

/// Returns `T` for a field typed `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first()? {
            GenericArgument::Type(inner) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

/// Converts a field name to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' || c == '.' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_alphanumeric();
        }
    }

    result
}
