use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, Lit, LitStr, Meta, Type};

/// Derive macro that describes the CSV columns of a record struct.
///
/// For each named field, extracts:
/// - Column name (respects `#[serde(rename = "...")]`)
/// - Required (false for `Option<T>` and `#[serde(default)]` fields)
/// - Description (from doc comments)
///
/// Fields marked `#[serde(skip)]` or `#[serde(skip_serializing)]` are left out.
///
/// Generates a `csv_columns() -> &'static [crate::core::CsvColumn]` method.
#[proc_macro_derive(CsvColumns, attributes(serde))]
pub fn derive_csv_columns(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "CsvColumns requires named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "CsvColumns only supports structs")
                .to_compile_error()
                .into()
        }
    };

    let mut columns: Vec<proc_macro2::TokenStream> = Vec::new();
    for field in fields {
        let serde = match SerdeField::parse(&field.attrs) {
            Ok(serde) => serde,
            Err(err) => return err.to_compile_error().into(),
        };
        if serde.skip {
            continue;
        }
        let column = serde.rename.unwrap_or_else(|| {
            field
                .ident
                .as_ref()
                .map(|ident| ident.to_string())
                .unwrap_or_default()
        });
        let required = !is_option(&field.ty) && !serde.default;
        let description = doc_comment(&field.attrs);

        columns.push(quote! {
            crate::core::CsvColumn {
                name: #column,
                required: #required,
                description: #description,
            }
        });
    }

    let expanded = quote! {
        impl #name {
            pub fn csv_columns() -> &'static [crate::core::CsvColumn] {
                static COLUMNS: &[crate::core::CsvColumn] = &[
                    #(#columns),*
                ];
                COLUMNS
            }
        }
    };

    TokenStream::from(expanded)
}

/// The subset of `#[serde(...)]` field attributes that affect CSV headers.
#[derive(Default)]
struct SerdeField {
    rename: Option<String>,
    skip: bool,
    default: bool,
}

impl SerdeField {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = SerdeField::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    out.rename = Some(lit.value());
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    out.skip = true;
                } else if meta.path.is_ident("default") {
                    out.default = true;
                    if meta.input.peek(syn::Token![=]) {
                        let _: LitStr = meta.value()?.parse()?;
                    }
                } else if meta.input.peek(syn::Token![=]) {
                    // other key = value options (with = "...", skip_serializing_if = "...")
                    let _: Expr = meta.value()?.parse()?;
                }
                Ok(())
            })?;
        }
        Ok(out)
    }
}

fn doc_comment(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                Expr::Lit(expr) => match &expr.lit {
                    Lit::Str(s) => Some(s.value().trim().to_string()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
