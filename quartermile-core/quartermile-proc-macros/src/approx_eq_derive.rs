use crate::imports::*;
use crate::utilities::named_fields;

pub fn approx_eq_derive(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = syn::parse(input).unwrap();
    let name = &ast.ident;
    let compared = named_fields(&ast, "ApproxEq")
        .into_iter()
        .filter(|f| !has_skip_attr(f))
        .filter_map(|f| f.ident)
        .collect::<Vec<_>>();

    quote! {
        impl ApproxEq for #name {
            fn approx_eq(&self, other: &#name, tol: f64) -> bool {
                true #(&& self.#compared.approx_eq(&other.#compared, tol))*
            }
        }
    }
    .into()
}

/// Whether `field` carries `#[approx_eq(skip)]`
fn has_skip_attr(field: &Field) -> bool {
    let mut skip = false;
    for attr in field.attrs.iter().filter(|a| a.path.is_ident("approx_eq")) {
        match attr.parse_meta() {
            Ok(syn::Meta::List(list)) if list.nested.len() == 1 => match &list.nested[0] {
                syn::NestedMeta::Meta(syn::Meta::Path(path)) if path.is_ident("skip") => {
                    skip = true
                }
                other => abort!(other.span(), "unknown `approx_eq` option"),
            },
            _ => abort!(attr.path.span(), "expected `#[approx_eq(skip)]`"),
        }
    }
    skip
}
