use crate::imports::*;

/// Named fields of the struct being derived on. Tuple structs, unit structs,
/// enums and unions are rejected with a compile error naming `derive_name`.
pub(crate) fn named_fields(ast: &DeriveInput, derive_name: &str) -> Vec<Field> {
    let data = match &ast.data {
        syn::Data::Struct(data) => data,
        _ => abort_call_site!("#[derive({})] only works on structs", derive_name),
    };
    match &data.fields {
        syn::Fields::Named(named) => named.named.iter().cloned().collect(),
        _ => abort!(
            ast.ident.span(),
            "#[derive({})] needs a struct with named fields",
            derive_name
        ),
    }
}
