//! Derives shared by the quartermile model structs

mod approx_eq_derive;
mod history_vec_derive;
mod imports;
mod utilities;

use crate::imports::*;

/// Adds a `<Name>HistoryVec` struct holding one `Vec` per field of `Name`,
/// with `push`, `pop`, `get`, `iter` and `len`
#[proc_macro_error]
#[proc_macro_derive(HistoryVec)]
pub fn derive_history_vec(input: TokenStream) -> TokenStream {
    history_vec_derive::history_vec_derive(input)
}

/// Implements `ApproxEq` field by field. Fields marked
/// `#[approx_eq(skip)]` are not compared.
#[proc_macro_error]
#[proc_macro_derive(ApproxEq, attributes(approx_eq))]
pub fn derive_approx_eq(input: TokenStream) -> TokenStream {
    approx_eq_derive::approx_eq_derive(input)
}
