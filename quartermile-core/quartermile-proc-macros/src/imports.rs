pub(crate) use proc_macro::TokenStream;
pub(crate) use proc_macro_error::{abort, abort_call_site, proc_macro_error};
pub(crate) use quote::{format_ident, quote};
pub(crate) use syn::{spanned::Spanned, DeriveInput, Field, Ident};
