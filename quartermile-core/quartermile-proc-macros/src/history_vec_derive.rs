use crate::imports::*;
use crate::utilities::named_fields;

/// Expands to `<Name>HistoryVec`, a struct-of-vectors recording one `Name`
/// per time step. Field types must be `Clone`.
pub fn history_vec_derive(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = syn::parse(input).unwrap();
    let state = &ast.ident;
    let history = format_ident!("{}HistoryVec", state);

    let fields = named_fields(&ast, "HistoryVec");
    let Some(first) = fields.first().and_then(|f| f.ident.clone()) else {
        abort!(state.span(), "#[derive(HistoryVec)] needs at least one field");
    };
    let names: Vec<Ident> = fields.iter().filter_map(|f| f.ident.clone()).collect();
    let columns = fields.iter().map(|f| {
        let (name, ty) = (&f.ident, &f.ty);
        let doc = format!(" `{}` at every recorded step", quote!(#name));
        quote! {
            #[doc = #doc]
            pub #name: Vec<#ty>,
        }
    });
    let struct_doc = format!(" Recorded [`{state}`] values, one vector per field");

    quote! {
        #[doc = #struct_doc]
        #[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
        pub struct #history {
            #(#columns)*
        }

        impl #history {
            pub fn new() -> Self {
                Self::default()
            }

            /// Appends one step
            pub fn push(&mut self, value: #state) {
                let #state { #(#names),* } = value;
                #(self.#names.push(#names);)*
            }

            pub fn clear(&mut self) {
                #(self.#names.clear();)*
            }

            /// Removes and returns the last step
            pub fn pop(&mut self) -> Option<#state> {
                let last = self.last()?;
                #(self.#names.truncate(self.#names.len() - 1);)*
                Some(last)
            }

            /// Step `i`, reassembled
            pub fn get(&self, i: usize) -> Option<#state> {
                (i < self.len()).then(|| #state {
                    #(#names: self.#names[i].clone(),)*
                })
            }

            pub fn last(&self) -> Option<#state> {
                self.get(self.len().checked_sub(1)?)
            }

            /// Steps in recording order
            pub fn iter(&self) -> impl Iterator<Item = #state> + '_ {
                (0..self.len()).filter_map(move |i| self.get(i))
            }

            pub fn len(&self) -> usize {
                self.#first.len()
            }

            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }
        }

        impl ApproxEq for #history {
            fn approx_eq(&self, other: &#history, tol: f64) -> bool {
                self.len() == other.len()
                    #(&& self.#names.approx_eq(&other.#names, tol))*
            }
        }
    }
    .into()
}
