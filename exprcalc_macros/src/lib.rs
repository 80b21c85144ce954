use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Expr, FnArg, ItemFn, Lit, Meta, Pat, PatType, Type};

/// Turns `fn name(a: f64, b: f64) -> Result<f64, String>` into a function
/// over `&[f64]` with an arity check, plus a `name_handler()` constructor
/// returning a `FunctionHandler` (which must be in scope at the call site).
///
/// The handler description is taken from the doc comment.
#[proc_macro_attribute]
pub fn builtin(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    let fn_name = &input.sig.ident;
    let fn_vis = &input.vis;
    let fn_body = &input.block;
    let fn_output = &input.sig.output;
    let attrs = &input.attrs;
    let handler_name = format_ident!("{}_handler", fn_name);

    let mut arg_names = Vec::new();
    let mut arg_extractions = Vec::new();
    for (i, arg) in input.sig.inputs.iter().enumerate() {
        let FnArg::Typed(PatType { pat, ty, .. }) = arg else {
            return Err(syn::Error::new_spanned(arg, "builtins cannot take self"));
        };
        let Pat::Ident(ref ident) = **pat else {
            return Err(syn::Error::new_spanned(pat, "unsupported argument pattern"));
        };
        if !is_f64(ty) {
            return Err(syn::Error::new_spanned(ty, "builtin arguments must be f64"));
        }

        let arg_name = &ident.ident;
        arg_extractions.push(quote! {
            let #arg_name: f64 = args[#i];
        });
        arg_names.push(arg_name.to_string());
    }

    let args_len = arg_names.len();
    let description = description(attrs);

    Ok(quote! {
        #(#attrs)*
        #fn_vis fn #fn_name(args: &[f64]) #fn_output {
            if args.len() != #args_len {
                return Err(format!("Expected {} arguments, but got {}", #args_len, args.len()));
            }

            #(#arg_extractions)*

            #fn_body
        }

        #fn_vis fn #handler_name() -> FunctionHandler {
            FunctionHandler::new(#description, &[#(#arg_names),*], #args_len, #args_len, #fn_name)
        }
    })
}

fn is_f64(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path.path.is_ident("f64"),
        _ => false,
    }
}

fn description(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                Expr::Lit(expr) => match &expr.lit {
                    Lit::Str(text) => Some(text.value().trim().to_string()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
