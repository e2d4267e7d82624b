use ::proc_macro::TokenStream;
use ::proc_macro2::{Span, TokenStream as TokenStream2};
use syn::{parse_macro_input, DeriveInput, Data, DataStruct, Field};
use syn::punctuated::Punctuated;
use quote::quote;
use ::syn::{*, Result};

const ATTR: &str = "value_entity";

#[proc_macro_derive(ValueEntity, attributes(value_entity))]
pub fn value_entity_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as _);
    TokenStream::from(match impl_value_entity(ast) {
        | Ok(it) => it,
        | Err(err) => err.to_compile_error(),
    })
}

#[derive(Default)]
struct ItemOptions {
    no_std_traits: bool,
}

#[derive(Default)]
struct FieldOptions {
    skip: bool,
    include: bool,
}

// Every `#[value_entity(...)]` attribute is a comma-separated list of flags
fn parse_flags(attrs: &[Attribute]) -> Result<Vec<Ident>> {
    let mut flags = Vec::new();
    for attr in attrs {
        if attr.path.is_ident(ATTR) {
            let list = attr.parse_args_with(Punctuated::<Ident, syn::Token![,]>::parse_terminated)?;
            flags.extend(list);
        }
    }
    Ok(flags)
}

fn item_options(attrs: &[Attribute]) -> Result<ItemOptions> {
    let mut options = ItemOptions::default();
    for flag in parse_flags(attrs)? {
        if flag == "no_std_traits" {
            options.no_std_traits = true;
        } else {
            return Err(Error::new_spanned(&flag, format!("Unknown value_entity option `{flag}` on a struct (expected `no_std_traits`)")));
        }
    }
    Ok(options)
}

fn field_options(field: &Field) -> Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for flag in parse_flags(&field.attrs)? {
        if flag == "skip" {
            options.skip = true;
        } else if flag == "include" {
            options.include = true;
        } else {
            return Err(Error::new_spanned(&flag, format!("Unknown value_entity option `{flag}` on a field (expected `skip` or `include`)")));
        }
    }
    if options.skip && options.include {
        return Err(Error::new_spanned(field, "A field cannot be both `skip` and `include`"));
    }
    Ok(options)
}

fn impl_value_entity(ast: DeriveInput) -> Result<TokenStream2> {
    let options = item_options(&ast.attrs)?;
    let name = ast.ident;
    let generics = ast.generics;

    if let Some(lifetime) = generics.lifetimes().next() {
        return Err(Error::new_spanned(lifetime, "ValueEntity cannot be derived for types with lifetime parameters"));
    }

    match ast.data {
        Data::Struct(s) => impl_value_entity_for_struct(name, generics, s, options),
        Data::Enum(e) => Err(Error::new_spanned(e.enum_token, "ValueEntity can only be derived for structs")),
        Data::Union(u) => Err(Error::new_spanned(u.union_token, "ValueEntity can only be derived for structs")),
    }
}

/// A field that takes part in comparison and hashing
struct SelectedField<'a> {
    label: String,
    member: Member,
    ty: &'a Type,
}

// Public fields are selected unless skipped; private fields only when explicitly included
fn select_fields(s: &DataStruct) -> Result<Vec<SelectedField<'_>>> {
    let mut selected = Vec::new();
    for (index, field) in s.fields.iter().enumerate() {
        let options = field_options(field)?;
        let public = match &field.vis {
            Visibility::Inherited => false,
            Visibility::Restricted(restricted) => !restricted.path.is_ident("self"),
            _ => true,
        };
        if options.skip || !(public || options.include) {
            continue;
        }

        let (label, member) = match &field.ident {
            Some(ident) => (ident.to_string(), Member::Named(ident.clone())),
            None => (index.to_string(), Member::Unnamed(Index { index: index as u32, span: Span::call_site() })),
        };
        selected.push(SelectedField { label, member, ty: &field.ty });
    }
    Ok(selected)
}

fn impl_value_entity_for_struct(name: Ident, generics: Generics, s: DataStruct, options: ItemOptions) -> Result<TokenStream2> {
    let selected = select_fields(&s)?;

    let mut bounded = generics.clone();
    if !generics.params.is_empty() {
        let type_params: Vec<Ident> = bounded.type_params().map(|param| param.ident.clone()).collect();
        let where_clause = bounded.make_where_clause();
        for param in type_params {
            where_clause.predicates.push(syn::parse_quote! { #param: 'static + ::std::marker::Send + ::std::marker::Sync });
        }
        for field in &selected {
            let ty = field.ty;
            where_clause.predicates.push(syn::parse_quote! { #ty: ::value_entity::Field });
        }
    }
    let (impl_generics, ty_generics, where_clause) = bounded.split_for_impl();

    let describe_fields: Vec<_> = selected.iter()
        .map(|field| {
            let label = &field.label;
            let member = &field.member;
            quote! { .field(#label, |this: &Self| &this.#member) }
        })
        .collect();

    // A static inside a generic impl is shared by every instantiation, so generic types rely on
    // the cache's per-thread memo instead.
    let cache_entry = if generics.params.is_empty() {
        quote! {
            fn cache_entry() -> &'static ::value_entity::CacheEntry<Self> {
                static ENTRY: ::value_entity::__private::OnceCell<&'static ::value_entity::CacheEntry<#name>> =
                    ::value_entity::__private::OnceCell::new();
                *ENTRY.get_or_init(::value_entity::cache::entry::<#name>)
            }
        }
    } else {
        quote! {}
    };

    let std_traits = if options.no_std_traits {
        quote! {}
    } else {
        quote! {
            impl #impl_generics ::std::cmp::PartialEq for #name #ty_generics #where_clause {
                fn eq(&self, other: &Self) -> bool {
                    ::value_entity::ValueEntity::value_eq(self, other)
                }
            }

            impl #impl_generics ::std::cmp::Eq for #name #ty_generics #where_clause {}

            impl #impl_generics ::std::hash::Hash for #name #ty_generics #where_clause {
                fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                    state.write_u64(::value_entity::ValueEntity::value_hash(self));
                }
            }
        }
    };

    Ok({
        quote! {
            impl #impl_generics ::value_entity::Introspect for #name #ty_generics #where_clause {
                fn describe() -> ::value_entity::FieldSet<Self> {
                    ::value_entity::FieldSet::builder()
                        #(#describe_fields)*
                        .build()
                }
            }

            impl #impl_generics ::value_entity::ValueEntity for #name #ty_generics #where_clause {
                #cache_entry
            }

            impl #impl_generics ::value_entity::FieldType for #name #ty_generics #where_clause {
                fn typed_eq() -> ::std::option::Option<::value_entity::TypedEq<Self>> {
                    ::std::option::Option::Some(<Self as ::value_entity::ValueEntity>::value_eq as ::value_entity::TypedEq<Self>)
                }

                fn field_hash(&self) -> u64 {
                    ::value_entity::ValueEntity::value_hash(self)
                }
            }

            impl #impl_generics ::value_entity::Field for #name #ty_generics #where_clause {
                type Data = Self;
                const KIND: ::value_entity::FieldKind = ::value_entity::FieldKind::Value;

                fn present(&self) -> ::std::option::Option<&Self> {
                    ::std::option::Option::Some(self)
                }
            }

            #std_traits
        }
    })
}
