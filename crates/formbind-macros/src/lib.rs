//! formbind 过程宏入口。
//!
//! # 设计意图（Why）
//! - 将“逐字段读取元数据 + 分派解码”的样板代码下沉到编译期展开，替代运行时反射；
//! - 字段声明顺序、可见性过滤与 `key`/`required`/`default` 三项元数据全部在展开时固化为常量表。
//!
//! # 集成方式（How）
//! - 业务 crate 依赖 `formbind-core`，通过 `formbind_core::Record` 使用派生宏；
//! - 生成代码固定引用 `::formbind_core` 路径，`formbind-core` 内部通过 `extern crate self` 保持同名可达。

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Error, Field, Fields, Ident, LitBool, LitStr, Type, Visibility,
    parse_macro_input, parse_quote, spanned::Spanned,
};

/// 为具名字段结构体派生 `formbind_core::Record`，并在未声明 `#[formbind(text)]` 时派生 `Field`。
///
/// # 语义说明（What）
/// - **字段属性**：`#[formbind(key = "k", required, default = "v")]`，三项均可省略；
///   `required` 也接受 `required = true/false`。
/// - **容器属性**：`#[formbind(text)]` 表示该结构体作为字段时走 `TextDecode` 能力而非嵌套递归，
///   此时宏只生成 `Record`，`Field` 由 `formbind-core` 的能力实现提供。
/// - **可见性**：仅 `pub` 字段参与解码，其余字段被静默跳过（其属性也不做解析）。
/// - **嵌套记录**：类型为派生记录的字段直接以同一个映射递归解码，不经过键查找；
///   在这类字段上声明 `key`/`required`/`default` 会产生编译错误。
/// - **前置条件**：作为嵌套字段使用时结构体需实现 `Default`，解码会先构造零值再整体移入父字段。
///
/// # 风险提示（Trade-offs）
/// - 泛型结构体的字段类型约束需由调用方在 `where` 子句中自行声明，宏不会推导 `Field` 约束。
#[proc_macro_derive(Record, attributes(formbind))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_record(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// 单个参与解码的字段：标识符、类型与展开后的 `FieldSpec` 构造表达式。
struct RecordField {
    ident: Ident,
    ty: Type,
    spec: proc_macro2::TokenStream,
    has_metadata: bool,
}

fn expand_record(input: DeriveInput) -> Result<proc_macro2::TokenStream, Error> {
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named,
            other => {
                return Err(Error::new(
                    other.span(),
                    "NotARecord: #[derive(Record)] 仅支持具名字段结构体",
                ));
            }
        },
        Data::Enum(data) => {
            return Err(Error::new(
                data.enum_token.span(),
                "NotARecord: #[derive(Record)] 不支持枚举",
            ));
        }
        Data::Union(data) => {
            return Err(Error::new(
                data.union_token.span(),
                "NotARecord: #[derive(Record)] 不支持联合体",
            ));
        }
    };

    let text_capability = parse_container_attrs(&input.attrs)?;

    let mut fields = Vec::new();
    for field in &named.named {
        if !matches!(field.vis, Visibility::Public(_)) {
            continue;
        }
        fields.push(parse_record_field(field)?);
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let specs = fields.iter().map(|field| &field.spec);
    let idents: Vec<_> = fields.iter().map(|field| &field.ident).collect();
    let tys: Vec<_> = fields.iter().map(|field| &field.ty).collect();
    let indexes: Vec<_> = (0..fields.len()).collect();

    // 嵌套记录不做键查找，其上的元数据属性必须在编译期被拒绝。
    let metadata_tys = fields
        .iter()
        .filter(|field| field.has_metadata)
        .map(|field| &field.ty);
    let nested_metadata_checks = quote! {
        #(
            ::core::assert!(
                !<#metadata_tys as ::formbind_core::Field>::KIND.is_record(),
                "#[formbind(key/required/default)] 不能用于嵌套记录字段"
            );
        )*
    };
    let (item_checks, body_checks) = if input.generics.params.is_empty() {
        (
            quote! { const _: () = { #nested_metadata_checks }; },
            quote! {},
        )
    } else {
        (quote! {}, quote! { const { #nested_metadata_checks } })
    };

    let record_impl = quote! {
        #item_checks

        impl #impl_generics ::formbind_core::Record for #ident #ty_generics #where_clause {
            fn fields() -> &'static [::formbind_core::FieldSpec] {
                const FIELDS: &[::formbind_core::FieldSpec] = &[#(#specs),*];
                FIELDS
            }

            #[allow(unused_variables)]
            fn decode_fields(
                &mut self,
                values: &::formbind_core::ValueMap,
                ctx: &mut ::formbind_core::DecodeContext,
            ) -> ::core::result::Result<(), ::formbind_core::DecodeError> {
                #body_checks
                let fields = <Self as ::formbind_core::Record>::fields();
                #(
                    ::formbind_core::Field::decode_field(
                        &mut self.#idents,
                        &fields[#indexes],
                        values,
                        ctx,
                    )?;
                )*
                ::core::result::Result::Ok(())
            }

            #[allow(unused_variables)]
            fn visit_fields(visit: &mut dyn FnMut(&'static ::formbind_core::FieldSpec)) {
                let fields = <Self as ::formbind_core::Record>::fields();
                #(
                    <#tys as ::formbind_core::Field>::visit_fields(&fields[#indexes], visit);
                )*
            }
        }
    };

    if text_capability {
        return Ok(record_impl);
    }

    let mut field_generics = input.generics.clone();
    field_generics
        .make_where_clause()
        .predicates
        .push(parse_quote!(#ident #ty_generics: ::core::default::Default));
    let (_, _, field_where_clause) = field_generics.split_for_impl();

    Ok(quote! {
        #record_impl

        impl #impl_generics ::formbind_core::Field for #ident #ty_generics #field_where_clause {
            const KIND: ::formbind_core::Kind = ::formbind_core::Kind::Record;

            fn decode_field(
                &mut self,
                _spec: &::formbind_core::FieldSpec,
                values: &::formbind_core::ValueMap,
                ctx: &mut ::formbind_core::DecodeContext,
            ) -> ::core::result::Result<(), ::formbind_core::DecodeError> {
                ::formbind_core::engine::decode_nested(self, values, ctx)
            }

            fn visit_fields(
                _spec: &'static ::formbind_core::FieldSpec,
                visit: &mut dyn FnMut(&'static ::formbind_core::FieldSpec),
            ) {
                <Self as ::formbind_core::Record>::visit_fields(visit)
            }
        }
    })
}

/// 解析容器级 `#[formbind(text)]`，返回是否声明了文本解码能力。
fn parse_container_attrs(attrs: &[Attribute]) -> Result<bool, Error> {
    let mut text_capability = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("formbind")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("text") {
                text_capability = true;
                Ok(())
            } else {
                Err(meta.error("结构体上的 #[formbind(...)] 仅支持 `text`"))
            }
        })?;
    }
    Ok(text_capability)
}

/// 教案级说明：
/// - **意图**：把字段上的 `#[formbind(...)]` 折叠为一条 `FieldSpec` 常量构造表达式。
/// - **逻辑**：逐个解析 `key`、`required`、`default`；重复声明或未知键直接报错，
///   空字符串默认值同样拒绝（与“未声明默认值”无法区分）。
/// - **契约**：输入为 `pub` 具名字段；输出的表达式可在 `const` 上下文求值。
fn parse_record_field(field: &Field) -> Result<RecordField, Error> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new(field.span(), "NotARecord: 字段缺少名称"))?;

    let mut key: Option<LitStr> = None;
    let mut required = false;
    let mut default: Option<LitStr> = None;

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("formbind")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                if key.is_some() {
                    return Err(meta.error("重复声明 `key`"));
                }
                key = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("required") {
                required = if meta.input.peek(syn::Token![=]) {
                    meta.value()?.parse::<LitBool>()?.value
                } else {
                    true
                };
            } else if meta.path.is_ident("default") {
                if default.is_some() {
                    return Err(meta.error("重复声明 `default`"));
                }
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().is_empty() {
                    return Err(Error::new(lit.span(), "`default` 不能为空字符串"));
                }
                default = Some(lit);
            } else {
                return Err(meta.error("字段上的 #[formbind(...)] 仅支持 `key`、`required`、`default`"));
            }
            Ok(())
        })?;
    }

    let has_metadata = key.is_some() || required || default.is_some();
    let name = LitStr::new(&ident.to_string(), Span::call_site());
    let mut spec = quote! { ::formbind_core::FieldSpec::new(#name) };
    if let Some(key) = key {
        spec = quote! { #spec.with_key(#key) };
    }
    if required {
        spec = quote! { #spec.required(true) };
    }
    if let Some(default) = default {
        spec = quote! { #spec.with_default(#default) };
    }

    Ok(RecordField {
        ident,
        ty: field.ty.clone(),
        spec,
        has_metadata,
    })
}
