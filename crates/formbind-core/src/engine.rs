//! 解码引擎：记录遍历、字段元数据解析与分派。
//!
//! # 分派顺序（What）
//! 每个字段的类型通过且仅通过一条实现路径获得 [`Field`]，由此在编译期固化优先级：
//!
//! 1. 实现了 [`TextDecode`] 的类型：经由能力解码，只取首个元素；
//! 2. 派生了 `Record`（且未声明 `#[formbind(text)]`）的结构体：在同一键空间内递归；
//! 3. `Vec<E>`：逐元素解码，`E` 先看能力、再看基础转换；
//! 4. 基础类型：基础转换首个元素。
//!
//! 既无能力也非记录、亦非基础类型的字段类型无法满足 `Field` 约束，在编译期即被拒绝。
//!
//! # 失败语义
//! fail-fast：首个错误立即终止调用；已处理字段保持修改，不做回滚。

use crate::capability::TextDecode;
use crate::context::DecodeContext;
use crate::error::{DecodeError, ElementError};
use crate::field::FieldSpec;
use crate::primitive::{Kind, Primitive};
use crate::value_map::ValueMap;

/// 可被逐字段解码的记录类型，通常由 `#[derive(Record)]` 生成。
///
/// # 教案式说明
/// - **意图 (Why)**：以编译期生成的字段访问器取代运行时反射，保留声明顺序与可见性过滤。
/// - **契约 (What)**：
///   - [`Record::fields`] 按声明顺序返回公开字段的元数据；
///   - [`Record::decode_fields`] 按相同顺序对每个字段调用 [`Field::decode_field`]，首个错误即返回；
///   - [`Record::visit_fields`] 以扁平方式访问记录（含嵌套记录）消费的全部叶子字段。
pub trait Record {
    fn fields() -> &'static [FieldSpec];

    fn decode_fields(
        &mut self,
        values: &ValueMap,
        ctx: &mut DecodeContext,
    ) -> Result<(), DecodeError>;

    /// 默认实现只访问本层字段；派生实现会展开嵌套记录。
    fn visit_fields(visit: &mut dyn FnMut(&'static FieldSpec)) {
        Self::fields().iter().for_each(|spec| visit(spec));
    }
}

/// 可作为记录字段的类型。
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be decoded as a record field",
    label = "unsupported field kind",
    note = "field types must be a primitive, `Vec<E>` of decodable elements, a `#[derive(Record)]` struct, or implement `TextDecode` + `Default`"
)]
pub trait Field {
    const KIND: Kind;

    fn decode_field(
        &mut self,
        spec: &FieldSpec,
        values: &ValueMap,
        ctx: &mut DecodeContext,
    ) -> Result<(), DecodeError>;

    /// 访问该字段消费的叶子字段元数据；嵌套记录覆盖此方法以展开子字段。
    fn visit_fields(spec: &'static FieldSpec, visit: &mut dyn FnMut(&'static FieldSpec)) {
        visit(spec)
    }
}

/// 可作为序列元素（以及 [`parse_str`](crate::parse_str) 目标）的类型。
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be decoded as a sequence element",
    note = "sequence elements must be a primitive or implement `TextDecode` + `Default`"
)]
pub trait Element: Sized {
    const KIND: Kind;

    fn decode_element(text: &str) -> Result<Self, ElementError>;
}

/// 经过元数据解析后的非空值序列。
///
/// 缺省值以局部替换的方式参与解码，从不写回调用方的 [`ValueMap`]。
#[derive(Clone, Copy)]
enum Resolved<'v> {
    Present { first: &'v str, all: &'v [String] },
    Default(&'static str),
}

impl<'v> Resolved<'v> {
    fn first(self) -> &'v str {
        match self {
            Self::Present { first, .. } => first,
            Self::Default(text) => text,
        }
    }

    fn len(self) -> usize {
        match self {
            Self::Present { all, .. } => all.len(),
            Self::Default(_) => 1,
        }
    }

    fn texts(self) -> impl Iterator<Item = &'v str> {
        let (present, default) = match self {
            Self::Present { all, .. } => (Some(all.iter().map(String::as_str)), None),
            Self::Default(text) => (None, Some(text)),
        };
        present.into_iter().flatten().chain(default)
    }
}

/// 解析字段的值序列：处理缺失、缺省值与空序列。
///
/// # 教案式拆解
/// - 键缺失（或字段未声明键）：必填 → `MissingField`；有缺省值 → 使用 `[default]`；否则跳过；
/// - 键存在但序列为空：必填 → `EmptyField`；否则跳过；
/// - 返回 `Ok(None)` 表示字段保持原值。
fn resolve<'v>(
    spec: &FieldSpec,
    values: &'v ValueMap,
) -> Result<Option<Resolved<'v>>, DecodeError> {
    let Some(found) = spec.key().and_then(|key| values.get(key)) else {
        if spec.is_required() {
            return Err(DecodeError::MissingField {
                key: spec.label().to_owned(),
            });
        }
        return Ok(spec.default_value().map(|text| {
            tracing::trace!(field = spec.name(), default = text, "applying default value");
            Resolved::Default(text)
        }));
    };

    match found.split_first() {
        Some((first, _)) => Ok(Some(Resolved::Present {
            first: first.as_str(),
            all: found,
        })),
        None if spec.is_required() => Err(DecodeError::EmptyField {
            key: spec.label().to_owned(),
        }),
        None => Ok(None),
    }
}

/// 基础类型字段：转换首个元素。
pub fn decode_primitive<T: Primitive>(
    slot: &mut T,
    spec: &FieldSpec,
    values: &ValueMap,
) -> Result<(), DecodeError> {
    let Some(resolved) = resolve(spec, values)? else {
        return Ok(());
    };
    let text = resolved.first();
    *slot = T::parse_text(text).map_err(|err| DecodeError::conversion(spec, None, text, err))?;
    Ok(())
}

/// 能力字段：在新的零值实例上以首个元素调用 [`TextDecode::decode_text`]，成功后整体移入。
pub fn decode_custom<T: TextDecode + Default>(
    slot: &mut T,
    spec: &FieldSpec,
    values: &ValueMap,
) -> Result<(), DecodeError> {
    let Some(resolved) = resolve(spec, values)? else {
        return Ok(());
    };
    let mut fresh = T::default();
    fresh
        .decode_text(resolved.first())
        .map_err(|err| DecodeError::CustomDecode {
            key: spec.label().to_owned(),
            index: None,
            source: err.into(),
        })?;
    *slot = fresh;
    Ok(())
}

/// 序列字段：按输入顺序逐元素解码，任一元素失败即整体失败并附带下标。
pub fn decode_sequence<E: Element>(
    slot: &mut Vec<E>,
    spec: &FieldSpec,
    values: &ValueMap,
) -> Result<(), DecodeError> {
    let Some(resolved) = resolve(spec, values)? else {
        return Ok(());
    };
    let mut decoded = Vec::with_capacity(resolved.len());
    for (index, text) in resolved.texts().enumerate() {
        let element =
            E::decode_element(text).map_err(|err| err.at_field(spec, Some(index), text))?;
        decoded.push(element);
    }
    *slot = decoded;
    Ok(())
}

/// 嵌套记录字段：构造零值实例，以同一个 `values` 递归解码，成功后移入父字段。
///
/// 嵌套记录与父记录共享完整键空间（不做前缀命名），内部错误原样向外传播。
pub fn decode_nested<R: Record + Default>(
    slot: &mut R,
    values: &ValueMap,
    ctx: &mut DecodeContext,
) -> Result<(), DecodeError> {
    let mut frame = ctx.enter_record()?;
    tracing::trace!(
        record = core::any::type_name::<R>(),
        depth = frame.current_depth(),
        "entering nested record"
    );
    let mut fresh = R::default();
    fresh.decode_fields(values, &mut frame)?;
    *slot = fresh;
    Ok(())
}

macro_rules! primitive_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                const KIND: Kind = <$ty as Primitive>::KIND;

                fn decode_field(
                    &mut self,
                    spec: &FieldSpec,
                    values: &ValueMap,
                    _ctx: &mut DecodeContext,
                ) -> Result<(), DecodeError> {
                    decode_primitive(self, spec, values)
                }
            }

            impl Element for $ty {
                const KIND: Kind = <$ty as Primitive>::KIND;

                fn decode_element(text: &str) -> Result<Self, ElementError> {
                    <$ty as Primitive>::parse_text(text).map_err(ElementError::from)
                }
            }
        )*
    };
}

primitive_field!(
    String, bool, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64,
);

impl<E: Element> Field for Vec<E> {
    const KIND: Kind = Kind::Sequence;

    fn decode_field(
        &mut self,
        spec: &FieldSpec,
        values: &ValueMap,
        _ctx: &mut DecodeContext,
    ) -> Result<(), DecodeError> {
        decode_sequence(self, spec, values)
    }
}

impl<T: TextDecode + Default> Field for T {
    const KIND: Kind = Kind::Custom;

    fn decode_field(
        &mut self,
        spec: &FieldSpec,
        values: &ValueMap,
        _ctx: &mut DecodeContext,
    ) -> Result<(), DecodeError> {
        decode_custom(self, spec, values)
    }
}

impl<T: TextDecode + Default> Element for T {
    const KIND: Kind = Kind::Custom;

    fn decode_element(text: &str) -> Result<Self, ElementError> {
        let mut fresh = T::default();
        fresh
            .decode_text(text)
            .map_err(|err| ElementError::Custom(err.into()))?;
        Ok(fresh)
    }
}
