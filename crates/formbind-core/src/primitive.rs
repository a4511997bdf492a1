//! 基础类型转换器：把一个字符串转换为固定集合中的一种标量。
//!
//! 转换器无状态、纯函数，不感知记录结构；类型化入口为 [`Primitive::parse_text`]，
//! 动态入口为 [`convert`]。

use core::fmt;
use core::num::{IntErrorKind, ParseIntError};
use core::str::FromStr;

use crate::error::ConversionError;

/// 字段或元素类型的类别。
///
/// ## 设计目的（Why）
/// - 既用于描述基础转换表的目标（`Text` 至 `F64`），也用于在错误与模式内省中标注非基础类别；
/// - 非基础类别（`Custom`/`Record`/`Sequence`）传入 [`convert`] 时返回
///   [`ConversionError::UnsupportedKind`]。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Kind {
    Text,
    Bool,
    U8,
    U16,
    U32,
    U64,
    Usize,
    I8,
    I16,
    I32,
    I64,
    Isize,
    F32,
    F64,
    /// 通过 [`TextDecode`](crate::TextDecode) 能力解码的类型。
    Custom,
    /// 派生了 [`Record`](crate::Record) 的嵌套记录。
    Record,
    /// `Vec<E>` 序列。
    Sequence,
}

impl Kind {
    /// 返回类别的稳定字符串描述。
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Custom => "custom",
            Self::Record => "record",
            Self::Sequence => "sequence",
        }
    }

    /// 是否位于基础转换表中。
    #[inline]
    pub const fn is_primitive(self) -> bool {
        !matches!(self, Self::Custom | Self::Record | Self::Sequence)
    }

    /// 是否为嵌套记录。
    #[inline]
    pub const fn is_record(self) -> bool {
        matches!(self, Self::Record)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// [`convert`] 的动态结果。
#[derive(Clone, Debug, PartialEq)]
pub enum PrimitiveValue {
    Text(String),
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    F32(f32),
    F64(f64),
}

impl PrimitiveValue {
    /// 返回值对应的类别。
    pub fn kind(&self) -> Kind {
        match self {
            Self::Text(_) => Kind::Text,
            Self::Bool(_) => Kind::Bool,
            Self::U8(_) => Kind::U8,
            Self::U16(_) => Kind::U16,
            Self::U32(_) => Kind::U32,
            Self::U64(_) => Kind::U64,
            Self::Usize(_) => Kind::Usize,
            Self::I8(_) => Kind::I8,
            Self::I16(_) => Kind::I16,
            Self::I32(_) => Kind::I32,
            Self::I64(_) => Kind::I64,
            Self::Isize(_) => Kind::Isize,
            Self::F32(_) => Kind::F32,
            Self::F64(_) => Kind::F64,
        }
    }
}

/// 以规范形式输出：整数为十进制、布尔为 `true`/`false`、浮点为最短可回读表示。
impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Bool(value) => write!(f, "{value}"),
            Self::U8(value) => write!(f, "{value}"),
            Self::U16(value) => write!(f, "{value}"),
            Self::U32(value) => write!(f, "{value}"),
            Self::U64(value) => write!(f, "{value}"),
            Self::Usize(value) => write!(f, "{value}"),
            Self::I8(value) => write!(f, "{value}"),
            Self::I16(value) => write!(f, "{value}"),
            Self::I32(value) => write!(f, "{value}"),
            Self::I64(value) => write!(f, "{value}"),
            Self::Isize(value) => write!(f, "{value}"),
            Self::F32(value) => write!(f, "{value}"),
            Self::F64(value) => write!(f, "{value}"),
        }
    }
}

/// 基础转换表中的类型。
///
/// ### 契约说明（What）
/// - `parse_text` 为纯函数，失败时返回携带 [`Self::KIND`] 的 [`ConversionError`]；
/// - `into_value` 将类型化结果装入 [`PrimitiveValue`]，供动态入口 [`convert`] 复用。
pub trait Primitive: Sized {
    const KIND: Kind;

    fn parse_text(text: &str) -> Result<Self, ConversionError>;

    fn into_value(self) -> PrimitiveValue;
}

/// 按 `kind` 转换一个字符串。
///
/// # 教案式说明
/// - **意图 (Why)**：为无法在编译期确定目标类型的宿主（例如按模式表驱动的校验器）提供动态入口。
/// - **契约 (What)**：
///   - 基础类别的语义与 [`Primitive::parse_text`] 完全一致；
///   - 非基础类别返回 [`ConversionError::UnsupportedKind`]，这是模式缺陷而非数据错误。
pub fn convert(text: &str, kind: Kind) -> Result<PrimitiveValue, ConversionError> {
    match kind {
        Kind::Text => typed::<String>(text),
        Kind::Bool => typed::<bool>(text),
        Kind::U8 => typed::<u8>(text),
        Kind::U16 => typed::<u16>(text),
        Kind::U32 => typed::<u32>(text),
        Kind::U64 => typed::<u64>(text),
        Kind::Usize => typed::<usize>(text),
        Kind::I8 => typed::<i8>(text),
        Kind::I16 => typed::<i16>(text),
        Kind::I32 => typed::<i32>(text),
        Kind::I64 => typed::<i64>(text),
        Kind::Isize => typed::<isize>(text),
        Kind::F32 => typed::<f32>(text),
        Kind::F64 => typed::<f64>(text),
        Kind::Custom | Kind::Record | Kind::Sequence => {
            Err(ConversionError::UnsupportedKind { kind })
        }
    }
}

fn typed<T: Primitive>(text: &str) -> Result<PrimitiveValue, ConversionError> {
    T::parse_text(text).map(T::into_value)
}

impl Primitive for String {
    const KIND: Kind = Kind::Text;

    fn parse_text(text: &str) -> Result<Self, ConversionError> {
        Ok(text.to_owned())
    }

    fn into_value(self) -> PrimitiveValue {
        PrimitiveValue::Text(self)
    }
}

impl Primitive for bool {
    const KIND: Kind = Kind::Bool;

    /// 布尔字面量语法固定为 `1 t T TRUE true True` 与 `0 f F FALSE false False`。
    fn parse_text(text: &str) -> Result<Self, ConversionError> {
        match text {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            "" => Err(ConversionError::Empty { kind: Kind::Bool }),
            _ => Err(ConversionError::InvalidSyntax { kind: Kind::Bool }),
        }
    }

    fn into_value(self) -> PrimitiveValue {
        PrimitiveValue::Bool(self)
    }
}

macro_rules! unsigned_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const KIND: Kind = Kind::$kind;

                fn parse_text(text: &str) -> Result<Self, ConversionError> {
                    parse_unsigned(text, Kind::$kind)
                }

                fn into_value(self) -> PrimitiveValue {
                    PrimitiveValue::$kind(self)
                }
            }
        )*
    };
}

macro_rules! signed_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const KIND: Kind = Kind::$kind;

                fn parse_text(text: &str) -> Result<Self, ConversionError> {
                    text.parse::<$ty>().map_err(|err| int_error(&err, Kind::$kind))
                }

                fn into_value(self) -> PrimitiveValue {
                    PrimitiveValue::$kind(self)
                }
            }
        )*
    };
}

macro_rules! float_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const KIND: Kind = Kind::$kind;

                fn parse_text(text: &str) -> Result<Self, ConversionError> {
                    if text.is_empty() {
                        return Err(ConversionError::Empty { kind: Kind::$kind });
                    }
                    text.parse::<$ty>()
                        .map_err(|_| ConversionError::InvalidSyntax { kind: Kind::$kind })
                }

                fn into_value(self) -> PrimitiveValue {
                    PrimitiveValue::$kind(self)
                }
            }
        )*
    };
}

unsigned_primitive!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize);
signed_primitive!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize);
float_primitive!(f32 => F32, f64 => F64);

/// 无符号整数不接受任何符号前缀：`-` 归为 `Negative`，`+` 归为语法错误。
fn parse_unsigned<T>(text: &str, kind: Kind) -> Result<T, ConversionError>
where
    T: FromStr<Err = ParseIntError>,
{
    match text.as_bytes().first() {
        None => Err(ConversionError::Empty { kind }),
        Some(b'-') => Err(ConversionError::Negative { kind }),
        Some(b'+') => Err(ConversionError::InvalidSyntax { kind }),
        Some(_) => text.parse::<T>().map_err(|err| int_error(&err, kind)),
    }
}

fn int_error(err: &ParseIntError, kind: Kind) -> ConversionError {
    match err.kind() {
        IntErrorKind::Empty => ConversionError::Empty { kind },
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ConversionError::OutOfRange { kind }
        }
        _ => ConversionError::InvalidSyntax { kind },
    }
}
