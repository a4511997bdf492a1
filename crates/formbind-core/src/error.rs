//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 以封闭枚举承载解码失败的全部语义，调用方可按变体分支处理，而非解析格式化字符串；
//! - 每个变体携带结构化上下文（键、原始文本、元素下标、底层原因），并映射到稳定错误码。
//!
//! ## 设计要求（What）
//! - 所有错误类型派生 `thiserror::Error`，与 `std::error::Error` 生态兼容；
//! - 所有错误都是终止性的：输入是确定的静态数据，不存在可重试的失败。

use core::fmt;
use core::num::NonZeroU16;

use thiserror::Error;

use crate::field::FieldSpec;
use crate::primitive::Kind;

/// 自定义文本解码能力上报的错误统一装箱为该类型。
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 解码错误码，遵循 `<领域>.<语义>` 命名约定，便于在日志与告警中聚合检索。
pub mod codes {
    /// 目标不是可内省的记录类型。
    pub const CONTRACT_NOT_A_RECORD: &str = "contract.not_a_record";
    /// 字段类型既无基础转换也无文本解码能力。
    pub const CONTRACT_UNSUPPORTED_KIND: &str = "contract.unsupported_kind";
    /// 必填字段的键不存在。
    pub const FIELD_MISSING: &str = "field.missing";
    /// 必填字段的键存在但值序列为空。
    pub const FIELD_EMPTY: &str = "field.empty";
    /// 基础类型转换失败。
    pub const FIELD_CONVERSION: &str = "field.conversion";
    /// 自定义文本解码能力报告失败。
    pub const FIELD_CUSTOM_DECODE: &str = "field.custom_decode";
    /// 嵌套记录层级超过配置上限。
    pub const LIMIT_DEPTH_EXCEEDED: &str = "limit.depth_exceeded";
}

/// 基础类型转换失败的原因，附带目标 [`Kind`]。
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("empty input for {kind}")]
    Empty { kind: Kind },

    #[error("invalid {kind} literal")]
    InvalidSyntax { kind: Kind },

    #[error("negative literal for unsigned {kind}")]
    Negative { kind: Kind },

    #[error("literal out of range for {kind}")]
    OutOfRange { kind: Kind },

    /// 目标类别不在基础转换表中，属于调用方的模式错误而非数据错误。
    #[error("kind `{kind}` has no primitive conversion")]
    UnsupportedKind { kind: Kind },
}

impl ConversionError {
    /// 返回转换的目标类别。
    pub fn kind(&self) -> Kind {
        match self {
            Self::Empty { kind }
            | Self::InvalidSyntax { kind }
            | Self::Negative { kind }
            | Self::OutOfRange { kind }
            | Self::UnsupportedKind { kind } => *kind,
        }
    }
}

/// 调用契约被破坏：属于调用方或模式定义的缺陷，与输入数据无关。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("destination `{type_name}` is not a record")]
    NotARecord { type_name: &'static str },

    #[error("field kind `{kind}` has no conversion and no text decoding capability")]
    UnsupportedKind { kind: Kind },
}

/// 单个序列元素（或 [`parse_str`](crate::parse_str) 的单个值）解码失败。
///
/// 元素层面不知道字段键与下标，由引擎在 [`ElementError::at_field`] 中补齐上下文。
#[derive(Debug, Error)]
pub enum ElementError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("{0}")]
    Custom(#[source] BoxError),
}

impl ElementError {
    /// 将元素错误提升为字段级错误，附带键、元素下标与原始文本。
    pub fn at_field(self, spec: &FieldSpec, index: Option<usize>, text: &str) -> DecodeError {
        match self {
            Self::Conversion(source) => DecodeError::conversion(spec, index, text, source),
            Self::Custom(source) => DecodeError::CustomDecode {
                key: spec.label().to_owned(),
                index,
                source,
            },
        }
    }
}

/// 解码错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：把“缺字段”“空字段”“转换失败”“能力失败”“契约错误”拆成独立变体，
///   调用方可直接按变体决定返回 400 还是视为程序缺陷。
/// - **契约 (What)**：
///   - `key` 为字段声明的查找键；未声明键时回落为 Rust 字段名；
///   - `index` 仅在序列字段的逐元素解码失败时为 `Some`；
///   - 嵌套记录内部的错误原样向外传播，不做包装。
/// - **设计权衡 (Trade-offs)**：使用 `String` 保存键与原始文本，牺牲少量分配换取错误可脱离输入独立存活。
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("required field `{key}` is missing")]
    MissingField { key: String },

    #[error("required field `{key}` is empty")]
    EmptyField { key: String },

    #[error("field `{key}`{}: cannot convert `{text}`: {source}", ElementAt(.index))]
    Conversion {
        key: String,
        index: Option<usize>,
        text: String,
        #[source]
        source: ConversionError,
    },

    #[error("field `{key}`{}: custom decoding failed: {source}", ElementAt(.index))]
    CustomDecode {
        key: String,
        index: Option<usize>,
        #[source]
        source: BoxError,
    },

    #[error("nested records exceed the depth limit of {limit}")]
    DepthExceeded { limit: NonZeroU16 },
}

impl DecodeError {
    /// 构造转换错误；目标类别不受支持时改为契约错误。
    pub(crate) fn conversion(
        spec: &FieldSpec,
        index: Option<usize>,
        text: &str,
        source: ConversionError,
    ) -> Self {
        if let ConversionError::UnsupportedKind { kind } = source {
            return ContractError::UnsupportedKind { kind }.into();
        }
        Self::Conversion {
            key: spec.label().to_owned(),
            index,
            text: text.to_owned(),
            source,
        }
    }

    /// 返回稳定错误码，取值见 [`codes`]。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Contract(ContractError::NotARecord { .. }) => codes::CONTRACT_NOT_A_RECORD,
            Self::Contract(ContractError::UnsupportedKind { .. }) => {
                codes::CONTRACT_UNSUPPORTED_KIND
            }
            Self::MissingField { .. } => codes::FIELD_MISSING,
            Self::EmptyField { .. } => codes::FIELD_EMPTY,
            Self::Conversion { .. } => codes::FIELD_CONVERSION,
            Self::CustomDecode { .. } => codes::FIELD_CUSTOM_DECODE,
            Self::DepthExceeded { .. } => codes::LIMIT_DEPTH_EXCEEDED,
        }
    }

    /// 返回出错字段的键；契约错误与深度超限没有关联字段。
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingField { key }
            | Self::EmptyField { key }
            | Self::Conversion { key, .. }
            | Self::CustomDecode { key, .. } => Some(key),
            Self::Contract(_) | Self::DepthExceeded { .. } => None,
        }
    }

    /// 返回序列字段中出错元素的下标。
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Conversion { index, .. } | Self::CustomDecode { index, .. } => *index,
            _ => None,
        }
    }

    /// 是否属于调用方契约错误（而非输入数据错误）。
    pub fn is_contract(&self) -> bool {
        matches!(self, Self::Contract(_))
    }
}

struct ElementAt<'a>(&'a Option<usize>);

impl fmt::Display for ElementAt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(index) => write!(f, "[{index}]"),
            None => Ok(()),
        }
    }
}
