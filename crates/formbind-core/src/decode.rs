//! 解码入口。
//!
//! - [`decode`] / [`decode_with`]：向调用方持有的记录写入字段，失败时已写入字段不回滚；
//! - [`decode_new`]：从 `Default` 实例开始解码并按值返回，失败时不暴露部分状态；
//! - [`parse_str`]：单个字符串到单个值的便捷入口，规则与序列元素解码一致；
//! - [`Decoder`]：持有 [`DecodeOptions`] 的可复用句柄。

use core::any::type_name;

use crate::context::DecodeContext;
use crate::engine::{Element, Record};
use crate::error::{DecodeError, ElementError};
use crate::options::DecodeOptions;
use crate::value_map::ValueMap;

/// 以默认选项将 `values` 解码进 `dst`。
///
/// 已存在于 `dst` 中且未被输入覆盖的字段保持原值；首个错误即返回。
pub fn decode<R: Record>(dst: &mut R, values: &ValueMap) -> Result<(), DecodeError> {
    decode_with(dst, values, &DecodeOptions::default())
}

/// 以指定选项将 `values` 解码进 `dst`。
///
/// # 教案式拆解
/// - **操作步骤 (How)**：
///   1. 为本次调用创建独立的 [`DecodeContext`]；
///   2. 顶层记录占用第一层，随后按声明顺序解码各字段；
///   3. 失败时以 `debug` 级别记录错误码与键，错误本身原样返回。
/// - **契约 (What)**：`values` 只读；同一个 `values` 可并发供多个调用使用。
pub fn decode_with<R: Record>(
    dst: &mut R,
    values: &ValueMap,
    options: &DecodeOptions,
) -> Result<(), DecodeError> {
    let span = tracing::debug_span!("formbind.decode", record = type_name::<R>());
    let _entered = span.enter();

    let mut ctx = DecodeContext::new(options);
    let result = ctx
        .enter_record()
        .and_then(|mut frame| dst.decode_fields(values, &mut frame));

    match &result {
        Ok(()) => tracing::trace!(keys = values.len(), "decode finished"),
        Err(err) => tracing::debug!(
            code = err.code(),
            key = err.key(),
            error = %err,
            "decode failed"
        ),
    }
    result
}

/// 从 `R::default()` 开始解码并返回新实例。
pub fn decode_new<R: Record + Default>(values: &ValueMap) -> Result<R, DecodeError> {
    let mut record = R::default();
    decode(&mut record, values)?;
    Ok(record)
}

/// 将单个字符串解码为单个值：有文本解码能力时使用能力，否则走基础转换。
pub fn parse_str<T: Element>(text: &str) -> Result<T, ElementError> {
    T::decode_element(text)
}

/// 持有解码选项的可复用解码器。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn decode<R: Record>(&self, dst: &mut R, values: &ValueMap) -> Result<(), DecodeError> {
        decode_with(dst, values, &self.options)
    }

    pub fn decode_new<R: Record + Default>(&self, values: &ValueMap) -> Result<R, DecodeError> {
        let mut record = R::default();
        self.decode(&mut record, values)?;
        Ok(record)
    }
}
