//! 自定义文本解码能力。
//!
//! 任何字段类型都可以通过实现 [`TextDecode`] 声明“我能从一个字符串构造自己”。
//! 该能力在分派中优先于基础转换与嵌套记录递归：标量字段只取值序列的首个元素，
//! 序列字段 `Vec<E>` 则对每个元素分别调用 `E` 的能力。
//!
//! 能力类型自身即便是集合形态（例如包装 `Vec<String>` 的新类型），也只会收到首个原始字符串。

use crate::error::BoxError;

/// 从单个字符串原地构造自身。
///
/// # 教案式说明
/// - **意图 (Why)**：让日期、枚举、带校验的新类型等领域类型接入解码流程，而无需引擎了解其语法。
/// - **契约 (What)**：
///   - 引擎总是在一个新构造的 `Default` 实例上调用 `decode_text`，成功后整体移入字段；
///   - 返回 `Err` 即视为该字段致命失败，不重试、不回落到缺省值；
///   - 每个标量字段至多调用一次，每个序列元素至多调用一次。
/// - **实现方式 (How)**：实现该 trait 并提供 `Default`，即可自动获得
///   [`Field`](crate::Field) 与 [`Element`](crate::Element)；派生了 `Record` 的结构体需要额外标注
///   `#[formbind(text)]` 才能走该能力。
pub trait TextDecode {
    type Error: Into<BoxError>;

    fn decode_text(&mut self, text: &str) -> Result<(), Self::Error>;
}
