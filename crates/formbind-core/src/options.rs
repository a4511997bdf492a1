use core::num::NonZeroU16;

/// 解码选项。
///
/// ### 设计目标（Why）
/// - 记录嵌套层级由类型在编译期固定，与输入无关，因此默认不设上限；
/// - 宿主若要约束可接受的记录形状（例如只允许扁平表单），可显式配置 `max_depth`；
/// - 选项为纯数据，可由宿主从自身配置文件加载（启用 `serde` 特性后支持反序列化）。
///
/// ### 契约说明（What）
/// - `max_depth` 计入顶层记录：`1` 表示只允许扁平记录；`None`（默认）表示不设上限；
/// - 反序列化时缺省字段回落为 [`Default`]，未知字段被拒绝。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct DecodeOptions {
    pub max_depth: Option<NonZeroU16>,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 不限制记录层级，与 [`Default`] 相同。
    pub fn unbounded() -> Self {
        Self { max_depth: None }
    }

    pub fn with_max_depth(mut self, max_depth: NonZeroU16) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
