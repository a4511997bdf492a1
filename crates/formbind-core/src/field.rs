/// 字段的静态元数据：查找键、是否必填、缺省值。
///
/// ## 设计目的（Why）
/// - 由 `#[derive(Record)]` 以 `const` 表的形式为每个公开字段生成，按声明顺序排列；
/// - 元数据对给定类型不可变，常量表即是“按类型记忆化”的实现，天然线程安全，无需运行时缓存。
///
/// ## 契约定义（What）
/// - `key` 为 `None` 表示字段不参与任何键查找（常见于纯透传的嵌套记录）；
/// - `default` 只在键完全缺失时生效；键存在但值序列为空时仅由 `required` 决定结果；
/// - `name` 为 Rust 字段名，仅用于诊断。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    name: &'static str,
    key: Option<&'static str>,
    required: bool,
    default: Option<&'static str>,
}

impl FieldSpec {
    /// 以字段名构造：无键、非必填、无缺省值。
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            key: None,
            required: false,
            default: None,
        }
    }

    pub const fn with_key(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn key(&self) -> Option<&'static str> {
        self.key
    }

    #[inline]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    pub const fn default_value(&self) -> Option<&'static str> {
        self.default
    }

    /// 诊断用标签：优先返回键，未声明键时回落为字段名。
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self.key {
            Some(key) => key,
            None => self.name,
        }
    }
}
