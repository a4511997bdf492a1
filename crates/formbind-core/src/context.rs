use core::num::NonZeroU16;
use core::ops::{Deref, DerefMut};

use crate::error::DecodeError;
use crate::options::DecodeOptions;

/// `DecodeContext` 承载单次解码调用的可变状态。
///
/// # 设计背景（Why）
/// - 嵌套记录共享父记录的完整键空间并递归解码，层级上限需要在整棵记录树的遍历中统一计数；
/// - 上下文只属于一次调用，不跨调用共享，因此无需任何同步原语。
///
/// # 逻辑解析（How）
/// - `new` 从 [`DecodeOptions`] 读取层级上限；
/// - [`Self::enter_record`] 进入一层记录并返回守卫，守卫释放时自动回退层级。
///
/// # 契约说明（What）
/// - **前置条件**：无；
/// - **后置条件**：每个成功的 `enter_record` 都与一次守卫析构配对，调用结束后 `current_depth` 归零。
#[derive(Debug)]
pub struct DecodeContext {
    max_depth: Option<NonZeroU16>,
    current_depth: u16,
}

impl DecodeContext {
    pub fn new(options: &DecodeOptions) -> Self {
        Self {
            max_depth: options.max_depth,
            current_depth: 0,
        }
    }

    /// 返回可选的最大记录层级。
    pub fn max_depth(&self) -> Option<NonZeroU16> {
        self.max_depth
    }

    /// 查询当前已进入的记录层级；顶层记录为 1。
    pub fn current_depth(&self) -> u16 {
        self.current_depth
    }

    /// 进入一层记录。
    ///
    /// # 教案式拆解
    /// - **意图 (Why)**：把层级限制集中在上下文中，派生代码与手写 `Record` 实现都无需自行防御。
    /// - **操作步骤 (How)**：
    ///   1. 若已达到上限，返回 [`DecodeError::DepthExceeded`]；
    ///   2. 否则层级加一，返回持有上下文可变引用的守卫；
    ///   3. 守卫可解引用为上下文，递归解码直接在守卫上进行。
    /// - **契约 (What)**：失败路径不修改层级计数。
    pub fn enter_record(&mut self) -> Result<DecodeFrameGuard<'_>, DecodeError> {
        if let Some(limit) = self.max_depth
            && self.current_depth >= limit.get()
        {
            return Err(DecodeError::DepthExceeded { limit });
        }

        // 层级受 `u16` 限制；未配置上限时饱和处理即可，实际记录树远达不到该深度。
        self.current_depth = self.current_depth.saturating_add(1);

        Ok(DecodeFrameGuard { ctx: self })
    }
}

/// `DecodeFrameGuard` 在析构时回退记录层级。
///
/// - **Why**：保证 `?` 提前返回的错误路径同样会释放层级，避免手动配对出错。
/// - **What**：只能通过 [`DecodeContext::enter_record`] 获取；可解引用为 [`DecodeContext`]。
#[must_use = "guard drops to release the record depth"]
pub struct DecodeFrameGuard<'ctx> {
    ctx: &'ctx mut DecodeContext,
}

impl Deref for DecodeFrameGuard<'_> {
    type Target = DecodeContext;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl DerefMut for DecodeFrameGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl Drop for DecodeFrameGuard<'_> {
    fn drop(&mut self) {
        self.ctx.current_depth = self.ctx.current_depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_releases_depth_on_drop() {
        let options = DecodeOptions::new().with_max_depth(NonZeroU16::new(2).unwrap());
        let mut ctx = DecodeContext::new(&options);
        {
            let mut outer = ctx.enter_record().expect("第一层应成功");
            assert_eq!(outer.current_depth(), 1);
            {
                let mut inner = outer.enter_record().expect("第二层应成功");
                assert_eq!(inner.current_depth(), 2);
                let err = inner.enter_record().err().expect("第三层应超限");
                assert!(matches!(err, DecodeError::DepthExceeded { limit } if limit.get() == 2));
                assert_eq!(inner.current_depth(), 2, "失败路径不应修改层级");
            }
            assert_eq!(outer.current_depth(), 1);
        }
        assert_eq!(ctx.current_depth(), 0, "守卫释放后层级归零");
    }

    #[test]
    fn unbounded_context_never_rejects() {
        let mut ctx = DecodeContext::new(&DecodeOptions::unbounded());
        let mut frame = ctx.enter_record().unwrap();
        let mut frame = frame.enter_record().unwrap();
        let frame = frame.enter_record().unwrap();
        assert_eq!(frame.current_depth(), 3);
        assert_eq!(frame.max_depth(), None);
    }
}
