//! 记录模式内省。
//!
//! 嵌套记录与父记录共享同一个扁平键空间，因此“记录消费哪些键”需要展开整棵记录树。
//! 宿主可据此拒绝未知参数，或生成文档与帮助信息。

use std::collections::BTreeSet;

use crate::engine::Record;
use crate::field::FieldSpec;
use crate::value_map::ValueMap;

/// 按声明顺序（深度优先展开嵌套记录）返回记录消费的全部叶子字段。
pub fn field_specs<R: Record>() -> Vec<&'static FieldSpec> {
    let mut specs = Vec::new();
    R::visit_fields(&mut |spec| specs.push(spec));
    specs
}

/// 返回记录消费的全部键，保持首次出现的顺序并去重；未声明键的字段不计入。
pub fn keys<R: Record>() -> Vec<&'static str> {
    let mut seen = BTreeSet::new();
    let mut keys = Vec::new();
    R::visit_fields(&mut |spec| {
        if let Some(key) = spec.key()
            && seen.insert(key)
        {
            keys.push(key);
        }
    });
    keys
}

/// 返回 `values` 中没有任何字段消费的键，按键的字典序排列。
pub fn unknown_keys<'v, R: Record>(values: &'v ValueMap) -> Vec<&'v str> {
    let known: BTreeSet<&'static str> = keys::<R>().into_iter().collect();
    values.keys().filter(|key| !known.contains(*key)).collect()
}
