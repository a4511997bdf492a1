use std::collections::{BTreeMap, HashMap, btree_map};

/// 键 → 有序字符串序列的映射，即解码引擎的输入。
///
/// ## 设计目的（Why）
/// - 与 URL 查询串、表单体、重复的命令行参数等上游生产者的形态一致：同一个键可出现多次；
/// - 每个键下的顺序有语义：它决定序列字段的元素顺序。
///
/// ## 契约定义（What）
/// - 键唯一；引擎只读访问，从不写回（缺省值在引擎内部做局部替换）；
/// - 键存在但序列为空是合法状态，与“键缺失”语义不同。
///
/// ## 设计权衡（Trade-offs）
/// - 底层使用 `BTreeMap`，使 `Debug` 输出与迭代顺序稳定，便于测试与日志比对。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由键值对序列构造，重复的键按出现顺序累积。
    ///
    /// 这是表单解析器（`application/x-www-form-urlencoded`）产出的典型形态。
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (key, value) in pairs {
            map.append(key, value);
        }
        map
    }

    /// 以新序列替换某个键的全部值，返回旧序列。
    pub fn insert<K, I>(&mut self, key: K, values: I) -> Option<Vec<String>>
    where
        K: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.entries
            .insert(key.into(), values.into_iter().map(Into::into).collect())
    }

    /// 向某个键追加一个值，键不存在时创建。
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// 返回某个键的首个值。
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(<[String]>::first)
            .map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }
}

/// [`ValueMap::iter`] 的迭代器，按键的字典序产出 `(键, 值序列)`。
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, Vec<String>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a [String]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a ValueMap {
    type Item = (&'a str, &'a [String]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<BTreeMap<String, Vec<String>>> for ValueMap {
    fn from(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self { entries }
    }
}

impl<S> From<HashMap<String, Vec<String>, S>> for ValueMap {
    fn from(entries: HashMap<String, Vec<String>, S>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

impl<K, I, const N: usize> From<[(K, I); N]> for ValueMap
where
    K: Into<String>,
    I: IntoIterator,
    I::Item: Into<String>,
{
    fn from(entries: [(K, I); N]) -> Self {
        let mut map = Self::new();
        for (key, values) in entries {
            map.insert(key, values);
        }
        map
    }
}

impl<K, V> FromIterator<(K, V)> for ValueMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}

impl<K, V> Extend<(K, V)> for ValueMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.append(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_accumulate_in_encounter_order() {
        let map = ValueMap::from_pairs([("ints", "3"), ("name", "bob"), ("ints", "1")]);
        assert_eq!(map.get("ints"), Some(&["3".to_owned(), "1".to_owned()][..]));
        assert_eq!(map.first("name"), Some("bob"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn empty_sequence_is_distinct_from_missing_key() {
        let map = ValueMap::from([("empty", Vec::<&str>::new())]);
        assert!(map.contains_key("empty"));
        assert_eq!(map.get("empty"), Some(&[][..]));
        assert_eq!(map.first("empty"), None);
        assert_eq!(map.get("missing"), None);
    }

    #[test]
    fn insert_replaces_and_append_extends() {
        let mut map = ValueMap::new();
        assert_eq!(map.insert("k", ["a", "b"]), None);
        map.append("k", "c");
        assert_eq!(
            map.insert("k", ["z"]),
            Some(vec!["a".to_owned(), "b".to_owned(), "c".to_owned()])
        );
        let collected: Vec<_> = map.iter().collect();
        assert_eq!(collected, vec![("k", &["z".to_owned()][..])]);
    }

    #[test]
    fn converts_from_hash_map() {
        let mut raw = HashMap::new();
        raw.insert("a".to_owned(), vec!["1".to_owned()]);
        let map = ValueMap::from(raw);
        assert_eq!(map.first("a"), Some("1"));
    }
}
