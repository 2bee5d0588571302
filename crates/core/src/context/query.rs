//! Query 参数
//!
//! 同名参数出现多次时保留全部取值。

use indexmap::IndexMap;

/// 单个 query 参数的取值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    Multiple(Vec<String>),
}

impl QueryValue {
    /// 第一个取值（同名参数出现多次时取第一个）
    pub fn first(&self) -> Option<&str> {
        match self {
            QueryValue::Single(value) => Some(value),
            QueryValue::Multiple(values) => values.first().map(String::as_str),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            QueryValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = QueryValue::Multiple(vec![first, value]);
            }
            QueryValue::Multiple(values) => values.push(value),
        }
    }
}

/// 按出现顺序保存的 query 映射
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    entries: IndexMap<String, QueryValue>,
}

impl Query {
    /// 解析 `a=1&b=2&a=3` 形式的 query 字符串
    pub fn parse(raw: &str) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)?;
        Ok(pairs.into_iter().collect())
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.get(key)
    }

    /// 参数的第一个取值
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(QueryValue::first)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl FromIterator<(String, String)> for Query {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut entries: IndexMap<String, QueryValue> = IndexMap::new();
        for (key, value) in iter {
            match entries.get_mut(&key) {
                Some(existing) => existing.push(value),
                None => {
                    entries.insert(key, QueryValue::Single(value));
                }
            }
        }
        Self { entries }
    }
}
