//! 永久记忆：有序、按位置寻址的字符串序列
//!
//! 键就是下标：删除第 k 条后，其后所有条目的键减一。越界的删除 / 覆盖只返回 None（上报而非报错），
//! 存储内容保持不变。

/// 按位置寻址的记忆存储，由 memory_* 命令独占
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条记忆，键为当前长度
    pub fn append(&mut self, value: impl Into<String>) -> String {
        let value = value.into();
        let text = format!("Committing memory with string \"{value}\" ");
        self.entries.push(value);
        tracing::info!(key = self.entries.len() - 1, "memory appended");
        text
    }

    /// 删除第 key 条；越界返回 None 且不改动存储
    pub fn delete(&mut self, key: i128) -> Option<String> {
        let Some(index) = self.index(key) else {
            tracing::warn!(key = %key, len = self.entries.len(), "Invalid key, cannot delete memory.");
            return None;
        };
        self.entries.remove(index);
        let text = format!("Deleting memory with key {key}");
        tracing::info!("{text}");
        Some(text)
    }

    /// 原地覆盖第 key 条（不重新编号）；越界返回 None
    pub fn overwrite(&mut self, key: i128, value: impl Into<String>) -> Option<String> {
        let Some(index) = self.index(key) else {
            tracing::warn!(key = %key, len = self.entries.len(), "Invalid key, cannot overwrite memory.");
            return None;
        };
        let value = value.into();
        let text = format!("Overwriting memory with key {key} and string {value}");
        self.entries[index] = value;
        tracing::info!(key = %key, "memory overwritten");
        Some(text)
    }

    pub fn get(&self, key: i128) -> Option<&str> {
        self.index(key).map(|i| self.entries[i].as_str())
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index(&self, key: i128) -> Option<usize> {
        usize::try_from(key).ok().filter(|&i| i < self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_delete_overwrite_scenario() {
        let mut store = MemoryStore::new();
        store.append("A");
        store.append("B");
        assert_eq!(store.entries(), ["A", "B"]);

        assert_eq!(store.delete(0).as_deref(), Some("Deleting memory with key 0"));
        assert_eq!(store.entries(), ["B"]);

        assert_eq!(
            store.overwrite(0, "C").as_deref(),
            Some("Overwriting memory with key 0 and string C")
        );
        assert_eq!(store.entries(), ["C"]);
    }

    #[test]
    fn test_append_text() {
        let mut store = MemoryStore::new();
        assert_eq!(store.append("hello"), "Committing memory with string \"hello\" ");
        assert_eq!(store.get(0), Some("hello"));
    }

    #[test]
    fn test_delete_first_shifts_remaining() {
        let mut store = MemoryStore::new();
        for s in ["a", "b", "c", "d"] {
            store.append(s);
        }
        store.delete(0);
        assert_eq!(store.entries(), ["b", "c", "d"]);
        assert_eq!(store.get(0), Some("b"));
        assert_eq!(store.get(2), Some("d"));
        assert_eq!(store.get(3), None);
    }

    #[test]
    fn test_out_of_range_is_reported_noop() {
        let mut store = MemoryStore::new();
        store.append("only");

        for key in [-1, 1, 42, i128::from(i64::MIN), i128::from(u64::MAX), i128::MAX] {
            assert!(store.delete(key).is_none());
            assert!(store.overwrite(key, "x").is_none());
        }
        assert_eq!(store.entries(), ["only"]);
    }

    #[test]
    fn test_empty_store() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(store.delete(0).is_none());
        assert!(store.overwrite(0, "x").is_none());
        assert_eq!(store.len(), 0);
    }
}
