//! 内存文档集合
//!
//! 使用 DashMap 实现的内存集合，按主键提供唯一约束，
//! 供本地开发（`storage.backend = "memory"`）和测试使用。

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 带唯一主键的内存集合
///
/// 每条记录附带写入序号，`list` 系列方法按写入顺序返回，
/// 与数据库按主键自增顺序返回的行为一致。
#[derive(Debug)]
pub struct MemoryStore<T> {
    data: Arc<DashMap<String, (u64, T)>>,
    next_seq: Arc<AtomicU64>,
}

impl<T: Clone> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    fn seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }

    /// 插入或覆盖
    pub fn upsert(&self, id: &str, value: T) {
        let seq = self.seq();
        self.data.insert(id.to_string(), (seq, value));
    }

    /// 仅在主键不存在时插入，返回是否插入成功
    ///
    /// 判断与写入在同一个分片锁内完成，相当于唯一索引。
    pub fn insert_unique(&self, id: &str, value: T) -> bool {
        match self.data.entry(id.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert((self.seq(), value));
                true
            }
        }
    }

    /// 返回数据的克隆，不持有锁
    pub fn get(&self, id: &str) -> Option<T> {
        self.data.get(id).map(|entry| entry.value().1.clone())
    }

    /// 在持有该主键写锁的情况下修改记录
    ///
    /// 记录不存在时返回 None
    pub fn update_with<R>(&self, id: &str, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.data.get_mut(id).map(|mut entry| f(&mut entry.value_mut().1))
    }

    /// 在持有写锁的情况下修改记录，不存在时先写入 `init()`
    pub fn upsert_with<R>(
        &self,
        id: &str,
        init: impl FnOnce() -> T,
        f: impl FnOnce(&mut T) -> R,
    ) -> R {
        let mut entry = self
            .data
            .entry(id.to_string())
            .or_insert_with(|| (self.seq(), init()));
        f(&mut entry.value_mut().1)
    }

    /// 删除数据，返回被删除的值
    pub fn remove(&self, id: &str) -> Option<T> {
        self.data.remove(id).map(|(_, (_, v))| v)
    }

    /// 按写入顺序列出所有数据
    pub fn list(&self) -> Vec<T> {
        self.list_by(|_| true)
    }

    /// 按写入顺序筛选数据
    pub fn list_by<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        let mut rows: Vec<(u64, T)> = self
            .data
            .iter()
            .filter(|entry| predicate(&entry.value().1))
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        rows.into_iter().map(|(_, v)| v).collect()
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.data.contains_key(id)
    }
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            next_seq: Arc::clone(&self.next_seq),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_unique_rejects_existing_key() {
        let store: MemoryStore<i32> = MemoryStore::new();

        assert!(store.insert_unique("a", 1));
        assert!(!store.insert_unique("a", 2));
        assert_eq!(store.get("a"), Some(1));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_update_with_missing_key() {
        let store: MemoryStore<i32> = MemoryStore::new();
        assert_eq!(store.update_with("missing", |v| *v += 1), None);

        store.upsert("k", 10);
        assert_eq!(store.update_with("k", |v| {
            *v += 1;
            *v
        }), Some(11));
        assert_eq!(store.get("k"), Some(11));
    }

    #[test]
    fn test_upsert_with_initializes_then_modifies() {
        let store: MemoryStore<i64> = MemoryStore::new();
        let bump = |v: &mut i64| {
            *v += 1;
            *v
        };

        assert_eq!(store.upsert_with("seq", || 0, bump), 1);
        assert_eq!(store.upsert_with("seq", || 0, bump), 2);
        assert_eq!(store.get("seq"), Some(2));
    }

    #[test]
    fn test_list_preserves_write_order() {
        let store: MemoryStore<&'static str> = MemoryStore::new();
        store.upsert("z", "first");
        store.upsert("a", "second");
        store.upsert("m", "third");

        assert_eq!(store.list(), vec!["first", "second", "third"]);
        assert_eq!(store.list_by(|v| v.starts_with('s')), vec!["second"]);
    }

    #[test]
    fn test_remove_and_clone_share_data() {
        let store: MemoryStore<i32> = MemoryStore::new();
        let view = store.clone();
        store.upsert("x", 5);

        assert!(view.contains("x"));
        assert_eq!(view.remove("x"), Some(5));
        assert!(!store.contains("x"));
    }
}
