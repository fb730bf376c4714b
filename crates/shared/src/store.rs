//! 内存存储
//!
//! 使用 DashMap 实现的高并发内存存储。本系统把持久化视为外部协作方，
//! 演示环境用内存快照代替数据库；分群引擎每次调用都拿到调用方提供的
//! 全量快照，存储层不做任何跨调用缓存。

use dashmap::DashMap;
use std::sync::Arc;

/// 通用内存存储
///
/// 基于 DashMap 实现，支持高并发读写操作。
#[derive(Debug)]
pub struct MemoryStore<T> {
    data: Arc<DashMap<String, T>>,
}

impl<T: Clone> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> MemoryStore<T> {
    /// 创建新的内存存储实例
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    /// 插入或更新数据
    ///
    /// 如果 key 已存在则覆盖原有数据
    pub fn insert(&self, id: &str, value: T) {
        self.data.insert(id.to_string(), value);
    }

    /// 获取数据
    ///
    /// 返回数据的克隆，不持有锁
    pub fn get(&self, id: &str) -> Option<T> {
        self.data.get(id).map(|v| v.clone())
    }

    /// 删除数据
    ///
    /// 返回被删除的数据
    pub fn remove(&self, id: &str) -> Option<T> {
        self.data.remove(id).map(|(_, v)| v)
    }

    /// 列出所有数据
    pub fn list(&self) -> Vec<T> {
        self.data
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// 按条件筛选数据
    pub fn list_by<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.data
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// 原地更新单条数据
    ///
    /// 返回是否命中。闭包在分段锁内执行，应保持轻量。
    pub fn update<F>(&self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        match self.data.get_mut(id) {
            Some(mut entry) => {
                f(entry.value_mut());
                true
            }
            None => false,
        }
    }

    /// 获取数据总数
    pub fn count(&self) -> usize {
        self.data.len()
    }

    /// 检查是否存在指定 key
    pub fn contains(&self, id: &str) -> bool {
        self.data.contains_key(id)
    }

    /// 清空所有数据
    pub fn clear(&self) {
        self.data.clear();
    }

    /// 批量插入数据
    ///
    /// 接收一个迭代器，提取每个元素的 key 并插入
    pub fn insert_many<I, F>(&self, items: I, key_fn: F)
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> String,
    {
        for item in items {
            let key = key_fn(&item);
            self.data.insert(key, item);
        }
    }
}

impl<T: Clone> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct TestItem {
        id: String,
        value: i32,
    }

    #[test]
    fn test_memory_store_crud() {
        let store: MemoryStore<TestItem> = MemoryStore::new();

        let item = TestItem {
            id: "test-1".to_string(),
            value: 42,
        };
        store.insert("test-1", item.clone());
        assert_eq!(store.get("test-1").unwrap(), item);

        let updated = TestItem {
            id: "test-1".to_string(),
            value: 43,
        };
        store.insert("test-1", updated.clone());
        assert_eq!(store.get("test-1").unwrap(), updated);

        assert_eq!(store.remove("test-1"), Some(updated));
        assert!(store.get("test-1").is_none());
    }

    #[test]
    fn test_list_by_predicate() {
        let store: MemoryStore<TestItem> = MemoryStore::new();
        for i in 0..10 {
            store.insert(
                &format!("item-{i}"),
                TestItem {
                    id: format!("item-{i}"),
                    value: i,
                },
            );
        }

        let big = store.list_by(|item| item.value >= 7);
        assert_eq!(big.len(), 3);
    }

    #[test]
    fn test_update_in_place() {
        let store: MemoryStore<TestItem> = MemoryStore::new();
        store.insert(
            "test-1",
            TestItem {
                id: "test-1".to_string(),
                value: 1,
            },
        );

        assert!(store.update("test-1", |item| item.value += 10));
        assert_eq!(store.get("test-1").unwrap().value, 11);
        assert!(!store.update("missing", |item| item.value = 0));
    }

    #[test]
    fn test_clone_shares_data() {
        let store: MemoryStore<TestItem> = MemoryStore::new();
        let clone = store.clone();

        store.insert(
            "shared",
            TestItem {
                id: "shared".to_string(),
                value: 1,
            },
        );
        assert!(clone.contains("shared"));
    }
}
