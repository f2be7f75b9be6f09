// ==========================================
// 水泥库存计划看板 - 导出缓存
// ==========================================
// 键: 补货计划表内容哈希（site_id + 全部投影字段）
// 存储: moka 本地内存缓存（容量上限,超出后按 TinyLFU 淘汰）
// 失效: 数据集重新加载时整体清空
// ==========================================

use moka::sync::Cache;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// 缓存统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

pub struct ExportCache {
    capacity: usize,
    /// capacity = 0 时为 None
    store: Option<Cache<String, Arc<[u8]>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ExportCache {
    /// capacity = 0 表示不缓存
    pub fn new(capacity: usize) -> Self {
        let store = (capacity > 0).then(|| {
            Cache::builder()
                .max_capacity(capacity as u64)
                .build()
        });

        Self {
            capacity,
            store,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// 命中直接返回,否则调用 `compute` 并写入（失败结果不缓存）
    pub fn get_or_try_insert_with<E, F>(&self, key: &str, compute: F) -> Result<Arc<[u8]>, E>
    where
        F: FnOnce() -> Result<Vec<u8>, E>,
    {
        if let Some(bytes) = self.store.as_ref().and_then(|store| store.get(key)) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(bytes);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let bytes: Arc<[u8]> = Arc::from(compute()?);

        if let Some(store) = &self.store {
            store.insert(key.to_string(), Arc::clone(&bytes));
        }
        Ok(bytes)
    }

    /// 清空全部条目（数据集变化时调用）
    pub fn invalidate(&self) {
        if let Some(store) = &self.store {
            store.invalidate_all();
            store.run_pending_tasks();
        }
    }

    pub fn stats(&self) -> CacheStats {
        let entries = match &self.store {
            Some(store) => {
                store.run_pending_tasks();
                store.entry_count() as usize
            }
            None => 0,
        };

        CacheStats {
            entries,
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
