use std::sync::Arc;

use dashmap::DashMap;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::core::EngineConfig;
use crate::db::DbService;

/// 引擎共享状态 - 持有连接池、配置和桌台锁表
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 |
/// | table_locks | 每桌一把分配锁 |
///
/// 分配服务在 "查可用 → 绑定" 的临界区内持有对应桌台的锁，
/// 保证并发分配同一桌台时只有一个调用方成功。
#[derive(Clone)]
pub struct EngineState {
    pub config: Arc<EngineConfig>,
    pool: SqlitePool,
    table_locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl EngineState {
    pub fn new(config: EngineConfig, db: DbService) -> Self {
        Self {
            config: Arc::new(config),
            pool: db.pool,
            table_locks: Arc::new(DashMap::new()),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 获取指定桌台的分配锁 (惰性创建)
    pub fn table_lock(&self, table_id: i64) -> Arc<Mutex<()>> {
        self.table_locks
            .entry(table_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
