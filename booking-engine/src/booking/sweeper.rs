//! 周期性状态重算调度器
//!
//! 预约窗口的开始/结束不产生显式事件，桌台状态只能靠周期性重算
//! 跟上时间的推移。派生逻辑本身幂等，与按需同步并发执行是安全的。

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::booking::status_sync::StatusSynchronizer;

/// 状态重算调度器
///
/// 注册为 `TaskKind::Periodic`，间隔由 `STATUS_SWEEP_INTERVAL_SECS` 控制。
pub struct StatusSweepScheduler {
    synchronizer: StatusSynchronizer,
    interval: Duration,
    shutdown: CancellationToken,
}

impl StatusSweepScheduler {
    pub fn new(
        synchronizer: StatusSynchronizer,
        interval_secs: u64,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            synchronizer,
            interval: Duration::from_secs(interval_secs.max(1)),
            shutdown,
        }
    }

    /// 主循环：启动扫描 + 定时扫描 + 关机响应
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Table status sweep started"
        );

        // 启动时立即扫描一次
        self.sweep().await;

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {
                    self.sweep().await;
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Table status sweep received shutdown signal");
                    return;
                }
            }
        }
    }

    async fn sweep(&self) {
        match self.synchronizer.sync_all().await {
            Ok(0) => tracing::debug!("No table status changes"),
            Ok(changed) => tracing::info!("{} table(s) changed status", changed),
            Err(e) => tracing::error!("Status sweep failed: {}", e),
        }
    }
}
