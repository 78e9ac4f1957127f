use chrono_tz::Tz;

/// 引擎配置 - 分配与状态同步的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | BOOKING_DB_PATH | booking.db | SQLite 数据库路径 |
/// | BOOKING_TIMEZONE | UTC | 营业时区 (IANA 名称) |
/// | CONFLICT_BUFFER_MINUTES | 120 | 预约冲突缓冲 (分钟) |
/// | CANCEL_LEAD_MINUTES | 120 | 顾客取消的最短提前量 (分钟) |
/// | DINEIN_MIN_COVERS | 2 | 堂食订单容量估算下限 |
/// | DINEIN_MAX_COVERS | 4 | 堂食订单容量估算上限 |
/// | STATUS_SWEEP_INTERVAL_SECS | 60 | 状态重算扫描间隔 (秒) |
/// | LOG_DIR | (无) | 日志目录，未设置则仅输出到终端 |
///
/// 缓冲与容量估算值来自既有业务习惯，保留为可配置项而非写死。
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// SQLite 数据库路径
    pub db_path: String,
    /// 营业时区，所有日期/时间字段按此解释
    pub timezone: Tz,
    /// 同一桌台两个预约之间的排他缓冲 (分钟)
    pub conflict_buffer_minutes: i64,
    /// 顾客自助取消需距预约窗口开始的最短提前量 (分钟)
    pub cancel_lead_minutes: i64,
    /// 堂食订单自动分配时的容量估算下限
    pub dinein_min_covers: i32,
    /// 堂食订单自动分配时的容量估算上限
    pub dinein_max_covers: i32,
    /// 周期性状态重算的扫描间隔 (秒)
    pub sweep_interval_secs: u64,
    /// 日志目录 (可选)
    pub log_dir: Option<String>,
}

impl EngineConfig {
    /// 从环境变量加载配置，未设置的项使用默认值
    pub fn from_env() -> Self {
        Self {
            db_path: std::env::var("BOOKING_DB_PATH").unwrap_or_else(|_| "booking.db".into()),
            timezone: std::env::var("BOOKING_TIMEZONE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(chrono_tz::UTC),
            conflict_buffer_minutes: std::env::var("CONFLICT_BUFFER_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
            cancel_lead_minutes: std::env::var("CANCEL_LEAD_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
            dinein_min_covers: std::env::var("DINEIN_MIN_COVERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            dinein_max_covers: std::env::var("DINEIN_MAX_COVERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
            sweep_interval_secs: std::env::var("STATUS_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// 使用自定义数据库路径覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_db_path(db_path: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.db_path = db_path.into();
        config
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
