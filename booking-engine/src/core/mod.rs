//! 核心模块 - 引擎配置、共享状态和后台任务
//!
//! # 模块结构
//!
//! - [`EngineConfig`] - 引擎配置
//! - [`EngineState`] - 共享状态
//! - [`BackgroundTasks`] - 后台任务管理

pub mod config;
pub mod state;
pub mod tasks;

pub use config::EngineConfig;
pub use state::EngineState;
pub use tasks::{BackgroundTasks, TaskKind};
