//! ExamSub - 考试提交管理平台后端服务
//!
//! 基于 Actix Web 构建的考试提交接收与校验流水线。
//!
//! # 架构
//! - `blob`: 对象存储层（带时限的读取授权）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `identity`: 外部身份/角色查询
//! - `models`: 数据模型定义
//! - `pipeline`: 提交接收与校验流水线核心
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod blob;
pub mod config;
pub mod entity;
pub mod errors;
pub mod identity;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
