//! SRSystem - 学生成绩管理后端
//!
//! 基于 SeaORM 构建的学籍成绩聚合与变更审计服务。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `services`: 业务逻辑层（成绩聚合 / 变更审计）
//! - `storage`: 数据存储层（SeaORM）

pub mod config;
pub mod entity;
pub mod errors;
pub mod models;
pub mod services;
pub mod storage;
