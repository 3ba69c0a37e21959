//! 业务数据模型定义
//!
//! 与 entity 模块中的数据库实体分离，Storage 层负责两者之间的转换。

pub mod audit;
pub mod classes;
pub mod common;
pub mod employees;
pub mod enrollments;
pub mod grades;
pub mod grading;
pub mod notes;
pub mod scales;
pub mod students;

pub use common::pagination::PaginationInfo;
