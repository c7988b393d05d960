//! # 常用接口模块
//!
//! 本模块提供单元测试所需的断言宏
