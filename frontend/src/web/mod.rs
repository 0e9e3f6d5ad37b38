//! 原生 Web API 封装模块
//!
//! 对浏览器原生 API 的轻量级封装：LocalStorage、History 路由。
//! 所有对 window 级对象的访问都集中在此模块，数据层不得直接触碰。

pub mod route;
pub mod router;
mod storage;

pub use storage::LocalStorage;
