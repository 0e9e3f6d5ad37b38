//! LocalStorage 封装模块
//!
//! 凭证持久化的落地点：会话存储通过这里读写 `jwt_token` 键。
//! 基于 `web_sys::Storage`，存储不可用（如隐私模式）时静默降级。

/// 本地存储操作封装
///
/// 提供静态方法访问浏览器 LocalStorage API。
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 读取存储的字符串值；键不存在或存储不可用时返回 `None`
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 写入键值对；返回操作是否成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    /// 删除键值对；键本就不存在也算成功（幂等）
    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}
