//! API 客户端模块
//!
//! 所有出站 HTTP 的单一入口（基于 gloo-net）：
//! - 请求阶段：发送前从 LocalStorage 读取凭证（不缓存），
//!   存在则附加 `Authorization: Bearer <token>` 头
//! - 响应阶段：401/403 一律当场清除持久化凭证，并调用注入的
//!   `on_unauthorized` 回调（由应用根部接线到会话存储；
//!   导航由路由服务监听身份信号完成，数据层不碰 window.location），
//!   然后仍把失败返回给调用方 —— 这是带副作用的观察者，不是吞错
//!
//! 无重试、无超时、无取消。

use crate::web::LocalStorage;
use cms_shared::{
    AuthResponse, Complaint, ComplaintStatus, DEFAULT_API_BASE_URL, LoginRequest, NewComplaint,
    RegisterRequest, STORAGE_TOKEN_KEY, StatusUpdateRequest,
};
use gloo_net::http::{Request, RequestBuilder, Response};
use leptos::prelude::{Callable, Callback, expect_context, provide_context};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// 编译期注入的服务端基地址（对应原生环境变量 `API_BASE_URL`）
pub fn api_base_url() -> &'static str {
    option_env!("API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL)
}

/// 该状态码是否属于认证失败（触发凭证清除）
fn is_auth_failure(status: u16) -> bool {
    matches!(status, 401 | 403)
}

/// 基地址与路径拼接（容忍双方的多余 / 缺失斜杠）
fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// API 调用错误
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// 401/403：凭证已被清除，会话即将结束
    #[error("not authorized")]
    Unauthorized,
    /// 其余非 2xx 响应（服务端校验失败等）
    #[error("server rejected the request ({0})")]
    Server(u16, String),
    /// 传输层失败
    #[error("network error: {0}")]
    Network(String),
    /// 响应体无法解析为期望的形状
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// HTTP 客户端
///
/// `on_unauthorized` 是显式回调而非全局跳转：
/// 路由层保持导航的唯一权威。
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    on_unauthorized: Callback<()>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, on_unauthorized: Callback<()>) -> Self {
        Self {
            base_url: base_url.into(),
            on_unauthorized,
        }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// 请求拦截：附加当前持久化的凭证（若有）
    fn with_auth(builder: RequestBuilder) -> RequestBuilder {
        match LocalStorage::get(STORAGE_TOKEN_KEY) {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    /// 响应拦截：认证失败立即清凭证并通知会话层，其余非 2xx 原样上抛
    async fn check(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();

        if is_auth_failure(status) {
            log::warn!("[Api] {status} from server, purging credential");
            LocalStorage::delete(STORAGE_TOKEN_KEY);
            self.on_unauthorized.run(());
            return Err(ApiError::Unauthorized);
        }

        if !response.ok() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Server(status, message));
        }

        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = Self::with_auth(Request::get(&self.url(path)))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_json(self.check(response).await?).await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = Self::with_auth(Request::post(&self.url(path)))
            .header("Content-Type", "application/json")
            .json(body)
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_json(self.check(response).await?).await
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = Self::with_auth(Request::put(&self.url(path)))
            .header("Content-Type", "application/json")
            .json(body)
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_json(self.check(response).await?).await
    }
}

// =========================================================
// 资源门面 (Resource Facades)
// =========================================================

/// 认证资源：注册 / 登录
///
/// 只做路径模板上的直通调用，返回原始 token，不产生会话副作用 ——
/// 建立会话是 `auth::login` 的专属职责，视图必须显式调用。
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<AuthResponse, ApiError> {
        let body = RegisterRequest {
            name,
            email,
            password,
        };
        self.client.post_json("/auth/register", &body).await
    }

    pub async fn login(&self, email: String, password: String) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest { email, password };
        self.client.post_json("/auth/login", &body).await
    }
}

/// 投诉资源：创建 / 查询 / 状态更新
#[derive(Clone)]
pub struct ComplaintApi {
    client: ApiClient,
}

impl ComplaintApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// 新建投诉；id / status / createdAt 由服务端分配
    pub async fn create(&self, complaint: NewComplaint) -> Result<Complaint, ApiError> {
        self.client.post_json("/api/complaints", &complaint).await
    }

    /// 当前用户的投诉列表
    pub async fn list_mine(&self, user_id: i64) -> Result<Vec<Complaint>, ApiError> {
        self.client
            .get_json(&format!("/api/complaints/my/{user_id}"))
            .await
    }

    /// 单条投诉详情
    pub async fn get(&self, id: i64) -> Result<Complaint, ApiError> {
        self.client.get_json(&format!("/api/complaints/{id}")).await
    }

    /// 全部投诉（仅管理端可用；客户端不做所有权检查）
    pub async fn list_all(&self) -> Result<Vec<Complaint>, ApiError> {
        self.client.get_json("/api/admin/complaints/all").await
    }

    /// 管理端更新投诉状态
    pub async fn update_status(
        &self,
        id: i64,
        status: ComplaintStatus,
    ) -> Result<Complaint, ApiError> {
        let body = StatusUpdateRequest { status };
        self.client
            .put_json(&format!("/api/admin/complaints/{id}/status"), &body)
            .await
    }
}

// =========================================================
// Context 接线
// =========================================================

/// 在应用根部提供 API 客户端
pub fn provide_api(client: ApiClient) {
    provide_context(client);
}

pub fn use_auth_api() -> AuthApi {
    AuthApi::new(expect_context::<ApiClient>())
}

pub fn use_complaint_api() -> ComplaintApi {
    ComplaintApi::new(expect_context::<ApiClient>())
}

// =========================================================
// 测试 (Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failure_covers_exactly_401_and_403() {
        assert!(is_auth_failure(401));
        assert!(is_auth_failure(403));
        for status in [200, 201, 204, 400, 404, 409, 500, 502] {
            assert!(!is_auth_failure(status));
        }
    }

    #[test]
    fn url_joining_normalizes_slashes() {
        assert_eq!(
            join_url("http://localhost:8080/", "/api/complaints"),
            "http://localhost:8080/api/complaints"
        );
        assert_eq!(
            join_url("http://localhost:8080", "auth/login"),
            "http://localhost:8080/auth/login"
        );
    }

    #[test]
    fn default_base_url_matches_contract() {
        assert_eq!(DEFAULT_API_BASE_URL, "http://localhost:8080");
    }
}
