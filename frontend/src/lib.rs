//! 投诉管理系统前端
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由与访问门控（纯领域模型）
//! - `web::router`: 路由服务（核心引擎，导航唯一权威）
//! - `auth`: 会话存储（凭证 + 身份声明的唯一持有者）
//! - `api`: API 客户端与资源门面（凭证注入、401/403 拦截）
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod admin;
    pub mod dashboard;
    mod icons;
    pub mod login;
    pub mod register;
    mod status_badge;
}
mod web;

use crate::api::{ApiClient, api_base_url, provide_api};
use crate::auth::{AuthContext, AuthState};
use crate::components::admin::AdminPage;
use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginPage;
use crate::components::register::RegisterPage;
use crate::web::route::AppRoute;
use crate::web::router::{Router, RouterOutlet};

use leptos::prelude::*;

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Admin => view! { <AdminPage /> }.into_any(),
        // "/" 在路由服务里已被解析为具体目标，这里最多短暂经过
        AppRoute::Home => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        }
        .into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建会话上下文并恢复会话
    //    restore 同步完成，先于任何视图渲染 —— 视图观察不到未知态
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    auth::restore(&auth_ctx);

    // 2. API 客户端：401/403 时通过显式回调清会话，
    //    导航由路由服务监听身份信号完成（数据层不做跳转）
    let set_state = auth_ctx.set_state;
    let on_unauthorized = Callback::new(move |()| set_state.set(AuthState::default()));
    let client = ApiClient::new(api_base_url(), on_unauthorized);
    provide_api(client);

    // 3. 身份信号注入路由服务实现门控
    let identity = auth_ctx.identity_signal();

    view! {
        <Router identity=identity>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
