//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 导航的三个入口（navigate、popstate、身份变化）都先经过
//! `route::resolve` 的同步门控，再落地 History 与界面状态。
//! 本服务是导航的唯一权威 —— 数据层（API 客户端）只清会话，
//! 由这里监听身份信号完成重定向。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, resolve};
use cms_shared::token::IdentityClaims;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入身份信号实现与会话系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 当前身份声明（注入的信号，门控依据）
    identity: Signal<Option<IdentityClaims>>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// 初始路由从 URL 解析后立即过一遍门控：
    /// 直接在受保护地址刷新页面时，未认证用户当场被重定向。
    fn new(identity: Signal<Option<IdentityClaims>>) -> Self {
        let requested = AppRoute::from_path(&current_path());
        let initial = identity.with_untracked(|id| resolve(requested, id.as_ref()));
        if initial != requested {
            replace_history_state(initial.to_path());
        }
        let (current_route, set_route) = signal(initial);

        Self {
            current_route,
            set_route,
            identity,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 门控(resolve) -> 推入 History -> 更新界面
    pub fn navigate(&self, path: &str) {
        let requested = AppRoute::from_path(path);
        let target = self
            .identity
            .with_untracked(|id| resolve(requested, id.as_ref()));

        if target != requested {
            log::debug!("[Router] {requested} gated, landing on {target}");
        }

        push_history_state(target.to_path());
        self.set_route.set(target);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let identity = self.identity;

        let closure = Closure::<dyn Fn()>::new(move || {
            let requested = AppRoute::from_path(&current_path());
            let target = identity.with_untracked(|id| resolve(requested, id.as_ref()));

            // popstate 时也执行门控；被拦下的地址不留在历史里
            if target != requested {
                replace_history_state(target.to_path());
            }
            set_route.set(target);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置身份变化时的自动重定向
    ///
    /// 登录后离开登录/注册页，注销（或 401/403 清会话）后离开受保护页。
    fn setup_identity_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let identity = self.identity;

        Effect::new(move |_| {
            // 订阅身份信号；当前路由本身不触发
            let target = identity.with(|id| {
                resolve(current_route.get_untracked(), id.as_ref())
            });

            if target != current_route.get_untracked() {
                log::debug!("[Router] identity changed, redirecting to {target}");
                push_history_state(target.to_path());
                set_route.set(target);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(identity: Signal<Option<IdentityClaims>>) -> RouterService {
    let router = RouterService::new(identity);

    router.init_popstate_listener();
    router.setup_identity_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 身份信号
    identity: Signal<Option<IdentityClaims>>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(identity);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}
