//! 路由定义与访问门控 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义应用的所有路由、各路由的角色要求，以及门控决策函数。
//! 路由服务在每次导航 / popstate / 身份变化时同步调用这里的决策。

use cms_shared::Role;
use cms_shared::token::IdentityClaims;
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 注册页面
    Register,
    /// 根路由 "/"：按身份重定向，本身不渲染内容
    Home,
    /// 用户面板 (要求 USER 角色)
    Dashboard,
    /// 管理面板 (要求 ADMIN 角色)
    Admin,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/admin" => Self::Admin,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Admin => "/admin",
            Self::NotFound => "/404",
        }
    }

    /// 该路由要求的角色；`None` 表示公开路由
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Self::Dashboard => Some(Role::User),
            Self::Admin => Some(Role::Admin),
            Self::Login | Self::Register | Self::Home | Self::NotFound => None,
        }
    }

    /// 已认证用户是否应离开此路由（登录 / 注册页）
    pub fn redirects_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 角色对应的主页
pub fn role_home(role: Role) -> AppRoute {
    match role {
        Role::Admin => AppRoute::Admin,
        Role::User => AppRoute::Dashboard,
    }
}

/// 门控决策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// 允许渲染
    Allow,
    /// 重定向到目标路由
    RedirectTo(AppRoute),
}

/// **核心门控逻辑：受保护视图的准入决策**
///
/// 1. 无身份 → 重定向登录页
/// 2. 要求角色且不匹配 → 重定向到持有角色自己的主页
/// 3. 其余情况放行
///
/// 纯函数，无 I/O。
pub fn authorize(identity: Option<&IdentityClaims>, required: Option<Role>) -> Decision {
    let Some(identity) = identity else {
        return Decision::RedirectTo(AppRoute::Login);
    };

    match required {
        Some(role) if identity.role != role => Decision::RedirectTo(role_home(identity.role)),
        _ => Decision::Allow,
    }
}

/// 根路由 "/" 的两分支映射：未认证去登录页，已认证去角色主页
pub fn root_redirect(identity: Option<&IdentityClaims>) -> AppRoute {
    match identity {
        None => AppRoute::Login,
        Some(claims) => role_home(claims.role),
    }
}

/// 将门控应用到任意目标路由，得到实际应落地的路由
///
/// 路由服务的三个入口（navigate、popstate、身份变化）统一走这里。
pub fn resolve(target: AppRoute, identity: Option<&IdentityClaims>) -> AppRoute {
    if target == AppRoute::Home {
        return root_redirect(identity);
    }

    if target.redirects_when_authenticated() {
        if let Some(claims) = identity {
            return role_home(claims.role);
        }
        return target;
    }

    match target.required_role() {
        None => target,
        Some(required) => match authorize(identity, Some(required)) {
            Decision::Allow => target,
            Decision::RedirectTo(redirect) => redirect,
        },
    }
}

#[cfg(test)]
mod tests;
