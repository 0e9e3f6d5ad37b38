use super::*;
use cms_shared::Role;
use cms_shared::token::decode;

// =========================================================
// 辅助函数
// =========================================================

/// 经由真实解码路径构造身份声明（身份只有一条推导路径，测试也遵守）
fn identity(role: Role) -> IdentityClaims {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let claims = format!(r#"{{"id":7,"role":"{}","sub":"a@x.com"}}"#, role.as_str());
    let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode(claims.as_bytes()));
    decode(&token).unwrap()
}

// =========================================================
// 路由解析
// =========================================================

#[test]
fn path_round_trip() {
    for route in [
        AppRoute::Login,
        AppRoute::Register,
        AppRoute::Home,
        AppRoute::Dashboard,
        AppRoute::Admin,
    ] {
        assert_eq!(AppRoute::from_path(route.to_path()), route);
    }
}

#[test]
fn unknown_path_maps_to_not_found() {
    assert_eq!(AppRoute::from_path("/profile"), AppRoute::NotFound);
    assert_eq!(AppRoute::from_path(""), AppRoute::NotFound);
}

// =========================================================
// authorize：准入决策
// =========================================================

#[test]
fn no_identity_always_redirects_to_login() {
    for required in [None, Some(Role::User), Some(Role::Admin)] {
        assert_eq!(
            authorize(None, required),
            Decision::RedirectTo(AppRoute::Login)
        );
    }
}

#[test]
fn matching_role_is_allowed() {
    let user = identity(Role::User);
    let admin = identity(Role::Admin);

    assert_eq!(authorize(Some(&user), Some(Role::User)), Decision::Allow);
    assert_eq!(authorize(Some(&admin), Some(Role::Admin)), Decision::Allow);
    // 无角色要求时，任何已认证身份都放行
    assert_eq!(authorize(Some(&user), None), Decision::Allow);
    assert_eq!(authorize(Some(&admin), None), Decision::Allow);
}

#[test]
fn mismatched_role_redirects_to_own_home() {
    // 管理员访问用户面板 → 回管理面板
    let admin = identity(Role::Admin);
    assert_eq!(
        authorize(Some(&admin), Some(Role::User)),
        Decision::RedirectTo(AppRoute::Admin)
    );

    // 普通用户访问管理面板 → 回用户面板
    let user = identity(Role::User);
    assert_eq!(
        authorize(Some(&user), Some(Role::Admin)),
        Decision::RedirectTo(AppRoute::Dashboard)
    );
}

// =========================================================
// 根路由重定向
// =========================================================

#[test]
fn root_redirects_unauthenticated_to_login() {
    // 启动时无凭证，根路由去登录页
    assert_eq!(root_redirect(None), AppRoute::Login);
}

#[test]
fn root_redirects_by_role() {
    assert_eq!(root_redirect(Some(&identity(Role::User))), AppRoute::Dashboard);
    assert_eq!(root_redirect(Some(&identity(Role::Admin))), AppRoute::Admin);
}

// =========================================================
// resolve：门控统一入口
// =========================================================

#[test]
fn resolve_home_applies_root_mapping() {
    assert_eq!(resolve(AppRoute::Home, None), AppRoute::Login);
    assert_eq!(
        resolve(AppRoute::Home, Some(&identity(Role::Admin))),
        AppRoute::Admin
    );
}

#[test]
fn resolve_keeps_public_routes_for_guests() {
    assert_eq!(resolve(AppRoute::Login, None), AppRoute::Login);
    assert_eq!(resolve(AppRoute::Register, None), AppRoute::Register);
    assert_eq!(resolve(AppRoute::NotFound, None), AppRoute::NotFound);
}

#[test]
fn resolve_moves_authenticated_users_off_auth_pages() {
    let user = identity(Role::User);
    assert_eq!(resolve(AppRoute::Login, Some(&user)), AppRoute::Dashboard);
    assert_eq!(resolve(AppRoute::Register, Some(&user)), AppRoute::Dashboard);

    let admin = identity(Role::Admin);
    assert_eq!(resolve(AppRoute::Login, Some(&admin)), AppRoute::Admin);
}

#[test]
fn resolve_guards_protected_routes() {
    // 未认证访问受保护路由 → 登录页；注销后任何受保护路由都不放行
    assert_eq!(resolve(AppRoute::Dashboard, None), AppRoute::Login);
    assert_eq!(resolve(AppRoute::Admin, None), AppRoute::Login);

    // 角色不匹配 → 各回各家
    let user = identity(Role::User);
    assert_eq!(resolve(AppRoute::Admin, Some(&user)), AppRoute::Dashboard);
    let admin = identity(Role::Admin);
    assert_eq!(resolve(AppRoute::Dashboard, Some(&admin)), AppRoute::Admin);

    // 角色匹配 → 放行
    assert_eq!(resolve(AppRoute::Dashboard, Some(&user)), AppRoute::Dashboard);
    assert_eq!(resolve(AppRoute::Admin, Some(&admin)), AppRoute::Admin);
}
