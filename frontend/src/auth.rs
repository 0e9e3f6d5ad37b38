//! 会话存储模块
//!
//! 当前会话（凭证 + 身份声明）的唯一持有者，与路由系统解耦：
//! 路由服务通过注入的身份信号来执行门控，视图通过 Context 读取会话。
//!
//! 不变量：身份声明永远由凭证经 `cms_shared::token::decode` 推导而来，
//! 二者不可能分叉 —— 推导路径只有一条。

use crate::web::LocalStorage;
use cms_shared::STORAGE_TOKEN_KEY;
use cms_shared::token::{self, IdentityClaims, TokenError};
use leptos::prelude::*;

/// 会话状态
#[derive(Clone, Default)]
pub struct AuthState {
    /// 从凭证解码出的身份声明（仅在持有合法凭证时存在）
    pub identity: Option<IdentityClaims>,
    /// 原始凭证，随每个出站请求发送
    pub token: Option<String>,
    /// 仅在启动时的恢复尝试期间为 true；之后的状态都是确定的
    pub is_loading: bool,
}

/// 会话上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 会话状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置会话状态（写入）
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState {
            is_loading: true,
            ..AuthState::default()
        });
        Self { state, set_state }
    }

    /// 身份信号（用于路由服务注入）
    pub fn identity_signal(&self) -> Signal<Option<IdentityClaims>> {
        let state = self.state;
        Signal::derive(move || state.get().identity)
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取会话上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 由凭证推导完整会话状态（唯一的推导路径，纯函数）
pub fn session_from_token(token: &str) -> Result<AuthState, TokenError> {
    let identity = token::decode(token)?;
    Ok(AuthState {
        identity: Some(identity),
        token: Some(token.to_string()),
        is_loading: false,
    })
}

/// 启动时恢复会话
///
/// 同步运行，且在路由渲染任何视图之前完成，
/// 因此视图永远观察不到 "未知" 的瞬态。
/// 持久化的凭证若已畸形，当场清除并降级为空会话。
pub fn restore(ctx: &AuthContext) {
    let next = match LocalStorage::get(STORAGE_TOKEN_KEY) {
        None => AuthState::default(),
        Some(stored) => match session_from_token(&stored) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("stored credential rejected by decoder, clearing session: {e}");
                LocalStorage::delete(STORAGE_TOKEN_KEY);
                AuthState::default()
            }
        },
    };
    ctx.set_state.set(next);
}

/// 以服务端换发的凭证建立会话
///
/// 先解码后落盘：凭证畸形时返回错误，旧会话与存储原样保留，
/// 不会持久化半个坏凭证。成功则覆盖任何先前会话（last-write-wins）。
pub fn login(ctx: &AuthContext, token: &str) -> Result<(), TokenError> {
    let state = session_from_token(token)?;
    LocalStorage::set(STORAGE_TOKEN_KEY, token);
    ctx.set_state.set(state);
    Ok(())
}

/// 注销：无条件清除持久化凭证与内存会话，可重复调用
///
/// 不需要手动导航，路由服务会监听身份信号变化并自动重定向。
pub fn logout(ctx: &AuthContext) {
    LocalStorage::delete(STORAGE_TOKEN_KEY);
    ctx.set_state.set(AuthState::default());
}

// =========================================================
// 测试 (Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use cms_shared::Role;

    fn make_token(claims_json: &str) -> String {
        let payload = URL_SAFE_NO_PAD.encode(claims_json.as_bytes());
        format!("h.{payload}.s")
    }

    #[test]
    fn session_derives_identity_from_credential() {
        let token = make_token(r#"{"id":7,"role":"ADMIN","sub":"a@x.com"}"#);
        let state = session_from_token(&token).unwrap();

        let identity = state.identity.unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(identity.id, 7);
        assert_eq!(state.token.as_deref(), Some(token.as_str()));
        assert!(!state.is_loading);
    }

    #[test]
    fn garbage_credential_yields_error_not_session() {
        // 登录路径只在 Ok 时才改写存储与内存状态，
        // 所以这里的 Err 即意味着旧会话原样保留
        assert!(session_from_token("garbage").is_err());
    }

    #[test]
    fn empty_state_has_no_identity() {
        let state = AuthState::default();
        assert!(state.identity.is_none());
        assert!(state.token.is_none());
        assert!(!state.is_loading);
    }
}
