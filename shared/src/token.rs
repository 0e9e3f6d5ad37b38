//! 凭证解码模块
//!
//! 将服务端签发的不透明承载凭证解析为结构化身份声明。
//! 凭证是三段式 token（header.payload.signature），身份声明位于
//! base64url 编码的中段。本模块只负责解析：不校验签名、不校验过期，
//! 那是服务端在每次 API 调用时的职责。
//!
//! 纯函数，无副作用；任何畸形输入都以 `TokenError` 返回，绝不 panic。

use crate::Role;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// 从凭证中提取的身份声明
///
/// 只能由 [`decode`] 产生，不允许手工构造 —— 这保证了
/// "身份声明存在当且仅当持有格式合法的凭证" 这一不变量。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// 用户数据库 id（服务端写入 "id" 声明）
    pub id: i64,
    /// 角色声明，决定面板与路由可达性
    pub role: Role,
    /// 标准 subject 声明，值为用户邮箱
    pub sub: String,
}

/// 凭证解码失败
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// 不是 "header.payload.signature" 三段形状
    #[error("credential is not a three-segment token")]
    Shape,
    /// 中段不是合法的 base64url
    #[error("credential payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    /// 声明 JSON 畸形，或缺少 / 无法识别必需声明（id、role、sub）
    #[error("credential claims are malformed: {0}")]
    Claims(#[from] serde_json::Error),
}

/// 解码凭证中段，得到身份声明
///
/// 兼容带与不带 base64 填充的编码器（JWT 规范为不填充，
/// 但个别实现会补 `=`，解码前统一剥掉）。
pub fn decode(credential: &str) -> Result<IdentityClaims, TokenError> {
    let mut segments = credential.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_header), Some(payload), Some(_signature), None) => payload,
        _ => return Err(TokenError::Shape),
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    let claims = serde_json::from_slice(&bytes)?;
    Ok(claims)
}

// =========================================================
// 测试 (Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// 用与解码相同的引擎手工构造一个三段 token
    fn make_token(claims_json: &str) -> String {
        let payload = URL_SAFE_NO_PAD.encode(claims_json.as_bytes());
        format!("eyJhbGciOiJIUzI1NiJ9.{payload}.sig")
    }

    #[test]
    fn decodes_valid_admin_token() {
        let token = make_token(r#"{"id":7,"role":"ADMIN","sub":"a@x.com"}"#);
        let claims = decode(&token).unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.sub, "a@x.com");
    }

    #[test]
    fn decodes_payload_with_extra_claims() {
        // 服务端还会附带 iat/exp 等标准声明，解码器只取所需
        let token = make_token(r#"{"sub":"u@x.com","id":3,"role":"USER","iat":1700000000,"exp":1700086400}"#);
        let claims = decode(&token).unwrap();
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn accepts_padded_base64() {
        let payload = base64::engine::general_purpose::URL_SAFE
            .encode(r#"{"id":1,"role":"USER","sub":"u@x.com"}"#);
        let token = format!("h.{payload}.s");
        assert!(decode(&token).is_ok());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(decode("garbage"), Err(TokenError::Shape)));
        assert!(matches!(decode(""), Err(TokenError::Shape)));
    }

    #[test]
    fn rejects_wrong_segment_count() {
        assert!(matches!(decode("a.b"), Err(TokenError::Shape)));
        assert!(matches!(decode("a.b.c.d"), Err(TokenError::Shape)));
    }

    #[test]
    fn rejects_invalid_base64_payload() {
        assert!(matches!(decode("h.%%%.s"), Err(TokenError::Base64(_))));
    }

    #[test]
    fn rejects_non_json_payload() {
        let payload = URL_SAFE_NO_PAD.encode(b"not json at all");
        let token = format!("h.{payload}.s");
        assert!(matches!(decode(&token), Err(TokenError::Claims(_))));
    }

    #[test]
    fn rejects_missing_claims() {
        let token = make_token(r#"{"sub":"u@x.com"}"#);
        assert!(matches!(decode(&token), Err(TokenError::Claims(_))));
    }

    #[test]
    fn rejects_unknown_role() {
        let token = make_token(r#"{"id":1,"role":"SUPERUSER","sub":"u@x.com"}"#);
        assert!(matches!(decode(&token), Err(TokenError::Claims(_))));
    }
}
