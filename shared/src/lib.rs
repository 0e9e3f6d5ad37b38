//! 投诉管理系统共享领域层
//!
//! 前端与服务端契约的纯数据部分：
//! - 封闭的角色 / 状态 / 分类枚举（拒绝裸字符串）
//! - 投诉记录与各类请求/响应模型
//! - `token`: 凭证解码器（身份声明的唯一推导路径）
//!
//! 本 crate 不依赖任何浏览器 API，可在原生目标上编译和测试。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod token;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// LocalStorage 中持久化凭证的键（与服务端无关，仅客户端约定）
pub const STORAGE_TOKEN_KEY: &str = "jwt_token";

/// 未配置 `API_BASE_URL` 时的默认服务端地址
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

// =========================================================
// 角色 (Role)
// =========================================================

/// 用户角色，决定可达的面板与可用的 API 操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =========================================================
// 投诉状态 (ComplaintStatus)
// =========================================================

/// 投诉处理状态
///
/// 服务端枚举以 `OPEN` 为新建默认值，线格式为 SCREAMING_SNAKE_CASE。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
    Rejected,
}

impl ComplaintStatus {
    /// 全部状态，供管理端下拉框穷举
    pub const ALL: [ComplaintStatus; 5] = [
        ComplaintStatus::Open,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::Closed,
        ComplaintStatus::Rejected,
    ];

    /// 线格式拼写（与服务端枚举一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Open => "OPEN",
            ComplaintStatus::InProgress => "IN_PROGRESS",
            ComplaintStatus::Resolved => "RESOLVED",
            ComplaintStatus::Closed => "CLOSED",
            ComplaintStatus::Rejected => "REJECTED",
        }
    }

    /// 状态徽章的 daisyUI 样式类（穷举匹配，新增状态时编译器会提醒）
    pub fn badge_class(&self) -> &'static str {
        match self {
            ComplaintStatus::Resolved | ComplaintStatus::Closed => "badge badge-success",
            ComplaintStatus::InProgress => "badge badge-info",
            ComplaintStatus::Open => "badge badge-warning",
            ComplaintStatus::Rejected => "badge badge-error",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComplaintStatus::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown complaint status: {s}"))
    }
}

// =========================================================
// 投诉分类 (ComplaintCategory)
// =========================================================

/// 投诉分类
///
/// 服务端以普通字符串存储，拼写为首字母大写单词（serde 默认变体名）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplaintCategory {
    Electrical,
    Plumbing,
    Internet,
    Other,
}

impl ComplaintCategory {
    /// 全部分类，供表单下拉框穷举
    pub const ALL: [ComplaintCategory; 4] = [
        ComplaintCategory::Electrical,
        ComplaintCategory::Plumbing,
        ComplaintCategory::Internet,
        ComplaintCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintCategory::Electrical => "Electrical",
            ComplaintCategory::Plumbing => "Plumbing",
            ComplaintCategory::Internet => "Internet",
            ComplaintCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ComplaintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ComplaintCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComplaintCategory::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown complaint category: {s}"))
    }
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 投诉记录（服务端拥有；id / createdAt / status 均由服务端分配）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub status: ComplaintStatus,
    /// 服务端以 "dd-MM-yyyy" 字符串序列化
    #[serde(rename = "createdAt", default, with = "created_at_format")]
    pub created_at: Option<chrono::NaiveDate>,
    pub user: ComplaintUser,
}

/// 投诉记录内嵌的提交人信息（管理面板展示用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintUser {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
}

// =========================================================
// 请求 / 响应模型 (Requests & Responses)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 登录 / 注册成功后的服务端响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// 新建投诉的请求体（`user_id` 为服务端约定的蛇形字段名）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub user_id: i64,
}

/// 管理端状态更新请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ComplaintStatus,
}

// =========================================================
// createdAt 序列化格式 (dd-MM-yyyy)
// =========================================================

/// 服务端 `createdAt` 的自定义日期格式
///
/// 服务端将创建时间序列化为 "dd-MM-yyyy" 字符串；历史数据可能为 null。
mod created_at_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%d-%m-%Y";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => NaiveDate::parse_from_str(&s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// 格式化 `created_at` 供界面展示；缺失时显示占位符
pub fn format_created_at(date: Option<chrono::NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%d-%m-%Y").to_string(),
        None => "—".to_string(),
    }
}

// =========================================================
// 测试 (Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn role_uses_screaming_snake_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::from_str::<Role>("\"USER\"").unwrap(), Role::User);
    }

    #[test]
    fn status_round_trips_through_wire_spelling() {
        for status in ComplaintStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(serde_json::from_str::<ComplaintStatus>(&json).unwrap(), status);
            // FromStr 与 serde 拼写保持一致（下拉框依赖这一点）
            assert_eq!(status.as_str().parse::<ComplaintStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<ComplaintStatus>("\"PENDING\"").is_err());
        assert!("PENDING".parse::<ComplaintStatus>().is_err());
    }

    #[test]
    fn category_uses_capitalized_words() {
        assert_eq!(
            serde_json::to_string(&ComplaintCategory::Plumbing).unwrap(),
            "\"Plumbing\""
        );
        assert_eq!(
            "Internet".parse::<ComplaintCategory>().unwrap(),
            ComplaintCategory::Internet
        );
        assert!("internet".parse::<ComplaintCategory>().is_err());
    }

    #[test]
    fn complaint_deserializes_from_server_shape() {
        // 服务端实际返回的形状：嵌套 user、dd-MM-yyyy 日期、多余字段被忽略
        let json = r#"{
            "id": 12,
            "title": "Leak",
            "description": "Water dripping from the ceiling",
            "category": "Plumbing",
            "status": "OPEN",
            "createdAt": "25-08-2026",
            "user": { "id": 3, "email": "a@x.com", "username": "alice" }
        }"#;

        let complaint: Complaint = serde_json::from_str(json).unwrap();
        assert_eq!(complaint.id, 12);
        assert_eq!(complaint.category, ComplaintCategory::Plumbing);
        assert_eq!(complaint.status, ComplaintStatus::Open);
        assert_eq!(
            complaint.created_at,
            Some(NaiveDate::from_ymd_opt(2026, 8, 25).unwrap())
        );
        assert_eq!(complaint.user.id, 3);
        assert_eq!(complaint.user.email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn complaint_tolerates_missing_created_at() {
        let json = r#"{
            "id": 1,
            "title": "t",
            "description": "d",
            "category": "Other",
            "status": "CLOSED",
            "user": { "id": 9 }
        }"#;

        let complaint: Complaint = serde_json::from_str(json).unwrap();
        assert_eq!(complaint.created_at, None);
        assert_eq!(complaint.user.email, None);
        assert_eq!(format_created_at(complaint.created_at), "—");
    }

    #[test]
    fn new_complaint_uses_snake_case_user_id() {
        let body = NewComplaint {
            title: "Leak".to_string(),
            description: "...".to_string(),
            category: ComplaintCategory::Plumbing,
            user_id: 3,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["user_id"], 3);
        assert_eq!(json["category"], "Plumbing");
        assert!(json.get("userId").is_none());
    }

    #[test]
    fn status_update_body_carries_wire_spelling() {
        let body = StatusUpdateRequest {
            status: ComplaintStatus::InProgress,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"status":"IN_PROGRESS"}"#
        );
    }
}
