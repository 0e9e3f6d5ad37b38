//! 状态徽章组件
//!
//! 样式类映射在 `ComplaintStatus::badge_class` 里穷举，
//! 新增状态时编译器会强制这里跟着更新。

use cms_shared::ComplaintStatus;
use leptos::prelude::*;

#[component]
pub fn StatusBadge(status: ComplaintStatus) -> impl IntoView {
    view! {
        <span class=status.badge_class()>{status.as_str()}</span>
    }
}
