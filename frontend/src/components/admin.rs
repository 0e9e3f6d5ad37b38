use crate::api::use_complaint_api;
use crate::auth::{self, use_auth};
use crate::components::icons::*;
use crate::components::status_badge::StatusBadge;
use cms_shared::{Complaint, ComplaintStatus, format_created_at};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 管理面板：全量投诉列表 + 逐行状态下拉更新
///
/// 客户端不做所有权检查；管理员可以处理任何人的投诉，
/// 越权与否由服务端裁决。
#[component]
pub fn AdminPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let complaint_api = use_complaint_api();

    let (complaints, set_complaints) = signal(Vec::<Complaint>::new());
    let (loading_list, set_loading_list) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    let admin_email = move || {
        auth_ctx
            .state
            .with(|s| s.identity.as_ref().map(|c| c.sub.clone()))
            .unwrap_or_default()
    };

    let load_complaints = {
        let api = complaint_api.clone();
        move || {
            let api = api.clone();
            set_loading_list.set(true);
            spawn_local(async move {
                match api.list_all().await {
                    Ok(data) => set_complaints.set(data),
                    Err(e) => {
                        log::debug!("[Admin] list_all: {e}");
                        set_notification
                            .set(Some(("Failed to load complaints.".to_string(), true)));
                    }
                }
                set_loading_list.set(false);
            });
        }
    };

    // 初始加载
    Effect::new({
        let load_complaints = load_complaints.clone();
        move |_| {
            load_complaints();
        }
    });

    // 状态变更：成功后用服务端返回的记录原位替换该行
    let on_status_change = {
        let api = complaint_api.clone();
        move |id: i64, status: ComplaintStatus| {
            let api = api.clone();
            spawn_local(async move {
                match api.update_status(id, status).await {
                    Ok(updated) => {
                        set_complaints.update(|list| {
                            if let Some(slot) = list.iter_mut().find(|c| c.id == updated.id) {
                                *slot = updated;
                            }
                        });
                        set_notification.set(Some((
                            format!("Complaint #{id} set to {status}"),
                            false,
                        )));
                    }
                    Err(e) => {
                        log::debug!("[Admin] update_status: {e}");
                        set_notification
                            .set(Some(("Failed to update status.".to_string(), true)));
                    }
                }
            });
        }
    };

    let on_logout = move |_| {
        auth::logout(&auth_ctx);
    };

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    // 单行渲染：逐行一个状态下拉框，变更即提交。
    // 包成 Callback（Copy）后可以被嵌套的 Show/For 闭包层任意捕获。
    let complaint_row = Callback::new({
        let on_status_change = on_status_change.clone();
        move |c: Complaint| {
            let on_status_change = on_status_change.clone();
            let id = c.id;
            let current = c.status;
            let reporter = c
                .user
                .email
                .clone()
                .unwrap_or_else(|| format!("user #{}", c.user.id));
            view! {
                <tr>
                    <td>{c.id}</td>
                    <td class="font-semibold">{c.title.clone()}</td>
                    <td>{reporter}</td>
                    <td>{c.category.as_str()}</td>
                    <td>{format_created_at(c.created_at)}</td>
                    <td><StatusBadge status=c.status /></td>
                    <td>
                        <select
                            class="select select-bordered select-sm"
                            on:change=move |ev| {
                                match event_target_value(&ev).parse::<ComplaintStatus>() {
                                    Ok(next) if next != current => on_status_change(id, next),
                                    Ok(_) => {}
                                    // option 值与枚举同源，除非 DOM 被篡改否则到不了这里
                                    Err(e) => log::warn!("[Admin] {e}"),
                                }
                            }
                            prop:value=current.as_str()
                        >
                            {ComplaintStatus::ALL
                                .iter()
                                .map(|s| view! {
                                    <option value=s.as_str() selected={*s == current}>
                                        {s.as_str()}
                                    </option>
                                })
                                .collect_view()}
                        </select>
                    </td>
                </tr>
            }
            .into_any()
        }
    });

    let total = move || complaints.with(|c| c.len());
    let has_complaints = move || complaints.with(|c| !c.is_empty());
    let open_count = move || {
        complaints.with(|c| {
            c.iter()
                .filter(|x| x.status == ComplaintStatus::Open)
                .count()
        })
    };
    let resolved_count = move || {
        complaints.with(|c| {
            c.iter()
                .filter(|x| x.status == ComplaintStatus::Resolved)
                .count()
        })
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <Show when=move || notification.get().is_some()>
                    <div class="toast toast-top toast-end z-50">
                        <div class=move || {
                            if notification.get().map(|(_, is_err)| is_err).unwrap_or(false) {
                                "alert alert-error shadow-lg"
                            } else {
                                "alert alert-success shadow-lg"
                            }
                        }>
                            <span>{move || notification.get().map(|(msg, _)| msg).unwrap_or_default()}</span>
                        </div>
                    </div>
                </Show>

                <div class="flex items-center justify-between">
                    <div>
                        <h1 class="text-3xl font-bold">"Admin Dashboard"</h1>
                        <p class="text-base-content/70">{admin_email}</p>
                    </div>
                    <button class="btn btn-outline btn-error btn-sm gap-2" on:click=on_logout>
                        <LogOut attr:class="h-4 w-4" />
                        "Logout"
                    </button>
                </div>

                <div class="grid grid-cols-3 gap-4">
                    <div class="stat bg-base-100 rounded-box shadow">
                        <div class="stat-figure text-primary"><FileText attr:class="h-8 w-8" /></div>
                        <div class="stat-title">"Total"</div>
                        <div class="stat-value">{total}</div>
                    </div>
                    <div class="stat bg-base-100 rounded-box shadow">
                        <div class="stat-figure text-warning"><AlertCircle attr:class="h-8 w-8" /></div>
                        <div class="stat-title">"Open"</div>
                        <div class="stat-value">{open_count}</div>
                    </div>
                    <div class="stat bg-base-100 rounded-box shadow">
                        <div class="stat-figure text-success"><CheckCircle attr:class="h-8 w-8" /></div>
                        <div class="stat-title">"Resolved"</div>
                        <div class="stat-value">{resolved_count}</div>
                    </div>
                </div>

                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title">"All complaints"</h2>
                        <Show
                            when=move || !loading_list.get()
                            fallback=|| view! {
                                <div class="flex justify-center py-8">
                                    <span class="loading loading-spinner loading-lg text-primary"></span>
                                </div>
                            }
                        >
                            <Show
                                when=has_complaints
                                fallback=|| view! {
                                    <p class="text-base-content/60 py-4">"No complaints in the system."</p>
                                }
                            >
                                <div class="overflow-x-auto">
                                    <table class="table">
                                        <thead>
                                            <tr>
                                                <th>"#"</th>
                                                <th>"Title"</th>
                                                <th>"Reporter"</th>
                                                <th>"Category"</th>
                                                <th>"Filed"</th>
                                                <th>"Status"</th>
                                                <th>"Set status"</th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            <For
                                                each=move || complaints.get()
                                                key=|c| (c.id, c.status)
                                                children=move |c: Complaint| complaint_row.run(c)
                                            />
                                        </tbody>
                                    </table>
                                </div>
                            </Show>
                        </Show>
                    </div>
                </div>
            </div>
        </div>
    }
}
