use crate::api::use_complaint_api;
use crate::auth::{self, use_auth};
use crate::components::icons::*;
use crate::components::status_badge::StatusBadge;
use cms_shared::{Complaint, ComplaintCategory, ComplaintStatus, NewComplaint, format_created_at};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 用户面板：统计卡片 + 新建投诉表单 + 我的投诉列表
#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let complaint_api = use_complaint_api();

    let (complaints, set_complaints) = signal(Vec::<Complaint>::new());
    let (loading_list, set_loading_list) = signal(true);
    let (title, set_title) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (category, set_category) = signal(ComplaintCategory::Electrical);
    let (is_submitting, set_is_submitting) = signal(false);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    // 门控保证了进到这里一定有 USER 身份
    let user_id = move || {
        auth_ctx
            .state
            .with_untracked(|s| s.identity.as_ref().map(|c| c.id))
    };
    let user_email = move || {
        auth_ctx
            .state
            .with(|s| s.identity.as_ref().map(|c| c.sub.clone()))
            .unwrap_or_default()
    };

    let load_complaints = {
        let api = complaint_api.clone();
        move || {
            let Some(id) = user_id() else {
                return;
            };
            let api = api.clone();
            set_loading_list.set(true);
            spawn_local(async move {
                match api.list_mine(id).await {
                    Ok(data) => set_complaints.set(data),
                    Err(e) => {
                        log::debug!("[Dashboard] list_mine: {e}");
                        set_notification
                            .set(Some(("Failed to load your complaints.".to_string(), true)));
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

    let on_submit = {
        let api = complaint_api.clone();
        let load_complaints = load_complaints.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let Some(id) = user_id() else {
                return;
            };
            if title.get().is_empty() || description.get().is_empty() {
                set_notification.set(Some(("Please fill in all fields".to_string(), true)));
                return;
            }

            set_is_submitting.set(true);
            set_notification.set(None);

            let api = api.clone();
            let load_complaints = load_complaints.clone();
            spawn_local(async move {
                let body = NewComplaint {
                    title: title.get_untracked(),
                    description: description.get_untracked(),
                    category: category.get_untracked(),
                    user_id: id,
                };
                match api.create(body).await {
                    Ok(_) => {
                        set_notification
                            .set(Some(("Complaint filed successfully!".to_string(), false)));
                        set_title.set(String::new());
                        set_description.set(String::new());
                        set_category.set(ComplaintCategory::Electrical);
                        // 提交成功后重新拉取列表（显式时序：submit, then reload）
                        load_complaints();
                    }
                    Err(e) => {
                        log::debug!("[Dashboard] create: {e}");
                        set_notification.set(Some((
                            "Failed to file complaint. Please try again.".to_string(),
                            true,
                        )));
                    }
                }
                set_is_submitting.set(false);
            });
        }
    };

    let on_logout = move |_| {
        // 路由服务监听身份信号，注销后自动回登录页
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

    // 统计数据的派生值
    let total = move || complaints.with(|c| c.len());
    let has_complaints = move || complaints.with(|c| !c.is_empty());
    let count_with = move |status: ComplaintStatus| {
        complaints.with(|c| c.iter().filter(|x| x.status == status).count())
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                // 通知提示框
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

                // 顶栏
                <div class="flex items-center justify-between">
                    <div>
                        <h1 class="text-3xl font-bold">"My Dashboard"</h1>
                        <p class="text-base-content/70">{user_email}</p>
                    </div>
                    <button class="btn btn-outline btn-error btn-sm gap-2" on:click=on_logout>
                        <LogOut attr:class="h-4 w-4" />
                        "Logout"
                    </button>
                </div>

                // 统计卡片
                <div class="grid grid-cols-2 lg:grid-cols-4 gap-4">
                    <div class="stat bg-base-100 rounded-box shadow">
                        <div class="stat-figure text-primary"><FileText attr:class="h-8 w-8" /></div>
                        <div class="stat-title">"Total"</div>
                        <div class="stat-value">{total}</div>
                    </div>
                    <div class="stat bg-base-100 rounded-box shadow">
                        <div class="stat-figure text-success"><CheckCircle attr:class="h-8 w-8" /></div>
                        <div class="stat-title">"Resolved"</div>
                        <div class="stat-value">{move || count_with(ComplaintStatus::Resolved)}</div>
                    </div>
                    <div class="stat bg-base-100 rounded-box shadow">
                        <div class="stat-figure text-info"><Clock attr:class="h-8 w-8" /></div>
                        <div class="stat-title">"In Progress"</div>
                        <div class="stat-value">{move || count_with(ComplaintStatus::InProgress)}</div>
                    </div>
                    <div class="stat bg-base-100 rounded-box shadow">
                        <div class="stat-figure text-warning"><AlertCircle attr:class="h-8 w-8" /></div>
                        <div class="stat-title">"Open"</div>
                        <div class="stat-value">{move || count_with(ComplaintStatus::Open)}</div>
                    </div>
                </div>

                // 新建投诉
                <div class="card bg-base-100 shadow">
                    <form class="card-body" on:submit=on_submit>
                        <h2 class="card-title">"File a complaint"</h2>
                        <div class="grid md:grid-cols-2 gap-4">
                            <div class="form-control">
                                <label class="label" for="title">
                                    <span class="label-text">"Title"</span>
                                </label>
                                <input
                                    id="title"
                                    type="text"
                                    placeholder="Short summary"
                                    on:input=move |ev| set_title.set(event_target_value(&ev))
                                    prop:value=title
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="category">
                                    <span class="label-text">"Category"</span>
                                </label>
                                <select
                                    id="category"
                                    class="select select-bordered"
                                    on:change=move |ev| {
                                        if let Ok(parsed) = event_target_value(&ev).parse() {
                                            set_category.set(parsed);
                                        }
                                    }
                                    prop:value=move || category.get().as_str()
                                >
                                    {ComplaintCategory::ALL
                                        .iter()
                                        .map(|c| view! { <option value=c.as_str()>{c.as_str()}</option> })
                                        .collect_view()}
                                </select>
                            </div>
                        </div>
                        <div class="form-control">
                            <label class="label" for="description">
                                <span class="label-text">"Description"</span>
                            </label>
                            <textarea
                                id="description"
                                placeholder="Describe the issue"
                                on:input=move |ev| set_description.set(event_target_value(&ev))
                                prop:value=description
                                class="textarea textarea-bordered h-24"
                                required
                            ></textarea>
                        </div>
                        <div class="card-actions justify-end mt-2">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Submitting..." }.into_any()
                                } else {
                                    "Submit".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>

                // 我的投诉列表
                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title">"My complaints"</h2>
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
                                    <p class="text-base-content/60 py-4">"No complaints filed yet."</p>
                                }
                            >
                                <div class="overflow-x-auto">
                                    <table class="table">
                                        <thead>
                                            <tr>
                                                <th>"#"</th>
                                                <th>"Title"</th>
                                                <th>"Category"</th>
                                                <th>"Filed"</th>
                                                <th>"Status"</th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            <For
                                                each=move || complaints.get()
                                                key=|c| (c.id, c.status)
                                                children=move |c: Complaint| {
                                                    view! {
                                                        <tr>
                                                            <td>{c.id}</td>
                                                            <td class="font-semibold">{c.title.clone()}</td>
                                                            <td>{c.category.as_str()}</td>
                                                            <td>{format_created_at(c.created_at)}</td>
                                                            <td><StatusBadge status=c.status /></td>
                                                        </tr>
                                                    }
                                                }
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
