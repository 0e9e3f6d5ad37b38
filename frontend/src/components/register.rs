use crate::api::use_auth_api;
use crate::auth::{self, use_auth};
use crate::components::icons::ShieldCheck;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let auth_api = use_auth_api();
    let router = use_router();

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if name.get().is_empty() || email.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let auth_api = auth_api.clone();
        spawn_local(async move {
            match auth_api
                .register(
                    name.get_untracked(),
                    email.get_untracked(),
                    password.get_untracked(),
                )
                .await
            {
                // 注册即登录：服务端直接换发凭证
                Ok(response) => match auth::login(&auth_ctx, &response.token) {
                    Ok(()) => {}
                    Err(e) => {
                        log::warn!("server issued an undecodable credential: {e}");
                        set_error_msg.set(Some(
                            "Received an invalid credential. Please sign in manually.".to_string(),
                        ));
                    }
                },
                Err(e) => {
                    log::debug!("[Register] {e}");
                    set_error_msg.set(Some(
                        "Registration failed. Please try again.".to_string(),
                    ));
                }
            }
            set_is_submitting.set(false);
        });
    };

    let go_login = move |ev: leptos::web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate("/login");
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShieldCheck attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Create account"</h1>
                        <p class="text-base-content/70">
                            "Register to start filing complaints"
                        </p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="name">
                                <span class="label-text">"Name"</span>
                            </label>
                            <input
                                id="name"
                                type="text"
                                placeholder="Jane Doe"
                                on:input=move |ev| set_name.set(event_target_value(&ev))
                                prop:value=name
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Register".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Already registered? "
                            <a href="/login" class="link link-primary" on:click=go_login>
                                "Sign in"
                            </a>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
