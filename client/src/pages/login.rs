//! Store and customer login pages.
//!
//! Both pages share one form: sign in, create an account, or request a
//! password recovery email. After a successful sign-in the form waits for the
//! session manager to commit the user, then navigates.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::auth_provider::use_auth;
use crate::routes::AppRoute;

/// Minimum password length accepted by the hosted auth service.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginMode {
    SignIn,
    SignUp,
    Reset,
}

/// Validated form input for the selected mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginRequest {
    SignIn { email: String, password: String },
    SignUp { email: String, password: String, full_name: Option<String> },
    Reset { email: String },
}

fn validate_email(email: &str) -> Result<String, &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Informe o email.");
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email.to_owned()),
        _ => Err("Email inválido."),
    }
}

fn validate_password(password: &str) -> Result<String, &'static str> {
    if password.is_empty() {
        return Err("Informe a senha.");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("A senha deve ter pelo menos 6 caracteres.");
    }
    Ok(password.to_owned())
}

/// Check raw form fields for `mode`. Email and name are trimmed; the password
/// is passed through untouched.
///
/// # Errors
///
/// Returns the message to show next to the form.
pub fn validate_login(mode: LoginMode, email: &str, password: &str, full_name: &str) -> Result<LoginRequest, &'static str> {
    let email = validate_email(email)?;
    match mode {
        LoginMode::Reset => Ok(LoginRequest::Reset { email }),
        LoginMode::SignIn => Ok(LoginRequest::SignIn { email, password: validate_password(password)? }),
        LoginMode::SignUp => {
            let password = validate_password(password)?;
            let full_name = Some(full_name.trim()).filter(|n| !n.is_empty()).map(str::to_owned);
            Ok(LoginRequest::SignUp { email, password, full_name })
        }
    }
}

#[component]
pub fn StoreLogin() -> impl IntoView {
    view! { <LoginForm title=AppRoute::StoreLogin.title() destination=AppRoute::StoreAdmin allow_sign_up=false/> }
}

#[component]
pub fn CustomerLogin() -> impl IntoView {
    view! {
        <LoginForm title=AppRoute::CustomerLogin.title() destination=AppRoute::CustomerDashboard allow_sign_up=true/>
    }
}

#[component]
fn LoginForm(title: &'static str, destination: AppRoute, allow_sign_up: bool) -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let mode = RwSignal::new(LoginMode::SignIn);
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let full_name = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let request = match validate_login(mode.get(), &email.get(), &password.get(), &full_name.get()) {
            Ok(request) => request,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set(String::new());

        let manager = auth.manager.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            let outcome = match request {
                LoginRequest::SignIn { email, password } => match manager.sign_in(&email, &password).await {
                    Ok(response) => {
                        if let Some(user) = response.user {
                            manager.wait_for_user(&user.id).await;
                        }
                        navigate(&destination.path(), NavigateOptions::default());
                        Ok(String::new())
                    }
                    Err(e) => Err(e),
                },
                LoginRequest::SignUp { email, password, full_name } => manager
                    .sign_up(&email, &password, full_name.as_deref())
                    .await
                    .map(|_| "Conta criada. Verifique seu email para confirmar o cadastro.".to_owned()),
                LoginRequest::Reset { email } => manager
                    .reset_password(&email)
                    .await
                    .map(|()| "Enviamos um link de recuperação para o seu email.".to_owned()),
            };
            match outcome {
                Ok(message) => info.set(message),
                Err(e) => info.set(e.to_string()),
            }
            busy.set(false);
        });
    };

    let submit_label = move || match mode.get() {
        LoginMode::SignIn => "Entrar",
        LoginMode::SignUp => "Criar conta",
        LoginMode::Reset => "Enviar link",
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>{title}</h1>
                <form class="login-form" on:submit=on_submit>
                    <Show when=move || mode.get() == LoginMode::SignUp>
                        <input
                            class="login-input"
                            type="text"
                            placeholder="Nome completo"
                            prop:value=move || full_name.get()
                            on:input=move |ev| full_name.set(event_target_value(&ev))
                        />
                    </Show>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="voce@exemplo.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <Show when=move || mode.get() != LoginMode::Reset>
                        <input
                            class="login-input"
                            type="password"
                            placeholder="Senha"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                    </Show>
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {submit_label}
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <div class="login-links">
                    <button class="login-link" on:click=move |_| mode.set(LoginMode::SignIn)>"Entrar"</button>
                    <Show when=move || allow_sign_up>
                        <button class="login-link" on:click=move |_| mode.set(LoginMode::SignUp)>"Criar conta"</button>
                    </Show>
                    <button class="login-link" on:click=move |_| mode.set(LoginMode::Reset)>"Esqueci minha senha"</button>
                </div>
            </div>
        </div>
    }
}
