//! Username/password form shown while no session is active.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct LoginFormProps {
    /// Called with `(username, password)`
    pub on_submit: EventHandler<(String, String)>,
    #[props(default = false)]
    pub busy: bool,
}

#[component]
pub fn LoginForm(props: LoginFormProps) -> Element {
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let on_submit = props.on_submit;

    let submit = move |evt: Event<FormData>| {
        evt.prevent_default();
        let user = username.peek().trim().to_string();
        if user.is_empty() {
            return;
        }
        on_submit.call((user, password.peek().clone()));
        password.set(String::new());
    };

    rsx! {
        form {
            style: "max-width: 320px; margin: 64px auto; display: flex; flex-direction: column; gap: 10px;",
            onsubmit: submit,
            h2 { style: "margin: 0 0 8px 0;", "Sign in" }
            input {
                r#type: "text",
                placeholder: "Username",
                autocomplete: "username",
                value: "{username}",
                oninput: move |evt| username.set(evt.value()),
            }
            input {
                r#type: "password",
                placeholder: "Password",
                autocomplete: "current-password",
                value: "{password}",
                oninput: move |evt| password.set(evt.value()),
            }
            button {
                r#type: "submit",
                disabled: props.busy,
                if props.busy { "Signing in..." } else { "Sign in" }
            }
        }
    }
}
