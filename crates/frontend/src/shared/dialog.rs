//! Thin wrappers over the browser's blocking dialogs, used by row
//! actions that need an explicit operator confirmation.

pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

pub fn prompt(message: &str) -> Option<String> {
    let value = web_sys::window()?
        .prompt_with_message(message)
        .ok()
        .flatten()?;
    let value = value.trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
