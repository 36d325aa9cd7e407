//! Login-page redirect targets.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left unescaped in a query value, beyond alphanumerics.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Builds `<login_path>?<return_param>=<encoded return_to>`.
///
/// The return target is dropped when it is empty or already points at the
/// login page, so a bounce never nests itself.
pub fn login_redirect(login_path: &str, return_param: &str, return_to: &str) -> String {
    if return_to.is_empty() || return_to == "/" || is_login_target(login_path, return_to) {
        return login_path.to_string();
    }

    format!(
        "{login_path}?{return_param}={}",
        utf8_percent_encode(return_to, QUERY_VALUE)
    )
}

fn is_login_target(login_path: &str, return_to: &str) -> bool {
    return_to == login_path
        || return_to
            .strip_prefix(login_path)
            .is_some_and(|rest| rest.starts_with('?') || rest.starts_with('#'))
}
