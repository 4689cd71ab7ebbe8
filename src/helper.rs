//! SSR register helper virtual module.
//!
//! Server builds import `ssrRegisterHelper` from this specifier; the helper
//! wraps a component's `setup` so that rendering it records the defining
//! module into `ssrContext.modules`.

pub const SSR_REGISTER_HELPER_ID: &str = "/__vue-jsx-ssr-register-helper";
pub const SSR_REGISTER_HELPER_NAME: &str = "ssrRegisterHelper";
pub const SSR_REGISTER_HELPER_CODE: &str = include_str!("runtime/ssr-register-helper.js");

/// Claim the helper specifier; every other id is left to the host.
pub fn resolve_helper_id(id: &str) -> Option<String> {
    (id == SSR_REGISTER_HELPER_ID).then(|| id.to_string())
}

pub fn load_helper(id: &str) -> Option<&'static str> {
    (id == SSR_REGISTER_HELPER_ID).then_some(SSR_REGISTER_HELPER_CODE)
}
