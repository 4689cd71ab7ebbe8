//! Injection Emitter
//!
//! Appends HMR registration and SSR registration statements to the compiled
//! module. Every appended line is a complete statement placed after the
//! compiler output, so the compiler's source map stays valid for all original
//! lines.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::correlate::{Correlation, DEFAULT_LOCAL};
use crate::helper::{SSR_REGISTER_HELPER_ID, SSR_REGISTER_HELPER_NAME};
use crate::recognize::COMPONENT_CONSTRUCTOR;

pub const HMR_RUNTIME: &str = "__VUE_HMR_RUNTIME__";
const MODULE_ID_CONST: &str = "__moduleId";

lazy_static! {
    static ref DEFAULT_EXPORT_CALL_RE: Regex =
        Regex::new(&format!(r"export default {}", COMPONENT_CONSTRUCTOR)).unwrap();

    /// `<script>` blocks of SFCs are re-requested with this query; the SFC
    /// plugin owns their HMR.
    static ref SCRIPT_SUBMODULE_RE: Regex = Regex::new(r"\?vue&type=script").unwrap();
}

#[derive(Debug, Clone)]
pub struct EmitContext<'a> {
    pub module_id: &'a str,
    /// Module path relative to the build root, `/`-separated
    pub relative_path: &'a str,
    pub live_reload: bool,
    pub ssr: bool,
}

pub fn emit(code: String, correlation: &Correlation, ctx: &EmitContext) -> String {
    if correlation.is_empty() {
        return code;
    }

    let mut code = code;

    if correlation.has_default_component && (ctx.live_reload || ctx.ssr) {
        code = bind_default_component(code, ctx.module_id);
    }

    if ctx.live_reload && !ctx.ssr && !SCRIPT_SUBMODULE_RE.is_match(ctx.module_id) {
        code.push_str(&hmr_registration(correlation));
    }

    if ctx.ssr {
        code.push_str(&ssr_registration(correlation, ctx.relative_path));
    }

    code
}

/// `export default defineComponent(...)` -> `const __default__ = defineComponent(...)`
/// followed by `export default __default__`. Left untouched if the compiler
/// printed the default export in any other form.
fn bind_default_component(code: String, module_id: &str) -> String {
    if !DEFAULT_EXPORT_CALL_RE.is_match(&code) {
        debug!(module_id, "default component export not found in compiled output");
        return code;
    }

    let replacement = format!("const {} = {}", DEFAULT_LOCAL, COMPONENT_CONSTRUCTOR);
    let mut code = DEFAULT_EXPORT_CALL_RE
        .replace_all(&code, replacement.as_str())
        .into_owned();
    code.push_str(&format!("\nexport default {}", DEFAULT_LOCAL));
    code
}

fn hmr_registration(correlation: &Correlation) -> String {
    let mut code = String::new();
    let mut callback_code = String::new();

    for triple in &correlation.triples {
        code.push_str(&format!("\n{}.__hmrId = \"{}\"", triple.local, triple.id));
        code.push_str(&format!(
            "\n{}.createRecord(\"{}\", {})",
            HMR_RUNTIME, triple.id, triple.local
        ));
        callback_code.push_str(&format!(
            "\n{}.reload(\"{}\", __{})",
            HMR_RUNTIME, triple.id, triple.exported
        ));
    }

    let params = correlation
        .triples
        .iter()
        .map(|t| format!("{}: __{}", t.exported, t.exported))
        .collect::<Vec<_>>()
        .join(",");

    code.push_str(&format!(
        "\nimport.meta.hot.accept(({{{}}}) => {{{}\n}})",
        params, callback_code
    ));
    code
}

fn ssr_registration(correlation: &Correlation, relative_path: &str) -> String {
    // serde_json string encoding doubles as JS string literal escaping
    let module_path =
        serde_json::to_string(relative_path).unwrap_or_else(|_| format!("\"{}\"", relative_path));

    let mut code = format!(
        "\nimport {{ {} }} from \"{}\"\nconst {} = {}",
        SSR_REGISTER_HELPER_NAME, SSR_REGISTER_HELPER_ID, MODULE_ID_CONST, module_path
    );
    for triple in &correlation.triples {
        code.push_str(&format!(
            "\n{}({}, {})",
            SSR_REGISTER_HELPER_NAME, triple.local, MODULE_ID_CONST
        ));
    }
    code
}

/// Path of `id` relative to `root`, with `/` separators regardless of host.
pub fn relative_module_path(root: &str, id: &str) -> String {
    let root_segments = normalize_segments(root);
    let id_segments = normalize_segments(id);

    let common = root_segments
        .iter()
        .zip(id_segments.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    for _ in common..root_segments.len() {
        parts.push("..");
    }
    parts.extend(id_segments[common..].iter().copied());
    parts.join("/")
}

fn normalize_segments(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments
}
