//! # Vue JSX Native Transform
//!
//! Compiles `.jsx`/`.tsx` component modules and wires every exported
//! `defineComponent(...)` into Vue's HMR runtime (dev server) or into the SSR
//! module registry (server builds).
//!
//! ## Pipeline Invariants
//!
//! 1. **Single pass**: top-level statements are read once, top to bottom. An
//!    export only sees component declarations that appear above it.
//!
//! 2. **Direct calls only**: a component is a bare `defineComponent(...)` call
//!    bound to a plain identifier or used as the default export. Aliases and
//!    member calls are not followed.
//!
//! 3. **Stable ids**: `id = sha256(moduleId + exportedName)[..8]`. The same
//!    module and export always produce the same id, across edits.
//!
//! 4. **Append only**: injected code is appended after the compiled module as
//!    self-contained statements. The only in-place edit is binding an inline
//!    default component to `__default__`.
//!
//! 5. **Best effort**: anything the analysis does not recognize is left
//!    alone. Missing HMR wiring never fails a build; parse errors do.

#[cfg(feature = "napi")]
use napi_derive::napi;

mod compiler;
mod correlate;
mod emit;
mod error;
mod helper;
mod ident;
mod logging;
mod options;
mod plugin;
mod recognize;
mod syntax;


pub use compiler::{
    lower_program, CompileRequest, CompiledModule, CompilerExtension, ModuleCompiler, OxcCompiler,
};
pub use correlate::{correlate, ComponentTriple, Correlation, DEFAULT_EXPORT, DEFAULT_LOCAL};
pub use emit::{emit, relative_module_path, EmitContext, HMR_RUNTIME};
pub use error::{PluginError, Result};
pub use helper::{SSR_REGISTER_HELPER_CODE, SSR_REGISTER_HELPER_ID};
pub use ident::synth;
pub use logging::{init_tracing, LOG_ENV};
pub use options::{
    BuildCommand, FilterPattern, JsxPassthrough, JsxRuntimeKind, ModeFlags, ModuleFilter,
    PatternSource, PluginOptions, ResolvedSession, SessionInfo,
};
pub use plugin::{JsxPlugin, TransformOutput};
pub use recognize::{is_component_construction, scan_declaration, DeclaredComponent, COMPONENT_CONSTRUCTOR};
pub use syntax::{
    BindingTarget, Callee, Declarator, ExportSpecifierShape, ExportedName, ExprShape, TopLevelItem,
};

#[cfg(feature = "napi")]
pub use logging::init_tracing_native;
#[cfg(feature = "napi")]
pub use plugin::NativeJsxPlugin;

#[cfg(feature = "napi")]
#[napi]
pub fn native_bridge_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
