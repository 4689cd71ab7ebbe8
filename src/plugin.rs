//! Plugin Engine
//!
//! One `JsxPlugin` is built per build session from the user options and the
//! resolved host config. `transform` is then called once per module and
//! shares nothing between calls but that immutable state.

#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::compiler::{CompileRequest, CompilerExtension, ModuleCompiler, OxcCompiler};
use crate::correlate::correlate;
use crate::emit::{emit, relative_module_path, EmitContext};
use crate::error::Result;
use crate::helper::{load_helper, resolve_helper_id};
use crate::options::{ModuleFilter, PluginOptions, ResolvedSession, SessionInfo};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct TransformOutput {
    pub code: String,
    pub map: Option<String>,
}

pub struct JsxPlugin<C: ModuleCompiler = OxcCompiler> {
    filter: ModuleFilter,
    session: ResolvedSession,
    compiler: C,
}

impl JsxPlugin<OxcCompiler> {
    pub fn new(options: PluginOptions, session: &SessionInfo) -> Result<Self> {
        let compiler = OxcCompiler::new(options.jsx.clone());
        JsxPlugin::with_compiler(&options, session, compiler)
    }

    pub fn with_extension(mut self, extension: impl CompilerExtension + 'static) -> Self {
        self.compiler.push_extension(Box::new(extension));
        self
    }
}

impl<C: ModuleCompiler> JsxPlugin<C> {
    pub fn with_compiler(options: &PluginOptions, session: &SessionInfo, compiler: C) -> Result<Self> {
        let session = ResolvedSession::from(session);
        let filter = ModuleFilter::new(
            options.include.as_ref(),
            options.exclude.as_ref(),
            &session.root,
        )?;
        Ok(JsxPlugin {
            filter,
            session,
            compiler,
        })
    }

    pub fn session(&self) -> &ResolvedSession {
        &self.session
    }

    /// `Ok(None)` means the module is not ours and passes through untouched.
    pub fn transform(&self, code: &str, id: &str, ssr: bool) -> Result<Option<TransformOutput>> {
        if !self.filter.matches(id) {
            trace!(id, "module filtered out");
            return Ok(None);
        }

        let flags = self.session.flags;
        let compiled = self.compiler.compile(&CompileRequest {
            code,
            id,
            source_map: flags.source_map,
        })?;

        if !ssr && !flags.live_reload {
            return Ok(Some(TransformOutput {
                code: compiled.code,
                map: compiled.map,
            }));
        }

        let correlation = correlate(&compiled.body, id);
        debug!(
            id,
            ssr,
            components = correlation.triples.len(),
            inline_default = correlation.has_default_component,
            "correlated component exports"
        );

        let root = self.session.root.to_string_lossy();
        let relative_path = relative_module_path(&root, id);
        let code = emit(
            compiled.code,
            &correlation,
            &EmitContext {
                module_id: id,
                relative_path: &relative_path,
                live_reload: flags.live_reload,
                ssr,
            },
        );

        Ok(Some(TransformOutput {
            code,
            map: compiled.map,
        }))
    }

    pub fn resolve_id(&self, id: &str) -> Option<String> {
        resolve_helper_id(id)
    }

    pub fn load(&self, id: &str) -> Option<&'static str> {
        load_helper(id)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

/// JS-facing wrapper around a default [`JsxPlugin`].
///
/// Compiler extensions are Rust values and cannot be passed in from JS. Hosts
/// that need them build their own addon around [`JsxPlugin::with_extension`].
#[cfg(feature = "napi")]
#[napi]
pub struct NativeJsxPlugin {
    inner: JsxPlugin,
}

#[cfg(feature = "napi")]
#[napi]
impl NativeJsxPlugin {
    #[napi(constructor)]
    pub fn new(options: Option<serde_json::Value>, session: serde_json::Value) -> napi::Result<Self> {
        let options = match options {
            Some(value) => PluginOptions::from_json(value)?,
            None => PluginOptions::default(),
        };
        let session = SessionInfo::from_json(session)?;
        Ok(NativeJsxPlugin {
            inner: JsxPlugin::new(options, &session)?,
        })
    }

    #[napi]
    pub fn transform(
        &self,
        code: String,
        id: String,
        ssr: Option<bool>,
    ) -> napi::Result<Option<TransformOutput>> {
        Ok(self.inner.transform(&code, &id, ssr.unwrap_or(false))?)
    }

    #[napi]
    pub fn resolve_id(&self, id: String) -> Option<String> {
        self.inner.resolve_id(&id)
    }

    #[napi]
    pub fn load(&self, id: String) -> Option<String> {
        self.inner.load(&id).map(str::to_string)
    }
}
