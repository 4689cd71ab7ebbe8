//! Plugin Configuration
//!
//! Options arrive from the JS side as JSON once per build session and are
//! resolved into immutable values that every transform call reads.

use glob::{MatchOptions, Pattern};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{PluginError, Result};

pub const DEFAULT_INCLUDE: &str = r"\.[jt]sx$";
pub const DEFAULT_IMPORT_SOURCE: &str = "vue";

/// `*` stops at `/`, `**` spans directories
const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

// ═══════════════════════════════════════════════════════════════════════════════
// USER OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// A plain string is a glob, `{ "regex": "..." }` is a regex source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PatternSource {
    Glob(String),
    Regex { regex: String },
}

impl PatternSource {
    pub fn glob(pattern: &str) -> Self {
        PatternSource::Glob(pattern.to_string())
    }

    pub fn regex(pattern: &str) -> Self {
        PatternSource::Regex {
            regex: pattern.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FilterPattern {
    One(PatternSource),
    Many(Vec<PatternSource>),
}

impl FilterPattern {
    fn sources(&self) -> &[PatternSource] {
        match self {
            FilterPattern::One(source) => std::slice::from_ref(source),
            FilterPattern::Many(sources) => sources,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum JsxRuntimeKind {
    #[default]
    Automatic,
    Classic,
}

/// Forwarded as-is to the JSX transform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct JsxPassthrough {
    pub runtime: JsxRuntimeKind,
    pub import_source: Option<String>,
    pub pragma: Option<String>,
    pub pragma_frag: Option<String>,
    pub development: bool,
}

impl Default for JsxPassthrough {
    fn default() -> Self {
        JsxPassthrough {
            runtime: JsxRuntimeKind::Automatic,
            import_source: Some(DEFAULT_IMPORT_SOURCE.to_string()),
            pragma: None,
            pragma_frag: None,
            development: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginOptions {
    pub include: Option<FilterPattern>,
    pub exclude: Option<FilterPattern>,
    pub jsx: JsxPassthrough,
}

impl PluginOptions {
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SESSION
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildCommand {
    #[default]
    Serve,
    Build,
}

/// What the host knows about the build once its config is resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(default)]
    pub command: BuildCommand,
    #[serde(default)]
    pub is_production: bool,
    #[serde(default)]
    pub build_sourcemap: bool,
    pub root: String,
}

impl SessionInfo {
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeFlags {
    pub live_reload: bool,
    pub source_map: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSession {
    pub flags: ModeFlags,
    pub root: PathBuf,
}

impl From<&SessionInfo> for ResolvedSession {
    fn from(info: &SessionInfo) -> Self {
        let serving = info.command == BuildCommand::Serve;
        ResolvedSession {
            flags: ModeFlags {
                live_reload: serving && !info.is_production,
                source_map: serving || info.build_sourcemap,
            },
            root: resolve_root(&info.root),
        }
    }
}

/// Relative roots (the empty one included) are taken from the working directory.
fn resolve_root(root: &str) -> PathBuf {
    let root = PathBuf::from(root);
    if root.is_absolute() {
        return root;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(root),
        Err(err) => {
            debug!(%err, root = %root.display(), "cannot resolve project root");
            root
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MODULE FILTER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
enum Matcher {
    Glob(Pattern),
    Regex(Regex),
}

impl Matcher {
    fn compile(source: &PatternSource, root: &Path) -> Result<Self> {
        match source {
            PatternSource::Glob(pattern) => {
                let resolved = resolve_glob(pattern, root);
                Pattern::new(&resolved)
                    .map(Matcher::Glob)
                    .map_err(|e| PluginError::InvalidGlob {
                        pattern: pattern.clone(),
                        source: e,
                    })
            }
            PatternSource::Regex { regex } => Regex::new(regex)
                .map(Matcher::Regex)
                .map_err(|e| PluginError::InvalidFilter {
                    pattern: regex.clone(),
                    source: e,
                }),
        }
    }

    fn is_match(&self, path: &str) -> bool {
        match self {
            Matcher::Glob(pattern) => pattern.matches_with(path, GLOB_OPTIONS),
            Matcher::Regex(re) => re.is_match(path),
        }
    }
}

/// Globs that are neither absolute nor `**`-led are anchored at `root`.
fn resolve_glob(pattern: &str, root: &Path) -> String {
    let pattern = pattern.replace('\\', "/");
    if pattern.starts_with("**") || pattern.starts_with('/') || Path::new(&pattern).is_absolute() {
        return pattern;
    }
    let base = root.to_string_lossy().replace('\\', "/");
    let relative = pattern.strip_prefix("./").unwrap_or(&pattern);
    format!("{}/{}", Pattern::escape(base.trim_end_matches('/')), relative)
}

#[derive(Debug, Clone)]
pub struct ModuleFilter {
    include: Vec<Matcher>,
    exclude: Vec<Matcher>,
}

impl ModuleFilter {
    pub fn new(
        include: Option<&FilterPattern>,
        exclude: Option<&FilterPattern>,
        root: &Path,
    ) -> Result<Self> {
        let include = match include {
            Some(pattern) => compile_patterns(pattern, root)?,
            None => vec![Matcher::compile(&PatternSource::regex(DEFAULT_INCLUDE), root)?],
        };
        let exclude = match exclude {
            Some(pattern) => compile_patterns(pattern, root)?,
            None => Vec::new(),
        };
        Ok(ModuleFilter { include, exclude })
    }

    /// Virtual modules (`\0` prefix) never match. Patterns are tried against the
    /// full id and against the id without its query string.
    pub fn matches(&self, id: &str) -> bool {
        if id.starts_with('\0') {
            return false;
        }
        let id = id.replace('\\', "/");
        let path = strip_query(&id);
        let hit = |matcher: &Matcher| matcher.is_match(&id) || matcher.is_match(path);

        if self.exclude.iter().any(|m| hit(m)) {
            return false;
        }
        self.include.iter().any(|m| hit(m))
    }
}

fn compile_patterns(pattern: &FilterPattern, root: &Path) -> Result<Vec<Matcher>> {
    pattern
        .sources()
        .iter()
        .map(|source| Matcher::compile(source, root))
        .collect()
}

pub fn strip_query(id: &str) -> &str {
    id.split('?').next().unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ROOT: &str = "/root/app";

    fn filter(include: Option<FilterPattern>, exclude: Option<FilterPattern>) -> ModuleFilter {
        ModuleFilter::new(include.as_ref(), exclude.as_ref(), Path::new(ROOT)).unwrap()
    }

    #[test]
    fn test_default_filter() {
        let filter = filter(None, None);
        assert!(filter.matches("/src/App.jsx"));
        assert!(filter.matches("/src/App.tsx"));
        assert!(filter.matches("/src/App.tsx?t=1700000000"));
        assert!(!filter.matches("/src/main.ts"));
        assert!(!filter.matches("\0/src/virtual.jsx"));
    }

    #[test]
    fn test_exclude_wins() {
        let filter = filter(
            None,
            Some(FilterPattern::Many(vec![PatternSource::glob("**/node_modules/**")])),
        );
        assert!(!filter.matches("/root/app/node_modules/lib/Button.jsx"));
        assert!(filter.matches("/root/app/src/Button.jsx"));
    }

    #[test]
    fn test_glob_include() {
        let filter = filter(Some(FilterPattern::One(PatternSource::glob("**/*.jsx"))), None);
        assert!(filter.matches("/root/app/src/A.jsx"));
        assert!(filter.matches("/elsewhere/A.jsx?t=1"));
        assert!(!filter.matches("/root/app/src/A.tsx"));
    }

    #[test]
    fn test_relative_glob_is_anchored_at_root() {
        let filter = filter(Some(FilterPattern::One(PatternSource::glob("src/*.jsx"))), None);
        assert!(filter.matches("/root/app/src/A.jsx"));
        // `*` does not cross directories
        assert!(!filter.matches("/root/app/src/nested/A.jsx"));
        assert!(!filter.matches("/other/src/A.jsx"));

        let nested = filter_with("./src/**/*.jsx");
        assert!(nested.matches("/root/app/src/A.jsx"));
        assert!(nested.matches("/root/app/src/nested/A.jsx"));
        assert!(!nested.matches("/root/app/lib/A.jsx"));
    }

    fn filter_with(glob: &str) -> ModuleFilter {
        filter(Some(FilterPattern::One(PatternSource::glob(glob))), None)
    }

    #[test]
    fn test_regex_include() {
        let filter = filter(Some(FilterPattern::One(PatternSource::regex(r"\.vue$"))), None);
        assert!(filter.matches("/src/App.vue?vue&type=script"));
        assert!(!filter.matches("/src/App.jsx"));
    }

    #[test]
    fn test_invalid_patterns() {
        let root = Path::new(ROOT);
        let err = ModuleFilter::new(Some(&FilterPattern::One(PatternSource::regex("("))), None, root)
            .unwrap_err();
        assert!(matches!(err, PluginError::InvalidFilter { ref pattern, .. } if pattern == "("));

        let err = ModuleFilter::new(None, Some(&FilterPattern::One(PatternSource::glob("src/[a"))), root)
            .unwrap_err();
        assert!(matches!(err, PluginError::InvalidGlob { ref pattern, .. } if pattern == "src/[a"));
    }

    #[test]
    fn test_options_from_json() {
        let options = PluginOptions::from_json(json!({
            "include": ["src/**/*.jsx", { "regex": "\\.mjsx$" }],
            "exclude": "**/*.test.jsx",
            "jsx": { "runtime": "classic", "pragma": "h" }
        }))
        .unwrap();

        assert_eq!(
            options.include,
            Some(FilterPattern::Many(vec![
                PatternSource::glob("src/**/*.jsx"),
                PatternSource::regex("\\.mjsx$"),
            ]))
        );
        assert_eq!(
            options.exclude,
            Some(FilterPattern::One(PatternSource::glob("**/*.test.jsx")))
        );
        assert_eq!(options.jsx.runtime, JsxRuntimeKind::Classic);
        assert_eq!(options.jsx.pragma.as_deref(), Some("h"));
        // Fields not mentioned fall back to their own defaults
        assert_eq!(options.jsx.import_source.as_deref(), Some("vue"));
    }

    #[test]
    fn test_session_flags() {
        let cases = [
            (BuildCommand::Serve, false, false, true, true),
            (BuildCommand::Serve, true, false, false, true),
            (BuildCommand::Build, true, false, false, false),
            (BuildCommand::Build, true, true, false, true),
        ];

        for (command, is_production, build_sourcemap, live_reload, source_map) in cases {
            let session = ResolvedSession::from(&SessionInfo {
                command,
                is_production,
                build_sourcemap,
                root: "/root".to_string(),
            });
            assert_eq!(
                session.flags,
                ModeFlags {
                    live_reload,
                    source_map
                }
            );
        }
    }

    #[test]
    fn test_session_from_json() {
        let info = SessionInfo::from_json(json!({
            "command": "build",
            "isProduction": true,
            "root": "/app"
        }))
        .unwrap();
        assert_eq!(info.command, BuildCommand::Build);
        assert!(!info.build_sourcemap);
        assert_eq!(ResolvedSession::from(&info).root, PathBuf::from("/app"));
    }

    #[test]
    fn test_session_requires_root() {
        let err = SessionInfo::from_json(json!({ "command": "serve" })).unwrap_err();
        assert!(matches!(err, PluginError::InvalidOptions(_)));
    }

    #[test]
    fn test_relative_root_uses_working_directory() {
        let cwd = std::env::current_dir().unwrap();
        for (root, expected) in [("", cwd.clone()), ("app", cwd.join("app"))] {
            let session = ResolvedSession::from(&SessionInfo {
                command: BuildCommand::Build,
                is_production: true,
                build_sourcemap: false,
                root: root.to_string(),
            });
            assert!(session.root.is_absolute());
            assert_eq!(session.root, expected);
        }
    }
}
