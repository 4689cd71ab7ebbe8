//! Module Compiler
//!
//! Parses a component module with oxc, strips TypeScript, compiles JSX,
//! runs any registered extensions and prints the result back out. The AST is
//! summarised into the closed `syntax` shapes before the allocator goes away,
//! so callers never hold on to oxc types.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    BindingPattern, Declaration, ExportDefaultDeclarationKind, ExportSpecifier, Expression,
    ModuleExportName, Program, Statement, VariableDeclaration,
};
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_parser::{ParseOptions, Parser};
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use oxc_transformer::{JsxOptions, JsxRuntime, TransformOptions, Transformer};
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::error::{PluginError, Result};
use crate::options::{strip_query, JsxPassthrough, JsxRuntimeKind};
use crate::syntax::{
    BindingTarget, Callee, Declarator, ExportSpecifierShape, ExportedName, ExprShape, TopLevelItem,
};

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER SEAM
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'s> {
    pub code: &'s str,
    pub id: &'s str,
    pub source_map: bool,
}

#[derive(Debug, Clone)]
pub struct CompiledModule {
    pub code: String,
    /// Source map JSON, present when requested
    pub map: Option<String>,
    pub body: Vec<TopLevelItem>,
}

pub trait ModuleCompiler: Send + Sync {
    fn compile(&self, request: &CompileRequest) -> Result<CompiledModule>;
}

/// Extra AST pass chained after the TypeScript/JSX transform, in
/// registration order.
pub trait CompilerExtension: Send + Sync {
    fn name(&self) -> &str;
    fn apply<'a>(&self, allocator: &'a Allocator, program: &mut Program<'a>);
}

// ═══════════════════════════════════════════════════════════════════════════════
// OXC COMPILER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct OxcCompiler {
    jsx: JsxPassthrough,
    extensions: Vec<Box<dyn CompilerExtension>>,
}

impl OxcCompiler {
    pub fn new(jsx: JsxPassthrough) -> Self {
        OxcCompiler {
            jsx,
            extensions: Vec::new(),
        }
    }

    pub fn push_extension(&mut self, extension: Box<dyn CompilerExtension>) {
        self.extensions.push(extension);
    }

    fn transform_options(&self) -> TransformOptions {
        let mut jsx = JsxOptions::default();
        jsx.runtime = match self.jsx.runtime {
            JsxRuntimeKind::Automatic => JsxRuntime::Automatic,
            JsxRuntimeKind::Classic => JsxRuntime::Classic,
        };
        jsx.import_source = self.jsx.import_source.clone();
        jsx.pragma = self.jsx.pragma.clone();
        jsx.pragma_frag = self.jsx.pragma_frag.clone();
        jsx.development = self.jsx.development;

        TransformOptions {
            jsx,
            ..TransformOptions::default()
        }
    }
}

impl ModuleCompiler for OxcCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<CompiledModule> {
        let filepath = strip_query(request.id);
        let source_type = module_source_type(request.id);

        let allocator = Allocator::default();
        let options = ParseOptions {
            preserve_parens: false,
            ..ParseOptions::default()
        };
        let ret = Parser::new(&allocator, request.code, source_type)
            .with_options(options)
            .parse();
        if !ret.errors.is_empty() {
            return Err(compile_error(request.id, &ret.errors[..]));
        }
        let mut program = ret.program;

        let scoping = SemanticBuilder::new()
            .build(&program)
            .semantic
            .into_scoping();
        let ret = Transformer::new(&allocator, Path::new(filepath), &self.transform_options())
            .build_with_scoping(scoping, &mut program);
        if !ret.errors.is_empty() {
            return Err(compile_error(request.id, &ret.errors[..]));
        }

        for extension in &self.extensions {
            trace!(id = request.id, extension = extension.name(), "running compiler extension");
            extension.apply(&allocator, &mut program);
        }

        let body = lower_program(&program);

        let codegen_options = CodegenOptions {
            source_map_path: request.source_map.then(|| PathBuf::from(filepath)),
            ..CodegenOptions::default()
        };
        let printed = Codegen::new().with_options(codegen_options).build(&program);

        Ok(CompiledModule {
            code: printed.code,
            map: printed.map.map(|map| map.to_json_string()),
            body,
        })
    }
}

/// `.tsx` anywhere at the end of the id (e.g. `App.vue?vue&type=script&lang.tsx`)
/// also enables TypeScript.
fn module_source_type(id: &str) -> SourceType {
    let filepath = strip_query(id);
    let source_type = SourceType::from_path(filepath).unwrap_or_else(|_| {
        SourceType::default().with_module(true).with_jsx(true)
    });
    if id.ends_with(".tsx") {
        source_type.with_typescript(true).with_jsx(true)
    } else {
        source_type
    }
}

fn compile_error<E: ToString>(id: &str, errors: &[E]) -> PluginError {
    PluginError::Compile {
        id: id.to_string(),
        messages: errors.iter().map(ToString::to_string).collect(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOWERING TO MODULE SHAPE
// ═══════════════════════════════════════════════════════════════════════════════

pub fn lower_program(program: &Program) -> Vec<TopLevelItem> {
    program.body.iter().map(lower_statement).collect()
}

fn lower_statement(stmt: &Statement) -> TopLevelItem {
    match stmt {
        Statement::VariableDeclaration(decl) => TopLevelItem::Variables(lower_declarators(decl)),
        Statement::ExportNamedDeclaration(export) => match &export.declaration {
            Some(Declaration::VariableDeclaration(decl)) => {
                TopLevelItem::ExportVariables(lower_declarators(decl))
            }
            Some(_) => TopLevelItem::Other,
            // `export { a } from './b'` does not name local bindings
            None if export.source.is_some() => TopLevelItem::Other,
            None => TopLevelItem::ExportSpecifiers(
                export.specifiers.iter().filter_map(lower_specifier).collect(),
            ),
        },
        Statement::ExportDefaultDeclaration(export) => {
            TopLevelItem::ExportDefault(lower_default_export(&export.declaration))
        }
        _ => TopLevelItem::Other,
    }
}

fn lower_declarators(decl: &VariableDeclaration) -> Vec<Declarator> {
    decl.declarations
        .iter()
        .map(|d| Declarator {
            target: match &d.id {
                BindingPattern::BindingIdentifier(id) => BindingTarget::Identifier(id.name.to_string()),
                _ => BindingTarget::Pattern,
            },
            init: d.init.as_ref().map(lower_expression),
        })
        .collect()
}

fn lower_specifier(spec: &ExportSpecifier) -> Option<ExportSpecifierShape> {
    let local = match &spec.local {
        ModuleExportName::IdentifierReference(id) => id.name.to_string(),
        ModuleExportName::IdentifierName(id) => id.name.to_string(),
        ModuleExportName::StringLiteral(_) => return None,
    };
    let exported = match &spec.exported {
        ModuleExportName::IdentifierName(id) => ExportedName::Identifier(id.name.to_string()),
        ModuleExportName::IdentifierReference(id) => ExportedName::Identifier(id.name.to_string()),
        ModuleExportName::StringLiteral(s) => ExportedName::StringLiteral(s.value.to_string()),
    };
    Some(ExportSpecifierShape { local, exported })
}

fn lower_default_export(kind: &ExportDefaultDeclarationKind) -> ExprShape {
    match kind.as_expression() {
        Some(expr) => lower_expression(expr),
        // function / class declarations
        None => ExprShape::Other,
    }
}

fn lower_expression(expr: &Expression) -> ExprShape {
    match expr.without_parentheses() {
        Expression::CallExpression(call) => match call.callee.without_parentheses() {
            Expression::Identifier(id) => ExprShape::Call(Callee::Identifier(id.name.to_string())),
            _ => ExprShape::Call(Callee::Other),
        },
        Expression::Identifier(id) => ExprShape::Identifier(id.name.to_string()),
        _ => ExprShape::Other,
    }
}
