//! Module Shape
//!
//! The closed set of top-level statement and expression kinds the component
//! analysis reasons about. The compiler lowers its full AST into these shapes;
//! everything the analysis does not care about collapses into `Other`.

// ═══════════════════════════════════════════════════════════════════════════════
// EXPRESSIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    /// Bare identifier callee: `foo(...)`
    Identifier(String),
    /// Member access, computed callee, IIFE, ...
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprShape {
    Call(Callee),
    Identifier(String),
    Other,
}

impl ExprShape {
    pub fn call(callee: &str) -> Self {
        ExprShape::Call(Callee::Identifier(callee.to_string()))
    }

    pub fn ident(name: &str) -> Self {
        ExprShape::Identifier(name.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DECLARATIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingTarget {
    Identifier(String),
    /// Object or array destructuring
    Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declarator {
    pub target: BindingTarget,
    pub init: Option<ExprShape>,
}

impl Declarator {
    pub fn named(name: &str, init: Option<ExprShape>) -> Self {
        Declarator {
            target: BindingTarget::Identifier(name.to_string()),
            init,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportedName {
    Identifier(String),
    /// `export { a as "some-name" }`
    StringLiteral(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSpecifierShape {
    pub local: String,
    pub exported: ExportedName,
}

impl ExportSpecifierShape {
    pub fn renamed(local: &str, exported: &str) -> Self {
        ExportSpecifierShape {
            local: local.to_string(),
            exported: ExportedName::Identifier(exported.to_string()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TOP-LEVEL ITEMS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopLevelItem {
    /// `const a = ..., b = ...`
    Variables(Vec<Declarator>),
    /// `export const a = ...`
    ExportVariables(Vec<Declarator>),
    /// `export { a, b as c }` without a `from` clause
    ExportSpecifiers(Vec<ExportSpecifierShape>),
    /// `export default <expr>`
    ExportDefault(ExprShape),
    Other,
}
