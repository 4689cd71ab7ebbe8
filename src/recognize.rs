use crate::syntax::{BindingTarget, Callee, Declarator, ExprShape};

/// The only callee recognized as constructing a component. Aliased imports
/// (`import { defineComponent as dc }`) and member calls (`Vue.defineComponent`)
/// are not followed.
pub const COMPONENT_CONSTRUCTOR: &str = "defineComponent";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredComponent {
    pub name: String,
}

/// Check if an expression is a direct `defineComponent(...)` call
pub fn is_component_construction(expr: &ExprShape) -> bool {
    matches!(
        expr,
        ExprShape::Call(Callee::Identifier(name)) if name == COMPONENT_CONSTRUCTOR
    )
}

/// Collect every declarator of a variable declaration that binds a plain
/// identifier to a component construction, in declaration order.
pub fn scan_declaration(declarators: &[Declarator]) -> Vec<DeclaredComponent> {
    declarators
        .iter()
        .filter_map(|decl| match (&decl.target, &decl.init) {
            (BindingTarget::Identifier(name), Some(init)) if is_component_construction(init) => {
                Some(DeclaredComponent { name: name.clone() })
            }
            _ => None,
        })
        .collect()
}
