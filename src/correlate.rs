//! Export Correlation
//!
//! Walks the top-level items of a module once and pairs every recognized
//! component binding with the name it is exported under.
//!
//! Only items *before* an export are visible to it: a component declared
//! below `export { Foo }` is not picked up.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ident::synth;
use crate::recognize::{is_component_construction, scan_declaration, DeclaredComponent};
use crate::syntax::{ExportedName, ExprShape, TopLevelItem};

/// Local binding the emitter introduces for `export default defineComponent(...)`
pub const DEFAULT_LOCAL: &str = "__default__";
pub const DEFAULT_EXPORT: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentTriple {
    pub local: String,
    pub exported: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Correlation {
    pub triples: Vec<ComponentTriple>,
    /// The default export is an inline `defineComponent(...)` call that has to
    /// be bound to `__default__` before anything can reference it.
    pub has_default_component: bool,
}

impl Correlation {
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

pub fn correlate(body: &[TopLevelItem], module_id: &str) -> Correlation {
    let mut declared: Vec<DeclaredComponent> = Vec::new();
    let mut result = Correlation::default();

    let is_declared =
        |declared: &[DeclaredComponent], name: &str| declared.iter().any(|c| c.name == name);

    for item in body {
        match item {
            TopLevelItem::Variables(declarators) => {
                declared.extend(scan_declaration(declarators));
            }
            TopLevelItem::ExportVariables(declarators) => {
                for component in scan_declaration(declarators) {
                    result.triples.push(ComponentTriple {
                        id: synth(module_id, &component.name),
                        local: component.name.clone(),
                        exported: component.name,
                    });
                }
            }
            TopLevelItem::ExportSpecifiers(specifiers) => {
                for spec in specifiers {
                    let exported = match &spec.exported {
                        ExportedName::Identifier(name) => name,
                        ExportedName::StringLiteral(name) => {
                            debug!(module_id, local = %spec.local, exported = %name, "skipping string-literal export name");
                            continue;
                        }
                    };
                    if !is_declared(&declared, &spec.local) {
                        debug!(module_id, local = %spec.local, "export specifier is not a known component");
                        continue;
                    }
                    result.triples.push(ComponentTriple {
                        local: spec.local.clone(),
                        exported: exported.clone(),
                        id: synth(module_id, exported),
                    });
                }
            }
            TopLevelItem::ExportDefault(ExprShape::Identifier(name)) => {
                if is_declared(&declared, name) {
                    result.triples.push(ComponentTriple {
                        local: name.clone(),
                        exported: DEFAULT_EXPORT.to_string(),
                        id: synth(module_id, DEFAULT_EXPORT),
                    });
                } else {
                    debug!(module_id, local = %name, "default export is not a known component");
                }
            }
            TopLevelItem::ExportDefault(expr) if is_component_construction(expr) => {
                result.has_default_component = true;
                result.triples.push(ComponentTriple {
                    local: DEFAULT_LOCAL.to_string(),
                    exported: DEFAULT_EXPORT.to_string(),
                    id: synth(module_id, DEFAULT_EXPORT),
                });
            }
            TopLevelItem::ExportDefault(_) | TopLevelItem::Other => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Declarator, ExportSpecifierShape};
    use pretty_assertions::assert_eq;

    const MODULE: &str = "/src/components/Foo.jsx";

    fn component(name: &str) -> Declarator {
        Declarator::named(name, Some(ExprShape::call("defineComponent")))
    }

    #[test]
    fn test_declared_then_exported_by_specifier() {
        let body = vec![
            TopLevelItem::Variables(vec![component("Foo")]),
            TopLevelItem::ExportSpecifiers(vec![ExportSpecifierShape::renamed("Foo", "Foo")]),
        ];

        let result = correlate(&body, MODULE);
        assert_eq!(
            result.triples,
            vec![ComponentTriple {
                local: "Foo".to_string(),
                exported: "Foo".to_string(),
                id: synth(MODULE, "Foo"),
            }]
        );
        assert!(!result.has_default_component);
    }

    #[test]
    fn test_renamed_specifier_hashes_exported_name() {
        let body = vec![
            TopLevelItem::Variables(vec![component("Inner")]),
            TopLevelItem::ExportSpecifiers(vec![ExportSpecifierShape::renamed("Inner", "Outer")]),
        ];

        let result = correlate(&body, MODULE);
        assert_eq!(result.triples.len(), 1);
        assert_eq!(result.triples[0].local, "Inner");
        assert_eq!(result.triples[0].exported, "Outer");
        assert_eq!(result.triples[0].id, synth(MODULE, "Outer"));
    }

    #[test]
    fn test_export_declaration_emits_triple_per_component() {
        let body = vec![TopLevelItem::ExportVariables(vec![
            component("A"),
            Declarator::named("count", Some(ExprShape::Other)),
            component("B"),
        ])];

        let result = correlate(&body, MODULE);
        let exported: Vec<_> = result.triples.iter().map(|t| t.exported.as_str()).collect();
        assert_eq!(exported, vec!["A", "B"]);
        assert!(result.triples.iter().all(|t| t.local == t.exported));
    }

    #[test]
    fn test_inline_default_component() {
        let body = vec![TopLevelItem::ExportDefault(ExprShape::call("defineComponent"))];

        let result = correlate(&body, MODULE);
        assert!(result.has_default_component);
        assert_eq!(
            result.triples,
            vec![ComponentTriple {
                local: DEFAULT_LOCAL.to_string(),
                exported: DEFAULT_EXPORT.to_string(),
                id: synth(MODULE, "default"),
            }]
        );
    }

    #[test]
    fn test_default_identifier_of_declared_component() {
        let body = vec![
            TopLevelItem::Variables(vec![component("Foo")]),
            TopLevelItem::ExportDefault(ExprShape::ident("Foo")),
        ];

        let result = correlate(&body, MODULE);
        assert!(!result.has_default_component);
        assert_eq!(result.triples.len(), 1);
        assert_eq!(result.triples[0].local, "Foo");
        assert_eq!(result.triples[0].exported, "default");
    }

    #[test]
    fn test_default_identifier_of_unknown_binding_is_skipped() {
        let body = vec![
            TopLevelItem::Variables(vec![Declarator::named("config", Some(ExprShape::Other))]),
            TopLevelItem::ExportDefault(ExprShape::ident("config")),
        ];

        assert!(correlate(&body, MODULE).is_empty());
    }

    #[test]
    fn test_declaration_after_export_is_not_seen() {
        let body = vec![
            TopLevelItem::ExportSpecifiers(vec![ExportSpecifierShape::renamed("Late", "Late")]),
            TopLevelItem::Variables(vec![component("Late")]),
        ];

        assert!(correlate(&body, MODULE).is_empty());
    }

    #[test]
    fn test_exported_declarations_are_not_visible_to_later_specifiers() {
        let body = vec![
            TopLevelItem::ExportVariables(vec![component("A")]),
            TopLevelItem::ExportSpecifiers(vec![ExportSpecifierShape::renamed("A", "Alias")]),
        ];

        let result = correlate(&body, MODULE);
        assert_eq!(result.triples.len(), 1);
        assert_eq!(result.triples[0].exported, "A");
    }

    #[test]
    fn test_string_literal_export_name_is_skipped() {
        let body = vec![
            TopLevelItem::Variables(vec![component("Foo")]),
            TopLevelItem::ExportSpecifiers(vec![ExportSpecifierShape {
                local: "Foo".to_string(),
                exported: ExportedName::StringLiteral("foo-bar".to_string()),
            }]),
        ];

        assert!(correlate(&body, MODULE).is_empty());
    }

    #[test]
    fn test_aliased_constructor_is_not_recognized() {
        let body = vec![TopLevelItem::ExportVariables(vec![Declarator::named(
            "Foo",
            Some(ExprShape::call("dc")),
        )])];

        assert!(correlate(&body, MODULE).is_empty());
    }
}
