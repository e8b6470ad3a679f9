use crate::ParsedSource;
use swc_core::ecma::ast::{ImportSpecifier, ModuleDecl, ModuleItem, Program};

/// Local name of the default import of `module_id`, if the source has one.
///
/// Only top-level imports of a module count; the first one with a default
/// binding wins. Type-only imports are ignored.
#[must_use]
pub fn find_import(parsed: &ParsedSource<'_>, module_id: &str) -> Option<String> {
    let Program::Module(module) = parsed.program() else {
        return None;
    };

    module.body.iter().find_map(|item| {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
            return None;
        };
        if import.type_only {
            return None;
        }
        if import.src.value.as_str()? != module_id {
            return None;
        }
        import.specifiers.iter().find_map(|specifier| match specifier {
            ImportSpecifier::Default(default) => Some(default.local.sym.to_string()),
            ImportSpecifier::Named(_) | ImportSpecifier::Namespace(_) => None,
        })
    })
}
