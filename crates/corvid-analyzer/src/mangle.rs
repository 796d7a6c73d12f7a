//! Deterministic name mangling (spec §6).

use corvid_ast::ids::TypeId;

use crate::types::{Type, TypeRegistry};

/// Multiply-by-31-seed-7 string hash, used to mangle struct/class names
/// into a stable 32-bit hex tag.
fn hash31(name: &str) -> u32 {
    let mut h: u32 = 7;
    for b in name.bytes() {
        h = h.wrapping_mul(31).wrapping_add(u32::from(b));
    }
    h
}

fn mangle_type(registry: &TypeRegistry, id: TypeId) -> String {
    match registry.get(id) {
        Type::Void => "v".to_string(),
        Type::Bool => "b".to_string(),
        Type::Integer { width, signed } => format!("{}{width}", if *signed { "i" } else { "u" }),
        Type::Float(p) => {
            let bits = match p {
                corvid_ast::types::FloatPrecision::Half => 16,
                corvid_ast::types::FloatPrecision::Single => 32,
                corvid_ast::types::FloatPrecision::Double => 64,
                corvid_ast::types::FloatPrecision::Decimal => 80,
                corvid_ast::types::FloatPrecision::Quad => 128,
            };
            format!("f{bits}")
        }
        Type::String => "s".to_string(),
        Type::Any => "s".to_string(),
        Type::Pointer(elem) => format!("p{}", mangle_type(registry, *elem)),
        Type::Optional(inner) => format!("o{}", mangle_type(registry, *inner)),
        Type::Array { element, .. } => format!("a{}", mangle_type(registry, *element)),
        Type::Function { params, return_type, .. } => {
            let param_mangles: String = params.iter().map(|p| mangle_type(registry, *p)).collect();
            format!("f{}{}{param_mangles}", mangle_type(registry, *return_type), params.len())
        }
        Type::Struct { name, .. } => format!("x{:x}", hash31(name)),
        Type::Class { name, .. } => format!("X{:x}", hash31(name)),
        Type::Tuple(elems) => {
            format!("x{:x}", hash31(&elems.iter().map(|e| mangle_type(registry, *e)).collect::<String>()))
        }
        Type::Alias { target, .. } => mangle_type(registry, registry.unwrap(*target)),
    }
}

/// Mangles a function's external symbol name.
///
/// `module_path` is the declaring file's module path (empty for a file
/// with no `module` declaration); `type_args` is non-empty only for a
/// generic instantiation.
#[must_use]
pub fn mangle_function(
    registry: &TypeRegistry,
    module_path: &[String],
    name: &str,
    is_entry_point: bool,
    is_extern: bool,
    param_types: &[TypeId],
    type_args: &[TypeId],
) -> String {
    if is_entry_point {
        return "main".to_string();
    }
    if is_extern {
        return name.to_string();
    }

    let mut mangled = if module_path.is_empty() { String::new() } else { format!("{}__", module_path.join("_")) };
    mangled.push_str(name);

    if !param_types.is_empty() {
        mangled.push('_');
        mangled.push_str(&param_types.len().to_string());
        for p in param_types {
            mangled.push_str(&mangle_type(registry, *p));
        }
    }

    if !type_args.is_empty() {
        mangled.push('_');
        for t in type_args {
            mangled.push_str(&mangle_type(registry, *t));
        }
    }

    mangled
}

/// Mangles a global variable's external symbol name — same module-path
/// qualification as a function, with no parameter suffix.
#[must_use]
pub fn mangle_global(module_path: &[String], name: &str, is_extern: bool) -> String {
    if is_extern {
        return name.to_string();
    }
    if module_path.is_empty() { name.to_string() } else { format!("{}__{name}", module_path.join("_")) }
}
