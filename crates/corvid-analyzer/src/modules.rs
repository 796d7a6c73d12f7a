//! The module graph: the tree of `module a.b.c;` paths declared across a
//! compilation, and the per-file dependency sets import declarations
//! accumulate against it.

use corvid_ast::ids::ModuleId;
use corvid_ast::module::ImportWildcard;
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
struct ModuleNode {
    path: Vec<String>,
    parent: Option<ModuleId>,
    children: Vec<ModuleId>,
}

/// The tree of modules declared across a compilation, plus the per-file
/// dependency sets computed from `import` declarations (spec §4.5).
#[derive(Debug, Default)]
pub struct ModuleGraph {
    nodes: Vec<ModuleNode>,
    by_path: FxHashMap<Vec<String>, ModuleId>,
}

impl ModuleGraph {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Binds `path` to a module node, creating any missing ancestor
    /// segments along the way, and returns its id.
    pub fn intern_path(&mut self, path: &[String]) -> ModuleId {
        let mut prefix = Vec::with_capacity(path.len());
        let mut parent = None;
        let mut id = None;
        for segment in path {
            prefix.push(segment.clone());
            id = Some(if let Some(&existing) = self.by_path.get(&prefix) {
                existing
            } else {
                let new_id = ModuleId::new(u32::try_from(self.nodes.len()).expect("module graph overflow"));
                self.nodes.push(ModuleNode { path: prefix.clone(), parent, children: Vec::new() });
                if let Some(p) = parent {
                    self.nodes[p.index()].children.push(new_id);
                }
                self.by_path.insert(prefix.clone(), new_id);
                new_id
            });
            parent = id;
        }
        id.expect("module path must be non-empty")
    }

    #[must_use]
    pub fn lookup_path(&self, path: &[String]) -> Option<ModuleId> { self.by_path.get(path).copied() }

    #[must_use]
    pub fn path_of(&self, id: ModuleId) -> &[String] { &self.nodes[id.index()].path }

    /// All transitive descendants of `id`, not including `id` itself.
    fn descendants(&self, id: ModuleId, out: &mut Vec<ModuleId>) {
        for &child in &self.nodes[id.index()].children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    /// Expands an import against the wildcard form (spec §4.5): `None`
    /// imports exactly the named module, `Children` adds its immediate
    /// children, `Transitive` adds every descendant.
    #[must_use]
    pub fn expand_import(&self, id: ModuleId, wildcard: ImportWildcard) -> Vec<ModuleId> {
        let mut result = vec![id];
        match wildcard {
            ImportWildcard::None => {}
            ImportWildcard::Children => result.extend(self.nodes[id.index()].children.iter().copied()),
            ImportWildcard::Transitive => self.descendants(id, &mut result),
        }
        result
    }
}

/// The dependency set computed for one file: its own module plus every
/// module reachable through its `import` declarations.
#[derive(Debug, Default, Clone)]
pub struct DependencySet {
    pub own_module: Option<ModuleId>,
    pub imported: Vec<ModuleId>,
}

impl DependencySet {
    #[must_use]
    pub fn contains(&self, module: ModuleId) -> bool {
        self.own_module == Some(module) || self.imported.contains(&module)
    }
}
