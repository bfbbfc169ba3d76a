//! "Field references type" graph over the registry
//!
//! Used to emit bindings dependencies-first, so every binding a constructor
//! asks for is defined earlier in the same artifact when both live there.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::DfsPostOrder;

use crate::registry::TypeRegistry;
use crate::types::{TypeDescriptor, TypeKind};

#[derive(Debug)]
pub struct TypeDependencyGraph {
    /// Edges point from a type to the types its fields use
    graph: DiGraph<String, ()>,
    indices: HashMap<String, NodeIndex>,
}

impl TypeDependencyGraph {
    pub fn from_registry(registry: &TypeRegistry) -> Self {
        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();

        for descriptor in registry.iter() {
            if descriptor.kind() != TypeKind::Atomic {
                let name = descriptor.qualified_name().to_string();
                let idx = graph.add_node(name.clone());
                indices.insert(name, idx);
            }
        }

        for descriptor in registry.iter() {
            let from = match descriptor {
                TypeDescriptor::Compound(_) | TypeDescriptor::Union(_) => {
                    indices[descriptor.qualified_name()]
                }
                TypeDescriptor::Atomic(_) | TypeDescriptor::Enum(_) => continue,
            };
            let mut linked = HashSet::new();
            for field in descriptor.fields() {
                if let Some(&to) = indices.get(&field.type_name) {
                    if linked.insert(to) {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }

        Self { graph, indices }
    }

    /// Direct dependencies of `name`, in field order
    #[cfg(test)]
    fn dependencies_of(&self, name: &str) -> Vec<&str> {
        let Some(&idx) = self.indices.get(name) else {
            return Vec::new();
        };
        // petgraph yields outgoing edges newest first
        let mut deps: Vec<&str> = self
            .graph
            .neighbors(idx)
            .map(|dep| self.graph[dep].as_str())
            .collect();
        deps.reverse();
        deps
    }

    /// Order `roots` so that every root comes after the roots it depends on
    /// (directly or through non-root types). Independent roots keep their
    /// relative order; names unknown to the graph are appended as given.
    pub fn emission_order<'n>(&self, roots: &[&'n str]) -> Vec<&'n str> {
        let wanted: HashMap<&str, &'n str> = roots.iter().map(|&root| (root, root)).collect();
        let mut ordered = Vec::with_capacity(roots.len());
        let mut emitted = HashSet::new();
        let mut dfs = DfsPostOrder::empty(&self.graph);

        for &root in roots {
            let Some(&start) = self.indices.get(root) else {
                if emitted.insert(root) {
                    ordered.push(root);
                }
                continue;
            };
            dfs.move_to(start);
            while let Some(idx) = dfs.next(&self.graph) {
                if let Some(&name) = wanted.get(self.graph[idx].as_str()) {
                    if emitted.insert(name) {
                        ordered.push(name);
                    }
                }
            }
        }
        ordered
    }
}
