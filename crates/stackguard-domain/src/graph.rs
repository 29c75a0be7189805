//! The normalized resource graph.
//!
//! Construction and evaluation are separate phases: a [`GraphBuilder`] accepts
//! resources and relationships and validates them one by one; [`GraphBuilder::build`]
//! freezes it into a [`ResourceGraph`] that only answers queries.
//!
//! Every lookup by id trims surrounding whitespace, like [`ResourceId::new`].

use crate::error::GraphError;
use crate::model::{RelationKind, Resource, ResourceKind};
use crate::schema;
use stackguard_types::ResourceId;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// A directed, typed edge between two resources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relationship {
    pub from: ResourceId,
    pub to: ResourceId,
    pub kind: RelationKind,
}

#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    resources: Vec<Resource>,
    index: BTreeMap<ResourceId, usize>,
    edges: Vec<(usize, RelationKind, usize)>,
    edge_set: BTreeSet<(usize, RelationKind, usize)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource after validating it against its kind's schema.
    ///
    /// A rejected resource leaves the builder unchanged.
    pub fn add_resource(&mut self, resource: Resource) -> Result<(), GraphError> {
        if self.index.contains_key(&resource.id) {
            return Err(GraphError::DuplicateResource { id: resource.id });
        }
        schema::validate(&resource).map_err(|violation| GraphError::SchemaValidation {
            id: resource.id.clone(),
            kind: resource.kind,
            violation,
        })?;

        self.index.insert(resource.id.clone(), self.resources.len());
        self.resources.push(resource);
        Ok(())
    }

    /// Add a relationship. Both endpoints must already be present; a repeated
    /// edge of the same kind between the same ordered pair is collapsed.
    pub fn add_relationship(
        &mut self,
        from: &str,
        to: &str,
        kind: RelationKind,
    ) -> Result<(), GraphError> {
        let from_idx = self.lookup(from, kind)?;
        let to_idx = self.lookup(to, kind)?;

        if self.edge_set.insert((from_idx, kind, to_idx)) {
            self.edges.push((from_idx, kind, to_idx));
        }
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id.trim())
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn build(self) -> ResourceGraph {
        let n = self.resources.len();
        let mut outgoing = vec![Vec::new(); n];
        let mut incoming = vec![Vec::new(); n];
        let mut relationships = Vec::with_capacity(self.edges.len());

        for &(from, kind, to) in &self.edges {
            outgoing[from].push((kind, to));
            incoming[to].push((kind, from));
            relationships.push(Relationship {
                from: self.resources[from].id.clone(),
                to: self.resources[to].id.clone(),
                kind,
            });
        }

        ResourceGraph {
            resources: self.resources,
            index: self.index,
            relationships,
            outgoing,
            incoming,
        }
    }

    fn lookup(&self, id: &str, relation: RelationKind) -> Result<usize, GraphError> {
        self.index
            .get(id.trim())
            .copied()
            .ok_or_else(|| GraphError::UnknownResource {
                id: ResourceId::new(id),
                relation,
            })
    }
}

/// Read-only resource graph. There is no way to mutate it once built.
#[derive(Clone, Debug, Default)]
pub struct ResourceGraph {
    resources: Vec<Resource>,
    index: BTreeMap<ResourceId, usize>,
    relationships: Vec<Relationship>,
    outgoing: Vec<Vec<(RelationKind, usize)>>,
    incoming: Vec<Vec<(RelationKind, usize)>>,
}

impl ResourceGraph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.position(id).map(|i| &self.resources[i])
    }

    /// All resources in insertion order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// All relationships in insertion order.
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Resources of one kind, in insertion order.
    pub fn resources_of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &Resource> + '_ {
        self.resources.iter().filter(move |r| r.kind == kind)
    }

    /// Kinds with at least one resource, in the fixed kind order.
    pub fn kinds_present(&self) -> Vec<ResourceKind> {
        let present: BTreeSet<ResourceKind> = self.resources.iter().map(|r| r.kind).collect();
        present.into_iter().collect()
    }

    /// Targets of `kind` edges leaving `id`, in edge insertion order.
    pub fn relationships_from(&self, id: &str, kind: RelationKind) -> Vec<&Resource> {
        self.neighbors(id, kind, &self.outgoing)
    }

    /// Sources of `kind` edges arriving at `id`, in edge insertion order.
    pub fn relationships_to(&self, id: &str, kind: RelationKind) -> Vec<&Resource> {
        self.neighbors(id, kind, &self.incoming)
    }

    pub fn has_relationship_from(&self, id: &str, kind: RelationKind) -> bool {
        !self.relationships_from(id, kind).is_empty()
    }

    /// Breadth-first search backwards along `kind` edges starting at `id`.
    ///
    /// Returns the first resource (in BFS order) that matches `source_filter` and
    /// from which `id` can be reached through one or more `kind` edges. The start
    /// resource itself never matches. Each resource is visited at most once, so
    /// cycles terminate.
    pub fn reachable_from<F>(
        &self,
        id: &str,
        kind: RelationKind,
        source_filter: F,
    ) -> Option<&Resource>
    where
        F: Fn(&Resource) -> bool,
    {
        let start = self.position(id)?;
        let mut visited = vec![false; self.resources.len()];
        let mut queue = VecDeque::new();
        visited[start] = true;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for &(edge_kind, source) in &self.incoming[current] {
                if edge_kind != kind || visited[source] {
                    continue;
                }
                visited[source] = true;
                let candidate = &self.resources[source];
                if source_filter(candidate) {
                    return Some(candidate);
                }
                queue.push_back(source);
            }
        }

        None
    }

    pub fn is_reachable_from<F>(&self, id: &str, kind: RelationKind, source_filter: F) -> bool
    where
        F: Fn(&Resource) -> bool,
    {
        self.reachable_from(id, kind, source_filter).is_some()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id.trim()).copied()
    }

    fn neighbors(
        &self,
        id: &str,
        kind: RelationKind,
        adjacency: &[Vec<(RelationKind, usize)>],
    ) -> Vec<&Resource> {
        let Some(i) = self.position(id) else {
            return Vec::new();
        };
        adjacency[i]
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|&(_, j)| &self.resources[j])
            .collect()
    }
}
