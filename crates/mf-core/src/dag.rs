//! Table dependency graph and run ordering
//!
//! Tables are ordered so that every foreign key is satisfied before a
//! referencing row is written. Foreign keys that take part in a cycle
//! (including a table referencing itself) cannot be satisfied that way; when
//! all of their columns are nullable they are deferred: the table is inserted
//! without them and a later update pass fills them in.

use crate::constraint::{ForeignConstraint, PrimaryKeyDependencyMap, ReferenceKey, TableConstraints};
use crate::error::{CoreError, CoreResult};
use crate::run_config::{DependsOn, RunConfig, RunType};
use crate::table_name::TableName;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Foreign key graph over the tables of a sync job.
///
/// Nodes are tables in enumeration order. An edge `a -> b` means `a` has a
/// foreign key into `b`; the edge weight indexes `a`'s foreign key list.
#[derive(Debug)]
pub struct TableDag {
    /// The underlying graph
    graph: DiGraph<TableName, usize>,

    /// Map from table name to node index
    node_map: HashMap<TableName, NodeIndex>,

    /// Strongly connected component id of each node
    component: Vec<usize>,

    /// Whether each component contains a cycle (self loops included)
    cyclic: Vec<bool>,
}

impl TableDag {
    /// Build the graph for `tables`, in the given order.
    ///
    /// Foreign keys with no referenced columns, or referencing a table that
    /// is not in `tables`, are ignored.
    pub fn build<'a>(
        tables: impl IntoIterator<Item = &'a TableName>,
        foreign_keys: &BTreeMap<TableName, Vec<ForeignConstraint>>,
    ) -> Self {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();

        for table in tables {
            if !node_map.contains_key(table) {
                let idx = graph.add_node(table.clone());
                node_map.insert(table.clone(), idx);
            }
        }

        let nodes: Vec<NodeIndex> = graph.node_indices().collect();
        for idx in nodes {
            let Some(fks) = foreign_keys.get(&graph[idx]) else {
                continue;
            };
            for (i, fk) in fks.iter().enumerate() {
                match resolve_target(fk, &node_map) {
                    Some(target) => {
                        graph.add_edge(idx, target, i);
                    }
                    None => log::debug!(
                        "Ignoring foreign key {}({}) -> {}: referenced table not in scope",
                        graph[idx],
                        fk.columns.join(", "),
                        fk.foreign_key.table
                    ),
                }
            }
        }

        let sccs = tarjan_scc(&graph);
        let mut component = vec![0; graph.node_count()];
        let mut cyclic = Vec::with_capacity(sccs.len());
        for (id, scc) in sccs.iter().enumerate() {
            for node in scc {
                component[node.index()] = id;
            }
            cyclic.push(scc.len() > 1 || graph.contains_edge(scc[0], scc[0]));
        }

        Self {
            graph,
            node_map,
            component,
            cyclic,
        }
    }

    /// Groups of tables that reference each other in a cycle.
    ///
    /// A self-referencing table forms a group of one. Groups and their
    /// members follow enumeration order.
    pub fn circular_dependencies(&self) -> Vec<Vec<TableName>> {
        let mut groups: BTreeMap<usize, Vec<NodeIndex>> = BTreeMap::new();
        for idx in self.graph.node_indices() {
            let comp = self.component[idx.index()];
            if self.cyclic[comp] {
                groups.entry(comp).or_default().push(idx);
            }
        }
        let mut groups: Vec<Vec<NodeIndex>> = groups.into_values().collect();
        groups.sort_by_key(|members| members[0]);
        groups
            .into_iter()
            .map(|members| members.into_iter().map(|n| self.graph[n].clone()).collect())
            .collect()
    }

    /// Resolve the ordered run configs for the tables in the graph.
    ///
    /// `tables` supplies each table's columns in ordinal order and `subsets`
    /// optional row filters. Ties between runs that are ready at the same
    /// time go to the table enumerated first, insert before update.
    pub fn run_configs(
        &self,
        tables: &BTreeMap<TableName, Vec<String>>,
        constraints: &TableConstraints,
        subsets: &BTreeMap<TableName, String>,
    ) -> CoreResult<Vec<RunConfig>> {
        let mut plan: DiGraph<RunConfig, ()> = DiGraph::new();
        let mut passes: Vec<(NodeIndex, Option<NodeIndex>)> =
            Vec::with_capacity(self.graph.node_count());

        for idx in self.graph.node_indices() {
            let table = &self.graph[idx];
            let columns = tables.get(table).cloned().unwrap_or_default();
            let primary_keys = constraints.primary_keys_for(table).to_vec();
            let where_clause = subsets.get(table).cloned();

            let mut deferred_columns: Vec<String> = Vec::new();
            let mut insert_deps: Vec<DependsOn> = Vec::new();
            let mut update_deps: Vec<DependsOn> = vec![DependsOn {
                table: table.clone(),
                columns: primary_keys.clone(),
            }];

            for (fk, target) in self.resolved_foreign_keys(idx, constraints) {
                if self.is_deferrable(idx, target, fk) {
                    push_unique(&mut deferred_columns, &fk.columns);
                    if target != idx {
                        merge_depends_on(&mut update_deps, &self.graph[target], fk);
                    }
                } else if target != idx {
                    merge_depends_on(&mut insert_deps, &self.graph[target], fk);
                }
            }

            let split = !deferred_columns.is_empty();
            let insert_columns: Vec<String> = columns
                .iter()
                .filter(|c| !deferred_columns.contains(c))
                .cloned()
                .collect();

            let insert = plan.add_node(RunConfig::new(
                table.clone(),
                RunType::Insert,
                primary_keys.clone(),
                where_clause.clone(),
                insert_columns.clone(),
                insert_columns,
                insert_deps,
                split,
            ));

            let update = if split {
                log::debug!(
                    "Deferring circular foreign key columns of {}: {}",
                    table,
                    deferred_columns.join(", ")
                );
                if primary_keys.is_empty() {
                    log::warn!(
                        "Table {} needs an update pass for circular references but has no primary key",
                        table
                    );
                }
                let mut select_columns = primary_keys.clone();
                push_unique(&mut select_columns, &deferred_columns);
                Some(plan.add_node(RunConfig::new(
                    table.clone(),
                    RunType::Update,
                    primary_keys,
                    where_clause,
                    select_columns,
                    deferred_columns,
                    update_deps,
                    true,
                )))
            } else {
                None
            };

            passes.push((insert, update));
        }

        for idx in self.graph.node_indices() {
            let (insert, update) = passes[idx.index()];

            for (fk, target) in self.resolved_foreign_keys(idx, constraints) {
                if self.is_deferrable(idx, target, fk) {
                    continue;
                }
                // A non-nullable self reference becomes a self loop and is
                // reported as an unsupported cycle below.
                let (target_insert, target_update) = passes[target.index()];
                plan.add_edge(target_insert, insert, ());
                if self.component[idx.index()] != self.component[target.index()] {
                    if let Some(target_update) = target_update {
                        plan.add_edge(target_update, insert, ());
                    }
                }
            }

            if let Some(update) = update {
                for member in self.component_members(idx) {
                    plan.add_edge(passes[member.index()].0, update, ());
                }
            }
        }

        let order = topological_order(&plan).map_err(|stuck| {
            CoreError::UnsupportedCircularDependency {
                cycle: describe_cycle(&plan, &stuck),
            }
        })?;

        Ok(order.into_iter().map(|n| plan[n].clone()).collect())
    }

    /// Foreign keys of a table paired with the node they reference
    fn resolved_foreign_keys<'c>(
        &self,
        idx: NodeIndex,
        constraints: &'c TableConstraints,
    ) -> Vec<(&'c ForeignConstraint, NodeIndex)> {
        constraints
            .foreign_keys
            .get(&self.graph[idx])
            .map(|fks| {
                fks.iter()
                    .filter_map(|fk| resolve_target(fk, &self.node_map).map(|t| (fk, t)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn same_cyclic_component(&self, a: NodeIndex, b: NodeIndex) -> bool {
        let comp = self.component[a.index()];
        comp == self.component[b.index()] && self.cyclic[comp]
    }

    fn is_deferrable(&self, from: NodeIndex, to: NodeIndex, fk: &ForeignConstraint) -> bool {
        self.same_cyclic_component(from, to) && fk.is_nullable()
    }

    fn component_members(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let comp = self.component[idx.index()];
        self.graph
            .node_indices()
            .filter(|n| self.component[n.index()] == comp)
            .collect()
    }
}

/// Resolve ordered run configs for a set of tables and their constraints.
pub fn resolve_run_configs(
    tables: &BTreeMap<TableName, Vec<String>>,
    constraints: &TableConstraints,
    subsets: &BTreeMap<TableName, String>,
) -> CoreResult<Vec<RunConfig>> {
    let dag = TableDag::build(tables.keys(), &constraints.foreign_keys);
    dag.run_configs(tables, constraints, subsets)
}

/// Groups of tables in `tables` that reference each other in a cycle.
pub fn find_circular_dependencies<'a>(
    tables: impl IntoIterator<Item = &'a TableName>,
    foreign_keys: &BTreeMap<TableName, Vec<ForeignConstraint>>,
) -> Vec<Vec<TableName>> {
    TableDag::build(tables, foreign_keys).circular_dependencies()
}

/// Build the reverse index from referenced columns to referencing columns.
///
/// Composite keys are zipped column by column, so `(a, b) -> t(x, y)` records
/// `a` under `t.x` and `b` under `t.y`.
pub fn primary_key_dependency_map(
    foreign_keys: &BTreeMap<TableName, Vec<ForeignConstraint>>,
) -> PrimaryKeyDependencyMap {
    let mut map = PrimaryKeyDependencyMap::new();
    for (table, fks) in foreign_keys {
        for fk in fks {
            if fk.foreign_key.table.is_empty() {
                continue;
            }
            for (column, referenced) in fk.column_pairs() {
                map.entry(fk.foreign_key.table.clone())
                    .or_default()
                    .entry(referenced.to_string())
                    .or_default()
                    .push(ReferenceKey {
                        table: table.clone(),
                        column: column.to_string(),
                    });
            }
        }
    }
    map
}

fn resolve_target(
    fk: &ForeignConstraint,
    node_map: &HashMap<TableName, NodeIndex>,
) -> Option<NodeIndex> {
    if fk.columns.is_empty() || fk.foreign_key.columns.is_empty() {
        return None;
    }
    node_map.get(&fk.foreign_key.table).copied()
}

fn push_unique(target: &mut Vec<String>, values: &[String]) {
    for v in values {
        if !target.contains(v) {
            target.push(v.clone());
        }
    }
}

fn merge_depends_on(deps: &mut Vec<DependsOn>, table: &TableName, fk: &ForeignConstraint) {
    match deps.iter_mut().find(|d| &d.table == table) {
        Some(existing) => push_unique(&mut existing.columns, &fk.foreign_key.columns),
        None => deps.push(DependsOn {
            table: table.clone(),
            columns: fk.foreign_key.columns.clone(),
        }),
    }
}

/// Kahn's algorithm, always taking the lowest ready node index.
///
/// Returns the nodes that could not be scheduled on failure.
fn topological_order<N, E>(graph: &DiGraph<N, E>) -> Result<Vec<NodeIndex>, Vec<NodeIndex>> {
    let mut in_degree: Vec<usize> = graph
        .node_indices()
        .map(|n| graph.edges_directed(n, Direction::Incoming).count())
        .collect();
    let mut ready: BTreeSet<NodeIndex> = graph
        .node_indices()
        .filter(|n| in_degree[n.index()] == 0)
        .collect();
    let mut order = Vec::with_capacity(graph.node_count());

    while let Some(next) = ready.pop_first() {
        order.push(next);
        for edge in graph.edges(next) {
            let target = edge.target();
            in_degree[target.index()] -= 1;
            if in_degree[target.index()] == 0 {
                ready.insert(target);
            }
        }
    }

    if order.len() == graph.node_count() {
        Ok(order)
    } else {
        Err(graph
            .node_indices()
            .filter(|n| in_degree[n.index()] > 0)
            .collect())
    }
}

/// Walk unscheduled runs back through their dependencies until one repeats.
///
/// Plan edges point from a referenced table's run to the referencing run, so
/// each step of the walk follows a foreign key: `a -> b` reads "a references b".
fn describe_cycle(plan: &DiGraph<RunConfig, ()>, stuck: &[NodeIndex]) -> String {
    let Some(&start) = stuck.first() else {
        return String::new();
    };
    let stuck_set: HashSet<NodeIndex> = stuck.iter().copied().collect();
    let mut path = vec![start];
    let mut seen: HashMap<NodeIndex, usize> = HashMap::from([(start, 0)]);
    let mut current = start;

    while let Some(prev) = plan
        .edges_directed(current, Direction::Incoming)
        .map(|e| e.source())
        .find(|s| stuck_set.contains(s))
    {
        path.push(prev);
        if let Some(&pos) = seen.get(&prev) {
            path.drain(..pos);
            break;
        }
        seen.insert(prev, path.len() - 1);
        current = prev;
    }

    path.iter()
        .map(|n| plan[*n].table.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
