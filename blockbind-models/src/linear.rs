//! A variable directory whose outputs are linear combinations of other variables.
//!
//! Computed variables are evaluated lazily. Writing a variable marks
//! everything downstream of it stale, and a stale variable is only
//! recomputed when it is read. This mirrors how table-driven model
//! interpreters behave, which is what the block layer is written against.

use blockbind_core::model::{DeclaredVariable, Model};
use blockbind_core::VariableId;
use log::debug;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::path::Path;

use crate::description::ModelDescription;
use crate::errors::{LinearModelError, LinearModelResult};

/// Handle to a variable of a [`LinearModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableIndex(usize);

#[derive(Debug)]
struct Variable {
    id: VariableId,
    is_input: bool,
    units: Option<String>,
    value: f64,
    offset: f64,
    terms: Vec<(usize, f64)>,
    stale: bool,
}

#[derive(Debug)]
pub struct LinearModel {
    variables: Vec<Variable>,
    index: HashMap<VariableId, usize>,
    /// Variables whose terms reference each variable
    dependants: Vec<Vec<usize>>,
    evaluations: usize,
    /// Scratch space for `invalidate`, kept to avoid allocating per write
    pending: Vec<usize>,
    visited: Vec<bool>,
}

impl LinearModel {
    /// Build a model from its description.
    ///
    /// Fails on duplicate identifiers, references to unknown variables,
    /// inputs with terms and dependency cycles.
    pub fn from_description(description: ModelDescription) -> LinearModelResult<Self> {
        let mut index = HashMap::new();
        for (i, variable) in description.variables.iter().enumerate() {
            let id = VariableId::from(variable.id.as_str());
            if index.insert(id, i).is_some() {
                return Err(LinearModelError::DuplicateVariable(variable.id.clone()));
            }
        }

        let mut variables = Vec::with_capacity(description.variables.len());
        let mut dependants = vec![Vec::new(); description.variables.len()];
        for (i, variable) in description.variables.into_iter().enumerate() {
            if variable.input && !variable.terms.is_empty() {
                return Err(LinearModelError::ComputedInput(variable.id));
            }

            let mut terms = Vec::with_capacity(variable.terms.len());
            for term in variable.terms {
                let source = *index.get(term.id.as_bytes()).ok_or_else(|| {
                    LinearModelError::UnknownReference {
                        variable: variable.id.clone(),
                        reference: term.id.clone(),
                    }
                })?;
                dependants[source].push(i);
                terms.push((source, term.gain));
            }

            let stale = !terms.is_empty();
            variables.push(Variable {
                id: VariableId::from(variable.id),
                is_input: variable.input,
                units: variable.units,
                value: variable.initial,
                offset: variable.offset,
                terms,
                stale,
            });
        }

        check_acyclic(&variables, &dependants)?;

        debug!("Built linear model with {} variables", variables.len());
        Ok(Self {
            variables,
            index,
            dependants,
            evaluations: 0,
            pending: Vec::new(),
            visited: Vec::new(),
        })
    }

    pub fn from_toml(text: &str) -> LinearModelResult<Self> {
        let description: ModelDescription = toml::from_str(text)?;
        Self::from_description(description)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn units(&self, handle: VariableIndex) -> Option<&str> {
        self.variables[handle.0].units.as_deref()
    }

    /// Number of times a computed variable has been recomputed.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Mark everything downstream of `index` stale.
    ///
    /// The walk goes through variables that are already stale, since a
    /// written computed variable can be fresh behind a stale one.
    fn invalidate(&mut self, index: usize) {
        let mut pending = std::mem::take(&mut self.pending);
        let mut visited = std::mem::take(&mut self.visited);
        visited.clear();
        visited.resize(self.variables.len(), false);

        pending.extend_from_slice(&self.dependants[index]);
        while let Some(dependant) = pending.pop() {
            if !std::mem::replace(&mut visited[dependant], true) {
                self.variables[dependant].stale = true;
                pending.extend_from_slice(&self.dependants[dependant]);
            }
        }

        self.pending = pending;
        self.visited = visited;
    }

    fn evaluate(&mut self, index: usize) -> f64 {
        if self.variables[index].stale {
            let mut value = self.variables[index].offset;
            for k in 0..self.variables[index].terms.len() {
                let (source, gain) = self.variables[index].terms[k];
                value += gain * self.evaluate(source);
            }
            let variable = &mut self.variables[index];
            variable.value = value;
            variable.stale = false;
            self.evaluations += 1;
        }
        self.variables[index].value
    }
}

fn check_acyclic(variables: &[Variable], dependants: &[Vec<usize>]) -> LinearModelResult<()> {
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(variables.len(), 0);
    let nodes: Vec<NodeIndex> = (0..variables.len()).map(|i| graph.add_node(i)).collect();
    for (source, targets) in dependants.iter().enumerate() {
        for &target in targets {
            graph.add_edge(nodes[source], nodes[target], ());
        }
    }

    toposort(&graph, None)
        .map(|_| ())
        .map_err(|cycle| LinearModelError::Cycle(variables[graph[cycle.node_id()]].id.to_string()))
}

impl Model for LinearModel {
    type Handle = VariableIndex;
    type Error = LinearModelError;

    fn load(path: &Path) -> Result<Self, Self::Error> {
        let text = std::fs::read_to_string(path).map_err(|source| LinearModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    fn find(&self, id: &str) -> Option<VariableIndex> {
        self.index.get(id.as_bytes()).map(|&i| VariableIndex(i))
    }

    fn declared_variables(&self) -> Vec<DeclaredVariable> {
        self.variables
            .iter()
            .map(|x| DeclaredVariable::new(x.id.clone(), x.is_input))
            .collect()
    }

    fn is_input(&self, handle: VariableIndex) -> bool {
        self.variables[handle.0].is_input
    }

    /// Writing a computed variable overrides it until something upstream changes.
    fn set_value(&mut self, handle: VariableIndex, value: f64) {
        let variable = &mut self.variables[handle.0];
        variable.value = value;
        variable.stale = false;
        self.invalidate(handle.0);
    }

    fn get_value(&mut self, handle: VariableIndex) -> f64 {
        self.evaluate(handle.0)
    }
}
