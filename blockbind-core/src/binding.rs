//! Resolution of port identifiers to model variable handles.

use crate::identifier::VariableId;
use crate::model::Model;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the block a port belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    Input,
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => write!(f, "input"),
            PortDirection::Output => write!(f, "output"),
        }
    }
}

/// The identifiers of one port vector and the handles they resolved to.
///
/// Index `i` of both arrays corresponds to host port `i`. Identifiers that
/// the model does not know keep a `None` handle rather than being dropped,
/// so the alignment with the host buffer is never disturbed.
#[derive(Debug, Clone)]
pub struct PortBinding<H> {
    ids: Vec<VariableId>,
    handles: Vec<Option<H>>,
}

impl<H: Copy> PortBinding<H> {
    /// Resolve every identifier against the model's directory, in order.
    pub fn bind<M: Model<Handle = H>>(model: &M, ids: Vec<VariableId>) -> Self {
        let handles = ids.iter().map(|id| resolve(model, id)).collect();
        Self { ids, handles }
    }

    /// Number of ports.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[VariableId] {
        &self.ids
    }

    pub fn handles(&self) -> &[Option<H>] {
        &self.handles
    }

    /// The handle bound to port `index`, if the port exists and resolved.
    pub fn handle(&self, index: usize) -> Option<H> {
        self.handles.get(index).copied().flatten()
    }

    /// Number of ports with a resolved handle.
    pub fn resolved_count(&self) -> usize {
        self.handles.iter().filter(|x| x.is_some()).count()
    }

    /// Identifiers that did not resolve, in port order.
    pub fn unresolved(&self) -> impl Iterator<Item = &VariableId> {
        self.ids
            .iter()
            .zip(self.handles.iter())
            .filter(|(_, handle)| handle.is_none())
            .map(|(id, _)| id)
    }
}

/// Look an identifier up in the model. Identifiers that are not valid
/// UTF-8 never resolve.
pub(crate) fn resolve<M: Model>(model: &M, id: &VariableId) -> Option<M::Handle> {
    id.to_str().and_then(|x| model.find(x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::example_model::TestModel;

    fn ids(ids: &[&str]) -> Vec<VariableId> {
        ids.iter().map(|x| VariableId::from(*x)).collect()
    }

    #[test]
    fn bind_keeps_port_order() {
        let model = TestModel::new();
        let binding = PortBinding::bind(&model, ids(&["gamma", "missing", "alpha", "gamma"]));

        assert_eq!(binding.len(), 4);
        assert_eq!(binding.handles(), &[Some(2), None, Some(0), Some(2)]);
        assert_eq!(binding.handle(1), None);
        assert_eq!(binding.handle(2), Some(0));
        assert_eq!(binding.handle(10), None);
        assert_eq!(binding.resolved_count(), 3);
        assert_eq!(binding.unresolved().collect::<Vec<_>>(), [&VariableId::from("missing")]);
    }

    #[test]
    fn bind_alignment_for_any_width() {
        let model = TestModel::new();
        let pool = ["alpha", "beta", "nope", "gamma", "mach", ""];
        for n in 0..=pool.len() {
            let declared = ids(&pool[..n]);
            let binding = PortBinding::bind(&model, declared.clone());

            assert_eq!(binding.len(), n);
            assert_eq!(binding.handles().len(), n);
            for (i, id) in declared.iter().enumerate() {
                assert_eq!(binding.ids()[i], *id);
                assert_eq!(binding.handle(i), resolve(&model, id));
            }
        }
    }

    #[test]
    fn invalid_utf8_never_resolves() {
        let model = TestModel::new();
        let mut bytes = b"alpha".to_vec();
        bytes.push(0xFF);
        let binding = PortBinding::bind(&model, vec![VariableId::from(bytes), VariableId::from("alpha")]);
        assert_eq!(binding.handles(), &[None, Some(0)]);
    }

    #[test]
    fn empty_binding() {
        let model = TestModel::new();
        let binding = PortBinding::bind(&model, vec![]);
        assert!(binding.is_empty());
        assert_eq!(binding.resolved_count(), 0);
    }

    #[test]
    fn direction_display() {
        assert_eq!(PortDirection::Input.to_string(), "input");
        assert_eq!(PortDirection::Output.to_string(), "output");
    }
}
