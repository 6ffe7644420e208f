//! Two-way mapping between live `web_sys::Element`s and [`NodeId`]s.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use dom_host::NodeId;
use wasm_bindgen::JsValue;
use web_sys::Element;

const NODE_ID_PROPERTY: &str = "__kemengNodeId";

#[derive(Debug, Default)]
struct RegistryState {
    next_id: u64,
    elements: HashMap<NodeId, Element>,
}

#[derive(Debug, Clone, Default)]
/// Shared element registry; clones observe the same mapping.
pub struct ElementRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl ElementRegistry {
    /// Returns the id stamped on `element`, registering it on first sight.
    pub fn node_id(&self, element: &Element) -> NodeId {
        if let Some(id) = stamped_id(element) {
            let mut state = self.state.borrow_mut();
            state
                .elements
                .entry(id)
                .or_insert_with(|| element.clone());
            return id;
        }

        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = NodeId(state.next_id);
        let _ = js_sys::Reflect::set(
            element,
            &JsValue::from_str(NODE_ID_PROPERTY),
            &JsValue::from_f64(id.0 as f64),
        );
        state.elements.insert(id, element.clone());
        id
    }

    /// Resolves an id back to its element.
    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.state.borrow().elements.get(&node).cloned()
    }

    /// Drops the registry's reference to `node`.
    pub fn release(&self, node: NodeId) {
        if let Some(element) = self.state.borrow_mut().elements.remove(&node) {
            let object: &js_sys::Object = element.as_ref();
            let _ = js_sys::Reflect::delete_property(object, &JsValue::from_str(NODE_ID_PROPERTY));
        }
    }

    /// Number of elements currently registered.
    pub fn len(&self) -> usize {
        self.state.borrow().elements.len()
    }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn stamped_id(element: &Element) -> Option<NodeId> {
    js_sys::Reflect::get(element, &JsValue::from_str(NODE_ID_PROPERTY))
        .ok()
        .and_then(|value| value.as_f64())
        .map(|raw| NodeId(raw as u64))
}
