use crate::objects::light::PointLight;
use crate::objects::model3d::{Mesh, Transform};
use nalgebra::Matrix4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
pub enum NodeKind {
    Group,
    Mesh(Mesh),
    Light(PointLight),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>, transform: Transform, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, Transform::default(), NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, transform: Transform, mesh: Mesh) -> Self {
        Self::new(name, transform, NodeKind::Mesh(mesh))
    }

    pub fn light(name: impl Into<String>, transform: Transform, light: PointLight) -> Self {
        Self::new(name, transform, NodeKind::Light(light))
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}

/// Scene graph. Nodes are stored in an arena; every node has at most one parent
/// and the hierarchy is append-only.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn add(&mut self, node: Node) -> NodeId {
        let id = self.insert(node);
        self.roots.push(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        node.parent = Some(parent);
        let id = self.insert(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    fn insert(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    pub fn world_matrix(&self, id: NodeId) -> Matrix4<f64> {
        let node = self.node(id);
        let local = node.transform.matrix();
        match node.parent {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        }
    }

    /// Depth-first walk from the roots, yielding each node with its world matrix.
    pub fn traverse(&self) -> Vec<(NodeId, Matrix4<f64>)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, Matrix4<f64>)> = self
            .roots
            .iter()
            .rev()
            .map(|&id| (id, Matrix4::identity()))
            .collect();

        while let Some((id, parent_matrix)) = stack.pop() {
            let node = self.node(id);
            let world = parent_matrix * node.transform.matrix();
            for &child in node.children.iter().rev() {
                stack.push((child, world));
            }
            out.push((id, world));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn child_inherits_parent_transform() {
        let mut scene = Scene::new();
        let parent = scene.add(Node::new("parent", Transform::at(0., 10., 0.), NodeKind::Group));
        let child = scene.add_child(parent, Node::new("child", Transform::at(1., 0., 0.), NodeKind::Group));

        let origin = scene.world_matrix(child).transform_point(&Point3::origin());
        assert_eq!(origin, Point3::new(1., 10., 0.));
        assert_eq!(scene.node(child).parent(), Some(parent));
        assert_eq!(scene.node(parent).children(), &[child]);
        assert_eq!(scene.roots(), &[parent]);
    }

    #[test]
    fn traverse_visits_every_node_once_in_order() {
        let mut scene = Scene::new();
        let a = scene.add(Node::group("a"));
        let a1 = scene.add_child(a, Node::group("a1"));
        let b = scene.add(Node::group("b"));

        let order: Vec<NodeId> = scene.traverse().into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![a, a1, b]);
        assert_eq!(scene.find("a1"), Some(a1));
        assert_eq!(scene.find("missing"), None);
    }

    #[test]
    fn clear_empties_the_graph() {
        let mut scene = Scene::new();
        scene.add(Node::group("a"));
        scene.clear();
        assert!(scene.is_empty());
        assert!(scene.roots().is_empty());
    }
}
