//! Body hierarchy
//!
//! The dog is a fixed tree of parts rooted at the body. Every node keeps an
//! explicit `(pivot, model)` pair: `pivot` is the node's frame before its own
//! scale, `model` is `pivot * scale`. Children compose onto the parent's
//! `pivot` only, so a parent's non-uniform scale never reaches them.

mod joints;
mod layout;

#[cfg(test)]
mod tests;

pub use joints::{JOINT_LIMIT, Joint, JointAngles, Leg, LegAngles};
pub use layout::{LIMB_UNIT, LocalPose, Part, local_pose};

use tracing::warn;

use crate::geometry_cache::GeometryCache;
use crate::primitive::Primitive;
use crate::render::RenderContext;
use crate::transform::Transform;

/// A node's frame for its children and its own final matrix
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeTransform {
    /// Local-to-world before the node's own scale
    pub pivot: Transform,
    /// Local-to-world including the node's own scale
    pub model: Transform,
}

/// One part in the hierarchy
#[derive(Debug, Clone)]
pub struct Node {
    pub part: Part,
    /// Index of the parent node, always lower than this node's index
    pub parent: Option<usize>,
    /// `None` for undrawn frames such as leg mounts
    pub primitive: Option<Primitive>,
    pub transform: NodeTransform,
}

/// The posed dog
#[derive(Debug, Clone)]
pub struct Skeleton {
    nodes: Vec<Node>,
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::new()
    }
}

impl Skeleton {
    /// Build the hierarchy in the rest pose
    pub fn new() -> Self {
        let parts = Part::all();
        let mut nodes: Vec<Node> = Vec::with_capacity(parts.len());

        for part in parts {
            let parent = part
                .parent()
                .and_then(|parent| nodes.iter().position(|node| node.part == parent));
            nodes.push(Node {
                part,
                parent,
                primitive: part.shape().map(|shape| Primitive::new(shape, part.color())),
                transform: NodeTransform::default(),
            });
        }

        let mut skeleton = Self { nodes };
        skeleton.update(&JointAngles::default());
        skeleton
    }

    /// Recompute every node's transform from the joint angles
    ///
    /// Nodes are stored parents-first, so one forward pass suffices.
    pub fn update(&mut self, angles: &JointAngles) {
        for i in 0..self.nodes.len() {
            let parent_pivot = match self.nodes[i].parent {
                Some(parent) => self.nodes[parent].transform.pivot,
                None => Transform::IDENTITY,
            };

            let node = &mut self.nodes[i];
            let (pivot, model) = local_pose(node.part, angles).apply(parent_pivot);
            node.transform = NodeTransform { pivot, model };
            if let Some(primitive) = node.primitive.as_mut() {
                primitive.set_transform(model);
            }
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, part: Part) -> Option<&Node> {
        self.nodes.iter().find(|node| node.part == part)
    }

    pub fn transform(&self, part: Part) -> Option<NodeTransform> {
        self.node(part).map(|node| node.transform)
    }

    /// Drawable primitives in hierarchy order
    pub fn primitives(&self) -> impl Iterator<Item = (Part, &Primitive)> {
        self.nodes
            .iter()
            .filter_map(|node| node.primitive.as_ref().map(|p| (node.part, p)))
    }

    /// Draw every part, skipping (and logging) parts whose buffers fail
    ///
    /// Returns the number of parts drawn.
    pub fn draw(&self, cache: &mut GeometryCache, ctx: &mut dyn RenderContext) -> usize {
        let mut drawn = 0;
        for (part, primitive) in self.primitives() {
            match primitive.draw(cache, ctx) {
                Ok(()) => drawn += 1,
                Err(e) => warn!("Skipping {:?} this frame: {}", part, e),
            }
        }
        drawn
    }
}
