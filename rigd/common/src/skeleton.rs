//! Named-bone arena over a rig hierarchy.
//!
//! Bones live in a flat `Vec` addressed by [`BoneId`]. A bone can only be added
//! after its parent, so every parent index is smaller than its children's and
//! walking the arena front to back visits parents first.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Quat;
use thiserror::Error;

static NEXT_SKELETON_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoneId(usize);

impl BoneId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SkeletonError {
    #[error("bone '{0}' is defined more than once")]
    DuplicateBone(String),
    #[error("bone '{bone}' names unknown parent '{parent}'")]
    UnknownParent { bone: String, parent: String },
    #[error("bone '{0}' has a non-finite or zero-length rotation")]
    InvalidRotation(String),
}

#[derive(Debug, Clone)]
struct Bone {
    name: String,
    parent: Option<BoneId>,
    children: Vec<BoneId>,
    local_rotation: Quat,
}

#[derive(Debug)]
pub struct Skeleton {
    id: u64,
    bones: Vec<Bone>,
    by_name: HashMap<String, BoneId>,
    root_rotation: Quat,
}

fn next_id() -> u64 {
    NEXT_SKELETON_ID.fetch_add(1, Ordering::Relaxed)
}

/// A clone is a separate skeleton and gets its own id.
impl Clone for Skeleton {
    fn clone(&self) -> Self {
        Self {
            id: next_id(),
            bones: self.bones.clone(),
            by_name: self.by_name.clone(),
            root_rotation: self.root_rotation,
        }
    }
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::new()
    }
}

impl Skeleton {
    pub fn new() -> Self {
        Self {
            id: next_id(),
            bones: Vec::new(),
            by_name: HashMap::new(),
            root_rotation: Quat::IDENTITY,
        }
    }

    /// Identity of this skeleton instance. Never shared, not even by clones.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn add_bone(
        &mut self,
        name: &str,
        parent: Option<&str>,
        local_rotation: Quat,
    ) -> Result<BoneId, SkeletonError> {
        if self.by_name.contains_key(name) {
            return Err(SkeletonError::DuplicateBone(name.to_string()));
        }
        let parent = match parent {
            Some(parent_name) => Some(self.resolve(parent_name).ok_or_else(|| {
                SkeletonError::UnknownParent {
                    bone: name.to_string(),
                    parent: parent_name.to_string(),
                }
            })?),
            None => None,
        };
        let length = local_rotation.length();
        if !local_rotation.is_finite() || length < 1e-6 {
            return Err(SkeletonError::InvalidRotation(name.to_string()));
        }

        let id = BoneId(self.bones.len());
        self.bones.push(Bone {
            name: name.to_string(),
            parent,
            children: Vec::new(),
            local_rotation: local_rotation / length,
        });
        if let Some(parent) = parent {
            self.bones[parent.0].children.push(id);
        }
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn resolve(&self, name: &str) -> Option<BoneId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn name(&self, id: BoneId) -> &str {
        &self.bones[id.0].name
    }

    pub fn parent(&self, id: BoneId) -> Option<BoneId> {
        self.bones[id.0].parent
    }

    pub fn children(&self, id: BoneId) -> &[BoneId] {
        &self.bones[id.0].children
    }

    /// All bones in hierarchy order (parents before children).
    pub fn ids(&self) -> impl Iterator<Item = BoneId> + '_ {
        (0..self.bones.len()).map(BoneId)
    }

    pub fn root_rotation(&self) -> Quat {
        self.root_rotation
    }

    /// Orientation of the armature itself in the scene.
    pub fn set_root_rotation(&mut self, rotation: Quat) {
        self.root_rotation = rotation.normalize();
    }

    pub fn local_rotation(&self, id: BoneId) -> Quat {
        self.bones[id.0].local_rotation
    }

    pub fn set_local_rotation(&mut self, id: BoneId, rotation: Quat) {
        self.bones[id.0].local_rotation = rotation;
    }

    /// Orientation of `id` relative to the scene: the armature rotation
    /// composed with every local rotation from the root down to `id`.
    pub fn world_rotation(&self, id: BoneId) -> Quat {
        let mut rotation = self.bones[id.0].local_rotation;
        let mut current = self.bones[id.0].parent;
        while let Some(parent) = current {
            rotation = self.bones[parent.0].local_rotation * rotation;
            current = self.bones[parent.0].parent;
        }
        (self.root_rotation * rotation).normalize()
    }

    /// World rotation of an optional bone; identity when absent.
    pub fn world_rotation_of(&self, id: Option<BoneId>) -> Quat {
        id.map_or(Quat::IDENTITY, |id| self.world_rotation(id))
    }

    /// World rotation of the frame `id`'s local rotation is expressed in.
    pub fn parent_world_rotation(&self, id: BoneId) -> Quat {
        match self.bones[id.0].parent {
            Some(parent) => self.world_rotation(parent),
            None => self.root_rotation,
        }
    }
}
