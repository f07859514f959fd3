use glam::IVec3;

use super::*;

/// Group key should always be the parent node.
#[test]
fn test_transition_group_key_is_parent() {
  let parent = OctreeKey::new(5, IVec3::new(1, 2, 3));

  let group = TransitionGroup::new_subdivide(parent).expect("Should create subdivide group");

  assert_eq!(group.group_key, parent, "Group key should be parent");
  assert!(group.is_subdivide());
}

/// Subdivide: 8 nodes to add (children), 1 to remove (parent).
#[test]
fn test_subdivide_group_invariants() {
  let parent = OctreeKey::new(5, IVec3::new(1, 2, 3));

  let group = TransitionGroup::new_subdivide(parent).expect("Should create subdivide group");

  assert_eq!(group.transition_type, TransitionType::Subdivide);
  assert_eq!(group.nodes_to_add.len(), 8, "Subdivide adds 8 children");
  assert_eq!(group.nodes_to_remove.as_slice(), &[parent]);
  assert!(group.nodes_to_add.iter().all(|child| child.parent() == parent));
}

/// Merge: 1 node to add (parent), 8 to remove (children).
#[test]
fn test_merge_group_invariants() {
  let parent = OctreeKey::new(2, IVec3::new(-1, 0, 4));

  let group = TransitionGroup::new_merge(parent).expect("Should create merge group");

  assert_eq!(group.transition_type, TransitionType::Merge);
  assert_eq!(group.nodes_to_add.as_slice(), &[parent]);
  assert_eq!(group.nodes_to_remove.len(), 8, "Merge removes 8 children");
}

#[test]
fn test_level_zero_has_no_transitions() {
  let leaf = OctreeKey::new(0, IVec3::ZERO);
  assert!(TransitionGroup::new_subdivide(leaf).is_none());
  assert!(TransitionGroup::new_merge(leaf).is_none());
}
