//! 变换系统 (Transform System)
//!
//! 负责把世界矩阵沿层级向下传播：`world = parent_world * local`。
//! 与 [`SceneGraph`](crate::SceneGraph) 解耦，只借用 [`World`] 和根节点列表。
//!
//! 局部矩阵由 `Transform::update` 在第一遍（update pass）中重新计算，
//! 这里只读取它，不再修改。两种遍历方式（显式栈 / 递归）访问顺序相同：
//! 深度优先先序，子节点按 `children` 的顺序。
//!
//! `visited` 集合保证每帧每个节点最多访问一次。层级链接只能通过
//! `HierarchyComponent` 的无校验接口被破坏成环，此时遍历会在重复节点处停下。

use glam::Mat4;
use rustc_hash::FxHashSet;

use crate::ecs::{EntityHandle, World};
use crate::scene::hierarchy::HierarchyComponent;
use crate::scene::transform::Transform;

/// 写入单个节点的世界矩阵，返回 (当前世界矩阵, 子节点列表)
///
/// 没有 Transform 的节点直接沿用父矩阵，其子树照常处理。
fn propagate_node(
    world: &mut World,
    handle: EntityHandle,
    parent_world: Mat4,
) -> Option<(Mat4, Vec<EntityHandle>)> {
    let entity = world.get_mut(handle)?;

    let current = match entity.get_component_mut::<Transform>() {
        Some(transform) => {
            let new_world = parent_world * *transform.matrix();
            transform.set_world_matrix(new_world);
            new_world
        }
        None => parent_world,
    };

    let children = entity
        .get_component::<HierarchyComponent>()
        .map(|h| h.children().to_vec())
        .unwrap_or_default();

    Some((current, children))
}

/// 从所有根节点开始更新世界矩阵（显式栈版本）
///
/// 使用显式栈替代递归调用，避免深层级场景的栈溢出风险。
/// 返回写入了世界矩阵的节点数。
pub fn update_hierarchy_iterative(
    world: &mut World,
    roots: &[EntityHandle],
    visited: &mut FxHashSet<EntityHandle>,
) -> usize {
    // 工作栈：(节点句柄, 父世界矩阵)
    let mut stack: Vec<(EntityHandle, Mat4)> = Vec::with_capacity(64);

    // 逆序入栈，保持根节点的处理顺序
    for &root in roots.iter().rev() {
        stack.push((root, Mat4::IDENTITY));
    }

    drain_stack(world, &mut stack, visited)
}

fn drain_stack(
    world: &mut World,
    stack: &mut Vec<(EntityHandle, Mat4)>,
    visited: &mut FxHashSet<EntityHandle>,
) -> usize {
    let mut count = 0;

    while let Some((handle, parent_world)) = stack.pop() {
        if !visited.insert(handle) {
            log::error!("Entity {handle:?} reached twice during propagation; hierarchy links are corrupted");
            continue;
        }

        let Some((current, children)) = propagate_node(world, handle, parent_world) else {
            log::debug!("Skipping unresolved entity {handle:?} during propagation");
            continue;
        };
        count += 1;

        // 子节点逆序入栈，保证按 children 顺序处理
        for &child in children.iter().rev() {
            stack.push((child, current));
        }
    }

    count
}

/// 从所有根节点开始更新世界矩阵（递归版本）
pub fn update_hierarchy_recursive(
    world: &mut World,
    roots: &[EntityHandle],
    visited: &mut FxHashSet<EntityHandle>,
) -> usize {
    roots
        .iter()
        .map(|&root| update_transform_recursive(world, root, Mat4::IDENTITY, visited))
        .sum()
}

fn update_transform_recursive(
    world: &mut World,
    handle: EntityHandle,
    parent_world: Mat4,
    visited: &mut FxHashSet<EntityHandle>,
) -> usize {
    if !visited.insert(handle) {
        log::error!("Entity {handle:?} reached twice during propagation; hierarchy links are corrupted");
        return 0;
    }

    // 阶段 1: 处理当前节点
    let Some((current, children)) = propagate_node(world, handle, parent_world) else {
        log::debug!("Skipping unresolved entity {handle:?} during propagation");
        return 0;
    };

    // 阶段 2: 递归处理子节点
    1 + children
        .into_iter()
        .map(|child| update_transform_recursive(world, child, current, visited))
        .sum::<usize>()
}

/// 从指定节点开始向下更新子树
///
/// 父节点的世界矩阵取其上一次传播的结果；用于编辑器拖动单个节点后的局部刷新。
pub fn update_subtree(
    world: &mut World,
    handle: EntityHandle,
    visited: &mut FxHashSet<EntityHandle>,
) -> usize {
    let parent_world = world
        .component::<HierarchyComponent>(handle)
        .and_then(HierarchyComponent::parent)
        .and_then(|parent| world.component::<Transform>(parent))
        .map_or(Mat4::IDENTITY, |t| *t.world_matrix());

    let mut stack = vec![(handle, parent_world)];
    drain_stack(world, &mut stack, visited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Component, Entity, SceneNode};
    use glam::Vec3;

    fn node(world: &mut World, name: &str, position: Vec3) -> EntityHandle {
        let mut entity = SceneNode::new(name);
        let mut transform = Transform::from_position(position);
        transform.update(0.0);
        entity.core_mut().add_component(transform);
        entity.core_mut().add_component(HierarchyComponent::new());
        world.spawn(entity)
    }

    fn link(world: &mut World, parent: EntityHandle, child: EntityHandle) {
        world
            .component_mut::<HierarchyComponent>(child)
            .unwrap()
            .set_parent(Some(parent));
        world
            .component_mut::<HierarchyComponent>(parent)
            .unwrap()
            .add_child(child);
    }

    fn world_position(world: &World, handle: EntityHandle) -> Vec3 {
        world.component::<Transform>(handle).unwrap().world_position()
    }

    #[test]
    fn test_hierarchy_update() {
        let mut world = World::new();

        // 创建简单的父子层级
        let parent = node(&mut world, "Parent", Vec3::new(1.0, 0.0, 0.0));
        let child = node(&mut world, "Child", Vec3::new(0.0, 1.0, 0.0));
        link(&mut world, parent, child);

        let mut visited = FxHashSet::default();
        let count = update_hierarchy_recursive(&mut world, &[parent], &mut visited);

        assert_eq!(count, 2);
        let pos = world_position(&world, child);
        assert!((pos.x - 1.0).abs() < 1e-5);
        assert!((pos.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn iterative_matches_recursive() {
        let mut world = World::new();
        let a = node(&mut world, "A", Vec3::new(1.0, 0.0, 0.0));
        let b = node(&mut world, "B", Vec3::new(0.0, 2.0, 0.0));
        let c = node(&mut world, "C", Vec3::new(0.0, 0.0, 3.0));
        let d = node(&mut world, "D", Vec3::new(4.0, 0.0, 0.0));
        link(&mut world, a, b);
        link(&mut world, b, c);
        link(&mut world, a, d);

        let mut visited = FxHashSet::default();
        update_hierarchy_recursive(&mut world, &[a], &mut visited);
        let expected: Vec<Vec3> = [a, b, c, d].iter().map(|&h| world_position(&world, h)).collect();

        visited.clear();
        let count = update_hierarchy_iterative(&mut world, &[a], &mut visited);
        let actual: Vec<Vec3> = [a, b, c, d].iter().map(|&h| world_position(&world, h)).collect();

        assert_eq!(count, 4);
        assert_eq!(actual, expected);
        assert_eq!(actual[2], Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(actual[3], Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn corrupted_cycle_terminates() {
        let mut world = World::new();
        let a = node(&mut world, "A", Vec3::X);
        let b = node(&mut world, "B", Vec3::X);
        link(&mut world, a, b);
        // b -> a 绕过了环检测
        world.component_mut::<HierarchyComponent>(b).unwrap().add_child(a);

        let mut visited = FxHashSet::default();
        assert_eq!(update_hierarchy_iterative(&mut world, &[a], &mut visited), 2);
        visited.clear();
        assert_eq!(update_hierarchy_recursive(&mut world, &[a], &mut visited), 2);
    }

    #[test]
    fn subtree_starts_from_parent_world() {
        let mut world = World::new();
        let parent = node(&mut world, "Parent", Vec3::new(10.0, 0.0, 0.0));
        let child = node(&mut world, "Child", Vec3::new(1.0, 0.0, 0.0));
        link(&mut world, parent, child);

        let mut visited = FxHashSet::default();
        update_hierarchy_iterative(&mut world, &[parent], &mut visited);

        {
            let transform = world.component_mut::<Transform>(child).unwrap();
            transform.set_position(Vec3::new(2.0, 0.0, 0.0));
            transform.update(0.0);
        }
        visited.clear();
        assert_eq!(update_subtree(&mut world, child, &mut visited), 1);
        assert_eq!(world_position(&world, child), Vec3::new(12.0, 0.0, 0.0));
    }
}
