use std::fmt;

use hashbrown::HashSet;

use crate::entity::EntityId;

/// 燈塔格座標 (欄, 列)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TowerCoord {
    pub x: u32,
    pub y: u32,
}

impl TowerCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// 燈塔
///
/// markers: 實際位置在本格內的實體
/// watchers: 視野窗口覆蓋本格的實體 (不一定站在本格)
#[derive(Debug, Clone)]
pub struct Tower {
    /// 列優先編號，從 1 開始
    id: usize,
    coord: TowerCoord,
    markers: HashSet<EntityId>,
    watchers: HashSet<EntityId>,
}

impl Tower {
    pub fn new(id: usize, coord: TowerCoord) -> Self {
        Self {
            id,
            coord,
            markers: HashSet::new(),
            watchers: HashSet::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn coord(&self) -> TowerCoord {
        self.coord
    }

    pub fn markers(&self) -> &HashSet<EntityId> {
        &self.markers
    }

    pub fn watchers(&self) -> &HashSet<EntityId> {
        &self.watchers
    }

    pub fn has_marker(&self, id: EntityId) -> bool {
        self.markers.contains(&id)
    }

    pub fn has_watcher(&self, id: EntityId) -> bool {
        self.watchers.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.watchers.is_empty()
    }

    pub(crate) fn add_marker(&mut self, id: EntityId) -> bool {
        let added = self.markers.insert(id);
        log::trace!("entity[{}] 加入{}", id, self);
        added
    }

    pub(crate) fn remove_marker(&mut self, id: EntityId) -> bool {
        let removed = self.markers.remove(&id);
        log::trace!("entity[{}] 離開{}", id, self);
        removed
    }

    pub(crate) fn add_watcher(&mut self, id: EntityId) -> bool {
        let added = self.watchers.insert(id);
        log::trace!("entity[{}] 關注{}", id, self);
        added
    }

    pub(crate) fn remove_watcher(&mut self, id: EntityId) -> bool {
        let removed = self.watchers.remove(&id);
        log::trace!("entity[{}] 不再關注{}", id, self);
        removed
    }
}

impl fmt::Display for Tower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tower[{},{}]", self.coord.x, self.coord.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_helpers() {
        let mut tower = Tower::new(1, TowerCoord::new(2, 3));
        assert!(tower.is_empty());
        assert_eq!(tower.to_string(), "tower[2,3]");

        assert!(tower.add_marker(10));
        assert!(!tower.add_marker(10));
        assert!(tower.add_watcher(10));
        assert!(tower.add_watcher(11));
        assert!(tower.has_marker(10));
        assert!(!tower.has_marker(11));
        assert_eq!(tower.watchers().len(), 2);

        assert!(tower.remove_marker(10));
        assert!(!tower.remove_marker(10));
        assert!(tower.remove_watcher(10));
        assert!(tower.remove_watcher(11));
        assert!(!tower.remove_watcher(11));
        assert!(tower.is_empty());
    }
}
