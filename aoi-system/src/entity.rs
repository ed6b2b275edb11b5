use hashbrown::HashSet;

pub type EntityId = u64;

/// 地圖上的移動實體
///
/// 同時是 marker (站在某座燈塔) 與 watcher (關注視野內的燈塔)。
/// `visible` 只存對方的 id，不持有對方；雙向關係由 AoiManager 維護。
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    x: u32,
    y: u32,
    visible: HashSet<EntityId>,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, x: u32, y: u32) -> Self {
        Self {
            id,
            name: name.into(),
            x,
            y,
            visible: HashSet::new(),
        }
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    /// 目前互相可見的實體
    pub fn visible_set(&self) -> &HashSet<EntityId> {
        &self.visible
    }

    pub fn can_see(&self, other: EntityId) -> bool {
        self.visible.contains(&other)
    }

    /// 依 id 排序的可見列表
    pub fn visible_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.visible.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn set_position(&mut self, x: u32, y: u32) {
        self.x = x;
        self.y = y;
    }

    pub(crate) fn link(&mut self, other: EntityId) -> bool {
        self.visible.insert(other)
    }

    pub(crate) fn unlink(&mut self, other: EntityId) -> bool {
        self.visible.remove(&other)
    }

    pub(crate) fn clear_links(&mut self) {
        self.visible.clear();
    }
}
