use hashbrown::{HashMap, HashSet};

use crate::config::AoiConfig;
use crate::entity::{Entity, EntityId};
use crate::error::{AoiError, Result};
use crate::grid::Grid;
use crate::tower::{Tower, TowerCoord};

/// AOI 統計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AoiStats {
    pub entity_count: usize,
    pub tower_count: usize,
    /// 雙向可見關係數 (每對算一次)
    pub link_count: usize,
    /// 至少有一個 marker 的燈塔數
    pub occupied_towers: usize,
}

/// 燈塔 AOI 管理器
///
/// 唯一會修改 Grid、Tower 與實體可見列表的地方。
/// 兩個實體只要視野窗口有共同燈塔就互相可見，進入、離開、移動時
/// 只處理窗口差集內的燈塔，不掃描整張地圖。
#[derive(Debug)]
pub struct AoiManager {
    grid: Grid,
    entities: HashMap<EntityId, Entity>,
}

impl AoiManager {
    pub fn new(config: AoiConfig) -> Result<Self> {
        Ok(Self {
            grid: Grid::new(config)?,
            entities: HashMap::new(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &AoiConfig {
        self.grid.config()
    }

    pub fn lookup(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// 依 id 排序的可見列表
    pub fn visible_ids(&self, id: EntityId) -> Result<Vec<EntityId>> {
        self.lookup(id)
            .map(Entity::visible_ids)
            .ok_or(AoiError::NotFound(id))
    }

    pub fn tower_at(&self, x: u32, y: u32) -> Result<&Tower> {
        self.grid.tower_at(x, y)
    }

    pub fn watched_towers(&self, x: u32, y: u32) -> Result<Vec<&Tower>> {
        self.grid.check_bounds(x, y)?;
        Ok(self.grid.watched_towers(x, y))
    }

    /// 進入地圖
    ///
    /// 成為所在燈塔的 marker，再逐一關注視野內的燈塔；
    /// 每遇到一個尚未連結的 watcher 就建立雙向連結並呼叫 `on_meet(自己, 對方)`。
    pub fn enter<F>(&mut self, mut entity: Entity, mut on_meet: F) -> Result<()>
    where
        F: FnMut(&Entity, &Entity),
    {
        let id = entity.id;
        if self.entities.contains_key(&id) {
            return Err(AoiError::IdConflict(id));
        }
        let (x, y) = entity.position();
        let coord = self.grid.coord_of(x, y)?;
        log::debug!("entity[{}:{}] 進入地圖 ({}, {})", id, entity.name, x, y);

        entity.clear_links();
        self.entities.insert(id, entity);
        self.grid.tower_mut(coord).add_marker(id);

        let window = self.grid.window(x, y);
        for coord in window.iter() {
            let found = self.unlinked_watchers(coord, id);
            for other in found {
                if link_pair(&mut self.entities, id, other) {
                    on_meet(entity_ref(&self.entities, id), entity_ref(&self.entities, other));
                }
            }
            self.grid.tower_mut(coord).add_watcher(id);
        }
        Ok(())
    }

    /// 離開地圖
    ///
    /// 清除所有燈塔上的紀錄並解除所有連結，每個對方呼叫一次 `on_leave(自己, 對方)`。
    /// 回傳被移除的實體 (可見列表已清空)。
    pub fn leave<F>(&mut self, id: EntityId, mut on_leave: F) -> Result<Entity>
    where
        F: FnMut(&Entity, &Entity),
    {
        let mut entity = self.entities.remove(&id).ok_or(AoiError::NotFound(id))?;
        let (x, y) = entity.position();
        let coord = self.grid.coord_of(x, y)?;
        self.grid.tower_mut(coord).remove_marker(id);
        let window = self.grid.window(x, y);
        for coord in window.iter() {
            self.grid.tower_mut(coord).remove_watcher(id);
        }

        for other in entity.visible_ids() {
            entity.unlink(other);
            match self.entities.get_mut(&other) {
                Some(counterpart) => {
                    counterpart.unlink(id);
                    on_leave(&entity, &*counterpart);
                }
                None => registry_broken(other),
            }
        }
        log::debug!("entity[{}:{}] 離開地圖", id, entity.name);
        Ok(entity)
    }

    /// 移動
    ///
    /// 視野窗口不變時只對現有可見實體呼叫 `on_move`。
    /// 窗口改變時先退出移除的燈塔並對失去連結者呼叫 `on_leave`，
    /// 再關注新增的燈塔並對新連結者呼叫 `on_enter`，保留連結者呼叫 `on_move`。
    /// 同一次移動中每個對方最多收到其中一種回呼。
    pub fn move_to<M, L, E>(
        &mut self,
        id: EntityId,
        x: u32,
        y: u32,
        mut on_move: M,
        mut on_leave: L,
        mut on_enter: E,
    ) -> Result<()>
    where
        M: FnMut(&Entity, &Entity),
        L: FnMut(&Entity, &Entity),
        E: FnMut(&Entity, &Entity),
    {
        let (old_x, old_y) = self
            .entities
            .get(&id)
            .map(Entity::position)
            .ok_or(AoiError::NotFound(id))?;
        let after_coord = self.grid.coord_of(x, y)?;
        let before_coord = self.grid.coord_of(old_x, old_y)?;
        log::debug!("entity[{}] 移動座標 ({}, {}) -> ({}, {})", id, old_x, old_y, x, y);

        if before_coord != after_coord {
            self.grid.tower_mut(before_coord).remove_marker(id);
            self.grid.tower_mut(after_coord).add_marker(id);
        }
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.set_position(x, y);
        }

        let before = self.grid.window(old_x, old_y);
        let after = self.grid.window(x, y);
        let previous = entity_ref(&self.entities, id).visible_ids();
        if before == after {
            for other in previous {
                on_move(entity_ref(&self.entities, id), entity_ref(&self.entities, other));
            }
            return Ok(());
        }

        for coord in before.difference(&after) {
            self.grid.tower_mut(coord).remove_watcher(id);
        }

        let mut lost: Vec<EntityId> = {
            let before_watchers = self.grid.watchers_in(&before);
            let after_watchers = self.grid.watchers_in(&after);
            before_watchers
                .difference(&after_watchers)
                .copied()
                .filter(|other| *other != id)
                .collect()
        };
        lost.sort_unstable();
        for other in lost {
            if let Some(counterpart) = self.entities.get_mut(&other) {
                counterpart.unlink(id);
            }
            let was_linked = self
                .entities
                .get_mut(&id)
                .map_or(false, |entity| entity.unlink(other));
            if was_linked {
                on_leave(entity_ref(&self.entities, id), entity_ref(&self.entities, other));
            }
        }

        let mut entered = HashSet::new();
        for coord in after.difference(&before) {
            self.grid.tower_mut(coord).add_watcher(id);
            let found = self.unlinked_watchers(coord, id);
            for other in found {
                if link_pair(&mut self.entities, id, other) {
                    entered.insert(other);
                    on_enter(entity_ref(&self.entities, id), entity_ref(&self.entities, other));
                }
            }
        }

        for other in previous {
            if !entered.contains(&other) && entity_ref(&self.entities, id).can_see(other) {
                on_move(entity_ref(&self.entities, id), entity_ref(&self.entities, other));
            }
        }
        Ok(())
    }

    pub fn stats(&self) -> AoiStats {
        let links: usize = self.entities.values().map(|e| e.visible_set().len()).sum();
        AoiStats {
            entity_count: self.entities.len(),
            tower_count: self.grid.towers().len(),
            link_count: links / 2,
            occupied_towers: self
                .grid
                .towers()
                .iter()
                .filter(|t| !t.markers().is_empty())
                .count(),
        }
    }

    /// 燈塔上尚未與 `id` 連結的 watcher，依 id 排序
    fn unlinked_watchers(&self, coord: TowerCoord, id: EntityId) -> Vec<EntityId> {
        let me = entity_ref(&self.entities, id);
        let mut found: Vec<EntityId> = self
            .grid
            .tower_expect(coord)
            .watchers()
            .iter()
            .copied()
            .filter(|other| *other != id && !me.can_see(*other))
            .collect();
        found.sort_unstable();
        found
    }
}

/// 建立雙向連結，已連結時回傳 false
fn link_pair(entities: &mut HashMap<EntityId, Entity>, a: EntityId, b: EntityId) -> bool {
    match entities.get_mut(&b) {
        Some(other) => other.link(a),
        None => registry_broken(b),
    };
    match entities.get_mut(&a) {
        Some(entity) => entity.link(b),
        None => registry_broken(a),
    }
}

fn entity_ref(entities: &HashMap<EntityId, Entity>, id: EntityId) -> &Entity {
    match entities.get(&id) {
        Some(entity) => entity,
        None => registry_broken(id),
    }
}

/// 燈塔或可見列表指向未註冊的實體，代表狀態已損壞
fn registry_broken(id: EntityId) -> ! {
    log::error!("entity[{}] 不在註冊表中", id);
    panic!("entity {} missing from the registry", id);
}
