use hashbrown::HashSet;

use crate::config::AoiConfig;
use crate::entity::EntityId;
use crate::error::{AoiError, Result};
use crate::tower::{Tower, TowerCoord};

/// 視野窗口
///
/// 燈塔座標的閉區間矩形 [min, max]。窗口相等即燈塔集合相等，
/// 與列舉順序無關。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TowerWindow {
    pub min: TowerCoord,
    pub max: TowerCoord,
}

impl TowerWindow {
    pub fn contains(&self, coord: TowerCoord) -> bool {
        coord.x >= self.min.x && coord.x <= self.max.x &&
        coord.y >= self.min.y && coord.y <= self.max.y
    }

    /// 兩窗口是否有共同燈塔
    pub fn intersects(&self, other: &TowerWindow) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y
    }

    pub fn len(&self) -> usize {
        (self.max.x - self.min.x + 1) as usize * (self.max.y - self.min.y + 1) as usize
    }

    /// 列優先列舉
    pub fn iter(&self) -> impl Iterator<Item = TowerCoord> {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| TowerCoord::new(x, y)))
    }

    /// 在 self 但不在 other 的燈塔
    pub fn difference(&self, other: &TowerWindow) -> impl Iterator<Item = TowerCoord> {
        let other = *other;
        self.iter().filter(move |c| !other.contains(*c))
    }
}

/// 燈塔網格
///
/// 建立時一次配置所有燈塔 (列優先的平坦陣列)，之後只變動燈塔內的集合。
#[derive(Debug, Clone)]
pub struct Grid {
    config: AoiConfig,
    cols: u32,
    rows: u32,
    towers: Vec<Tower>,
}

impl Grid {
    pub fn new(config: AoiConfig) -> Result<Self> {
        config.validate()?;
        let cols = config.grid_cols();
        let rows = config.grid_rows();
        let count = config.tower_count().ok_or_else(|| {
            AoiError::InvalidConfig(format!("grid {}x{} is too large", cols, rows))
        })?;
        let mut towers = Vec::with_capacity(count);
        for y in 0..rows {
            for x in 0..cols {
                towers.push(Tower::new(towers.len() + 1, TowerCoord::new(x, y)));
            }
        }
        log::debug!("grid {}x{} 建立 {} 座燈塔", cols, rows, towers.len());
        Ok(Self {
            config,
            cols,
            rows,
            towers,
        })
    }

    pub fn config(&self) -> &AoiConfig {
        &self.config
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.config.map_width && y < self.config.map_height
    }

    pub fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        if self.in_bounds(x, y) {
            Ok(())
        } else {
            Err(AoiError::OutOfBounds { x, y })
        }
    }

    /// 世界座標轉燈塔座標 (floor 除法)
    pub fn coord_of(&self, x: u32, y: u32) -> Result<TowerCoord> {
        self.check_bounds(x, y)?;
        Ok(TowerCoord::new(x / self.config.tower_width, y / self.config.tower_height))
    }

    pub fn tower(&self, coord: TowerCoord) -> Option<&Tower> {
        self.index_of(coord).map(|i| &self.towers[i])
    }

    pub fn tower_at(&self, x: u32, y: u32) -> Result<&Tower> {
        let coord = self.coord_of(x, y)?;
        Ok(self.tower_expect(coord))
    }

    /// 視野窗口
    ///
    /// x 範圍 [max(0, x-range) / tw, min(map_width, x+range) / tw]，y 同理，
    /// 再夾到網格邊界內。
    pub fn window(&self, x: u32, y: u32) -> TowerWindow {
        let c = &self.config;
        let range = c.visible_range;
        let x_lo = x.saturating_sub(range) / c.tower_width;
        let x_hi = x.saturating_add(range).min(c.map_width) / c.tower_width;
        let y_lo = y.saturating_sub(range) / c.tower_height;
        let y_hi = y.saturating_add(range).min(c.map_height) / c.tower_height;
        TowerWindow {
            min: TowerCoord::new(x_lo.min(self.cols - 1), y_lo.min(self.rows - 1)),
            max: TowerCoord::new(x_hi.min(self.cols - 1), y_hi.min(self.rows - 1)),
        }
    }

    /// 視野內的燈塔
    pub fn watched_towers(&self, x: u32, y: u32) -> Vec<&Tower> {
        self.window(x, y).iter().map(|c| self.tower_expect(c)).collect()
    }

    /// 窗口內所有燈塔的 watcher 聯集
    pub fn watchers_in(&self, window: &TowerWindow) -> HashSet<EntityId> {
        let mut ids = HashSet::new();
        for coord in window.iter() {
            ids.extend(self.tower_expect(coord).watchers().iter().copied());
        }
        ids
    }

    fn index_of(&self, coord: TowerCoord) -> Option<usize> {
        if coord.x < self.cols && coord.y < self.rows {
            Some(coord.y as usize * self.cols as usize + coord.x as usize)
        } else {
            None
        }
    }

    pub(crate) fn tower_expect(&self, coord: TowerCoord) -> &Tower {
        match self.index_of(coord) {
            Some(i) => &self.towers[i],
            None => Self::missing_tower(coord, self.cols, self.rows),
        }
    }

    /// 只接受由已檢查座標算出的燈塔；找不到代表網格狀態損壞
    pub(crate) fn tower_mut(&mut self, coord: TowerCoord) -> &mut Tower {
        match self.index_of(coord) {
            Some(i) => &mut self.towers[i],
            None => Self::missing_tower(coord, self.cols, self.rows),
        }
    }

    fn missing_tower(coord: TowerCoord, cols: u32, rows: u32) -> ! {
        log::error!("燈塔[異常]不存在的燈塔: {},{} (grid {}x{})", coord.x, coord.y, cols, rows);
        panic!("tower ({}, {}) outside grid {}x{}", coord.x, coord.y, cols, rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(AoiConfig::default()).unwrap()
    }

    #[test]
    fn test_towers_are_row_major() {
        let grid = grid();
        assert_eq!(grid.towers().len(), 100);
        let tower = grid.tower(TowerCoord::new(3, 2)).unwrap();
        assert_eq!(tower.id(), 2 * 10 + 3 + 1);
        assert!(grid.tower(TowerCoord::new(10, 0)).is_none());
    }

    #[test]
    fn test_tower_at_uses_floor_division() {
        let grid = grid();
        assert_eq!(grid.tower_at(0, 0).unwrap().coord(), TowerCoord::new(0, 0));
        assert_eq!(grid.tower_at(4, 9).unwrap().coord(), TowerCoord::new(0, 1));
        assert_eq!(grid.tower_at(49, 49).unwrap().coord(), TowerCoord::new(9, 9));
        assert_eq!(grid.tower_at(50, 0).unwrap_err(), AoiError::OutOfBounds { x: 50, y: 0 });
    }

    #[test]
    fn test_window_is_clamped() {
        let grid = grid();
        let w = grid.window(8, 8);
        assert_eq!(w.min, TowerCoord::new(0, 0));
        assert_eq!(w.max, TowerCoord::new(2, 2));
        assert_eq!(w.len(), 9);

        let w = grid.window(0, 0);
        assert_eq!(w.min, TowerCoord::new(0, 0));
        assert_eq!(w.max, TowerCoord::new(1, 1));

        // min(map, x + range) / tw 會落在第 10 欄，需夾回 9
        let w = grid.window(49, 49);
        assert_eq!(w.min, TowerCoord::new(8, 8));
        assert_eq!(w.max, TowerCoord::new(9, 9));
        assert_eq!(grid.watched_towers(49, 49).len(), 4);
    }

    #[test]
    fn test_window_on_uneven_map() {
        let grid = Grid::new(AoiConfig::new(52, 13, 5, 5, 3)).unwrap();
        assert_eq!(grid.cols(), 11);
        assert_eq!(grid.rows(), 3);
        let w = grid.window(51, 12);
        assert_eq!(w.min, TowerCoord::new(9, 1));
        assert_eq!(w.max, TowerCoord::new(10, 2));
    }

    #[test]
    fn test_window_set_operations() {
        let grid = grid();
        let a = grid.window(8, 8);
        let b = grid.window(13, 8);
        assert!(a.intersects(&b));
        let removed: Vec<_> = a.difference(&b).collect();
        assert_eq!(removed, vec![TowerCoord::new(0, 0), TowerCoord::new(0, 1), TowerCoord::new(0, 2)]);
        let added: Vec<_> = b.difference(&a).collect();
        assert_eq!(added, vec![TowerCoord::new(3, 0), TowerCoord::new(3, 1), TowerCoord::new(3, 2)]);
        assert!(!grid.window(0, 0).intersects(&grid.window(49, 49)));
    }

    #[test]
    fn test_zero_range_watches_own_tower() {
        let grid = Grid::new(AoiConfig::new(50, 50, 5, 5, 0)).unwrap();
        let w = grid.window(12, 7);
        assert_eq!(w.len(), 1);
        assert!(w.contains(TowerCoord::new(2, 1)));
    }
}
