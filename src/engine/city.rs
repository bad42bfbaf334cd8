// City block generator: expands a grid of tile codes into positioned parts.
//
// Every cell gets a ground plane; the tile code selects at most one feature
// on top of it (building block, straight street, quarter-turn street curve).
// Cells are independent, there is no adjacency check between neighbours.
//
// Axes: columns run along +X, rows along +Z, Y is up.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::components::{Color, Transform};
use super::error::GridError;
use super::primitives::Primitive;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Fraction of the field width left free on each side of a street.
pub const SIDE_RATIO: f32 = 0.2;

/// Height of street surfaces above the ground plane.
const STREET_LIFT: f32 = 1.0;

const CURVE_THETA_SEGMENTS: u32 = 9;
const CURVE_PHI_SEGMENTS: u32 = 5;

// ============================================================================
// TILE CODES
// ============================================================================

/// Raw tile code as authored in a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileCode(pub i32);

impl TileCode {
    pub const PLAIN_EMPTY: Self = Self(1);
    pub const PLAIN_WITH_BUILDING: Self = Self(2);
    pub const CURVE_SE: Self = Self(10);
    pub const CURVE_SW: Self = Self(11);
    pub const CURVE_NE: Self = Self(12);
    pub const CURVE_NW: Self = Self(13);
    pub const STRAIGHT_EW: Self = Self(20);
    pub const STRAIGHT_NS: Self = Self(21);
}

/// Which quadrant a curve connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveOrientation {
    SouthEast,
    SouthWest,
    NorthEast,
    NorthWest,
}

impl CurveOrientation {
    /// Rotation of the curve about the vertical axis, in radians.
    pub fn yaw(self) -> f32 {
        match self {
            Self::SouthEast => PI,
            Self::SouthWest => FRAC_PI_2,
            Self::NorthEast => 3.0 * FRAC_PI_2,
            Self::NorthWest => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StraightOrientation {
    EastWest,
    NorthSouth,
}

impl StraightOrientation {
    pub fn yaw(self) -> f32 {
        match self {
            Self::EastWest => 0.0,
            Self::NorthSouth => FRAC_PI_2,
        }
    }
}

/// Decoded tile code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Plain,
    PlainWithBuilding,
    Curve(CurveOrientation),
    Straight(StraightOrientation),
}

/// Ground coloring of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Land,
    Street,
}

impl Surface {
    pub fn color(self) -> Color {
        match self {
            Self::Land => Color::LAND,
            Self::Street => Color::STREET,
        }
    }
}

impl TileKind {
    /// `None` for codes outside the known set.
    pub fn from_code(code: TileCode) -> Option<Self> {
        use CurveOrientation::*;
        use StraightOrientation::*;
        Some(match code {
            TileCode::PLAIN_EMPTY => Self::Plain,
            TileCode::PLAIN_WITH_BUILDING => Self::PlainWithBuilding,
            TileCode::CURVE_SE => Self::Curve(SouthEast),
            TileCode::CURVE_SW => Self::Curve(SouthWest),
            TileCode::CURVE_NE => Self::Curve(NorthEast),
            TileCode::CURVE_NW => Self::Curve(NorthWest),
            TileCode::STRAIGHT_EW => Self::Straight(EastWest),
            TileCode::STRAIGHT_NS => Self::Straight(NorthSouth),
            _ => return None,
        })
    }

    pub fn code(self) -> TileCode {
        use CurveOrientation::*;
        use StraightOrientation::*;
        match self {
            Self::Plain => TileCode::PLAIN_EMPTY,
            Self::PlainWithBuilding => TileCode::PLAIN_WITH_BUILDING,
            Self::Curve(SouthEast) => TileCode::CURVE_SE,
            Self::Curve(SouthWest) => TileCode::CURVE_SW,
            Self::Curve(NorthEast) => TileCode::CURVE_NE,
            Self::Curve(NorthWest) => TileCode::CURVE_NW,
            Self::Straight(EastWest) => TileCode::STRAIGHT_EW,
            Self::Straight(NorthSouth) => TileCode::STRAIGHT_NS,
        }
    }

    pub fn surface(self) -> Surface {
        match self {
            Self::Plain | Self::PlainWithBuilding => Surface::Land,
            Self::Curve(_) | Self::Straight(_) => Surface::Street,
        }
    }
}

// ============================================================================
// TILE GRID
// ============================================================================

/// Fixed-size row-major grid of tile codes with a uniform cell edge length.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    width:      u32,
    height:     u32,
    cells:      Vec<TileCode>,
    field_size: f32,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, cells: Vec<TileCode>, field_size: f32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimension { width, height });
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(GridError::CellCount { width, height, expected, actual: cells.len() });
        }
        // Building heights are drawn up to three times the field size
        if !(field_size > 0.0 && (3.0 * field_size).is_finite()) {
            return Err(GridError::FieldSize(field_size));
        }
        Ok(Self { width, height, cells, field_size })
    }

    /// Build from rows of codes; every row must have the same length.
    pub fn from_rows(rows: &[Vec<TileCode>], field_size: f32) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, Vec::len);
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(GridError::RaggedRow { row, expected: width, actual: cells.len() });
        }
        let cells = rows.iter().flatten().copied().collect();
        Self::new(width as u32, rows.len() as u32, cells, field_size)
    }

    /// The 10x10 block ringed by streets with a few scattered buildings.
    pub fn example_layout(field_size: f32) -> Result<Self, GridError> {
        const PEP: TileCode = TileCode::PLAIN_EMPTY;
        const PH1: TileCode = TileCode::PLAIN_WITH_BUILDING;
        const CSE: TileCode = TileCode::CURVE_SE;
        const CSW: TileCode = TileCode::CURVE_SW;
        const CNE: TileCode = TileCode::CURVE_NE;
        const CNW: TileCode = TileCode::CURVE_NW;
        const SEW: TileCode = TileCode::STRAIGHT_EW;
        const SNS: TileCode = TileCode::STRAIGHT_NS;

        let rows: Vec<Vec<TileCode>> = vec![
            vec![CSE, SEW, SEW, SEW, SEW, SEW, SEW, SEW, SEW, CSW],
            vec![SNS, PH1, PEP, PEP, PEP, PEP, PEP, PEP, PEP, SNS],
            vec![SNS, PEP, PEP, PEP, PEP, PEP, PEP, PEP, PEP, SNS],
            vec![SNS, PH1, PEP, PEP, PEP, PH1, PH1, PEP, PEP, SNS],
            vec![SNS, PEP, PEP, PEP, PEP, PEP, PEP, PEP, PEP, SNS],
            vec![SNS, PEP, PEP, PEP, PEP, PEP, PEP, PEP, PEP, SNS],
            vec![SNS, PEP, PEP, PEP, PEP, PH1, PEP, PEP, PEP, SNS],
            vec![SNS, PEP, PEP, PH1, PEP, PEP, PEP, PEP, PEP, SNS],
            vec![SNS, PH1, PEP, PEP, PEP, PEP, PH1, PEP, PEP, SNS],
            vec![CNE, SEW, SEW, SEW, SEW, SEW, SEW, SEW, SEW, CNW],
        ];
        Self::from_rows(&rows, field_size)
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn field_size(&self) -> f32 { self.field_size }
    pub fn cells(&self) -> &[TileCode] { &self.cells }

    pub fn cell(&self, col: u32, row: u32) -> Option<TileCode> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells.get((row * self.width + col) as usize).copied()
    }

    /// World-space origin of a cell: `((col - w/2) * size, 0, (row - h/2) * size)`.
    pub fn cell_position(&self, col: u32, row: u32) -> Vec3 {
        Vec3::new(
            (col as f32 - self.width as f32 / 2.0) * self.field_size,
            0.0,
            (row as f32 - self.height as f32 / 2.0) * self.field_size,
        )
    }
}

// ============================================================================
// GENERATED OUTPUT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartRole {
    Ground,
    Building,
    StreetStraight,
    StreetCurve,
}

/// One primitive of a tile.
///
/// `frame` orients the feature inside the tile (the per-code yaw), `offset`
/// places the primitive inside that frame.
#[derive(Debug, Clone)]
pub struct TilePart {
    pub role:      PartRole,
    pub primitive: Primitive,
    pub color:     Color,
    pub frame:     Transform,
    pub offset:    Transform,
}

impl TilePart {
    /// Transform from primitive space to tile space.
    pub fn local_matrix(&self) -> Mat4 {
        self.frame.to_matrix() * self.offset.to_matrix()
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedTile {
    pub col:      u32,
    pub row:      u32,
    pub code:     TileCode,
    /// `None` when the code was not recognised and the tile fell back to bare land.
    pub kind:     Option<TileKind>,
    pub position: Vec3,
    pub ground:   TilePart,
    pub feature:  Option<TilePart>,
}

impl GeneratedTile {
    /// Ground first, then the feature if any.
    pub fn parts(&self) -> impl Iterator<Item = &TilePart> {
        std::iter::once(&self.ground).chain(self.feature.as_ref())
    }

    pub fn part_world_matrix(&self, part: &TilePart) -> Mat4 {
        Mat4::from_translation(self.position) * part.local_matrix()
    }
}

// ============================================================================
// GENERATOR
// ============================================================================

pub struct TileGridGenerator {
    grid: TileGrid,
}

impl TileGridGenerator {
    pub fn new(grid: TileGrid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Generate one tile per cell, row by row. Building sizes are unseeded.
    pub fn generate(&self) -> Vec<GeneratedTile> {
        self.generate_with_rng(&mut rand::thread_rng())
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<GeneratedTile> {
        let grid = &self.grid;
        let mut tiles = Vec::with_capacity(grid.cells.len());
        for row in 0..grid.height {
            for col in 0..grid.width {
                let code = grid.cells[(row * grid.width + col) as usize];
                tiles.push(self.tile(col, row, code, rng));
            }
        }
        log::debug!("generated {} tiles ({}x{})", tiles.len(), grid.width, grid.height);
        tiles
    }

    fn tile<R: Rng + ?Sized>(&self, col: u32, row: u32, code: TileCode, rng: &mut R) -> GeneratedTile {
        let kind = TileKind::from_code(code);
        if kind.is_none() {
            log::warn!("unknown tile code {} at ({col}, {row}), using bare land", code.0);
        }
        let surface = kind.map_or(Surface::Land, TileKind::surface);

        let feature = kind.and_then(|kind| match kind {
            TileKind::Plain => None,
            TileKind::PlainWithBuilding => Some(self.building(rng)),
            TileKind::Curve(orientation) => Some(self.curve(orientation)),
            TileKind::Straight(orientation) => Some(self.straight(orientation)),
        });

        GeneratedTile {
            col,
            row,
            code,
            kind,
            position: self.grid.cell_position(col, row),
            ground: self.ground(surface),
            feature,
        }
    }

    fn ground(&self, surface: Surface) -> TilePart {
        let size = self.grid.field_size;
        TilePart {
            role:      PartRole::Ground,
            primitive: Primitive::plane(size, size),
            color:     surface.color(),
            frame:     Transform::IDENTITY,
            offset:    Transform::from_rotation(Quat::from_rotation_x(FRAC_PI_2)),
        }
    }

    /// Box with its base on the ground plane.
    fn building<R: Rng + ?Sized>(&self, rng: &mut R) -> TilePart {
        let size = self.grid.field_size;
        let width = rng.gen_range(size / 2.0..size);
        let height = rng.gen_range(size..3.0 * size);
        let depth = rng.gen_range(size / 2.0..size);

        TilePart {
            role:      PartRole::Building,
            primitive: Primitive::Box { width, height, depth },
            color:     Color::BUILDING,
            frame:     Transform::IDENTITY,
            offset:    Transform::from_translation(Vec3::new(0.0, height / 2.0, 0.0)),
        }
    }

    fn straight(&self, orientation: StraightOrientation) -> TilePart {
        let size = self.grid.field_size;
        let mut offset = Transform::from_rotation(Quat::from_rotation_x(FRAC_PI_2));
        offset.translate_local(Vec3::new(0.0, 0.0, -STREET_LIFT));

        TilePart {
            role:      PartRole::StreetStraight,
            primitive: Primitive::plane(size, size * (1.0 - 2.0 * SIDE_RATIO)),
            color:     Color::ASPHALT,
            frame:     Transform::from_rotation(Quat::from_rotation_y(orientation.yaw())),
            offset,
        }
    }

    /// Quarter ring anchored at the tile's near corner.
    fn curve(&self, orientation: CurveOrientation) -> TilePart {
        let size = self.grid.field_size;
        let mut offset = Transform::from_rotation(Quat::from_rotation_x(FRAC_PI_2));
        offset.translate_local(Vec3::new(-size / 2.0, -size / 2.0, -STREET_LIFT));

        TilePart {
            role: PartRole::StreetCurve,
            primitive: Primitive::RingSector {
                inner_radius:   size * SIDE_RATIO,
                outer_radius:   size * (1.0 - SIDE_RATIO),
                theta_segments: CURVE_THETA_SEGMENTS,
                phi_segments:   CURVE_PHI_SEGMENTS,
                theta_start:    0.0,
                theta_length:   FRAC_PI_2,
            },
            color: Color::ASPHALT,
            frame: Transform::from_rotation(Quat::from_rotation_y(orientation.yaw())),
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    const FIELD: f32 = 100.0;

    fn generate(grid: TileGrid) -> Vec<GeneratedTile> {
        TileGridGenerator::new(grid).generate_with_rng(&mut StdRng::seed_from_u64(7))
    }

    fn codes(rows: &[&[i32]]) -> Vec<Vec<TileCode>> {
        rows.iter().map(|r| r.iter().map(|&c| TileCode(c)).collect()).collect()
    }

    fn single(code: TileCode) -> GeneratedTile {
        generate(TileGrid::from_rows(&[vec![code]], FIELD).unwrap()).remove(0)
    }

    #[test]
    fn one_tile_per_cell_at_documented_position() {
        let grid = TileGrid::example_layout(FIELD).unwrap();
        let tiles = generate(grid.clone());
        assert_eq!(tiles.len(), 100);

        let mut seen = HashSet::new();
        for tile in &tiles {
            let expected = Vec3::new(
                (tile.col as f32 - 5.0) * FIELD,
                0.0,
                (tile.row as f32 - 5.0) * FIELD,
            );
            assert_eq!(tile.position, expected);
            assert_eq!(Some(tile.code), grid.cell(tile.col, tile.row));
            assert!(seen.insert((tile.position.x as i64, tile.position.z as i64)));
        }
    }

    #[test]
    fn odd_grid_positions_use_fractional_half_width() {
        let grid = TileGrid::new(3, 1, vec![TileCode::PLAIN_EMPTY; 3], 10.0).unwrap();
        let tiles = generate(grid);
        assert_eq!(tiles[0].position, Vec3::new(-15.0, 0.0, -5.0));
        assert_eq!(tiles[2].position, Vec3::new(5.0, 0.0, -5.0));
    }

    #[test]
    fn corner_curve_is_turned_half_way() {
        let tiles = generate(TileGrid::example_layout(FIELD).unwrap());
        let corner = &tiles[0];
        assert_eq!(corner.code, TileCode::CURVE_SE);
        assert_eq!(corner.position, Vec3::new(-5.0 * FIELD, 0.0, -5.0 * FIELD));

        let feature = corner.feature.as_ref().unwrap();
        assert_eq!(feature.role, PartRole::StreetCurve);
        assert!(feature.frame.rotation.abs_diff_eq(Quat::from_rotation_y(PI), 1e-6));
    }

    #[test]
    fn curve_and_straight_rotation_table() {
        let table = [
            (TileCode::CURVE_SE, PI),
            (TileCode::CURVE_SW, FRAC_PI_2),
            (TileCode::CURVE_NE, 3.0 * FRAC_PI_2),
            (TileCode::CURVE_NW, 0.0),
            (TileCode::STRAIGHT_EW, 0.0),
            (TileCode::STRAIGHT_NS, FRAC_PI_2),
        ];
        for (code, yaw) in table {
            let tile = single(code);
            let feature = tile.feature.as_ref().unwrap();
            assert!(
                feature.frame.rotation.abs_diff_eq(Quat::from_rotation_y(yaw), 1e-6),
                "code {} should be rotated by {}",
                code.0,
                yaw
            );
            assert_eq!(tile.ground.color, Color::STREET);
        }
    }

    #[test]
    fn curve_ring_geometry_and_anchor() {
        let tile = single(TileCode::CURVE_NW);
        let feature = tile.feature.clone().unwrap();
        match feature.primitive {
            Primitive::RingSector { inner_radius, outer_radius, theta_length, .. } => {
                assert!((inner_radius - 20.0).abs() < 1e-4);
                assert!((outer_radius - 80.0).abs() < 1e-4);
                assert!((theta_length - FRAC_PI_2).abs() < 1e-6);
            }
            ref other => panic!("unexpected primitive {other:?}"),
        }
        assert!(feature.offset.translation.abs_diff_eq(Vec3::new(-50.0, 1.0, -50.0), 1e-4));

        // Every ring vertex lies flat, lifted above the ground, inside the tile
        let m = tile.part_world_matrix(&feature);
        for p in feature.primitive.build().positions {
            let w = m.transform_point3(p) - tile.position;
            assert!((w.y - 1.0).abs() < 1e-3);
            assert!(w.x >= -50.0 - 1e-3 && w.x <= 50.0 + 1e-3);
            assert!(w.z >= -50.0 - 1e-3 && w.z <= 50.0 + 1e-3);
        }

        // Same bounds in tile space, with the single cell centred off the origin
        assert_eq!(tile.position, Vec3::new(-50.0, 0.0, -50.0));
        let local = feature.local_matrix();
        for p in feature.primitive.build().positions {
            let q = local.transform_point3(p);
            assert!(q.x.abs() <= 50.0 + 1e-3 && q.z.abs() <= 50.0 + 1e-3);
        }
    }

    #[test]
    fn straight_strip_is_narrowed_on_both_sides() {
        let tile = single(TileCode::STRAIGHT_NS);
        let feature = tile.feature.as_ref().unwrap();
        assert_eq!(feature.role, PartRole::StreetStraight);
        match feature.primitive {
            Primitive::Plane { width, height, .. } => {
                assert_eq!(width, FIELD);
                assert!((height - FIELD * 0.6).abs() < 1e-4);
            }
            ref other => panic!("unexpected primitive {other:?}"),
        }
        // North-south strip spans the full tile along Z after rotation
        let m = tile.part_world_matrix(feature);
        let (lo, hi) = feature.primitive.build().positions.iter()
            .map(|&p| m.transform_point3(p))
            .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), p| (lo.min(p), hi.max(p)));
        assert!((hi.z - lo.z - FIELD).abs() < 1e-3);
        assert!((hi.x - lo.x - FIELD * 0.6).abs() < 1e-3);
    }

    #[test]
    fn buildings_stay_in_range_and_sit_on_ground() {
        let mut rng = StdRng::seed_from_u64(42);
        let generator = TileGridGenerator::new(
            TileGrid::new(4, 4, vec![TileCode::PLAIN_WITH_BUILDING; 16], FIELD).unwrap(),
        );
        for _ in 0..20 {
            for tile in generator.generate_with_rng(&mut rng) {
                assert_eq!(tile.ground.color, Color::LAND);
                let feature = tile.feature.unwrap();
                assert_eq!(feature.role, PartRole::Building);
                let Primitive::Box { width, height, depth } = feature.primitive else {
                    panic!("building should be a box");
                };
                assert!((FIELD / 2.0..=FIELD).contains(&width));
                assert!((FIELD..=3.0 * FIELD).contains(&height));
                assert!((FIELD / 2.0..=FIELD).contains(&depth));
                assert_eq!(feature.offset.translation, Vec3::new(0.0, height / 2.0, 0.0));
            }
        }
    }

    #[test]
    fn unseeded_generation_keeps_invariants() {
        let tiles = TileGridGenerator::new(TileGrid::example_layout(FIELD).unwrap()).generate();
        let buildings = tiles.iter()
            .filter_map(|t| t.feature.as_ref())
            .filter(|f| f.role == PartRole::Building)
            .count();
        assert_eq!(buildings, 8);
    }

    #[test]
    fn plain_tile_has_only_ground() {
        let tile = single(TileCode::PLAIN_EMPTY);
        assert_eq!(tile.kind, Some(TileKind::Plain));
        assert!(tile.feature.is_none());
        assert_eq!(tile.parts().count(), 1);
        assert_eq!(tile.ground.color, Color::LAND);
    }

    #[test]
    fn unknown_code_falls_back_to_land() {
        let grid = TileGrid::from_rows(&codes(&[&[1, 99], &[20, 21]]), FIELD).unwrap();
        let tiles = generate(grid);
        assert_eq!(tiles.len(), 4);
        let unknown = &tiles[1];
        assert_eq!(unknown.code, TileCode(99));
        assert_eq!(unknown.kind, None);
        assert!(unknown.feature.is_none());
        assert_eq!(unknown.ground.color, Color::LAND);
        // Neighbours are unaffected
        assert!(tiles[2].feature.is_some());
    }

    #[test]
    fn codes_round_trip_through_kind() {
        for code in [1, 2, 10, 11, 12, 13, 20, 21] {
            let kind = TileKind::from_code(TileCode(code)).unwrap();
            assert_eq!(kind.code(), TileCode(code));
            assert_eq!(kind.surface() == Surface::Street, code >= 10);
        }
        for code in [-1, 0, 3, 9, 14, 19, 22, 99, 300] {
            assert!(TileKind::from_code(TileCode(code)).is_none());
        }
    }

    #[test]
    fn invalid_grids_are_rejected() {
        assert!(matches!(
            TileGrid::new(0, 3, vec![], FIELD),
            Err(GridError::ZeroDimension { .. })
        ));
        assert!(matches!(
            TileGrid::new(2, 2, vec![TileCode::PLAIN_EMPTY; 3], FIELD),
            Err(GridError::CellCount { expected: 4, actual: 3, .. })
        ));
        assert!(matches!(
            TileGrid::from_rows(&codes(&[&[1, 1], &[1]]), FIELD),
            Err(GridError::RaggedRow { row: 1, expected: 2, actual: 1 })
        ));
        assert!(matches!(
            TileGrid::new(1, 1, vec![TileCode::PLAIN_EMPTY], -1.0),
            Err(GridError::FieldSize(_))
        ));
        assert!(TileGrid::from_rows(&[], FIELD).is_err());
        assert!(matches!(
            TileGrid::new(1, 1, vec![TileCode::PLAIN_EMPTY], 2e38),
            Err(GridError::FieldSize(_))
        ));
        assert!(matches!(
            TileGrid::new(1, 1, vec![TileCode::PLAIN_EMPTY], f32::INFINITY),
            Err(GridError::FieldSize(_))
        ));
    }

    #[test]
    fn largest_accepted_field_size_still_generates() {
        let size = f32::MAX / 4.0;
        let grid = TileGrid::new(1, 1, vec![TileCode::PLAIN_WITH_BUILDING], size).unwrap();
        let tile = generate(grid).remove(0);
        let Some(TilePart { primitive: Primitive::Box { height, .. }, .. }) = tile.feature else {
            panic!("building expected");
        };
        assert!(height.is_finite() && height >= size);
    }

    #[test]
    fn out_of_range_codes_fall_back_per_cell() {
        let grid = TileGrid::from_rows(&codes(&[&[300, 2], &[-1, 21]]), FIELD).unwrap();
        let tiles = generate(grid);
        for unknown in [&tiles[0], &tiles[2]] {
            assert_eq!(unknown.kind, None);
            assert_eq!(unknown.parts().count(), 1);
            assert_eq!(unknown.ground.color, Color::LAND);
        }
        assert_eq!(tiles[0].code, TileCode(300));
        assert_eq!(tiles[1].feature.as_ref().map(|f| f.role), Some(PartRole::Building));
        assert_eq!(tiles[3].feature.as_ref().map(|f| f.role), Some(PartRole::StreetStraight));
    }
}
