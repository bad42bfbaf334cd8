// Procedural scene demo: builds the city block, the segmented rig and the
// heightfield terrain, hands them to the scene graph and reports what was made.
// Usage: procgen_scenes [config.json]

use procgen_scenes::engine::config::SceneConfig;
use procgen_scenes::engine::error::Error;
use procgen_scenes::engine::mesh::{triangulate_smooth, GpuVertex, SkinnedGpuVertex};
use procgen_scenes::{HeightfieldTerrain, Scene, SegmentedRigBuilder, TileGridGenerator};

// ============================================================================
// SCENE BUILD
// ============================================================================

fn run() -> Result<(), Error> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading config from {path}");
            SceneConfig::load(path)?
        }
        None => SceneConfig::default(),
    };

    let mut scene = Scene::new();

    // City
    let generator = TileGridGenerator::new(config.city.grid()?);
    let tiles = generator.generate();
    let city_root = scene.spawn_city(&tiles);
    log::info!(
        "city: {}x{} tiles of size {}",
        generator.grid().width(),
        generator.grid().height(),
        generator.grid().field_size()
    );

    // Rig
    let rig = SegmentedRigBuilder::new(config.rig.sizing()?, config.rig.cylinder())?.build();
    let rig_nodes = scene.spawn_rig(&rig);
    let skinned = rig.to_render_mesh();
    log::info!(
        "rig: {} bones, {} vertices, {} indices ({} vertex bytes, stride {})",
        rig_nodes.bones.len(),
        skinned.vertices.len(),
        skinned.index_count(),
        skinned.vertex_bytes().len(),
        SkinnedGpuVertex::desc().array_stride
    );

    // Terrain: the plane exists before its textures arrive
    let terrain = HeightfieldTerrain::new(config.terrain.spec()?)?;
    let mut plane = terrain.create();
    let terrain_node = scene.spawn_terrain(&plane);
    pollster::block_on(HeightfieldTerrain::load_textures(
        &mut plane,
        &config.terrain.albedo_path,
        &config.terrain.displacement_path,
    ));
    let terrain_mesh = triangulate_smooth(&plane.mesh);
    log::info!(
        "terrain: {} vertices, {} indices, stride {}, displaced: {}",
        terrain_mesh.vertices.len(),
        terrain_mesh.index_count(),
        GpuVertex::desc().array_stride,
        plane.material.displacement.is_some()
    );

    scene.update();
    log::info!(
        "scene ready: {} mesh parts, city root {:?}, rig body {:?}, terrain {:?}",
        scene.mesh_part_count(),
        city_root,
        rig_nodes.body,
        terrain_node
    );
    Ok(())
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
