//! Built-in demo scenes.

use std::sync::Arc;

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::Rng;
use wray_renderer::{
    AaBox, Ambient, AreaLight, Checker3D, Color, Emissive, GeometricObject, Grid, Matte, Phong, Pinhole, Plane,
    PointLight, Reflective, Sphere, SvMatte, ThinLens, Transparent, Triangle, Vec3, ViewPlane, Whitted, World,
    RayCast, BLACK, DEFAULT_GRID_MULTIPLIER, WHITE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneName {
    /// Four spheres with different materials over a checkered floor
    Spheres,
    /// A random city of boxes around a park, seen through a thin lens
    City,
}

#[derive(Debug, Clone, Copy)]
pub struct SceneOptions {
    /// Store the city's buildings in a regular grid instead of the world list
    pub use_grid: bool,
    /// Grid cells per object along each axis
    pub grid_multiplier: f32,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            use_grid: true,
            grid_multiplier: DEFAULT_GRID_MULTIPLIER,
        }
    }
}

pub fn build(scene: SceneName, options: &SceneOptions, rng: &mut StdRng) -> World {
    match scene {
        SceneName::Spheres => spheres(rng),
        SceneName::City => city(options, rng),
    }
}

fn spheres(rng: &mut StdRng) -> World {
    let mut world = World::new();
    world.vp = ViewPlane::default().with_resolution(600, 400).with_quality(4, 5);
    world.background_color = Color::new(0.05, 0.05, 0.1);
    world.set_tracer(Box::new(Whitted));
    world.set_camera(Box::new(Pinhole::new(
        Vec3::new(0.0, 4.0, 14.0),
        Vec3::new(0.0, 1.0, 0.0),
        600.0,
    )));
    world.set_ambient_light(Box::new(Ambient::new(0.5, WHITE)));

    world.add_light(Box::new(PointLight::new(Vec3::new(-8.0, 10.0, 8.0), 2.0, WHITE)));

    // Square panel facing down, with its emitting surface drawn as two triangles
    let p0 = Vec3::new(-2.0, 8.0, -2.0);
    let a = Vec3::new(4.0, 0.0, 0.0);
    let b = Vec3::new(0.0, 0.0, 4.0);
    let panel = AreaLight::new(p0, a, b, 3.0, WHITE, 16, rng);
    let glow = Arc::new(Emissive::new(panel.ls, panel.color));
    world.add_object(Box::new(
        Triangle::new(p0, p0 + a, p0 + a + b, glow.clone()).with_shadows(false),
    ));
    world.add_object(Box::new(Triangle::new(p0, p0 + a + b, p0 + b, glow).with_shadows(false)));
    world.add_light(Box::new(panel));

    let floor = Checker3D::new(1.0, Color::splat(0.8), Color::splat(0.3));
    world.add_object(Box::new(Plane::new(
        Vec3::ZERO,
        Vec3::Y,
        Arc::new(SvMatte::new(0.25, 0.75, Arc::new(floor))),
    )));

    world.add_object(Box::new(Sphere::new(
        Vec3::new(-4.5, 1.0, 0.0),
        1.0,
        Arc::new(Matte::new(0.25, 0.65, Color::new(0.8, 0.3, 0.2))),
    )));
    world.add_object(Box::new(Sphere::new(
        Vec3::new(-1.5, 1.0, 0.0),
        1.0,
        Arc::new(Phong::new(0.25, 0.6, Color::new(0.2, 0.4, 0.8), 0.3, 40.0)),
    )));
    world.add_object(Box::new(Sphere::new(
        Vec3::new(1.5, 1.0, 0.0),
        1.0,
        Arc::new(Reflective::new(
            Phong::new(0.1, 0.2, Color::new(0.9, 0.9, 0.6), 0.2, 100.0),
            0.75,
            WHITE,
        )),
    )));
    world.add_object(Box::new(Sphere::new(
        Vec3::new(4.5, 1.0, 0.0),
        1.0,
        Arc::new(Transparent::new(Phong::new(0.0, 0.0, WHITE, 0.5, 2000.0), 1.5)),
    )));

    world
}

// City block and building parameters
const BLOCK_WIDTH: f32 = 10.0;
const BLOCK_LENGTH: f32 = 12.0;
const NUM_ROWS: i32 = 10;
const NUM_COLUMNS: i32 = 12;
const NUM_PARK_ROWS: i32 = 4;
const NUM_PARK_COLUMNS: i32 = 6;
const MIN_SIZE: f32 = 6.0;
const OFFSET: f32 = 1.0;
const MIN_HEIGHT: f32 = 0.0;
const MAX_HEIGHT: f32 = 30.0;
const MIN_COLOR: f32 = 0.1;
const MAX_COLOR: f32 = 0.9;

/// Whether block `(row, column)` lies inside the park in the middle of the city.
fn in_park(row: i32, column: i32) -> bool {
    let centered = |i: i32, n: i32| if i - n / 2 >= 0 { i - n / 2 } else { i - n / 2 + 1 };
    centered(row, NUM_ROWS).abs() < NUM_PARK_ROWS / 2 && centered(column, NUM_COLUMNS).abs() < NUM_PARK_COLUMNS / 2
}

fn building(row: i32, column: i32, rng: &mut StdRng) -> AaBox {
    let mut channel = || MIN_COLOR + rng.gen::<f32>() * (MAX_COLOR - MIN_COLOR);
    let cd = Color::new(channel(), channel(), channel());
    let material = Arc::new(Matte::new(0.4, 0.6, cd));

    let xc = BLOCK_WIDTH * (row as f32 - NUM_ROWS as f32 / 2.0 + 0.5);
    let zc = BLOCK_LENGTH * (column as f32 - NUM_COLUMNS as f32 / 2.0 + 0.5);

    let width = MIN_SIZE + rng.gen::<f32>() * (BLOCK_WIDTH - 2.0 * OFFSET - MIN_SIZE);
    let length = MIN_SIZE + rng.gen::<f32>() * (BLOCK_LENGTH - 2.0 * OFFSET - MIN_SIZE);
    let mut height = MIN_HEIGHT + rng.gen::<f32>() * (MAX_HEIGHT - MIN_HEIGHT);

    // Taller buildings around the edge of the park
    if row == 1 || row == NUM_ROWS - 2 || column == 1 || column == NUM_COLUMNS - 2 {
        height *= 1.5;
    }

    AaBox::new(
        Vec3::new(xc - width / 2.0, 0.0, zc - length / 2.0),
        Vec3::new(xc + width / 2.0, height, zc + length / 2.0),
        material,
    )
}

fn city(options: &SceneOptions, rng: &mut StdRng) -> World {
    let mut world = World::new();
    world.vp = ViewPlane::default().with_resolution(600, 400).with_quality(16, 0);
    world.background_color = BLACK;
    world.set_tracer(Box::new(RayCast));

    let pinhole = Pinhole::new(Vec3::new(100.0, 100.0, 50.0), Vec3::new(0.0, -10.0, 0.0), 390.0);
    world.set_camera(Box::new(ThinLens::new(pinhole, 5.0, 135.0)));
    world.set_ambient_light(Box::new(Ambient::default()));
    world.add_light(Box::new(PointLight::new(Vec3::new(150.0, 500.0, 300.0), 3.75, WHITE)));

    let mut buildings: Vec<Box<dyn GeometricObject>> = Vec::new();
    for row in 0..NUM_ROWS {
        for column in 0..NUM_COLUMNS {
            if !in_park(row, column) {
                buildings.push(Box::new(building(row, column, rng)));
            }
        }
    }
    log::info!("City has {} buildings", buildings.len());

    if options.use_grid {
        let mut grid = Grid::new().with_multiplier(options.grid_multiplier);
        for object in buildings {
            grid.add_object(object);
        }
        grid.setup_cells();
        world.add_object(Box::new(grid));
    } else {
        for object in buildings {
            world.add_object(object);
        }
    }

    let park_half = Vec3::new(
        BLOCK_WIDTH * (NUM_PARK_ROWS / 2) as f32,
        0.0,
        BLOCK_LENGTH * (NUM_PARK_COLUMNS / 2) as f32,
    );
    let park = Checker3D::new(5.0, Color::new(0.35, 0.75, 0.35), Color::new(0.3, 0.5, 0.3));
    world.add_object(Box::new(AaBox::new(
        -park_half,
        park_half + Vec3::new(0.0, 0.1, 0.0),
        Arc::new(SvMatte::new(0.3, 0.5, Arc::new(park))),
    )));

    let ground = Checker3D::new(50.0, Color::splat(0.7), WHITE);
    world.add_object(Box::new(Plane::new(
        Vec3::new(0.0, 0.01, 0.0),
        Vec3::Y,
        Arc::new(SvMatte::new(0.3, 0.4, Arc::new(ground))),
    )));

    world
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use wray_renderer::{FrameSink, Ray};

    #[test]
    fn test_park_blocks() {
        let park: Vec<(i32, i32)> = (0..NUM_ROWS)
            .flat_map(|r| (0..NUM_COLUMNS).map(move |c| (r, c)))
            .filter(|&(r, c)| in_park(r, c))
            .collect();

        assert_eq!(park.len(), (NUM_PARK_ROWS * NUM_PARK_COLUMNS) as usize);
        assert!(in_park(4, 5) && in_park(6, 8) && in_park(3, 4));
        assert!(!in_park(2, 5) && !in_park(7, 5) && !in_park(4, 2));
    }

    #[test]
    fn test_city_is_repeatable() {
        let options = SceneOptions::default();
        let first = build(SceneName::City, &options, &mut StdRng::seed_from_u64(15));
        let second = build(SceneName::City, &options, &mut StdRng::seed_from_u64(15));

        // Grid, park and ground
        assert_eq!(first.num_objects(), 3);
        assert!(first.check().is_ok());

        let ray = Ray::new_simple(Vec3::new(-40.0, 60.0, -55.0), Vec3::new(0.2, -1.0, 0.1));
        let a = first.hit_objects(&ray).map(|sr| (sr.t, sr.hit_point));
        let b = second.hit_objects(&ray).map(|sr| (sr.t, sr.hit_point));
        assert_eq!(a, b);
    }

    #[test]
    fn test_city_grid_matches_flat_list() {
        let gridded = build(
            SceneName::City,
            &SceneOptions::default(),
            &mut StdRng::seed_from_u64(15),
        );
        let flat = build(
            SceneName::City,
            &SceneOptions {
                use_grid: false,
                ..Default::default()
            },
            &mut StdRng::seed_from_u64(15),
        );
        assert_eq!(flat.num_objects(), 96 + 2);

        for i in 0..20 {
            let x = -50.0 + 5.0 * i as f32;
            let ray = Ray::new_simple(Vec3::new(x, 80.0, 70.0), Vec3::new(-0.1, -0.8, -0.6));
            let a = gridded.hit_objects(&ray).map(|sr| sr.t);
            let b = flat.hit_objects(&ray).map(|sr| sr.t);
            match (a, b) {
                (Some(a), Some(b)) => assert!((a - b).abs() < 1e-3, "ray {}: {} vs {}", i, a, b),
                (a, b) => assert_eq!(a, b),
            }
        }
    }

    #[test]
    fn test_city_grid_multiplier_keeps_hits() {
        let coarse = build(SceneName::City, &SceneOptions::default(), &mut StdRng::seed_from_u64(15));
        let fine = build(
            SceneName::City,
            &SceneOptions {
                grid_multiplier: 4.0,
                ..Default::default()
            },
            &mut StdRng::seed_from_u64(15),
        );

        for i in 0..20 {
            let z = -60.0 + 6.0 * i as f32;
            let ray = Ray::new_simple(Vec3::new(90.0, 40.0, z), Vec3::new(-1.0, -0.3, 0.05));
            let a = coarse.hit_objects(&ray).map(|sr| sr.t);
            let b = fine.hit_objects(&ray).map(|sr| sr.t);
            match (a, b) {
                (Some(a), Some(b)) => assert!((a - b).abs() < 1e-3, "ray {}: {} vs {}", i, a, b),
                (a, b) => assert_eq!(a, b),
            }
        }
    }

    #[test]
    fn test_small_spheres_render() {
        let mut world = build(SceneName::Spheres, &SceneOptions::default(), &mut StdRng::seed_from_u64(1));
        world.vp = world.vp.clone().with_resolution(12, 8).with_pixel_size(50.0).with_quality(1, 2);

        let sink = FrameSink::new(12, 8);
        let stats = world.render_scene(&sink).unwrap();
        assert_eq!(stats.pixels, 96);

        let image = sink.into_image();
        assert!(image.pixels.iter().all(|c| c.is_finite() && c.max_element() <= 1.0));
    }
}
