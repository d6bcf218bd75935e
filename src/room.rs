//! One-shot composition of the room scene.
//!
//! Build order is camera, light, floor, walls, ball, clock face; the clock face
//! is last because it needs a bitmap drawn by [`ClockFace`].

use crate::assets::{TextureLoader, asset_path};
use crate::clock::ClockFace;
use crate::config::{
    BALL_RADIUS, CAMERA_POSITION, CLOCK_PHI, CLOCK_THETA, FLOOR_REPEAT, FLOOR_TEXTURE_PATH, FLOOR_TEXTURE_ROTATION,
    JOINT_DEPTH, JOINT_HEIGHT, JOINT_TEXTURE_ROTATION, LIGHT_DECAY, LIGHT_INTENSITY, LIGHT_RANGE,
    ROOM_X, ROOM_Y, ROOM_Z, SHADOW_TEXTURE_PATH, SPHERE_SEGMENTS, WALL_TEXTURE_PATH,
    WALL_TILE_SIZE, WOOD_TEXTURE_PATH,
};
use crate::context::SceneContext;
use crate::objects::light::PointLight;
use crate::objects::material::{Material, Side};
use crate::objects::model3d::{Mesh, Transform};
use crate::objects::orbit::OrbitController;
use crate::objects::texture::{SharedTexture, TextureMap};
use crate::objects::triangle_mesh::TriangleMesh;
use crate::scene::{Node, NodeId};
use chrono::NaiveTime;
use image::Rgb;
use imageproc::definitions::HasWhite;
use nalgebra::Point3;
use std::f64::consts::{FRAC_PI_2, PI};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
    Back,
    Front,
    Right,
    Left,
    Top,
}

impl SurfaceKind {
    pub fn name(self) -> &'static str {
        match self {
            SurfaceKind::Back => "back",
            SurfaceKind::Front => "front",
            SurfaceKind::Right => "right",
            SurfaceKind::Left => "left",
            SurfaceKind::Top => "top",
        }
    }

    /// Vertical panels carry a trim bar along their bottom edge.
    pub fn has_trim(self) -> bool {
        self != SurfaceKind::Top
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceDescriptor {
    pub kind: SurfaceKind,
    pub size: (f64, f64),
    pub position: [f64; 3],
    pub rotation: [f64; 3],
}

pub const ROOM_SURFACES: [SurfaceDescriptor; 5] = [
    SurfaceDescriptor {
        kind: SurfaceKind::Back,
        size: (ROOM_X, ROOM_Y),
        position: [0., ROOM_Y / 2., -ROOM_Z / 2.],
        rotation: [0., 0., 0.],
    },
    SurfaceDescriptor {
        kind: SurfaceKind::Front,
        size: (ROOM_X, ROOM_Y),
        position: [0., ROOM_Y / 2., ROOM_Z / 2.],
        rotation: [0., PI, 0.],
    },
    SurfaceDescriptor {
        kind: SurfaceKind::Right,
        size: (ROOM_Z, ROOM_Y),
        position: [ROOM_X / 2., ROOM_Y / 2., 0.],
        rotation: [0., -FRAC_PI_2, 0.],
    },
    SurfaceDescriptor {
        kind: SurfaceKind::Left,
        size: (ROOM_Z, ROOM_Y),
        position: [-ROOM_X / 2., ROOM_Y / 2., 0.],
        rotation: [0., FRAC_PI_2, 0.],
    },
    SurfaceDescriptor {
        kind: SurfaceKind::Top,
        size: (ROOM_X, ROOM_Z),
        position: [0., ROOM_Y, 0.],
        rotation: [FRAC_PI_2, 0., 0.],
    },
];

impl SurfaceDescriptor {
    pub fn transform(&self) -> Transform {
        let [px, py, pz] = self.position;
        let [rx, ry, rz] = self.rotation;
        Transform::at(px, py, pz).rotated(rx, ry, rz)
    }

    /// Wall texture tiles per panel axis.
    pub fn texture_repeat(&self) -> (f64, f64) {
        (
            (self.size.0 / WALL_TILE_SIZE).round(),
            (self.size.1 / WALL_TILE_SIZE).round(),
        )
    }

    /// Local offset of the trim bar; the panel's own height is the room height.
    pub fn trim_offset(&self) -> [f64; 3] {
        [0., -self.size.1 / 2. + JOINT_HEIGHT / 2., JOINT_DEPTH / 2.]
    }
}

/// Texture slots used by the room surfaces.
#[derive(Clone, Debug)]
pub struct RoomTextures {
    pub floor: SharedTexture,
    pub wall: SharedTexture,
    pub wood: SharedTexture,
    pub shadow: SharedTexture,
}

impl RoomTextures {
    pub fn load(loader: &mut TextureLoader) -> Self {
        Self {
            floor: loader.load(asset_path(FLOOR_TEXTURE_PATH)),
            wall: loader.load(asset_path(WALL_TEXTURE_PATH)),
            wood: loader.load(asset_path(WOOD_TEXTURE_PATH)),
            shadow: loader.load(asset_path(SHADOW_TEXTURE_PATH)),
        }
    }

    pub fn placeholders() -> Self {
        Self {
            floor: SharedTexture::placeholder(),
            wall: SharedTexture::placeholder(),
            wood: SharedTexture::placeholder(),
            shadow: SharedTexture::placeholder(),
        }
    }
}

fn ball_position() -> [f64; 3] {
    [0., BALL_RADIUS, -ROOM_Z / 2. + 2. * BALL_RADIUS]
}

/// Builds the whole room into `ctx`, discarding any previous scene graph.
pub fn compose(
    ctx: &mut SceneContext,
    textures: &RoomTextures,
    clock: &mut ClockFace,
    now: NaiveTime,
) {
    ctx.scene.clear();
    ctx.clock_face = None;

    set_camera(ctx);
    set_light(ctx);
    set_floor(ctx, textures);
    set_walls(ctx, textures);
    set_ball(ctx, textures);
    let clock_face = create_clock(ctx);
    clock.update(&mut ctx.scene, clock_face, now);
    ctx.clock_face = Some(clock_face);

    tracing::info!(nodes = ctx.scene.len(), "room composed");
}

pub fn set_camera(ctx: &mut SceneContext) {
    let [x, y, z] = CAMERA_POSITION;
    let target = Point3::new(0., BALL_RADIUS, -ROOM_Z / 2. + 2. + BALL_RADIUS);
    ctx.orbit = OrbitController::new(Point3::new(x, y, z), target);
    ctx.sync_camera();
}

pub fn set_light(ctx: &mut SceneContext) -> NodeId {
    let light = PointLight::new(LIGHT_INTENSITY, LIGHT_RANGE, LIGHT_DECAY);
    ctx.scene.add(Node::light(
        "light",
        Transform::at(0., ROOM_Y / 2., -ROOM_Z / 2. + 3. * BALL_RADIUS),
        light,
    ))
}

pub fn set_floor(ctx: &mut SceneContext, textures: &RoomTextures) -> NodeId {
    let map = TextureMap::new(textures.floor.clone())
        .repeating(FLOOR_REPEAT.0, FLOOR_REPEAT.1)
        .rotated(FLOOR_TEXTURE_ROTATION);
    ctx.scene.add(Node::mesh(
        "floor",
        Transform::default().rotated(-FRAC_PI_2, 0., 0.),
        Mesh::new(TriangleMesh::plane(ROOM_X, ROOM_Z), Material::phong(Some(map))),
    ))
}

/// Adds the five room panels under a "walls" group; returns the group.
pub fn set_walls(ctx: &mut SceneContext, textures: &RoomTextures) -> NodeId {
    let group = ctx.scene.add(Node::group("walls"));
    let trim_map = TextureMap::new(textures.wood.clone()).rotated(JOINT_TEXTURE_ROTATION);

    for surface in &ROOM_SURFACES {
        let (width, height) = surface.size;
        let (repeat_u, repeat_v) = surface.texture_repeat();
        let wall_map = TextureMap::new(textures.wall.clone()).repeating(repeat_u, repeat_v);

        let panel = ctx.scene.add_child(
            group,
            Node::mesh(
                format!("wall:{}", surface.kind.name()),
                surface.transform(),
                Mesh::new(TriangleMesh::plane(width, height), Material::phong(Some(wall_map))),
            ),
        );

        if surface.kind.has_trim() {
            let [x, y, z] = surface.trim_offset();
            ctx.scene.add_child(
                panel,
                Node::mesh(
                    format!("trim:{}", surface.kind.name()),
                    Transform::at(x, y, z),
                    Mesh::new(
                        TriangleMesh::cuboid(width, JOINT_HEIGHT, JOINT_DEPTH),
                        Material::phong(Some(trim_map.clone())),
                    ),
                ),
            );
        }
    }
    group
}

/// Adds the black ball and its shadow decal; returns `(ball, shadow)`.
pub fn set_ball(ctx: &mut SceneContext, textures: &RoomTextures) -> (NodeId, NodeId) {
    let [x, y, z] = ball_position();
    let ball_material = Material {
        color: Rgb([0, 0, 0]),
        specular: Rgb::white(),
        shininess: 1.,
        ..Material::default()
    };
    let ball = ctx.scene.add(Node::mesh(
        "ball",
        Transform::at(x, y, z),
        Mesh::new(
            TriangleMesh::sphere(BALL_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
            ball_material,
        ),
    ));

    let shadow_material = Material {
        transparent: true,
        depth_write: false,
        ..Material::basic(Some(TextureMap::new(textures.shadow.clone())))
    };
    let shadow = ctx.scene.add(Node::mesh(
        "ball-shadow",
        Transform::at(x, 0.01, z)
            .rotated(-FRAC_PI_2, 0., 0.)
            .scaled(BALL_RADIUS, BALL_RADIUS, 1.),
        Mesh::new(TriangleMesh::plane(BALL_RADIUS, BALL_RADIUS), shadow_material),
    ));

    (ball, shadow)
}

/// Adds the visor-shaped clock mesh in front of the ball. Its texture is bound
/// by the clock updater.
pub fn create_clock(ctx: &mut SceneContext) -> NodeId {
    let [x, y, z] = ball_position();
    let geometry = TriangleMesh::sphere_segment(
        BALL_RADIUS,
        SPHERE_SEGMENTS,
        SPHERE_SEGMENTS,
        CLOCK_PHI,
        PI - 2. * CLOCK_PHI,
        CLOCK_THETA,
        PI - 2. * CLOCK_THETA,
    );
    let material = Material {
        transparent: true,
        side: Side::Double,
        ..Material::basic(None)
    };
    ctx.scene.add(Node::mesh(
        "clock-face",
        Transform::at(x, y, z),
        Mesh::new(geometry, material),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::fallback_font;
    use crate::render::collect_lights;
    use crate::scene::NodeKind;
    use nalgebra::Vector3;

    fn composed() -> SceneContext {
        let mut ctx = SceneContext::new();
        let mut clock = ClockFace::new(fallback_font(), None);
        compose(
            &mut ctx,
            &RoomTextures::placeholders(),
            &mut clock,
            NaiveTime::from_hms_opt(13, 7, 45).unwrap(),
        );
        ctx
    }

    fn plane_extent(ctx: &SceneContext, id: NodeId) -> (f64, f64) {
        let mesh = ctx.scene.node(id).as_mesh().unwrap();
        let xs = mesh.geometry.vertices().iter().map(|v| v.x);
        let ys = mesh.geometry.vertices().iter().map(|v| v.y);
        (
            xs.clone().fold(f64::MIN, f64::max) - xs.fold(f64::MAX, f64::min),
            ys.clone().fold(f64::MIN, f64::max) - ys.fold(f64::MAX, f64::min),
        )
    }

    #[test]
    fn panels_match_surface_table() {
        let ctx = composed();
        let expected = [
            ("back", (40., 25.), [0., 12.5, -35.], [0., 0., 0.]),
            ("front", (40., 25.), [0., 12.5, 35.], [0., PI, 0.]),
            ("right", (70., 25.), [20., 12.5, 0.], [0., -FRAC_PI_2, 0.]),
            ("left", (70., 25.), [-20., 12.5, 0.], [0., FRAC_PI_2, 0.]),
            ("top", (40., 70.), [0., 25., 0.], [FRAC_PI_2, 0., 0.]),
        ];
        let walls = ctx.scene.find("walls").unwrap();
        assert_eq!(ctx.scene.node(walls).children().len(), 5);

        for (name, size, position, rotation) in expected {
            let id = ctx.scene.find(&format!("wall:{name}")).unwrap();
            let node = ctx.scene.node(id);
            assert_eq!(node.parent(), Some(walls));
            assert_eq!(plane_extent(&ctx, id), size, "{name}");
            assert_eq!(node.transform.position, Vector3::from(position), "{name}");
            assert_eq!(node.transform.rotation, Vector3::from(rotation), "{name}");
        }
    }

    #[test]
    fn vertical_panels_have_one_trim_at_bottom_edge() {
        let ctx = composed();
        for surface in &ROOM_SURFACES {
            let panel = ctx.scene.find(&format!("wall:{}", surface.kind.name())).unwrap();
            let children = ctx.scene.node(panel).children();
            if surface.kind == SurfaceKind::Top {
                assert!(children.is_empty());
                continue;
            }
            assert_eq!(children.len(), 1, "{:?}", surface.kind);
            let trim = ctx.scene.node(children[0]);
            let expected_y = -surface.size.1 / 2. + JOINT_HEIGHT / 2.;
            assert_eq!(trim.transform.position.y, expected_y);
            assert!((expected_y + 11.8).abs() < 1e-12);
            assert!(matches!(trim.kind, NodeKind::Mesh(_)));
        }
    }

    #[test]
    fn wall_textures_repeat_per_panel() {
        let ctx = composed();
        let repeat = |name: &str| {
            let id = ctx.scene.find(name).unwrap();
            let map = ctx.scene.node(id).as_mesh().unwrap().material.map.clone().unwrap();
            (map.repeat.x, map.repeat.y)
        };
        assert_eq!(repeat("wall:back"), (20., 13.));
        assert_eq!(repeat("wall:left"), (35., 13.));
        assert_eq!(repeat("wall:top"), (20., 35.));
    }

    #[test]
    fn floor_and_trim_maps_are_turned_a_quarter() {
        use crate::objects::texture::Wrap;

        let ctx = composed();
        let map = |name: &str| {
            let id = ctx.scene.find(name).unwrap();
            ctx.scene.node(id).as_mesh().unwrap().material.map.clone().unwrap()
        };

        let floor = map("floor");
        assert_eq!(floor.wrap, Wrap::Repeat);
        assert_eq!((floor.repeat.x, floor.repeat.y), (4., 4.));
        assert_eq!(floor.rotation, FRAC_PI_2);

        for name in ["trim:back", "trim:front", "trim:left", "trim:right"] {
            let trim = map(name);
            assert_eq!(trim.rotation, FRAC_PI_2, "{name}");
            assert_eq!((trim.repeat.x, trim.repeat.y), (1., 1.), "{name}");
        }
    }

    #[test]
    fn shadow_sits_under_ball() {
        let ctx = composed();
        let ball = ctx.scene.node(ctx.scene.find("ball").unwrap());
        let shadow = ctx.scene.node(ctx.scene.find("ball-shadow").unwrap());

        assert_eq!(ball.transform.position.x, shadow.transform.position.x);
        assert_eq!(ball.transform.position.z, shadow.transform.position.z);
        assert!(shadow.transform.position.y > 0.0 && shadow.transform.position.y < 0.1);
        assert_eq!(shadow.transform.scale, Vector3::new(BALL_RADIUS, BALL_RADIUS, 1.));

        let material = &shadow.as_mesh().unwrap().material;
        assert!(material.transparent);
        assert!(!material.depth_write);
    }

    #[test]
    fn single_light_near_ball() {
        let ctx = composed();
        let lights = collect_lights(&ctx.scene);
        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].pos, Point3::new(0., 12.5, -14.));
        assert_eq!(lights[0].light.intensity, 1.8);
        assert_eq!(lights[0].light.range, 34.);
    }

    #[test]
    fn camera_looks_at_orbit_target() {
        let ctx = composed();
        assert_eq!(ctx.orbit.target, Point3::new(0., 7., -26.));
        assert!((ctx.camera.pos - Point3::new(0., 10., 22.)).norm() < 1e-9);
        assert_eq!(ctx.camera.look_at_point(), ctx.orbit.target);
        assert_eq!(ctx.camera.fov_radians(), 60f64.to_radians());
        assert_eq!((ctx.camera.near_plane(), ctx.camera.far_plane()), (0.1, 200.));
    }

    #[test]
    fn clock_face_is_bound_and_tracked() {
        let ctx = composed();
        let id = ctx.clock_face.unwrap();
        let node = ctx.scene.node(id);
        assert_eq!(node.name, "clock-face");
        let material = &node.as_mesh().unwrap().material;
        assert_eq!(material.side, Side::Double);
        assert_eq!(material.map.as_ref().unwrap().texture.get().dimensions(), (512, 256));
    }

    #[test]
    fn composing_twice_does_not_accumulate() {
        let mut ctx = composed();
        let count = ctx.scene.len();
        let mut clock = ClockFace::new(fallback_font(), None);
        compose(
            &mut ctx,
            &RoomTextures::placeholders(),
            &mut clock,
            NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        );
        assert_eq!(ctx.scene.len(), count);
        // light, floor, walls group, 5 panels, 4 trims, ball, shadow, clock
        assert_eq!(count, 15);
    }
}
