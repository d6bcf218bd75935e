use image::Rgb;
use std::f64::consts::PI;

pub const BACKGROUND_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

// Room layout
pub const ROOM_X: f64 = 40.0;
pub const ROOM_Y: f64 = 25.0;
pub const ROOM_Z: f64 = 70.0;
pub const BALL_RADIUS: f64 = 7.0;
pub const JOINT_HEIGHT: f64 = 1.4;
pub const JOINT_DEPTH: f64 = 0.3;
pub const SPHERE_SEGMENTS: usize = 32;

// Texture tiling
pub const WALL_TILE_SIZE: f64 = 2.0;
pub const FLOOR_REPEAT: (f64, f64) = (4.0, 4.0);
pub const FLOOR_TEXTURE_ROTATION: f64 = PI / 2.0;
pub const JOINT_TEXTURE_ROTATION: f64 = PI / 2.0;

// Camera settings
pub const FOV_DEGREES: f64 = 60.0;
pub const ASPECT_RATIO: f64 = 1.0;
pub const NEAR_PLANE: f64 = 0.1;
pub const FAR_PLANE: f64 = 200.0;
pub const CAMERA_POSITION: [f64; 3] = [0.0, 10.0, 22.0];

// Light behavior settings
pub const LIGHT_INTENSITY: f64 = 1.8;
pub const LIGHT_RANGE: f64 = 34.0;
pub const LIGHT_DECAY: f64 = 1.0;

// Clock face
pub const CLOCK_WIDTH: u32 = 512;
pub const CLOCK_HEIGHT: u32 = 256;
pub const CLOCK_FONT_PX: f32 = 90.0;
pub const CLOCK_INTERVAL_MS: u64 = 1000;
// Used when the host locale is unknown
pub const CLOCK_TIME_FORMAT: &str = "%H:%M:%S";
pub const CLOCK_LOCALE_FORMAT: &str = "%X";
pub const CLOCK_PHI: f64 = PI / 3.4;
pub const CLOCK_THETA: f64 = PI / 2.3;

// Assets
pub const FLOOR_TEXTURE_PATH: &str = "assets/img/floor.jpg";
pub const WALL_TEXTURE_PATH: &str = "assets/img/wall.jpg";
pub const WOOD_TEXTURE_PATH: &str = "assets/img/wood.jpg";
pub const SHADOW_TEXTURE_PATH: &str = "assets/img/roundshadow.png";
pub const CLOCK_FONT_PATH: &str = "assets/fonts/7segment.ttf";

// User interaction settings
pub const ZOOM_STEP: f64 = 0.95;
pub const ZOOM_SENSITIVITY_FACTOR: f64 = 0.02;
pub const MIN_ORBIT_DISTANCE: f64 = 1.0;
pub const MAX_ORBIT_DISTANCE: f64 = 150.0;

// Output surface size as a fraction of the physical viewport; lower it to
// trade sharpness for frame rate on slow machines
pub const RENDER_SCALE: f32 = 1.0;
