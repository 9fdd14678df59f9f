pub mod audio;
pub mod cli;
pub mod clock;
pub mod input;
pub mod math;
pub mod mode;
pub mod render;
pub mod scene;
pub mod settings;

pub use mode::{Mode, ObserveError, ObserveMode};
pub use scene::demo::create_city_scene;
pub use scene::loader::load_gltf_scene;
pub use settings::Settings;
